//! Heap graph integration tests.
//!
//! Snapshots are written by the builder, decoded and resolved into a heap.

use hql_core::{Identifier, ObjectRef};
use hql_graph::{FieldValue as Resolved, Heap};
use hql_tests::prelude::*;

fn node(heap: &Heap, raw: u64) -> ObjectRef {
    heap.resolve(Identifier::new(raw)).unwrap()
}

fn next(heap: &Heap, of: ObjectRef) -> ObjectRef {
    let instance = heap.instance(of.as_instance().unwrap());
    instance.field("next").and_then(Resolved::as_ref).unwrap()
}

mod identity {
    use super::*;

    #[test]
    fn test_distinct_identifiers_map_to_distinct_nodes() {
        // GIVEN
        let heap = Heap::from_bytes(&fixtures::people()).unwrap();

        // WHEN
        let mut seen = std::collections::HashSet::new();
        for instance in heap.instances() {
            seen.insert(heap.resolve(instance.id).unwrap());
        }

        // THEN
        assert_eq!(seen.len(), heap.instances().len());
    }

    #[test]
    fn test_shared_references_resolve_to_one_node() {
        let heap = Heap::from_bytes(&fixtures::people()).unwrap();
        let person = heap.class_by_name(fixtures::PERSON).unwrap();
        let (bob, dave) = (person.instances[1], person.instances[3]);

        // Bob and Dave are both friends with Alice.
        let bobs_friend = heap.instance(bob).field("friend").copied();
        let daves_friend = heap.instance(dave).field("friend").copied();

        assert_eq!(bobs_friend, daves_friend);
        assert_eq!(
            bobs_friend.and_then(|f| f.as_ref()),
            Some(ObjectRef::Instance(person.instances[0]))
        );
    }

    #[test]
    fn test_identifier_round_trip() {
        let heap = Heap::from_bytes(&fixtures::people()).unwrap();

        for class in heap.classes() {
            let node = heap.resolve(class.id).unwrap();
            assert_eq!(heap.identifier(node), class.id);
        }
    }
}

mod cycles {
    use super::*;

    #[test]
    fn test_mutual_references_terminate() {
        // GIVEN
        let (bytes, a, b) = fixtures::cycle();

        // WHEN
        let heap = Heap::from_bytes(&bytes).unwrap();

        // THEN
        let (a, b) = (node(&heap, a), node(&heap, b));
        assert_eq!(next(&heap, a), b);
        assert_eq!(next(&heap, next(&heap, a)), a);
    }

    #[test]
    fn test_self_containing_array_terminates() {
        // GIVEN
        let mut builder = SnapshotBuilder::new();
        let array = builder.object_array(&[]);
        builder.set_elements(array, &[array, 0]);

        // WHEN
        let heap = Heap::from_bytes(&builder.build()).unwrap();

        // THEN
        let node = node(&heap, array);
        let elements = &heap.array(node.as_array().unwrap()).elements;
        assert_eq!(elements, &vec![Resolved::Ref(node), Resolved::Null]);
    }
}

mod layouts {
    use super::*;

    fn person_names(heap: &Heap) -> Vec<String> {
        let person = heap.class_by_name(fixtures::PERSON).unwrap();
        person
            .instances
            .iter()
            .map(|id| {
                let name = heap.instance(*id).field("name").unwrap().as_ref().unwrap();
                heap.text_of(name).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_layout_options_build_the_same_heap() {
        let expected = vec!["Alice", "Bob", "Carol", "Dave"];

        for builder in [
            SnapshotBuilder::new(),
            SnapshotBuilder::new().identifier_size(8),
            SnapshotBuilder::new().compact_strings(true),
            SnapshotBuilder::new().split_segments(true),
            SnapshotBuilder::new().objects_first(true),
        ] {
            let heap = Heap::from_bytes(&fixtures::people_with(builder)).unwrap();
            assert_eq!(person_names(&heap), expected);
        }
    }

    #[test]
    fn test_header() {
        let bytes = fixtures::people_with(SnapshotBuilder::new().identifier_size(8).timestamp(42));

        let heap = Heap::from_bytes(&bytes).unwrap();

        assert_eq!(heap.header().format, "JAVA PROFILE 1.0.2");
        assert_eq!(heap.header().identifier_size, 8);
        assert_eq!(heap.header().timestamp, 42);
    }

    #[test]
    fn test_statics_and_superclass() {
        let heap = Heap::from_bytes(&fixtures::people()).unwrap();

        let person = heap.class_by_name(fixtures::PERSON).unwrap();
        let employee = heap.class_by_name("com.example.Employee").unwrap();

        assert_eq!(person.static_field("COUNT").map(ToString::to_string).as_deref(), Some("4"));
        assert_eq!(heap.class(employee.superclass.unwrap()).name, fixtures::PERSON);
        let erin = heap.instance(employee.instances[0]);
        let names: Vec<&str> = erin.fields.keys().map(String::as_str).collect();
        assert_eq!(names[0], "salary");
        assert!(names.contains(&"age"));
    }
}

mod files {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_mapped_file() {
        // GIVEN
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&fixtures::people()).unwrap();
        file.flush().unwrap();

        // WHEN
        let heap = Heap::open(file.path()).unwrap();

        // THEN
        assert_eq!(heap.class_by_name(fixtures::PERSON).unwrap().instances.len(), 4);
    }

    #[test]
    fn test_open_truncated_file() {
        let mut bytes = fixtures::people();
        bytes.truncate(bytes.len() - 3);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        assert!(Heap::open(file.path()).is_err());
    }
}
