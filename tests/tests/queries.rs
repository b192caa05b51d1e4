//! End-to-end query tests: query text in, rendered rows out.

use hql_graph::Heap;
use hql_query::QueryResults;
use hql_session::{run_query, Session, SessionError};
use hql_tests::prelude::*;
use pretty_assertions::assert_eq;

fn people() -> Heap {
    Heap::from_bytes(&fixtures::people()).unwrap()
}

fn names(results: &QueryResults) -> Vec<&str> {
    results.column("name")
}

mod projection {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_all_returns_declared_fields() {
        // GIVEN
        let heap = people();

        // WHEN
        let results = run_query(&heap, "SELECT * FROM com.example.Person").unwrap();

        // THEN
        assert_eq!(results.column_names(), fixtures::PERSON_FIELDS);
        assert_eq!(results.len(), 4);
        for row in &results {
            assert_eq!(row.names(), fixtures::PERSON_FIELDS);
        }
        assert_eq!(
            results.rows()[0].cells(),
            [
                "\"Alice\"",
                "30",
                "\"Msk\"",
                "true",
                "91.5",
                "(object com.example.Person)",
                "[\"Al\", \"Ally\"]",
            ]
        );
    }

    #[test]
    fn test_subclass_instances_are_excluded() {
        let heap = people();

        let results = run_query(&heap, "SELECT name FROM com.example.Person").unwrap();

        assert_eq!(names(&results), vec!["\"Alice\"", "\"Bob\"", "\"Carol\"", "\"Dave\""]);
    }

    #[test]
    fn test_expressions_and_aliases() {
        let heap = people();

        let results = run_query(
            &heap,
            "SELECT name + '@' + city AS who, friend.friend.name, score / 2 \
             FROM com/example/Person WHERE friend != null",
        )
        .unwrap();

        assert_eq!(results.column_names(), ["who", "friend.friend.name", "score / 2"]);
        assert_eq!(results.column("who"), vec!["\"Alice@Msk\"", "\"Bob@Spb\"", "\"Dave@Msk\""]);
        assert_eq!(
            results.column("friend.friend.name"),
            vec!["\"Alice\"", "\"Bob\"", "\"Bob\""]
        );
        assert_eq!(results.column("score / 2"), vec!["45.75", "36.0", "30.0"]);
    }
}

mod precedence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_and_binds_tighter_than_or() {
        let heap = people();

        let results = run_query(
            &heap,
            "SELECT name FROM com.example.Person \
             WHERE age > 18 OR city = 'Msk' AND active = true",
        )
        .unwrap();

        assert_eq!(names(&results), vec!["\"Alice\"", "\"Carol\"", "\"Dave\""]);
    }

    #[test]
    fn test_parentheses_are_honored() {
        let heap = people();

        let results = run_query(
            &heap,
            "SELECT name FROM com.example.Person \
             WHERE (age > 18 OR city = 'Msk') AND active = true",
        )
        .unwrap();

        assert_eq!(names(&results), vec!["\"Alice\"", "\"Dave\""]);
    }
}

mod pipeline {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sort_then_offset_then_limit() {
        let heap = Heap::from_bytes(&fixtures::numbers(&[3, 1, 2])).unwrap();

        let results = run_query(&heap, "SELECT x FROM Row ORDER BY x LIMIT 1 OFFSET 1").unwrap();

        assert_eq!(results.column("x"), vec!["2"]);
    }

    #[test]
    fn test_offset_past_the_end() {
        let heap = Heap::from_bytes(&fixtures::numbers(&[3, 1, 2])).unwrap();

        let results = run_query(&heap, "SELECT x FROM Row OFFSET 5").unwrap();

        assert!(results.is_empty());
        assert_eq!(results.column_names(), ["x"]);
    }

    #[test]
    fn test_descending_text_sort() {
        let heap = people();

        let results = run_query(
            &heap,
            "SELECT name FROM com.example.Person WHERE city = 'Msk' ORDER BY name DESC LIMIT 2",
        )
        .unwrap();

        assert_eq!(names(&results), vec!["\"Dave\"", "\"Carol\""]);
    }

    #[test]
    fn test_session_reuses_tables() {
        let heap = people();
        let mut session = Session::new(&heap);

        for _ in 0..3 {
            let results = session.run_query("SELECT age FROM com.example.Person LIMIT 1").unwrap();
            assert_eq!(results.column("age"), vec!["30"]);
        }
        assert_eq!(session.cached_tables(), 1);
    }
}

mod primitives {
    use super::*;
    use pretty_assertions::assert_eq;

    fn samples() -> Heap {
        let mut builder = SnapshotBuilder::new();
        let sample = builder.class(
            "Sample",
            None,
            &[
                ("v", BasicType::Object),
                ("c", BasicType::Char),
                ("f", BasicType::Float),
            ],
        );
        for (text, c, f) in [("abc", b'A', 0.1f32), ("abb", b'B', 2.5f32)] {
            let chars = builder.char_array(text);
            builder.instance(
                sample,
                &[
                    ("v", FieldValue::Ref(chars)),
                    ("c", FieldValue::Char(u16::from(c))),
                    ("f", FieldValue::Float(f)),
                ],
            );
        }
        Heap::from_bytes(&builder.build()).unwrap()
    }

    #[test]
    fn test_char_array_field_queries_as_text() {
        let heap = samples();

        let matched = run_query(&heap, "SELECT v FROM Sample WHERE v = 'abc'").unwrap();
        let sorted = run_query(&heap, "SELECT v FROM Sample ORDER BY v").unwrap();

        assert_eq!(matched.column("v"), vec!["\"abc\""]);
        assert_eq!(sorted.column("v"), vec!["\"abb\"", "\"abc\""]);
    }

    #[test]
    fn test_char_and_float_fields_render_as_written() {
        let heap = samples();

        let results = run_query(&heap, "SELECT c, f FROM Sample").unwrap();

        assert_eq!(results.column("c"), vec!["\"A\"", "\"B\""]);
        assert_eq!(results.column("f"), vec!["0.1", "2.5"]);
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_logical_operand_type_error() {
        let heap = people();

        let err = run_query(&heap, "SELECT * FROM com.example.Person WHERE name AND age").unwrap_err();

        assert_eq!(
            err.to_string(),
            "left operand of AND should be boolean (got java.lang.String)"
        );
    }

    #[test]
    fn test_unknown_class() {
        let heap = people();

        let err = run_query(&heap, "SELECT nope FROM NoSuchClass WHERE 1 + 'x' ORDER BY z").unwrap_err();

        assert_eq!(err.to_string(), "no such class: NoSuchClass");
    }

    #[test]
    fn test_string_literal_against_boolean_field() {
        let heap = people();

        let err = run_query(&heap, "SELECT * FROM com.example.Person WHERE active = 'true'")
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "comparing values of type boolean and string is not supported"
        );
    }

    #[test]
    fn test_parse_error_position() {
        let heap = people();

        let err = run_query(&heap, "SELECT name\nFROM com.example.Person\nWHERE age >").unwrap_err();

        let SessionError::Parse(parse) = err else {
            panic!("expected a parse error");
        };
        assert_eq!(parse.span.line, 3);
    }
}

mod files {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_query_a_snapshot_on_disk() {
        // GIVEN
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&fixtures::people()).unwrap();
        file.flush().unwrap();

        // WHEN
        let heap = Heap::open(file.path()).unwrap();
        let results = run_query(&heap, "SELECT salary FROM com.example.Employee").unwrap();

        // THEN
        assert_eq!(results.column("salary"), vec!["120000"]);
    }
}
