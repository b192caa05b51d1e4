//! Snapshot reader.
//!
//! Decoding happens in two steps. The first walks the record stream once,
//! in order, keeping strings, class names, class dumps and array dumps, and
//! setting instance field blobs aside. The second decodes each blob against
//! its class's field layout, which needs every class dump to be known.

use hql_core::Identifier;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};

use crate::cursor::Cursor;
use crate::error::{DecodeError, DecodeResult};
use crate::record::{
    ClassRecord, FieldDescriptor, Header, InstanceRecord, ObjectArrayRecord, ObjectRecord,
    PrimitiveArrayRecord, RawValue, Snapshot,
};
use crate::tag;

/// Decode a complete snapshot.
pub fn read_snapshot(bytes: &[u8]) -> DecodeResult<Snapshot> {
    let span = tracing::info_span!("read_snapshot", bytes_len = bytes.len());
    let _guard = span.enter();

    let mut reader = SnapshotReader::new(bytes)?;
    reader.read_records()?;
    let snapshot = reader.finish()?;

    info!(
        strings = snapshot.strings.len(),
        classes = snapshot.classes.len(),
        objects = snapshot.objects.len(),
        "Decoded snapshot"
    );
    Ok(snapshot)
}

/// Instance dump whose field blob waits for the class table.
struct PendingInstance<'a> {
    id: Identifier,
    class_id: Identifier,
    blob: &'a [u8],
    offset: usize,
}

enum PendingObject<'a> {
    Instance(PendingInstance<'a>),
    Decoded(ObjectRecord),
}

struct SnapshotReader<'a> {
    cursor: Cursor<'a>,
    header: Header,
    strings: HashMap<Identifier, String>,
    class_names: HashMap<Identifier, Identifier>,
    classes: Vec<ClassRecord>,
    objects: Vec<PendingObject<'a>>,
    skipped_records: usize,
    skipped_roots: usize,
}

impl<'a> SnapshotReader<'a> {
    fn new(bytes: &'a [u8]) -> DecodeResult<Self> {
        let mut cursor = Cursor::new(bytes);
        let header = read_header(&mut cursor)?;
        cursor.set_identifier_size(header.identifier_size as usize);
        debug!(
            format = %header.format,
            identifier_size = header.identifier_size,
            timestamp = header.timestamp,
            "Read snapshot header"
        );

        Ok(Self {
            cursor,
            header,
            strings: HashMap::new(),
            class_names: HashMap::new(),
            classes: Vec::new(),
            objects: Vec::new(),
            skipped_records: 0,
            skipped_roots: 0,
        })
    }

    // ==================== TOP-LEVEL RECORDS ====================

    fn read_records(&mut self) -> DecodeResult<()> {
        let id_size = self.cursor.identifier_size();
        while !self.cursor.eof() {
            let tag = self.cursor.read_u8()?;
            let _time_delta = self.cursor.read_u32()?;
            let length = self.cursor.read_u32()? as usize;
            let base = self.cursor.offset();
            let body = self.cursor.read_bytes(length)?;
            let mut record = Cursor::with_base(body, base, id_size);

            match tag {
                tag::STRING => self.read_string(&mut record)?,
                tag::LOAD_CLASS => self.read_load_class(&mut record)?,
                tag::HEAP_DUMP | tag::HEAP_DUMP_SEGMENT => self.read_heap_dump(&mut record)?,
                _ => {
                    trace!(tag, length, offset = base, "Skipping record");
                    self.skipped_records += 1;
                }
            }
        }
        debug!(
            skipped_records = self.skipped_records,
            skipped_roots = self.skipped_roots,
            "Finished record stream"
        );
        Ok(())
    }

    fn read_string(&mut self, record: &mut Cursor<'a>) -> DecodeResult<()> {
        let id = record.read_identifier()?;
        let text = String::from_utf8_lossy(record.read_rest()).into_owned();
        self.strings.insert(id, text);
        Ok(())
    }

    fn read_load_class(&mut self, record: &mut Cursor<'a>) -> DecodeResult<()> {
        let _serial = record.read_u32()?;
        let class_id = record.read_identifier()?;
        let _stack_serial = record.read_u32()?;
        let name_id = record.read_identifier()?;
        self.class_names.insert(class_id, name_id);
        Ok(())
    }

    // ==================== HEAP DUMP ====================

    fn read_heap_dump(&mut self, record: &mut Cursor<'a>) -> DecodeResult<()> {
        while !record.eof() {
            let offset = record.offset();
            let sub_tag = record.read_u8()?;
            match sub_tag {
                tag::ROOT_UNKNOWN | tag::ROOT_STICKY_CLASS | tag::ROOT_MONITOR_USED => {
                    self.skip_root(record, 1, 0)?
                }
                tag::ROOT_JNI_GLOBAL => self.skip_root(record, 2, 0)?,
                tag::ROOT_JNI_LOCAL | tag::ROOT_JAVA_FRAME | tag::ROOT_THREAD_OBJECT => {
                    self.skip_root(record, 1, 2)?
                }
                tag::ROOT_NATIVE_STACK | tag::ROOT_THREAD_BLOCK => self.skip_root(record, 1, 1)?,
                tag::CLASS_DUMP => self.read_class_dump(record)?,
                tag::INSTANCE_DUMP => self.read_instance_dump(record)?,
                tag::OBJECT_ARRAY_DUMP => self.read_object_array(record)?,
                tag::PRIMITIVE_ARRAY_DUMP => self.read_primitive_array(record)?,
                _ => return Err(DecodeError::unknown_heap_dump_tag(sub_tag, offset)),
            }
        }
        Ok(())
    }

    fn skip_root(&mut self, record: &mut Cursor<'a>, ids: usize, words: usize) -> DecodeResult<()> {
        record.skip_identifiers(ids)?;
        record.skip(4 * words)?;
        self.skipped_roots += 1;
        Ok(())
    }

    fn read_class_dump(&mut self, record: &mut Cursor<'a>) -> DecodeResult<()> {
        let id = record.read_identifier()?;
        let _stack_serial = record.read_u32()?;
        let superclass_id = record.read_identifier()?;
        // class loader, signers, protection domain, two reserved
        record.skip_identifiers(5)?;
        let instance_size = record.read_u32()?;

        let constant_pool_size = record.read_u16()?;
        for _ in 0..constant_pool_size {
            let _index = record.read_u16()?;
            record.read_typed_value()?;
        }

        let static_count = record.read_u16()?;
        let mut static_fields = Vec::with_capacity(static_count as usize);
        for _ in 0..static_count {
            let name_id = record.read_identifier()?;
            let value = record.read_typed_value()?;
            static_fields.push((name_id, value));
        }

        let field_count = record.read_u16()?;
        let mut instance_fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let name_id = record.read_identifier()?;
            let ty = record.read_basic_type()?;
            instance_fields.push(FieldDescriptor { name_id, ty });
        }

        self.classes.push(ClassRecord {
            id,
            superclass_id,
            instance_size,
            static_fields,
            instance_fields,
        });
        Ok(())
    }

    fn read_instance_dump(&mut self, record: &mut Cursor<'a>) -> DecodeResult<()> {
        let id = record.read_identifier()?;
        let _stack_serial = record.read_u32()?;
        let class_id = record.read_identifier()?;
        let length = record.read_u32()? as usize;
        let offset = record.offset();
        let blob = record.read_bytes(length)?;

        self.objects.push(PendingObject::Instance(PendingInstance {
            id,
            class_id,
            blob,
            offset,
        }));
        Ok(())
    }

    fn read_object_array(&mut self, record: &mut Cursor<'a>) -> DecodeResult<()> {
        let id = record.read_identifier()?;
        let _stack_serial = record.read_u32()?;
        let count = record.read_u32()? as usize;
        let _element_class_id = record.read_identifier()?;

        let mut elements = Vec::with_capacity(count.min(record.remaining()));
        for _ in 0..count {
            elements.push(record.read_identifier()?);
        }

        self.objects
            .push(PendingObject::Decoded(ObjectRecord::ObjectArray(ObjectArrayRecord {
                id,
                elements,
            })));
        Ok(())
    }

    fn read_primitive_array(&mut self, record: &mut Cursor<'a>) -> DecodeResult<()> {
        let id = record.read_identifier()?;
        let _stack_serial = record.read_u32()?;
        let count = record.read_u32()? as usize;
        let element_type = record.read_basic_type()?;

        let mut elements = Vec::with_capacity(count.min(record.remaining()));
        for _ in 0..count {
            elements.push(record.read_primitive(element_type)?);
        }

        self.objects.push(PendingObject::Decoded(ObjectRecord::PrimitiveArray(
            PrimitiveArrayRecord {
                id,
                element_type,
                elements,
            },
        )));
        Ok(())
    }

    // ==================== FIELD DECODING ====================

    fn finish(self) -> DecodeResult<Snapshot> {
        let id_size = self.header.identifier_size as usize;
        let class_index: HashMap<Identifier, &ClassRecord> =
            self.classes.iter().map(|c| (c.id, c)).collect();

        let mut objects = Vec::with_capacity(self.objects.len());
        for pending in self.objects {
            let record = match pending {
                PendingObject::Decoded(record) => record,
                PendingObject::Instance(instance) => ObjectRecord::Instance(decode_instance(
                    &class_index,
                    &instance,
                    id_size,
                )?),
            };
            objects.push(record);
        }

        Ok(Snapshot {
            header: self.header,
            strings: self.strings,
            class_names: self.class_names,
            classes: self.classes,
            objects,
        })
    }
}

fn read_header(cursor: &mut Cursor<'_>) -> DecodeResult<Header> {
    let mut format = Vec::new();
    loop {
        match cursor.read_u8() {
            Ok(0) => break,
            Ok(b) => format.push(b),
            Err(_) => return Err(DecodeError::UnterminatedHeader),
        }
    }
    let identifier_size = cursor.read_u32()?;
    if identifier_size != 4 && identifier_size != 8 {
        return Err(DecodeError::UnsupportedIdentifierSize {
            size: identifier_size,
        });
    }
    let timestamp = cursor.read_u64()?;

    Ok(Header {
        format: String::from_utf8_lossy(&format).into_owned(),
        identifier_size,
        timestamp,
    })
}

/// Decode an instance blob by walking its class and then each superclass.
fn decode_instance(
    classes: &HashMap<Identifier, &ClassRecord>,
    instance: &PendingInstance<'_>,
    id_size: usize,
) -> DecodeResult<InstanceRecord> {
    let mut cursor = Cursor::with_base(instance.blob, instance.offset, id_size);
    let mut fields: Vec<(Identifier, RawValue)> = Vec::new();
    let mut seen = HashSet::new();
    let mut visited = HashSet::new();

    let mut class_id = instance.class_id;
    while !class_id.is_null() {
        if !visited.insert(class_id) {
            return Err(DecodeError::CyclicHierarchy { class: class_id });
        }
        let class = classes.get(&class_id).ok_or(DecodeError::UnknownClass {
            instance: instance.id,
            class: class_id,
        })?;

        for field in &class.instance_fields {
            let value = cursor.read_value(field.ty).map_err(|_| {
                DecodeError::FieldLengthMismatch {
                    instance: instance.id,
                    declared: instance.blob.len(),
                    needed: layout_size(classes, instance.class_id, id_size),
                }
            })?;
            // A field shadowed by a subclass keeps the subclass value.
            if seen.insert(field.name_id) {
                fields.push((field.name_id, value));
            }
        }
        class_id = class.superclass_id;
    }

    if !cursor.eof() {
        return Err(DecodeError::FieldLengthMismatch {
            instance: instance.id,
            declared: instance.blob.len(),
            needed: cursor.position(),
        });
    }

    Ok(InstanceRecord {
        id: instance.id,
        class_id: instance.class_id,
        fields,
    })
}

/// Total field bytes of a class and its ancestors.
fn layout_size(classes: &HashMap<Identifier, &ClassRecord>, class_id: Identifier, id_size: usize) -> usize {
    let mut size = 0;
    let mut visited = HashSet::new();
    let mut current = classes.get(&class_id);
    while let Some(class) = current {
        if !visited.insert(class.id) {
            break;
        }
        size += class
            .instance_fields
            .iter()
            .map(|f| f.ty.size(id_size))
            .sum::<usize>();
        current = classes.get(&class.superclass_id);
    }
    size
}
