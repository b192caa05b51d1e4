//! Rendering values as table cells.

use hql_core::{ObjectRef, Value};
use hql_graph::{FieldValue, Heap};

/// Render a value as cell text.
///
/// Text (string values, `java.lang.String` objects, `char[]` and `byte[]`)
/// is double-quoted. Other arrays list their elements. Plain objects and
/// classes show their type.
pub fn render_value(heap: &Heap, value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => render_float(*f),
        Value::Str(s) => quote(s),
        Value::Object(node) => render_object(heap, *node),
    }
}

/// Shortest text that reads back as the same float, keeping a `.0` on
/// whole numbers. Values that fit an `f32` exactly are printed at that
/// width, so `float` fields read as they were written.
fn render_float(f: f64) -> String {
    let narrow = f as f32;
    if f64::from(narrow) == f {
        format!("{:?}", narrow)
    } else {
        format!("{:?}", f)
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text)
}

fn render_object(heap: &Heap, node: ObjectRef) -> String {
    if let Some(text) = heap.text_of(node) {
        return quote(&text);
    }
    match node {
        ObjectRef::Class(id) => format!("(class {})", heap.class(id).name),
        ObjectRef::Instance(id) => format!("(object {})", heap.class_of(id).name),
        ObjectRef::Array(id) => {
            let array = heap.array(id);
            let elements: Vec<String> = array
                .elements
                .iter()
                .map(|element| render_element(heap, element))
                .collect();
            format!("[{}]", elements.join(", "))
        }
    }
}

/// Array elements: scalars and strings in full, anything else by type.
fn render_element(heap: &Heap, element: &FieldValue) -> String {
    match element {
        FieldValue::Null => "null".to_string(),
        FieldValue::Primitive(p) => render_value(heap, &Value::from(*p)),
        FieldValue::Ref(node @ ObjectRef::Instance(id)) if heap.is_string(*id) => {
            render_object(heap, *node)
        }
        FieldValue::Ref(node) => heap.type_name(*node),
    }
}
