//! Schema-driven document binding

use crate::schema::types::{FieldType, Multiplicity, Schema};
use crate::value::{Array, Object, Value};
use crate::xml::model::Element;

/// Bind `element` under `schema`, producing the populated object graph
///
/// Fields are keyed by their normalized names. `Many` fields always bind as
/// arrays, empty when no occurrence matched; `Single` fields are present only
/// when the element or attribute occurred, so a lookup on an occurrence that
/// lacked an optional field yields `None` rather than an error. Significant
/// inline text binds under the `content` key.
pub fn materialize(schema: &Schema, element: &Element) -> Value {
    let mut object = Object::with_capacity(
        schema.attributes.len() + schema.elements.len() + usize::from(schema.has_content),
    );

    for (key, attr) in &schema.attributes {
        if let Some(value) = element.attributes.get(&attr.tag) {
            object.insert(key.clone(), value.clone());
        }
    }

    if schema.has_content {
        let text = element.text_content();
        if !text.is_empty() {
            object.insert("content", text);
        }
    }

    for (key, spec) in &schema.elements {
        let mut occurrences = element.child_elements().filter(|c| c.name == spec.tag);
        match spec.multiplicity {
            Multiplicity::Many => {
                let items: Array = occurrences.map(|c| field_value(&spec.ty, c)).collect();
                object.insert(key.clone(), items);
            }
            Multiplicity::Single => {
                if let Some(child) = occurrences.next() {
                    object.insert(key.clone(), field_value(&spec.ty, child));
                }
            }
        }
    }

    Value::Object(object)
}

fn field_value(ty: &FieldType, element: &Element) -> Value {
    match ty {
        FieldType::Text => Value::String(element.text_content()),
        FieldType::Nested(schema) => materialize(schema, element),
    }
}
