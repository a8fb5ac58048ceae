//! Compact JSON rendering for materialized values and inferred schemas

use crate::schema::types::{FieldType, Multiplicity, Schema};
use crate::value::Value;

/// Render a materialized value as compact JSON
pub fn value_to_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => format!("\"{}\"", escape_json(s)),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(value_to_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(obj) => {
            let pairs: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("\"{}\":{}", escape_json(k), value_to_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

/// Render an inferred schema as compact JSON
///
/// Attribute fields map normalized name to original tag; element fields carry
/// the original tag, multiplicity and either `"text"` or the nested schema.
pub fn schema_to_json(schema: &Schema) -> String {
    let mut pairs = vec![format!("\"tag\":\"{}\"", escape_json(&schema.tag))];

    if let Some(prefix) = &schema.prefix {
        pairs.push(format!("\"prefix\":\"{}\"", escape_json(prefix)));
    }

    if !schema.namespaces.is_empty() {
        let bindings: Vec<String> = schema
            .namespaces
            .iter()
            .map(|(p, uri)| format!("\"{}\":\"{}\"", escape_json(p), escape_json(uri)))
            .collect();
        pairs.push(format!("\"namespaces\":{{{}}}", bindings.join(",")));
    }

    pairs.push(format!("\"has_content\":{}", schema.has_content));

    let attributes: Vec<String> = schema
        .attributes
        .iter()
        .map(|(key, attr)| format!("\"{}\":\"{}\"", escape_json(key), escape_json(&attr.tag)))
        .collect();
    pairs.push(format!("\"attributes\":{{{}}}", attributes.join(",")));

    let elements: Vec<String> = schema
        .elements
        .iter()
        .map(|(key, spec)| {
            let ty = match &spec.ty {
                FieldType::Text => "\"text\"".to_string(),
                FieldType::Nested(nested) => schema_to_json(nested),
            };
            let multiplicity = match spec.multiplicity {
                Multiplicity::Single => "single",
                Multiplicity::Many => "many",
            };
            format!(
                "\"{}\":{{\"tag\":\"{}\",\"multiplicity\":\"{multiplicity}\",\"type\":{ty}}}",
                escape_json(key),
                escape_json(&spec.tag)
            )
        })
        .collect();
    pairs.push(format!("\"elements\":{{{}}}", elements.join(",")));

    format!("{{{}}}", pairs.join(","))
}

fn escape_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::value::{Array, Object};

    #[test]
    fn test_value_to_json() {
        let mut obj = Object::new();
        obj.insert("name", "a \"quoted\" value");
        let mut arr = Array::new();
        arr.push("one");
        arr.push("two");
        obj.insert("items", arr);
        assert_eq!(
            value_to_json(&Value::Object(obj)),
            "{\"name\":\"a \\\"quoted\\\" value\",\"items\":[\"one\",\"two\"]}"
        );
    }

    #[test]
    fn test_null_renders() {
        assert_eq!(value_to_json(&Value::Null), "null");
    }

    #[test]
    fn test_control_characters_escaped() {
        let rendered = value_to_json(&Value::String("a\u{1}b\nc".to_string()));
        assert_eq!(rendered, "\"a\\u0001b\\nc\"");
    }

    #[test]
    fn test_schema_to_json_shape() {
        let root = match crate::xml::Parser::new(b"<r><image>a</image><image>b</image></r>").parse()
        {
            Ok(doc) => doc.root,
            Err(_) => return,
        };
        let schema = crate::schema::infer(&root).expect("schema");
        let rendered = schema_to_json(&schema);
        assert!(rendered.contains("\"tag\":\"r\""));
        assert!(rendered.contains("\"image\":{\"tag\":\"image\",\"multiplicity\":\"many\",\"type\":\"text\"}"));
    }
}
