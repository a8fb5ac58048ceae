//! Schema inference over a parsed element tree

use tracing::debug;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::schema::merge::merge;
use crate::schema::name::normalize;
use crate::schema::types::{AttributeSpec, ElementSpec, FieldType, Multiplicity, Schema};
use crate::xml::model::Element;

/// Infer the schema describing `root` and the subtree below it
///
/// One top-down pass in document order. The first occurrence of a child tag
/// fixes its field's position; later occurrences of the same tag are merge
/// events that unify the field's type and promote it to `Many`.
pub fn infer(root: &Element) -> Result<Schema> {
    debug!(root = %root.name, "inferring document schema");
    let mut path = Vec::new();
    build(root, &mut path)
}

/// Whether an element carries significant inline text
///
/// True iff at least one direct text child trims to non-empty. Whitespace-only
/// text contributes nothing.
pub fn has_significant_text(element: &Element) -> bool {
    element.text_children().any(|t| !t.trim().is_empty())
}

/// Whether an element infers as primitive text rather than a nested schema
///
/// Text-only elements have no child elements and no attributes; their text,
/// if any, becomes the field value at the parent.
pub fn is_text_only(element: &Element) -> bool {
    !element.has_element_children() && element.attributes.is_empty()
}

fn build(element: &Element, path: &mut Vec<String>) -> Result<Schema> {
    if element.name.is_empty() {
        return Err(unsupported_element(path));
    }
    path.push(element.name.clone());
    let result = build_inner(element, path);
    path.pop();
    result
}

fn build_inner(element: &Element, path: &mut Vec<String>) -> Result<Schema> {
    let mut schema = Schema::new(&element.name);
    schema.prefix = element.prefix.clone();
    for (prefix, uri) in &element.namespaces {
        schema.register_namespace(prefix, uri);
    }

    for attr_name in element.attributes.keys() {
        let key = normalize(attr_name);
        if let Some(existing) = schema.attributes.get(&key) {
            if existing.tag != *attr_name {
                return Err(schema_conflict(
                    path,
                    format!(
                        "attributes `{}` and `{attr_name}` both normalize to `{key}`",
                        existing.tag
                    ),
                ));
            }
            continue;
        }
        schema.attributes.insert(
            key.clone(),
            AttributeSpec {
                name: key,
                tag: attr_name.clone(),
            },
        );
    }

    schema.has_content = has_significant_text(element);

    for child in element.child_elements() {
        if child.name.is_empty() {
            return Err(unsupported_element(path));
        }
        let key = normalize(&child.name);

        let ty = if is_text_only(child) {
            FieldType::Text
        } else {
            FieldType::Nested(Box::new(build(child, path)?))
        };

        if let Some(existing) = schema.elements.get_mut(&key) {
            if existing.tag != child.name {
                return Err(schema_conflict(
                    path,
                    format!(
                        "elements `{}` and `{}` both normalize to `{key}`",
                        existing.tag, child.name
                    ),
                ));
            }

            // Merge event: a later occurrence of an already-seen tag.
            debug!(parent = %element.name, child = %child.name, "unifying repeated child schemas");
            let superseded = std::mem::replace(&mut existing.ty, FieldType::Text);
            existing.ty = unify_field(superseded, ty, &child.name, path)?;
            existing.multiplicity = Multiplicity::Many;
        } else {
            schema.elements.insert(
                key.clone(),
                ElementSpec {
                    name: key,
                    tag: child.name.clone(),
                    ty,
                    multiplicity: Multiplicity::Single,
                },
            );
        }
    }

    Ok(schema)
}

/// Unify the types of two occurrences of one field
pub(crate) fn unify_field(
    existing: FieldType,
    incoming: FieldType,
    tag: &str,
    path: &mut Vec<String>,
) -> Result<FieldType> {
    match (existing, incoming) {
        (FieldType::Text, FieldType::Text) => Ok(FieldType::Text),
        (FieldType::Nested(existing), FieldType::Nested(incoming)) => {
            path.push(tag.to_string());
            let merged = merge(*existing, *incoming, path);
            path.pop();
            Ok(FieldType::Nested(Box::new(merged?)))
        }
        _ => Err(schema_conflict(
            path,
            format!("element `{tag}` is text in one occurrence and structured in another"),
        )),
    }
}

pub(crate) fn schema_conflict(path: &[String], detail: String) -> Error {
    let path = render_path(path);
    Error::with_message(
        ErrorKind::SchemaConflict { path: path.clone() },
        Span::empty(),
        format!("schema conflict at {path}: {detail}"),
    )
}

fn unsupported_element(path: &[String]) -> Error {
    let path = render_path(path);
    Error::with_message(
        ErrorKind::UnsupportedElement { path: path.clone() },
        Span::empty(),
        format!("element with empty name under {path}"),
    )
}

fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        "document root".to_string()
    } else {
        path.join("/")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::xml::model::Content;

    fn parse_root(input: &str) -> Element {
        match crate::xml::Parser::new(input.as_bytes()).parse() {
            Ok(doc) => doc.root,
            Err(err) => panic!("fixture must parse: {err}"),
        }
    }

    #[test]
    fn test_leaf_elements_become_text_fields() {
        let root = parse_root("<address><street>Milchstrasse</street><city>Oldenburg</city></address>");
        let schema = infer(&root).expect("schema");
        assert_eq!(schema.elements.len(), 2);
        let street = schema.element("street").expect("street field");
        assert!(street.ty.is_text());
        assert_eq!(street.multiplicity, Multiplicity::Single);
        assert_eq!(street.tag, "street");
    }

    #[test]
    fn test_camel_cased_tags_normalize() {
        let root = parse_root("<a><mobilePhone operatorName=\"vodafone\">123</mobilePhone></a>");
        let schema = infer(&root).expect("schema");
        let phone = schema.element("mobile_phone").expect("mobile_phone field");
        let nested = phone.ty.as_nested().expect("nested schema");
        assert!(nested.has_content);
        assert_eq!(
            nested.attribute("operator_name").map(|a| a.tag.as_str()),
            Some("operatorName")
        );
    }

    #[test]
    fn test_text_only_child_with_whitespace() {
        let root = parse_root("<root><note>   </note></root>");
        let schema = infer(&root).expect("schema");
        let note = schema.element("note").expect("note field");
        assert!(note.ty.is_text());
        assert!(!schema.has_content);
    }

    #[test]
    fn test_content_with_attribute_is_nested() {
        let root = parse_root("<root><country code=\"de\">Germany</country></root>");
        let schema = infer(&root).expect("schema");
        let country = schema.element("country").expect("country field");
        let nested = country.ty.as_nested().expect("nested schema");
        assert!(nested.has_content);
        assert!(nested.attribute("code").is_some());
        assert!(nested.elements.is_empty());
    }

    #[test]
    fn test_repeated_text_children_promote_to_many() {
        let root = parse_root("<r><name>value</name><image>a</image><image>b</image></r>");
        let schema = infer(&root).expect("schema");
        assert_eq!(
            schema.element("name").map(|s| s.multiplicity),
            Some(Multiplicity::Single)
        );
        assert_eq!(
            schema.element("image").map(|s| s.multiplicity),
            Some(Multiplicity::Many)
        );
    }

    #[test]
    fn test_elements_keep_first_seen_order() {
        let root = parse_root("<r><b/><a/><c/><a/></r>");
        let schema = infer(&root).expect("schema");
        let keys: Vec<_> = schema.elements.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_attribute_collision_is_conflict() {
        let root = parse_root("<r fooBar=\"1\" foo-bar=\"2\"/>");
        let result = infer(&root);
        assert!(matches!(
            result.map_err(|e| e.kind().clone()),
            Err(ErrorKind::SchemaConflict { .. })
        ));
    }

    #[test]
    fn test_element_tag_collision_is_conflict() {
        let root = parse_root("<r><fooBar>a</fooBar><foo-bar>b</foo-bar></r>");
        let result = infer(&root);
        assert!(matches!(
            result.map_err(|e| e.kind().clone()),
            Err(ErrorKind::SchemaConflict { .. })
        ));
    }

    #[test]
    fn test_text_vs_structured_is_conflict() {
        let root = parse_root("<r><x>plain</x><x lang=\"en\">text</x></r>");
        let result = infer(&root);
        let err = match result {
            Err(err) => err,
            Ok(_) => panic!("expected conflict"),
        };
        assert!(matches!(err.kind(), ErrorKind::SchemaConflict { .. }));
        assert!(err.message().contains("r/x") || err.message().contains("`x`"));
    }

    #[test]
    fn test_empty_element_name_is_unsupported() {
        let mut root = Element::new("root");
        root.children.push(Content::Element(Element::new("")));
        let result = infer(&root);
        assert!(matches!(
            result.map_err(|e| e.kind().clone()),
            Err(ErrorKind::UnsupportedElement { .. })
        ));
    }

    #[test]
    fn test_namespaces_registered_on_schema() {
        let root = parse_root("<r xmlns=\"urn:d\" xmlns:p=\"urn:p\"><p:c attr=\"1\"/></r>");
        let schema = infer(&root).expect("schema");
        assert_eq!(schema.namespaces.len(), 2);
        let child = schema.element("c").expect("c field");
        let nested = child.ty.as_nested().expect("nested schema");
        assert_eq!(nested.prefix.as_deref(), Some("p"));
        assert_eq!(nested.namespaces.get("p").map(String::as_str), Some("urn:p"));
    }
}
