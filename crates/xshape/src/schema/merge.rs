//! Schema unification for repeated occurrences of one tag

use tracing::debug;

use crate::error::Result;
use crate::schema::infer::{schema_conflict, unify_field};
use crate::schema::types::{FieldType, Schema};

/// Unify two schemas inferred for the same tag into one consistent shape
///
/// The merged schema is `incoming` plus everything missing from it that
/// `existing` has: attributes and element fields present on only one side are
/// carried over unchanged (a field missing from an occurrence is optional,
/// never an error), matching nested fields merge recursively, and a matched
/// field is `Many` when either side already was. Both inputs are consumed; a
/// fresh schema is returned.
///
/// The produced field set does not depend on which occurrence arrived first,
/// so repeated merges across many siblings converge to one stable shape.
pub fn merge(existing: Schema, incoming: Schema, path: &mut Vec<String>) -> Result<Schema> {
    debug!(tag = %incoming.tag, "merging schemas");
    let mut merged = incoming;

    merged.has_content = merged.has_content || existing.has_content;

    for (prefix, uri) in existing.namespaces {
        merged.register_namespace(prefix, uri);
    }

    for (key, attr) in existing.attributes {
        match merged.attributes.get(&key) {
            None => {
                merged.attributes.insert(key, attr);
            }
            Some(present) if present.tag != attr.tag => {
                return Err(schema_conflict(
                    path,
                    format!(
                        "attributes `{}` and `{}` both normalize to `{key}`",
                        present.tag, attr.tag
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    for (key, spec) in existing.elements {
        match merged.elements.get_mut(&key) {
            None => {
                merged.elements.insert(key, spec);
            }
            Some(counterpart) => {
                if counterpart.tag != spec.tag {
                    return Err(schema_conflict(
                        path,
                        format!(
                            "elements `{}` and `{}` both normalize to `{key}`",
                            counterpart.tag, spec.tag
                        ),
                    ));
                }
                counterpart.multiplicity = counterpart.multiplicity.combined(spec.multiplicity);
                let incoming_ty = std::mem::replace(&mut counterpart.ty, FieldType::Text);
                counterpart.ty = unify_field(spec.ty, incoming_ty, &spec.tag, path)?;
            }
        }
    }

    Ok(merged)
}
