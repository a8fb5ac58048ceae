//! Inferred schema data model
//!
//! A schema is plain data: inference produces it, the materializer interprets
//! it. No types are synthesized at runtime.

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Observed occurrence count for a field across instances
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Multiplicity {
    /// Exactly one occurrence in every instance seen so far
    Single,
    /// Two or more occurrences in at least one instance
    Many,
}

impl Multiplicity {
    pub fn is_many(self) -> bool {
        matches!(self, Self::Many)
    }

    /// Promotion is monotonic: `Many` wins over `Single` from either side
    pub fn combined(self, other: Self) -> Self {
        if self.is_many() || other.is_many() {
            Self::Many
        } else {
            Self::Single
        }
    }
}

/// Value type of an element field
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldType {
    /// Primitive text content
    Text,
    /// A nested element with its own schema
    Nested(Box<Schema>),
}

impl FieldType {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    pub fn as_nested(&self) -> Option<&Schema> {
        match self {
            Self::Nested(schema) => Some(schema),
            Self::Text => None,
        }
    }
}

/// Attribute field descriptor; attribute values are always text
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AttributeSpec {
    /// Normalized field name
    pub name: String,
    /// Original attribute name, kept for wire mapping
    pub tag: String,
}

/// Element field descriptor
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ElementSpec {
    /// Normalized field name
    pub name: String,
    /// Original local tag name, kept for wire mapping
    pub tag: String,
    pub ty: FieldType,
    pub multiplicity: Multiplicity,
}

/// The inferred record schema for one class of element
///
/// Keys of `attributes` and `elements` are normalized names, unique within
/// each map; `elements` iterates in first-seen order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Schema {
    /// Original local tag name
    pub tag: String,
    /// Namespace prefix the element was written with, if any
    pub prefix: Option<String>,
    /// Registered namespace bindings, prefix to URI
    pub namespaces: IndexMap<String, String>,
    pub attributes: IndexMap<String, AttributeSpec>,
    pub elements: IndexMap<String, ElementSpec>,
    /// Whether instances carry significant inline text
    pub has_content: bool,
}

impl Schema {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            prefix: None,
            namespaces: IndexMap::new(),
            attributes: IndexMap::new(),
            elements: IndexMap::new(),
            has_content: false,
        }
    }

    /// Register a namespace binding; additive and idempotent
    pub fn register_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.namespaces.entry(prefix.into()).or_insert_with(|| uri.into());
    }

    /// Look up an attribute field by normalized name
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.get(name)
    }

    /// Look up an element field by normalized name
    pub fn element(&self, name: &str) -> Option<&ElementSpec> {
        self.elements.get(name)
    }
}
