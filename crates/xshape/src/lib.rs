//! xshape - schema inference and object materialization for XML
//!
//! Given an example XML document and no schema declared in advance, xshape
//! infers a typed schema describing the document's shape (field names, types,
//! multiplicities, namespaces) and materializes the document into an object
//! graph keyed by normalized field names. Sibling elements sharing a tag but
//! differing in attributes or children are reconciled into one consistent
//! type.
//!
//! # Quick Start
//!
//! ```
//! use xshape::{parse, Value};
//! # fn main() -> Result<(), xshape::Error> {
//! let value = parse("<address><street>Milchstrasse</street></address>")?;
//! let street = value
//!     .get("street")
//!     .and_then(Value::as_string)
//!     .unwrap_or_default();
//! assert_eq!(street, "Milchstrasse");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use tracing::debug;

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod input;
pub use input::Input;

pub mod cursor;
pub use cursor::Cursor;

pub mod value;
pub use value::{Array, Object, Value};

pub mod xml;
pub use xml::{
    Config as XmlConfig, Content as XmlContent, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser,
};

pub mod schema;
pub use schema::{
    infer, normalize, AttributeSpec, ElementSpec, FieldType, Multiplicity, Schema,
};

pub mod materialize;
pub use materialize::materialize;

pub mod render;
pub use render::{schema_to_json, value_to_json};

/// Infer a schema from the document and materialize the object graph
///
/// The schema is built fresh for this call and dropped with it; nothing is
/// cached across invocations.
pub fn parse(s: &str) -> Result<Value> {
    let doc = from_xml_str(s)?;
    debug!(root = %doc.root.name, "document parsed, inferring schema");
    let schema = infer(&doc.root)?;
    Ok(materialize(&schema, &doc.root))
}

/// Infer a schema from the document without materializing it
pub fn infer_schema(s: &str) -> Result<Schema> {
    let doc = from_xml_str(s)?;
    infer(&doc.root)
}

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    let input = Input::from_str(s);
    let mut parser = XmlParser::new(input.as_bytes());
    parser.parse()
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let input = Input::from_bytes(bytes);
    let mut parser = XmlParser::new(input.as_bytes());
    parser.parse()
}

/// Parse XML with custom limits
pub fn from_xml_str_with_config(s: &str, config: XmlConfig) -> Result<XmlDocument> {
    let input = Input::from_str(s);
    let mut parser = XmlParser::with_config(input.as_bytes(), config);
    parser.parse()
}
