//! Schema inference and unification engine
//!
//! Walks a parsed XML tree once and produces a normalized [`Schema`]
//! describing that document's shape: field names, types, multiplicities and
//! namespaces. Repeated sibling occurrences of one tag are reconciled into a
//! single consistent type by [`merge`].

pub mod infer;
pub mod merge;
pub mod name;
pub mod types;

pub use infer::infer;
pub use merge::merge;
pub use name::normalize;
pub use types::{AttributeSpec, ElementSpec, FieldType, Multiplicity, Schema};
