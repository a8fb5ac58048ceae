//! Error types for xshape

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected byte or markup while parsing
    InvalidToken,
    /// Input is not valid UTF-8
    InvalidUtf8,
    /// Unknown or malformed character/entity reference
    InvalidEntity,
    /// The same attribute appears twice on one element
    DuplicateAttribute { name: String },
    /// Closing tag does not match the open element
    MismatchedTag { expected: String, found: String },
    /// Element, comment or other markup never closed
    UnterminatedMarkup,
    /// Document nesting exceeds the configured limit
    MaxDepthExceeded { max: u16 },
    /// Two occurrences of a normalized name cannot be reconciled
    SchemaConflict { path: String },
    /// Element with an empty or unusable name
    UnsupportedElement { path: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::InvalidEntity => write!(f, "invalid entity reference"),
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected {expected}, found {found}")
            }
            Self::UnterminatedMarkup => write!(f, "unterminated markup"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::SchemaConflict { path } => write!(f, "schema conflict at {path}"),
            Self::UnsupportedElement { path } => write!(f, "unsupported element at {path}"),
        }
    }
}

/// Main error type for xshape
#[derive(Error, Clone, Debug, PartialEq)]
#[error("error at {}: {}", .span.start, .message)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }
}

/// Result type alias for xshape
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, 0, 1, 1);
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
    }

    #[test]
    fn test_error_display() {
        let err = Error::at(ErrorKind::InvalidEntity, 10, 2, 5);
        let display = err.to_string();
        assert!(display.contains("error at"));
        assert!(display.contains("invalid entity reference"));
    }

    #[test]
    fn test_schema_conflict_carries_path() {
        let err = Error::new(
            ErrorKind::SchemaConflict {
                path: "root/items/item".to_string(),
            },
            Span::empty(),
        );
        assert!(err.to_string().contains("root/items/item"));
    }
}
