//! XML parser implementation

use indexmap::IndexMap;

use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::model::{split_qname, Content, Document, Element};

/// Parser limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth, 0 disables the check
    pub max_depth: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl Config {
    pub const fn new(max_depth: u16) -> Self {
        Self { max_depth }
    }
}

/// XML parser
///
/// Produces the element tree consumed by schema inference. Namespace
/// declaration attributes are resolved into per-element bindings instead of
/// staying in the attribute map; comments, processing instructions and CDATA
/// sections are skipped.
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    scopes: Vec<Vec<(String, String)>>,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default limits
    pub const fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config { max_depth: 128 })
    }

    /// Create a new XML parser with custom limits
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            scopes: Vec::new(),
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        self.skip_misc()?;
        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_here("unexpected content after document root"));
        }

        Ok(Document { root })
    }

    /// Skip whitespace, comments, processing instructions and doctype markup
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.current() == Some(b'<') {
                match self.cursor.peek(1) {
                    Some(b'?') => {
                        self.cursor.advance();
                        self.skip_processing_instruction()?;
                        continue;
                    }
                    Some(b'!') => {
                        self.cursor.advance();
                        self.skip_declaration_or_comment()?;
                        continue;
                    }
                    _ => {}
                }
            }
            return Ok(());
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        self.depth += 1;
        if self.config.max_depth > 0 && self.depth > self.config.max_depth {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                self.span_here(),
            ));
        }
        let result = self.parse_element_body();
        self.depth -= 1;
        result
    }

    fn parse_element_body(&mut self) -> Result<Element> {
        let qname = self.parse_name()?;
        let (attributes, declarations) = self.parse_attributes()?;

        // Declarations are in scope for the element itself.
        self.scopes.push(declarations);
        let result = self.parse_element_rest(&qname, attributes);
        self.scopes.pop();
        result
    }

    fn parse_element_rest(
        &mut self,
        qname: &str,
        attributes: IndexMap<String, String>,
    ) -> Result<Element> {
        let (prefix, local) = split_qname(qname);
        let namespace = self
            .resolve(prefix.unwrap_or(""))
            .filter(|uri| !uri.is_empty());
        let mut element = Element {
            name: local.to_string(),
            prefix: prefix.map(str::to_string),
            namespace,
            namespaces: self.in_scope_namespaces(),
            attributes,
            children: Vec::new(),
        };

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(element);
        }

        self.expect_byte(b'>')?;

        loop {
            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'/') {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != qname {
                    return Err(Error::new(
                        ErrorKind::MismatchedTag {
                            expected: qname.to_string(),
                            found: close_name,
                        },
                        self.span_here(),
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'!') {
                self.cursor.advance();
                self.skip_declaration_or_comment()?;
                continue;
            }

            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'?') {
                self.cursor.advance();
                self.skip_processing_instruction()?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                element.children.push(Content::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(Error::new(ErrorKind::UnterminatedMarkup, self.span_here()));
            }

            if let Some(text) = self.parse_text()? {
                element.children.push(Content::Text(text));
            }
        }

        Ok(element)
    }

    fn parse_attributes(&mut self) -> Result<(IndexMap<String, String>, Vec<(String, String)>)> {
        let mut attrs = IndexMap::new();
        let mut declarations = Vec::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) => {}
                None => return Err(Error::new(ErrorKind::UnterminatedMarkup, self.span_here())),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if name == "xmlns" {
                declarations.push((String::new(), value));
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                declarations.push((prefix.to_string(), value));
            } else {
                if attrs.contains_key(&name) {
                    return Err(Error::new(
                        ErrorKind::DuplicateAttribute { name },
                        self.span_here(),
                    ));
                }
                attrs.insert(name, value);
            }
        }

        Ok((attrs, declarations))
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw)?;
                return decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(Error::with_message(
            ErrorKind::UnterminatedMarkup,
            self.span_here(),
            "unterminated attribute value",
        ))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw)?;
        let text = decode_entities(&text)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here("expected name"));
        };
        if !is_name_start(first) {
            return Err(self.error_here("expected name"));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start))
    }

    fn skip_declaration_or_comment(&mut self) -> Result<()> {
        // cursor currently at '!'
        if self.cursor.peek(1) == Some(b'-') && self.cursor.peek(2) == Some(b'-') {
            self.cursor.advance_by(3);
            return self.skip_until(b"-->");
        }

        if self.cursor.peek_bytes(8) == Some(b"![CDATA[".as_slice()) {
            self.cursor.advance_by(8);
            return self.skip_until(b"]]>");
        }

        self.skip_until(b">")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        // cursor currently at '?'
        self.cursor.advance();
        self.skip_until(b"?>")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(Error::new(ErrorKind::UnterminatedMarkup, self.span_here()))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn resolve(&self, prefix: &str) -> Option<String> {
        for scope in self.scopes.iter().rev() {
            for (p, uri) in scope.iter().rev() {
                if p == prefix {
                    return Some(uri.clone());
                }
            }
        }
        None
    }

    fn in_scope_namespaces(&self) -> Vec<(String, String)> {
        let mut bindings: IndexMap<String, String> = IndexMap::new();
        for scope in &self.scopes {
            for (prefix, uri) in scope {
                bindings.insert(prefix.clone(), uri.clone());
            }
        }
        bindings.into_iter().collect()
    }

    fn span_here(&self) -> Span {
        let pos = self.cursor.position();
        Span::new(pos, pos)
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(ErrorKind::InvalidToken, self.span_here(), message)
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::new(ErrorKind::InvalidUtf8, Span::empty()))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        for next in chars.by_ref() {
            if next == ';' {
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::InvalidEntity,
                    Span::empty(),
                    format!("invalid entity reference: &{entity};"),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
