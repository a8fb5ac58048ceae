//! XML data model

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
///
/// `name` is the local name; the namespace prefix, if the element was written
/// with one, lives in `prefix` and its resolved URI in `namespace`.
/// `namespaces` holds every in-scope (prefix, URI) binding, outermost first,
/// with the default namespace under the empty prefix. Namespace declaration
/// attributes (`xmlns`, `xmlns:p`) never appear in `attributes`.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub prefix: Option<String>,
    pub namespace: Option<String>,
    pub namespaces: Vec<(String, String)>,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

impl Element {
    /// Create an element with the given local name and no other state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            namespace: None,
            namespaces: Vec::new(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Iterate over child element nodes, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// Iterate over direct text children
    pub fn text_children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|c| match c {
            Content::Text(t) => Some(t.as_str()),
            Content::Element(_) => None,
        })
    }

    /// Whether the element has any child element nodes
    pub fn has_element_children(&self) -> bool {
        self.child_elements().next().is_some()
    }

    /// Trimmed concatenation of the direct text children
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for t in self.text_children() {
            text.push_str(t);
        }
        text.trim().to_string()
    }
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

/// Splits a qualified name into prefix and local name
pub(crate) fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("photo:image"), (Some("photo"), "image"));
        assert_eq!(split_qname("image"), (None, "image"));
        assert_eq!(split_qname("a:b:c"), (Some("a"), "b:c"));
    }

    #[test]
    fn test_text_content_trims() {
        let mut element = Element::new("note");
        element.children.push(Content::Text("  hello ".to_string()));
        assert_eq!(element.text_content(), "hello");
    }

    #[test]
    fn test_child_iterators() {
        let mut element = Element::new("root");
        element.children.push(Content::Text("t".to_string()));
        element.children.push(Content::Element(Element::new("a")));
        assert_eq!(element.child_elements().count(), 1);
        assert_eq!(element.text_children().count(), 1);
        assert!(element.has_element_children());
    }
}
