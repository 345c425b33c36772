// Owned XML element tree
//
// Prime answers every `.xml` resource with a small document. The body is
// parsed once with `roxmltree` and copied into an owned tree so callers can
// hold on to it after the response buffer is gone.

use crate::error::Error;

/// An XML element with its attributes, direct text and child elements.
///
/// Namespaces are dropped; element and attribute names are local names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let doc = roxmltree::Document::parse(input).map_err(|e| Error::Deserialization {
            message: format!("invalid XML: {e}"),
            body: input.to_owned(),
        })?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let text: String = node
            .children()
            .filter(roxmltree::Node::is_text)
            .filter_map(|n| n.text())
            .collect();

        Self {
            name: node.tag_name().name().to_owned(),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_owned(), a.value().to_owned()))
                .collect(),
            text: (!text.trim().is_empty()).then_some(text),
            children: node
                .children()
                .filter(roxmltree::Node::is_element)
                .map(Self::from_node)
                .collect(),
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct text content, if any non-whitespace text is present.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first direct child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Element::text)
    }

    /// First descendant (depth-first, document order) with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|c| {
            if c.name == name {
                Some(c)
            } else {
                c.find(name)
            }
        })
    }

    /// Text of the first descendant with the given name.
    pub fn find_text(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(Element::text)
    }

    /// All descendants with the given name, in document order.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0" ?>
<queryResponse type="ConfigVersions" count="3" first="0" last="2">
  <entityId type="ConfigVersions" url="https://prime/x/1">101</entityId>
  <entityId type="ConfigVersions" url="https://prime/x/2">102</entityId>
  <nested><entityId>103</entityId></nested>
</queryResponse>"#;

    #[test]
    fn root_attributes_and_descendants() {
        let root = Element::parse(LISTING).unwrap();
        assert_eq!(root.name, "queryResponse");
        assert_eq!(root.attr("count"), Some("3"));
        assert_eq!(root.attr("missing"), None);

        let ids: Vec<_> = root
            .find_all("entityId")
            .into_iter()
            .filter_map(Element::text)
            .collect();
        assert_eq!(ids, ["101", "102", "103"]);
    }

    #[test]
    fn whitespace_only_text_is_none() {
        let root = Element::parse("<a>\n  <b>  </b><c>x</c></a>").unwrap();
        assert_eq!(root.text(), None);
        assert_eq!(root.find_text("b"), None);
        assert_eq!(root.child_text("c"), Some("x"));
    }

    #[test]
    fn text_keeps_inner_formatting() {
        let root = Element::parse("<r><fileData>line 1\n line 2\n</fileData></r>").unwrap();
        assert_eq!(root.find_text("fileData"), Some("line 1\n line 2\n"));
    }

    #[test]
    fn malformed_xml_is_a_deserialization_error() {
        let err = Element::parse("<open>").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
    }
}
