//! Tree node model for parsed patch XML.
//!
//! The tree is single-owner: every node is owned by its parent's child
//! list, there is no sharing and no cycles. Child order is document
//! order and significant.

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::base::Position;

/// Attribute names that carry an XPath-like target on a patch operation.
///
/// `Path` is the generic form; the others double as the operation kind.
pub const PATH_ATTRIBUTES: [&str; 7] = [
    "Path", "Add", "Merge", "Replace", "Append", "Prepend", "Remove",
];

/// One node of the parsed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// A parsed element with ordered attributes and children.
///
/// `start` is the byte offset of the `<` character; `position` is the
/// same location as line/column, derived at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: SmolStr,
    pub attributes: IndexMap<SmolStr, String>,
    pub children: Vec<XmlNode>,
    pub start: TextSize,
    pub position: Position,
}

impl Drop for Element {
    fn drop(&mut self) {
        // Nesting depth is author-controlled and unbounded; the default
        // drop glue would recurse once per level. Flatten destruction
        // into a worklist instead.
        let mut queue = std::mem::take(&mut self.children);
        while let Some(node) = queue.pop() {
            if let XmlNode::Element(mut el) = node {
                queue.append(&mut el.children);
            }
        }
    }
}

impl Element {
    pub(crate) fn new(name: SmolStr, start: TextSize, position: Position) -> Self {
        Self {
            name,
            attributes: IndexMap::new(),
            children: Vec::new(),
            start,
            position,
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First attribute that names an XPath-like operation target.
    ///
    /// Returns `(attribute name, value)`, scanning attributes in document
    /// order.
    pub fn path_attribute(&self) -> Option<(&str, &str)> {
        self.attributes
            .iter()
            .find(|(key, _)| PATH_ATTRIBUTES.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Element children, in document order.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Element child by index (counting element children only).
    pub fn element_child(&self, index: usize) -> Option<&Element> {
        self.element_children().nth(index)
    }

    /// First element child with the given tag name.
    pub fn child_named(&self, name: &str) -> Option<&Element> {
        self.element_children().find(|el| el.name == name)
    }

    /// Concatenated text content of direct text children, or `""`.
    pub fn text(&self) -> &str {
        for child in &self.children {
            if let XmlNode::Text(value) = child {
                return value;
            }
        }
        ""
    }

    /// Text value at a dot-separated child path, e.g.
    /// `Values.Standard.GUID`. `None` when any path segment is missing.
    pub fn value_with_path(&self, path: &str) -> Option<&str> {
        let mut current = self;
        for segment in path.split('.') {
            current = current.child_named(segment)?;
        }
        Some(current.text())
    }

    pub fn has_element_children(&self) -> bool {
        self.element_children().next().is_some()
    }

    /// First element child that is a leaf (no element children of its own).
    pub fn first_leaf_child(&self) -> Option<&Element> {
        self.element_children().find(|el| !el.has_element_children())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::LineIndex;
    use crate::parser::parse_tree;

    fn parse(text: &str) -> Element {
        let index = LineIndex::new(text);
        parse_tree(text, &index).unwrap()
    }

    #[test]
    fn test_value_with_path() {
        let root = parse(
            "<Asset><Values><Standard><GUID>100</GUID><Name>Hut</Name></Standard></Values></Asset>",
        );
        assert_eq!(root.value_with_path("Values.Standard.GUID"), Some("100"));
        assert_eq!(root.value_with_path("Values.Standard.Name"), Some("Hut"));
        assert_eq!(root.value_with_path("Values.Missing"), None);
    }

    #[test]
    fn test_path_attribute_order() {
        let root = parse(r#"<ModOp Add="/Values" Type="add"/>"#);
        assert_eq!(root.path_attribute(), Some(("Add", "/Values")));

        let root = parse(r#"<ModOp Type="add"/>"#);
        assert_eq!(root.path_attribute(), None);
    }

    #[test]
    fn test_first_leaf_child() {
        let root = parse("<Item><Outer><Inner>1</Inner></Outer><Leaf>2</Leaf></Item>");
        assert_eq!(root.first_leaf_child().unwrap().name, "Leaf");
    }

    #[test]
    fn test_text_of_empty_element() {
        let root = parse("<GUID></GUID>");
        assert_eq!(root.text(), "");
    }
}
