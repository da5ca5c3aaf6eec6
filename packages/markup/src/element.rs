use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node in the markup tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MarkupNode {
    Element(MarkupElement),
    Text { content: String },
}

impl MarkupNode {
    pub fn text(content: impl Into<String>) -> Self {
        MarkupNode::Text {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&MarkupElement> {
        match self {
            MarkupNode::Element(el) => Some(el),
            MarkupNode::Text { .. } => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MarkupNode::Text { content } => Some(content),
            MarkupNode::Element(_) => None,
        }
    }
}

/// Markup element with attributes, inline styles and children
///
/// Attributes and styles use ordered maps so serialization is canonical:
/// the same element always produces the same text, which is what makes
/// round-trip tests meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Marker attribute with no value, e.g. `data-custom-image` or `open`
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), String::new());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<MarkupNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(MarkupNode::text(content))
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    /// Concatenated text content of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &MarkupElement> {
        self.children.iter().filter_map(MarkupNode::as_element)
    }
}

fn collect_text(children: &[MarkupNode], out: &mut String) {
    for child in children {
        match child {
            MarkupNode::Text { content } => out.push_str(content),
            MarkupNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let el = MarkupElement::new("div")
            .with_flag("data-custom-image")
            .with_attr("data-src", "https://x/y.png")
            .with_style("text-align", "center")
            .with_text("hello");

        assert!(el.has_attr("data-custom-image"));
        assert_eq!(el.attr("data-src"), Some("https://x/y.png"));
        assert_eq!(el.style("text-align"), Some("center"));
        assert_eq!(el.text_content(), "hello");
    }

    #[test]
    fn test_text_content_recurses() {
        let el = MarkupElement::new("details")
            .with_child(MarkupNode::Element(
                MarkupElement::new("summary").with_text("Question"),
            ))
            .with_child(MarkupNode::Element(
                MarkupElement::new("p").with_text("Answer"),
            ));

        assert_eq!(el.text_content(), "QuestionAnswer");
    }
}
