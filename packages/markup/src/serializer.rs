//! Canonical text serialization for markup trees.
//!
//! Output is compact (no pretty whitespace) and deterministic: attributes
//! are emitted in sorted order, `style` always last. The parser accepts
//! exactly what this emits, which gives `parse(serialize(x)) == x`.

use crate::element::{MarkupElement, MarkupNode};

const VOID_TAGS: &[&str] = &["img", "br", "hr"];

pub fn serialize_element(element: &MarkupElement) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

pub fn serialize_fragment(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &MarkupNode, out: &mut String) {
    match node {
        MarkupNode::Element(el) => write_element(el, out),
        MarkupNode::Text { content } => out.push_str(&escape_text(content)),
    }
}

fn write_element(element: &MarkupElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);

    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }

    if !element.styles.is_empty() {
        out.push_str(" style=\"");
        let mut first = true;
        for (property, value) in &element.styles {
            if !first {
                out.push_str("; ");
            }
            out.push_str(property);
            out.push_str(": ");
            out.push_str(&escape_attr(value));
            first = false;
        }
        out.push('"');
    }

    if VOID_TAGS.contains(&element.tag.as_str()) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_element;

    #[test]
    fn test_serialize_is_canonical() {
        let el = MarkupElement::new("div")
            .with_attr("data-width", "500")
            .with_flag("data-custom-image")
            .with_style("text-align", "center");

        assert_eq!(
            serialize_element(&el),
            r#"<div data-custom-image data-width="500" style="text-align: center"></div>"#
        );
    }

    #[test]
    fn test_round_trip_element() {
        let el = MarkupElement::new("div")
            .with_flag("data-tweet-embed")
            .with_attr("data-tweet-url", "https://x.com/user/status/12345")
            .with_attr("data-tweet-id", "12345")
            .with_attr("data-width", "500")
            .with_style("text-align", "right")
            .with_child(MarkupNode::Element(
                MarkupElement::new("p").with_text("fallback & more"),
            ));

        let text = serialize_element(&el);
        let parsed = parse_element(&text).unwrap();
        assert_eq!(parsed, el);
    }

    #[test]
    fn test_round_trip_void_tag() {
        let el = MarkupElement::new("div").with_child(MarkupNode::Element(
            MarkupElement::new("img").with_attr("src", "a.png"),
        ));
        let parsed = parse_element(&serialize_element(&el)).unwrap();
        assert_eq!(parsed, el);
    }

    #[test]
    fn test_escaping() {
        let el = MarkupElement::new("p")
            .with_attr("title", r#"say "hi" & <go>"#)
            .with_text("1 < 2 & 3 > 2");
        let parsed = parse_element(&serialize_element(&el)).unwrap();
        assert_eq!(parsed, el);
    }
}
