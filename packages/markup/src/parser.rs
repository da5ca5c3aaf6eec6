//! Recursive-descent parser for the persisted markup format.
//!
//! The format is a small HTML subset: elements with attributes (including
//! bare marker attributes), inline `style`, text, self-closing and void
//! tags. Entities `&amp; &lt; &gt; &quot;` are decoded. Whitespace-only
//! text between elements is dropped; the serializer never emits it.

use crate::element::{MarkupElement, MarkupNode};
use crate::error::{ParseError, ParseResult};

const VOID_TAGS: &[&str] = &["img", "br", "hr"];

/// Parse a sequence of sibling nodes
pub fn parse_fragment(source: &str) -> ParseResult<Vec<MarkupNode>> {
    let mut parser = Parser::new(source);
    let nodes = parser.parse_nodes(None)?;
    parser.skip_whitespace();
    if !parser.is_at_end() {
        return Err(ParseError::invalid(
            parser.pos,
            "trailing content after fragment",
        ));
    }
    Ok(nodes)
}

/// Parse exactly one element
pub fn parse_element(source: &str) -> ParseResult<MarkupElement> {
    let nodes = parse_fragment(source)?;
    let mut elements = nodes.into_iter().filter_map(|node| match node {
        MarkupNode::Element(el) => Some(el),
        MarkupNode::Text { .. } => None,
    });

    match (elements.next(), elements.next()) {
        (Some(el), None) => Ok(el),
        (None, _) => Err(ParseError::invalid(0, "expected an element")),
        (Some(_), Some(_)) => Err(ParseError::invalid(0, "expected a single element")),
    }
}

struct Parser<'src> {
    chars: Vec<char>,
    pos: usize,
    _source: &'src str,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            _source: source,
        }
    }

    fn parse_nodes(&mut self, close_tag: Option<&str>) -> ParseResult<Vec<MarkupNode>> {
        let mut nodes = Vec::new();

        loop {
            if self.is_at_end() {
                return match close_tag {
                    Some(_) => Err(ParseError::unexpected_eof(self.pos)),
                    None => Ok(nodes),
                };
            }

            if self.peek() == Some('<') {
                if self.peek_at(1) == Some('/') {
                    let close_pos = self.pos;
                    self.pos += 2;
                    let name = self.parse_tag_name()?;
                    self.skip_whitespace();
                    self.expect('>')?;

                    return match close_tag {
                        Some(expected) if expected == name => Ok(nodes),
                        Some(expected) => {
                            Err(ParseError::mismatched_tag(close_pos, expected, name))
                        }
                        None => Err(ParseError::invalid(close_pos, "unexpected closing tag")),
                    };
                }

                nodes.push(MarkupNode::Element(self.parse_one_element()?));
            } else {
                let text = self.parse_text();
                if !text.trim().is_empty() {
                    nodes.push(MarkupNode::text(text));
                }
            }
        }
    }

    fn parse_one_element(&mut self) -> ParseResult<MarkupElement> {
        self.expect('<')?;
        let tag = self.parse_tag_name()?;
        let mut element = MarkupElement::new(&tag);

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some('/') => {
                    self.pos += 1;
                    self.expect('>')?;
                    return Ok(element);
                }
                Some(_) => {
                    let (name, value) = self.parse_attribute()?;
                    if name == "style" {
                        element.styles = parse_style(&value);
                    } else {
                        element.attributes.insert(name, value);
                    }
                }
                None => return Err(ParseError::unexpected_eof(self.pos)),
            }
        }

        if VOID_TAGS.contains(&tag.as_str()) {
            return Ok(element);
        }

        element.children = self.parse_nodes(Some(&tag))?;
        Ok(element)
    }

    fn parse_attribute(&mut self) -> ParseResult<(String, String)> {
        let name = self.parse_attr_name()?;
        self.skip_whitespace();

        if self.peek() != Some('=') {
            // Bare marker attribute, e.g. `open` or `data-custom-image`
            return Ok((name, String::new()));
        }
        self.pos += 1;
        self.skip_whitespace();

        self.expect('"')?;
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('&') => value.push(self.parse_entity()?),
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
                None => return Err(ParseError::unexpected_eof(self.pos)),
            }
        }

        Ok((name, value))
    }

    fn parse_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            match c {
                '<' => break,
                '&' => match self.parse_entity() {
                    Ok(decoded) => text.push(decoded),
                    Err(_) => {
                        text.push('&');
                        self.pos += 1;
                    }
                },
                _ => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }
        text
    }

    fn parse_entity(&mut self) -> ParseResult<char> {
        let start = self.pos;
        let mut name = String::new();
        self.pos += 1; // consume '&'

        while let Some(c) = self.peek() {
            if c == ';' {
                self.pos += 1;
                return match name.as_str() {
                    "amp" => Ok('&'),
                    "lt" => Ok('<'),
                    "gt" => Ok('>'),
                    "quot" => Ok('"'),
                    other => {
                        self.pos = start;
                        Err(ParseError::invalid(start, format!("unknown entity &{other};")))
                    }
                };
            }
            if !c.is_ascii_alphanumeric() || name.len() > 8 {
                break;
            }
            name.push(c);
            self.pos += 1;
        }

        self.pos = start;
        Err(ParseError::invalid(start, "unterminated entity"))
    }

    fn parse_tag_name(&mut self) -> ParseResult<String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '-' {
                name.push(c.to_ascii_lowercase());
                self.pos += 1;
            } else {
                break;
            }
        }

        if name.is_empty() {
            match self.peek() {
                Some(c) => Err(ParseError::unexpected_char(self.pos, "tag name", c)),
                None => Err(ParseError::unexpected_eof(self.pos)),
            }
        } else {
            Ok(name)
        }
    }

    fn parse_attr_name(&mut self) -> ParseResult<String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                name.push(c.to_ascii_lowercase());
                self.pos += 1;
            } else {
                break;
            }
        }

        if name.is_empty() {
            match self.peek() {
                Some(c) => Err(ParseError::unexpected_char(self.pos, "attribute name", c)),
                None => Err(ParseError::unexpected_eof(self.pos)),
            }
        } else {
            Ok(name)
        }
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(ParseError::unexpected_char(
                self.pos,
                expected.to_string(),
                c,
            )),
            None => Err(ParseError::unexpected_eof(self.pos)),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

/// Parse an inline `style` attribute value into a property map
fn parse_style(value: &str) -> std::collections::BTreeMap<String, String> {
    let mut styles = std::collections::BTreeMap::new();
    for declaration in value.split(';') {
        if let Some((property, val)) = declaration.split_once(':') {
            let property = property.trim();
            let val = val.trim();
            if !property.is_empty() && !val.is_empty() {
                styles.insert(property.to_string(), val.to_string());
            }
        }
    }
    styles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_element() {
        let el = parse_element(r#"<p>hello</p>"#).unwrap();
        assert_eq!(el.tag, "p");
        assert_eq!(el.text_content(), "hello");
    }

    #[test]
    fn test_parse_attributes_and_flags() {
        let el = parse_element(r#"<div data-custom-image data-src="https://x/y.png"></div>"#)
            .unwrap();
        assert!(el.has_attr("data-custom-image"));
        assert_eq!(el.attr("data-src"), Some("https://x/y.png"));
    }

    #[test]
    fn test_parse_inline_style() {
        let el = parse_element(r#"<p style="margin-left: 40px; text-align: center">x</p>"#)
            .unwrap();
        assert_eq!(el.style("margin-left"), Some("40px"));
        assert_eq!(el.style("text-align"), Some("center"));
    }

    #[test]
    fn test_parse_nested_elements() {
        let el = parse_element(
            r#"<details open><summary>Q</summary><div data-details-content><p>A</p></div></details>"#,
        )
        .unwrap();
        assert_eq!(el.tag, "details");
        assert!(el.has_attr("open"));
        let children: Vec<_> = el.child_elements().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].tag, "summary");
        assert_eq!(children[1].tag, "div");
    }

    #[test]
    fn test_parse_self_closing_and_void() {
        let el = parse_element(r#"<div><img src="a.png" /><br></div>"#).unwrap();
        let tags: Vec<_> = el.child_elements().map(|c| c.tag.clone()).collect();
        assert_eq!(tags, vec!["img", "br"]);
    }

    #[test]
    fn test_parse_entities() {
        let el = parse_element(r#"<p title="a &quot;b&quot;">x &amp; y</p>"#).unwrap();
        assert_eq!(el.attr("title"), Some(r#"a "b""#));
        assert_eq!(el.text_content(), "x & y");
    }

    #[test]
    fn test_mismatched_close_tag_is_error() {
        let result = parse_element("<div><p>x</div></p>");
        assert!(matches!(result, Err(ParseError::MismatchedTag { .. })));
    }

    #[test]
    fn test_whitespace_between_blocks_dropped() {
        let nodes = parse_fragment("<p>a</p>\n  <p>b</p>").unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_unexpected_eof() {
        assert!(matches!(
            parse_element("<div><p>x"),
            Err(ParseError::UnexpectedEof { .. })
        ));
    }
}
