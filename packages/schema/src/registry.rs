//! Parse/serialize rules per custom node kind.
//!
//! Each kind recognizes its own marker in the persisted markup
//! (`data-custom-image`, `data-youtube-video`, `data-tweet-embed`, the
//! `details` tag, table cells) and owns both directions of the
//! conversion. Parsing coerces types and clamps domains: a width that
//! fails to parse becomes the default, one outside the domain is clamped.

use crate::attrs::{
    Align, DetailsAttrs, ImageAttrs, Indent, SocialEmbedAttrs, TableCellAttrs, VideoEmbedAttrs,
};
use crate::embed::{extract_post_id, extract_video_id, video_embed_url, video_height, VideoEmbedOptions};
use richdoc_markup::{MarkupElement, MarkupNode};

/// The custom node kinds the registry knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Image,
    VideoEmbed,
    SocialEmbed,
    Details,
    TableCell,
}

/// Parse/serialize contract for one node kind
pub trait NodeSchema {
    type Attrs;

    /// Does this element carry the kind's marker?
    fn matches(element: &MarkupElement) -> bool;

    /// Extract attributes; `None` means the element is not a valid
    /// instance of this kind (wrong marker, or a required derived
    /// attribute cannot be reconstructed)
    fn parse(element: &MarkupElement) -> Option<Self::Attrs>;

    /// Produce canonical markup carrying every attribute needed for a
    /// round-trip parse
    fn serialize(attrs: &Self::Attrs) -> MarkupElement;
}

pub struct ImageSchema;

impl NodeSchema for ImageSchema {
    type Attrs = ImageAttrs;

    fn matches(element: &MarkupElement) -> bool {
        element.tag == "div" && element.has_attr("data-custom-image")
    }

    fn parse(element: &MarkupElement) -> Option<ImageAttrs> {
        if !Self::matches(element) {
            return None;
        }

        Some(ImageAttrs {
            src: element.attr("data-src").unwrap_or_default().to_string(),
            alt: element.attr("data-alt").unwrap_or_default().to_string(),
            title: element.attr("data-title").map(str::to_string),
            width: parse_width(
                element.attr("data-width"),
                ImageAttrs::DEFAULT_WIDTH,
                ImageAttrs::clamp_width,
            ),
            align: parse_align(element),
            caption: element.attr("data-caption").unwrap_or_default().to_string(),
        })
    }

    fn serialize(attrs: &ImageAttrs) -> MarkupElement {
        let mut element = MarkupElement::new("div")
            .with_flag("data-custom-image")
            .with_attr("data-src", &attrs.src)
            .with_attr("data-alt", &attrs.alt)
            .with_attr("data-width", attrs.width.to_string())
            .with_attr("data-align", attrs.align.as_str())
            .with_style("text-align", attrs.align.as_str());
        if let Some(title) = &attrs.title {
            element = element.with_attr("data-title", title);
        }
        if !attrs.caption.is_empty() {
            element = element.with_attr("data-caption", &attrs.caption);
        }
        element
    }
}

pub struct VideoEmbedSchema;

impl NodeSchema for VideoEmbedSchema {
    type Attrs = VideoEmbedAttrs;

    fn matches(element: &MarkupElement) -> bool {
        element.tag == "div" && element.has_attr("data-youtube-video")
    }

    fn parse(element: &MarkupElement) -> Option<VideoEmbedAttrs> {
        if !Self::matches(element) {
            return None;
        }

        Some(VideoEmbedAttrs {
            src: element.attr("data-src").unwrap_or_default().to_string(),
            width: parse_width(
                element.attr("data-width"),
                VideoEmbedAttrs::DEFAULT_WIDTH,
                VideoEmbedAttrs::clamp_width,
            ),
            align: parse_align(element),
        })
    }

    fn serialize(attrs: &VideoEmbedAttrs) -> MarkupElement {
        let mut element = MarkupElement::new("div")
            .with_flag("data-youtube-video")
            .with_attr("data-src", &attrs.src)
            .with_attr("data-width", attrs.width.to_string())
            .with_attr("data-align", attrs.align.as_str())
            .with_style("text-align", attrs.align.as_str());

        // The iframe is render output only; parse reads the data-*
        // attributes and ignores children.
        if let Some(video_id) = extract_video_id(&attrs.src) {
            let options = VideoEmbedOptions::default();
            element = element.with_child(MarkupNode::Element(
                MarkupElement::new("iframe")
                    .with_attr("src", video_embed_url(&video_id, &options))
                    .with_attr("width", attrs.width.to_string())
                    .with_attr("height", video_height(attrs.width).to_string())
                    .with_attr("frameborder", "0")
                    .with_flag("allowfullscreen"),
            ));
        }
        element
    }
}

pub struct SocialEmbedSchema;

impl NodeSchema for SocialEmbedSchema {
    type Attrs = SocialEmbedAttrs;

    fn matches(element: &MarkupElement) -> bool {
        element.tag == "div" && element.has_attr("data-tweet-embed")
    }

    fn parse(element: &MarkupElement) -> Option<SocialEmbedAttrs> {
        if !Self::matches(element) {
            return None;
        }

        let post_url = element.attr("data-tweet-url")?.to_string();
        // Prefer the persisted id; re-derive from the URL when absent.
        // A node that yields neither was never validly constructed.
        let post_id = element
            .attr("data-tweet-id")
            .map(str::to_string)
            .or_else(|| extract_post_id(&post_url))?;

        Some(SocialEmbedAttrs {
            post_url,
            post_id,
            width: parse_width(
                element.attr("data-width"),
                SocialEmbedAttrs::DEFAULT_WIDTH,
                SocialEmbedAttrs::clamp_width,
            ),
            align: parse_align(element),
        })
    }

    fn serialize(attrs: &SocialEmbedAttrs) -> MarkupElement {
        MarkupElement::new("div")
            .with_flag("data-tweet-embed")
            .with_attr("data-tweet-url", &attrs.post_url)
            .with_attr("data-tweet-id", &attrs.post_id)
            .with_attr("data-width", attrs.width.to_string())
            .with_attr("data-align", attrs.align.as_str())
            .with_style("text-align", attrs.align.as_str())
    }
}

pub struct DetailsSchema;

impl NodeSchema for DetailsSchema {
    type Attrs = DetailsAttrs;

    fn matches(element: &MarkupElement) -> bool {
        element.tag == "details"
    }

    fn parse(element: &MarkupElement) -> Option<DetailsAttrs> {
        if !Self::matches(element) {
            return None;
        }
        Some(DetailsAttrs {
            open: element.has_attr("open"),
        })
    }

    fn serialize(attrs: &DetailsAttrs) -> MarkupElement {
        let element = MarkupElement::new("details");
        if attrs.open {
            element.with_flag("open")
        } else {
            element
        }
    }
}

pub struct CellSchema;

impl NodeSchema for CellSchema {
    type Attrs = TableCellAttrs;

    fn matches(element: &MarkupElement) -> bool {
        element.tag == "td" || element.tag == "th"
    }

    fn parse(element: &MarkupElement) -> Option<TableCellAttrs> {
        if !Self::matches(element) {
            return None;
        }

        let background = element
            .attr("data-background")
            .or_else(|| element.style("background-color"))
            .map(str::to_string);

        Some(TableCellAttrs {
            background,
            rowspan: parse_span(element.attr("rowspan")),
            colspan: parse_span(element.attr("colspan")),
        })
    }

    fn serialize(attrs: &TableCellAttrs) -> MarkupElement {
        let mut element = MarkupElement::new("td");
        if let Some(background) = &attrs.background {
            element = element
                .with_attr("data-background", background)
                .with_style("background-color", background);
        }
        if attrs.rowspan > 1 {
            element = element.with_attr("rowspan", attrs.rowspan.to_string());
        }
        if attrs.colspan > 1 {
            element = element.with_attr("colspan", attrs.colspan.to_string());
        }
        element
    }
}

/// Read the indent level off a paragraph/heading element's inline style
pub fn parse_indent(element: &MarkupElement) -> Indent {
    let Some(margin) = element.style("margin-left") else {
        return Indent::default();
    };
    margin
        .trim_end_matches("px")
        .parse::<u32>()
        .map(Indent::from)
        .unwrap_or_default()
}

/// Stamp the indent level onto a paragraph/heading element; zero emits
/// nothing so unindented markup stays clean
pub fn serialize_indent(element: MarkupElement, indent: Indent) -> MarkupElement {
    if indent.is_zero() {
        element
    } else {
        element.with_style("margin-left", format!("{}px", indent.px()))
    }
}

/// Tag/marker recognition for document-level parsing
#[derive(Debug, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    pub fn classify(&self, element: &MarkupElement) -> Option<NodeKind> {
        if ImageSchema::matches(element) {
            Some(NodeKind::Image)
        } else if VideoEmbedSchema::matches(element) {
            Some(NodeKind::VideoEmbed)
        } else if SocialEmbedSchema::matches(element) {
            Some(NodeKind::SocialEmbed)
        } else if DetailsSchema::matches(element) {
            Some(NodeKind::Details)
        } else if CellSchema::matches(element) {
            Some(NodeKind::TableCell)
        } else {
            None
        }
    }
}

fn parse_width(value: Option<&str>, default: u32, clamp: impl Fn(i64) -> u32) -> u32 {
    match value.and_then(|v| v.parse::<i64>().ok()) {
        Some(parsed) => clamp(parsed),
        None => default,
    }
}

fn parse_align(element: &MarkupElement) -> Align {
    element
        .attr("data-align")
        .map(Align::from_str_or_default)
        .unwrap_or_default()
}

fn parse_span(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|&span| TableCellAttrs::span_in_domain(span))
        .map(|span| span as u32)
        .unwrap_or(1)
}
