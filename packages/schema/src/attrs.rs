//! Typed attribute sets for the custom node kinds.
//!
//! Every numeric attribute has a fixed domain and is clamped on the way
//! in, so a constructed attribute set is always valid. Defaults match the
//! editor's insert commands: a bare image is 500px wide and centered.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a block-level embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }

    /// Parse from markup; anything unrecognized falls back to the default
    pub fn from_str_or_default(value: &str) -> Self {
        match value {
            "left" => Align::Left,
            "right" => Align::Right,
            _ => Align::Center,
        }
    }
}

/// Resizable image with caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAttrs {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
    pub width: u32,
    pub align: Align,
    pub caption: String,
}

impl ImageAttrs {
    pub const MIN_WIDTH: u32 = 200;
    pub const MAX_WIDTH: u32 = 1000;
    pub const DEFAULT_WIDTH: u32 = 500;

    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            ..Self::default()
        }
    }

    pub fn clamp_width(width: i64) -> u32 {
        width.clamp(Self::MIN_WIDTH as i64, Self::MAX_WIDTH as i64) as u32
    }
}

impl Default for ImageAttrs {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: String::new(),
            title: None,
            width: Self::DEFAULT_WIDTH,
            align: Align::Center,
            caption: String::new(),
        }
    }
}

/// Embedded external video (YouTube)
///
/// `src` is stored raw; the video identifier is derived at render time and
/// an unparseable URL renders a fallback placeholder instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEmbedAttrs {
    pub src: String,
    pub width: u32,
    pub align: Align,
}

impl VideoEmbedAttrs {
    pub const MIN_WIDTH: u32 = 300;
    pub const MAX_WIDTH: u32 = 900;
    pub const DEFAULT_WIDTH: u32 = 640;

    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    pub fn clamp_width(width: i64) -> u32 {
        width.clamp(Self::MIN_WIDTH as i64, Self::MAX_WIDTH as i64) as u32
    }
}

impl Default for VideoEmbedAttrs {
    fn default() -> Self {
        Self {
            src: String::new(),
            width: Self::DEFAULT_WIDTH,
            align: Align::Center,
        }
    }
}

/// Embedded social post (Tweet/X)
///
/// `post_id` is a pure function of `post_url`; the insert command rejects
/// URLs the extraction fails on, so a constructed node always carries a
/// usable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialEmbedAttrs {
    pub post_url: String,
    pub post_id: String,
    pub width: u32,
    pub align: Align,
}

impl SocialEmbedAttrs {
    pub const MIN_WIDTH: u32 = 300;
    pub const MAX_WIDTH: u32 = 600;
    pub const DEFAULT_WIDTH: u32 = 500;

    pub fn clamp_width(width: i64) -> u32 {
        width.clamp(Self::MIN_WIDTH as i64, Self::MAX_WIDTH as i64) as u32
    }
}

/// Collapsible details block; `open` is the single source of truth for
/// the expand/collapse UI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsAttrs {
    pub open: bool,
}

impl Default for DetailsAttrs {
    fn default() -> Self {
        Self { open: true }
    }
}

/// Extended table cell: background color plus row/col span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCellAttrs {
    /// CSS color; `None` means inherit
    pub background: Option<String>,
    pub rowspan: u32,
    pub colspan: u32,
}

impl TableCellAttrs {
    pub const MIN_SPAN: u32 = 1;
    pub const MAX_SPAN: u32 = 10;

    pub fn span_in_domain(span: i64) -> bool {
        span >= Self::MIN_SPAN as i64 && span <= Self::MAX_SPAN as i64
    }
}

impl Default for TableCellAttrs {
    fn default() -> Self {
        Self {
            background: None,
            rowspan: 1,
            colspan: 1,
        }
    }
}

/// The fixed indentation ladder, in pixels
pub const INDENT_LADDER: [u32; 5] = [0, 40, 80, 120, 160];

/// Left-indentation level of a paragraph or heading
///
/// Ladder-based rather than free-valued: a level is always one of
/// [`INDENT_LADDER`]. Values from outside the ladder snap to zero on
/// construction, matching the parse rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Indent(u32);

impl Indent {
    pub fn px(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// One rung up the ladder, clamped at the top
    pub fn increased(&self) -> Indent {
        let index = self.ladder_index();
        Indent(INDENT_LADDER[(index + 1).min(INDENT_LADDER.len() - 1)])
    }

    /// One rung down the ladder, clamped at zero
    pub fn decreased(&self) -> Indent {
        let index = self.ladder_index();
        Indent(INDENT_LADDER[index.saturating_sub(1)])
    }

    fn ladder_index(&self) -> usize {
        INDENT_LADDER
            .iter()
            .position(|&rung| rung == self.0)
            .unwrap_or(0)
    }
}

impl From<u32> for Indent {
    fn from(px: u32) -> Self {
        if INDENT_LADDER.contains(&px) {
            Indent(px)
        } else {
            Indent(0)
        }
    }
}

impl From<Indent> for u32 {
    fn from(indent: Indent) -> Self {
        indent.0
    }
}
