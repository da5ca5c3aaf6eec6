//! The command set: pure functions from state + arguments to a
//! transaction, or a rejection.
//!
//! Commands are total. Invalid input (empty image src, an unparseable
//! social post URL, a span pushed out of its domain) produces
//! `Rejected`, never an error and never a partial mutation. Node
//! references are re-resolved by identity at call time, so a command
//! built from a stale view either lands on the live node or rejects.

use crate::node::Block;
use crate::state::{EditorState, NodeRef, Selection};
use crate::transaction::{Step, Transaction};
use richdoc_schema::{
    extract_post_id, Align, DetailsAttrs, ImageAttrs, SocialEmbedAttrs, TableCellAttrs,
    VideoEmbedAttrs,
};
use serde::{Deserialize, Serialize};

/// Outcome of a command: a transaction to dispatch, or a no-op
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Applied(Transaction),
    Rejected,
}

impl CommandResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandResult::Applied(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, CommandResult::Rejected)
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            CommandResult::Applied(tx) => Some(tx),
            CommandResult::Rejected => None,
        }
    }

    pub fn into_transaction(self) -> Option<Transaction> {
        match self {
            CommandResult::Applied(tx) => Some(tx),
            CommandResult::Rejected => None,
        }
    }
}

/// Partial update for an image node; unset fields keep current values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePatch {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub width: Option<i64>,
    pub align: Option<Align>,
    pub caption: Option<String>,
}

impl ImagePatch {
    pub fn width(width: i64) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn align(align: Align) -> Self {
        Self {
            align: Some(align),
            ..Self::default()
        }
    }

    pub fn caption(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
            ..Self::default()
        }
    }
}

/// Partial update for an embed node (video or social)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedPatch {
    pub width: Option<i64>,
    pub align: Option<Align>,
}

impl EmbedPatch {
    pub fn width(width: i64) -> Self {
        Self {
            width: Some(width),
            align: None,
        }
    }

    pub fn align(align: Align) -> Self {
        Self {
            width: None,
            align: Some(align),
        }
    }
}

/// Which span a cell adjustment targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanDimension {
    Row,
    Col,
}

/// Insert an image node. Rejects an empty `src`; width defaults to 500
/// and is clamped to [200, 1000]; alignment defaults to center.
pub fn insert_image(
    state: &EditorState,
    src: &str,
    alt: &str,
    width: Option<i64>,
    align: Option<Align>,
) -> CommandResult {
    if src.is_empty() {
        return CommandResult::Rejected;
    }

    let attrs = ImageAttrs {
        src: src.to_string(),
        alt: alt.to_string(),
        title: None,
        width: width.map(ImageAttrs::clamp_width).unwrap_or(ImageAttrs::DEFAULT_WIDTH),
        align: align.unwrap_or_default(),
        caption: String::new(),
    };

    CommandResult::Applied(Transaction::single(Step::Insert {
        index: state.insertion_index(),
        block: Block::image(state.doc.peek_id(0), attrs),
    }))
}

/// Merge a partial attribute set onto the image at `node_ref`,
/// re-resolved at call time. Width is clamped to the image domain.
pub fn update_image_attrs(
    state: &EditorState,
    node_ref: &NodeRef,
    patch: &ImagePatch,
) -> CommandResult {
    let Some(block) = node_ref.resolve(&state.doc) else {
        return CommandResult::Rejected;
    };
    let crate::node::BlockKind::Image(current) = &block.kind else {
        return CommandResult::Rejected;
    };

    let mut attrs = current.clone();
    if let Some(src) = &patch.src {
        attrs.src = src.clone();
    }
    if let Some(alt) = &patch.alt {
        attrs.alt = alt.clone();
    }
    if let Some(width) = patch.width {
        attrs.width = ImageAttrs::clamp_width(width);
    }
    if let Some(align) = patch.align {
        attrs.align = align;
    }
    if let Some(caption) = &patch.caption {
        attrs.caption = caption.clone();
    }

    CommandResult::Applied(Transaction::single(Step::SetImageAttrs {
        id: block.id.clone(),
        attrs,
    }))
}

/// Insert a video embed. Always inserts, even when no video identifier
/// can be extracted; the view renders a fallback placeholder for an
/// invalid URL. The identifier is derived at render time, so no derived
/// attribute constrains insertion.
pub fn insert_video_embed(
    state: &EditorState,
    url: &str,
    width: Option<i64>,
    align: Option<Align>,
) -> CommandResult {
    let attrs = VideoEmbedAttrs {
        src: url.to_string(),
        width: width
            .map(VideoEmbedAttrs::clamp_width)
            .unwrap_or(VideoEmbedAttrs::DEFAULT_WIDTH),
        align: align.unwrap_or_default(),
    };

    CommandResult::Applied(Transaction::single(Step::Insert {
        index: state.insertion_index(),
        block: Block::video_embed(state.doc.peek_id(0), attrs),
    }))
}

pub fn update_video_attrs(
    state: &EditorState,
    node_ref: &NodeRef,
    patch: &EmbedPatch,
) -> CommandResult {
    let Some(block) = node_ref.resolve(&state.doc) else {
        return CommandResult::Rejected;
    };
    let crate::node::BlockKind::VideoEmbed(current) = &block.kind else {
        return CommandResult::Rejected;
    };

    let mut attrs = current.clone();
    if let Some(width) = patch.width {
        attrs.width = VideoEmbedAttrs::clamp_width(width);
    }
    if let Some(align) = patch.align {
        attrs.align = align;
    }

    CommandResult::Applied(Transaction::single(Step::SetVideoAttrs {
        id: block.id.clone(),
        attrs,
    }))
}

/// Insert a social embed. The post identifier is a required derived
/// attribute: a URL it cannot be extracted from rejects the insertion
/// and leaves the document unchanged.
pub fn insert_social_embed(state: &EditorState, url: &str) -> CommandResult {
    let Some(post_id) = extract_post_id(url) else {
        return CommandResult::Rejected;
    };

    let attrs = SocialEmbedAttrs {
        post_url: url.to_string(),
        post_id,
        width: SocialEmbedAttrs::DEFAULT_WIDTH,
        align: Align::Center,
    };

    CommandResult::Applied(Transaction::single(Step::Insert {
        index: state.insertion_index(),
        block: Block::social_embed(state.doc.peek_id(0), attrs),
    }))
}

pub fn update_social_attrs(
    state: &EditorState,
    node_ref: &NodeRef,
    patch: &EmbedPatch,
) -> CommandResult {
    let Some(block) = node_ref.resolve(&state.doc) else {
        return CommandResult::Rejected;
    };
    let crate::node::BlockKind::SocialEmbed(current) = &block.kind else {
        return CommandResult::Rejected;
    };

    let mut attrs = current.clone();
    if let Some(width) = patch.width {
        attrs.width = SocialEmbedAttrs::clamp_width(width);
    }
    if let Some(align) = patch.align {
        attrs.align = align;
    }

    CommandResult::Applied(Transaction::single(Step::SetSocialAttrs {
        id: block.id.clone(),
        attrs,
    }))
}

/// Persist the open/closed state of a details block. Also issued as a
/// side effect of native toggle gestures so the attribute tracks what
/// the user sees.
pub fn set_collapsible_open(state: &EditorState, node_ref: &NodeRef, open: bool) -> CommandResult {
    let Some(block) = node_ref.resolve(&state.doc) else {
        return CommandResult::Rejected;
    };
    if !matches!(block.kind, crate::node::BlockKind::Details { .. }) {
        return CommandResult::Rejected;
    }

    CommandResult::Applied(Transaction::single(Step::SetOpen {
        id: block.id.clone(),
        open,
    }))
}

/// Insert a collapsible with placeholder summary and body
pub fn insert_collapsible(state: &EditorState) -> CommandResult {
    let details_id = state.doc.peek_id(0);
    let body_id = state.doc.peek_id(1);

    let block = Block::details(
        details_id,
        DetailsAttrs::default(),
        "Click to expand",
        vec![Block::paragraph(body_id, "Add your content here...")],
    );

    CommandResult::Applied(Transaction::single(Step::Insert {
        index: state.insertion_index(),
        block,
    }))
}

/// Remove the referenced node unconditionally (if it still exists)
pub fn delete_node(state: &EditorState, node_ref: &NodeRef) -> CommandResult {
    if node_ref.resolve(&state.doc).is_none() {
        return CommandResult::Rejected;
    }
    CommandResult::Applied(Transaction::single(Step::Remove {
        id: node_ref.id.clone(),
    }))
}

/// Set the background of the currently selected table cell; `None`
/// clears it back to inherit
pub fn set_cell_background(state: &EditorState, color: Option<String>) -> CommandResult {
    let Some(cell) = selected_cell(state) else {
        return CommandResult::Rejected;
    };

    let attrs = TableCellAttrs {
        background: color.filter(|c| !c.is_empty()),
        ..cell.attrs.clone()
    };

    CommandResult::Applied(Transaction::single(Step::SetCellAttrs {
        id: cell.id.clone(),
        attrs,
    }))
}

/// Adjust the selected cell's row or column span by `delta`. Rejected
/// when the result would leave [1, 10].
pub fn adjust_cell_span(state: &EditorState, dimension: SpanDimension, delta: i64) -> CommandResult {
    let Some(cell) = selected_cell(state) else {
        return CommandResult::Rejected;
    };

    let current = match dimension {
        SpanDimension::Row => cell.attrs.rowspan,
        SpanDimension::Col => cell.attrs.colspan,
    };
    let next = current as i64 + delta;
    if !TableCellAttrs::span_in_domain(next) {
        return CommandResult::Rejected;
    }

    let mut attrs = cell.attrs.clone();
    match dimension {
        SpanDimension::Row => attrs.rowspan = next as u32,
        SpanDimension::Col => attrs.colspan = next as u32,
    }

    CommandResult::Applied(Transaction::single(Step::SetCellAttrs {
        id: cell.id.clone(),
        attrs,
    }))
}

fn selected_cell(state: &EditorState) -> Option<&crate::node::TableCell> {
    match &state.selection {
        Selection::Cell { id } => state.doc.find_cell(id),
        _ => None,
    }
}
