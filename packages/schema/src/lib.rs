//! # Richdoc Schema
//!
//! The attribute schema registry: typed attribute sets for every custom
//! node kind, their domain clamping rules, and the parse/serialize
//! contracts that tie them to the persisted markup format.
//!
//! ## Round-trip invariant
//!
//! For every node kind and every valid attribute set `x`:
//!
//! ```text
//! parse(serialize(x)) == x
//! ```
//!
//! `serialize` never omits an attribute needed to reconstruct render
//! state: alignment, width, captions and spans all appear as `data-*`
//! attributes or inline style in the output markup.

mod attrs;
mod embed;
mod registry;

pub use attrs::{
    Align, DetailsAttrs, ImageAttrs, Indent, SocialEmbedAttrs, TableCellAttrs, VideoEmbedAttrs,
    INDENT_LADDER,
};
pub use embed::{extract_post_id, extract_video_id, video_embed_url, video_height, VideoEmbedOptions};
pub use registry::{
    parse_indent, serialize_indent, CellSchema, DetailsSchema, ImageSchema, NodeKind, NodeSchema,
    SchemaRegistry, SocialEmbedSchema, VideoEmbedSchema,
};
