//! # Richdoc Markup
//!
//! The persisted markup format for richdoc documents.
//!
//! Custom editor nodes serialize to a small HTML-like format: each node
//! becomes an element carrying `data-*` attributes (or inline `style`)
//! sufficient for the parse rules to reconstruct the node exactly. This
//! package owns the element model plus the text parser/serializer pair;
//! which attributes mean what is decided one level up, in `richdoc-schema`.
//!
//! ```text
//! text ──parse──▶ MarkupNode tree ──schema──▶ typed attributes
//!      ◀─serialize──              ◀─schema──
//! ```

mod element;
mod error;
mod parser;
mod serializer;

pub use element::{MarkupElement, MarkupNode};
pub use error::{ParseError, ParseResult};
pub use parser::{parse_element, parse_fragment};
pub use serializer::{serialize_element, serialize_fragment};
