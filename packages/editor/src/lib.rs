//! # Richdoc Editor
//!
//! Document model and command layer for the rich-document extensions:
//! a block tree with stable node identity, atomic transactions over it,
//! and a command set of total functions (invalid input rejects, never
//! errors and never half-applies).
//!
//! ## Layering
//!
//! - [`node`]: the block tree and id minting
//! - [`state`]: document + host-driven selection, weak node references
//! - [`transaction`]: validated, atomic step batches
//! - [`commands`], [`indent`], [`table`]: the command set
//! - [`keymap`]: key bindings that fall through when a command rejects
//! - [`editor`]: dispatch loop, revision counter, subscribers
//! - [`persistence`]: markup round-trip and storage
//! - [`upload`]: size/type gate in front of the upload backend

pub mod commands;
pub mod editor;
pub mod error;
pub mod indent;
pub mod keymap;
pub mod node;
pub mod persistence;
pub mod state;
pub mod table;
pub mod transaction;
pub mod upload;

pub use commands::{CommandResult, EmbedPatch, ImagePatch, SpanDimension};
pub use editor::Editor;
pub use error::EditorError;
pub use node::{Block, BlockKind, Document, IdGenerator, NodeId, TableCell, TableRow};
pub use state::{EditorState, NodeRef, Selection};
pub use transaction::{Step, StepError, Transaction};
