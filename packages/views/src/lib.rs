//! # Richdoc Views
//!
//! Interactive controllers for the custom nodes: each view owns a weak
//! reference to its node plus UI-only state (hover, in-flight drags),
//! reads the document through [`richdoc_editor::EditorState`], and
//! emits transactions for the host to dispatch. Views never mutate the
//! document directly, and a view whose node has vanished goes inert
//! instead of erroring.

pub mod cell_overlay;
pub mod collapsible;
pub mod controller;
pub mod image;
pub mod script;
pub mod social;
pub mod video;

pub use cell_overlay::{decorations, CellMenu, CellTrigger, SpanKind, CELL_COLORS};
pub use collapsible::CollapsibleView;
pub use controller::{InteractionState, PointerEvent, ResizeDrag, ViewPhase};
pub use image::ImageView;
pub use script::{ScriptHost, ScriptLoader, ScriptState, WaiterId, LOAD_TIMEOUT_MS, POLL_INTERVAL_MS};
pub use social::SocialView;
pub use video::VideoView;
