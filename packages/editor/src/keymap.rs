//! Keyboard bindings for the extension commands.
//!
//! A binding claims a key only when its command actually produces a
//! transaction. Tab and Shift+Tab in particular fall through when the
//! selection holds no indentable block (or nothing can move), so the
//! host keeps its native behavior, like moving between table cells.

use crate::commands::insert_collapsible;
use crate::indent::{decrease_indent, increase_indent};
use crate::state::EditorState;
use crate::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    ShiftTab,
    /// Mod+Shift+D (Cmd on mac, Ctrl elsewhere)
    ModShiftD,
}

/// Returns the transaction for a claimed key, or `None` to let the host
/// apply its default handling
pub fn handle_key(state: &EditorState, key: Key) -> Option<Transaction> {
    let result = match key {
        Key::Tab => increase_indent(state),
        Key::ShiftTab => decrease_indent(state),
        Key::ModShiftD => insert_collapsible(state),
    };
    result.into_transaction()
}
