//! Indentation commands over the fixed ladder.
//!
//! Only paragraphs and headings indent. A command collects every
//! indentable block under the selection, moves each one rung up or down
//! the ladder, and emits steps only for blocks that actually change.
//! When nothing changes (empty selection, no indentable blocks, or all
//! blocks already at the boundary rung) the command rejects and the
//! document is untouched.

use crate::commands::CommandResult;
use crate::state::{EditorState, Selection};
use crate::transaction::{Step, Transaction};
use richdoc_schema::Indent;

pub fn increase_indent(state: &EditorState) -> CommandResult {
    shift_indent(state, Indent::increased)
}

pub fn decrease_indent(state: &EditorState) -> CommandResult {
    shift_indent(state, Indent::decreased)
}

fn shift_indent(state: &EditorState, shift: fn(&Indent) -> Indent) -> CommandResult {
    let (from, to) = match state.selection {
        Selection::Caret { pos } => (pos, pos),
        Selection::Range { from, to } => (from, to),
        _ => return CommandResult::Rejected,
    };

    let mut steps = Vec::new();
    for id in state.doc.indentable_in_range(from, to) {
        let Some(current) = state.doc.find(&id).and_then(|block| block.indent()) else {
            continue;
        };
        let next = shift(&current);
        if next != current {
            steps.push(Step::SetIndent { id, indent: next });
        }
    }

    if steps.is_empty() {
        CommandResult::Rejected
    } else {
        CommandResult::Applied(Transaction::new(steps))
    }
}
