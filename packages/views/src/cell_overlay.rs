//! Table cell overlay: one trigger decoration per cell, recomputed
//! wholesale from the current document, and the dropdown menu behind
//! the trigger. Menu actions resolve their cell by identity at click
//! time, so a menu held open across edits either acts on the live cell
//! or does nothing.

use richdoc_editor::table::{add_column, add_row, delete_column, delete_row, Placement};
use richdoc_editor::{BlockKind, EditorState, NodeId, Step, Transaction};
use richdoc_schema::TableCellAttrs;

/// Background palette offered by the menu; the empty value clears back
/// to inherit
pub const CELL_COLORS: [(&str, &str); 8] = [
    ("Default", ""),
    ("Red", "#fee2e2"),
    ("Orange", "#ffedd5"),
    ("Yellow", "#fef9c3"),
    ("Green", "#dcfce7"),
    ("Blue", "#dbeafe"),
    ("Purple", "#f3e8ff"),
    ("Gray", "#f3f4f6"),
];

/// Anchor for one cell's overlay trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTrigger {
    pub cell: NodeId,
    pub table: NodeId,
    pub row: usize,
    pub col: usize,
}

/// One trigger per cell in document order. Callers replace their whole
/// decoration set with the result after every document change.
pub fn decorations(state: &EditorState) -> Vec<CellTrigger> {
    let mut triggers = Vec::new();
    state.doc.walk(&mut |block, _| {
        if let BlockKind::Table { rows } = &block.kind {
            for (row_index, row) in rows.iter().enumerate() {
                for (col_index, cell) in row.cells.iter().enumerate() {
                    triggers.push(CellTrigger {
                        cell: cell.id.clone(),
                        table: block.id.clone(),
                        row: row_index,
                        col: col_index,
                    });
                }
            }
        }
    });
    triggers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Row,
    Col,
}

/// The dropdown opened from a trigger
pub struct CellMenu {
    cell: NodeId,
}

impl CellMenu {
    pub fn open(trigger: &CellTrigger) -> Self {
        Self {
            cell: trigger.cell.clone(),
        }
    }

    pub fn cell(&self) -> &str {
        &self.cell
    }

    /// Apply a palette entry; the empty value clears the background
    pub fn set_background(&self, state: &EditorState, color: &str) -> Option<Transaction> {
        let cell = state.doc.find_cell(&self.cell)?;
        let attrs = TableCellAttrs {
            background: Some(color.to_string()).filter(|c| !c.is_empty()),
            ..cell.attrs.clone()
        };
        Some(Transaction::single(Step::SetCellAttrs {
            id: cell.id.clone(),
            attrs,
        }))
    }

    /// Bump a span by `delta`; silently does nothing at the domain edge
    pub fn adjust_span(&self, state: &EditorState, kind: SpanKind, delta: i64) -> Option<Transaction> {
        let cell = state.doc.find_cell(&self.cell)?;
        let current = match kind {
            SpanKind::Row => cell.attrs.rowspan,
            SpanKind::Col => cell.attrs.colspan,
        };
        let next = current as i64 + delta;
        if !TableCellAttrs::span_in_domain(next) {
            return None;
        }

        let mut attrs = cell.attrs.clone();
        match kind {
            SpanKind::Row => attrs.rowspan = next as u32,
            SpanKind::Col => attrs.colspan = next as u32,
        }
        Some(Transaction::single(Step::SetCellAttrs {
            id: cell.id.clone(),
            attrs,
        }))
    }

    pub fn add_row(&self, state: &EditorState, placement: Placement) -> Option<Transaction> {
        add_row(state, &self.cell, placement).into_transaction()
    }

    pub fn delete_row(&self, state: &EditorState) -> Option<Transaction> {
        delete_row(state, &self.cell).into_transaction()
    }

    pub fn add_column(&self, state: &EditorState, placement: Placement) -> Option<Transaction> {
        add_column(state, &self.cell, placement).into_transaction()
    }

    pub fn delete_column(&self, state: &EditorState) -> Option<Transaction> {
        delete_column(state, &self.cell).into_transaction()
    }
}
