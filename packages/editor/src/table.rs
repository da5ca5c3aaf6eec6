//! Table structure commands: row and column insertion and removal.
//!
//! Each command resolves the trigger cell by identity at call time,
//! locates its table and position, and builds the structural step from
//! the live document. A cell that has vanished since the menu was built
//! rejects cleanly. Removal commands reject rather than delete the last
//! row or column; the step layer enforces the same floor.

use crate::commands::CommandResult;
use crate::node::{Block, BlockKind, TableCell, TableRow};
use crate::state::EditorState;
use crate::transaction::{Step, Transaction};
use richdoc_schema::TableCellAttrs;

/// Where the new row or column lands relative to the trigger cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

pub fn add_row(state: &EditorState, cell_id: &str, placement: Placement) -> CommandResult {
    let Some((table, row_index, _)) = state.doc.locate_cell(cell_id) else {
        return CommandResult::Rejected;
    };
    let columns = column_count(state, &table);

    // One id for the row, then two per cell (cell + its paragraph)
    let mut offset = 0;
    let row_id = state.doc.peek_id(offset);
    offset += 1;
    let mut cells = Vec::with_capacity(columns);
    for _ in 0..columns {
        let (cell, consumed) = fresh_cell(state, offset);
        offset += consumed;
        cells.push(cell);
    }

    let index = match placement {
        Placement::Before => row_index,
        Placement::After => row_index + 1,
    };

    CommandResult::Applied(Transaction::single(Step::InsertRow {
        table,
        index,
        row: TableRow { id: row_id, cells },
    }))
}

pub fn delete_row(state: &EditorState, cell_id: &str) -> CommandResult {
    let Some((table, row_index, _)) = state.doc.locate_cell(cell_id) else {
        return CommandResult::Rejected;
    };
    if row_count(state, &table) <= 1 {
        return CommandResult::Rejected;
    }

    CommandResult::Applied(Transaction::single(Step::RemoveRow {
        table,
        index: row_index,
    }))
}

pub fn add_column(state: &EditorState, cell_id: &str, placement: Placement) -> CommandResult {
    let Some((table, _, col_index)) = state.doc.locate_cell(cell_id) else {
        return CommandResult::Rejected;
    };
    let rows = row_count(state, &table);

    let mut offset = 0;
    let mut cells = Vec::with_capacity(rows);
    for _ in 0..rows {
        let (cell, consumed) = fresh_cell(state, offset);
        offset += consumed;
        cells.push(cell);
    }

    let index = match placement {
        Placement::Before => col_index,
        Placement::After => col_index + 1,
    };

    CommandResult::Applied(Transaction::single(Step::InsertColumn {
        table,
        index,
        cells,
    }))
}

pub fn delete_column(state: &EditorState, cell_id: &str) -> CommandResult {
    let Some((table, _, col_index)) = state.doc.locate_cell(cell_id) else {
        return CommandResult::Rejected;
    };
    if column_count(state, &table) <= 1 {
        return CommandResult::Rejected;
    }

    CommandResult::Applied(Transaction::single(Step::RemoveColumn {
        table,
        index: col_index,
    }))
}

/// An empty cell seeded with one empty paragraph; returns the number of
/// peeked ids it consumed
fn fresh_cell(state: &EditorState, offset: u64) -> (TableCell, u64) {
    let cell = TableCell {
        id: state.doc.peek_id(offset),
        attrs: TableCellAttrs::default(),
        content: vec![Block::paragraph(state.doc.peek_id(offset + 1), "")],
    };
    (cell, 2)
}

fn row_count(state: &EditorState, table: &str) -> usize {
    match state.doc.find(table).map(|block| &block.kind) {
        Some(BlockKind::Table { rows }) => rows.len(),
        _ => 0,
    }
}

fn column_count(state: &EditorState, table: &str) -> usize {
    match state.doc.find(table).map(|block| &block.kind) {
        Some(BlockKind::Table { rows }) => rows.first().map(|row| row.cells.len()).unwrap_or(0),
        _ => 0,
    }
}
