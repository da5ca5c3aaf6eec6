//! Transactions: atomic, validated batches of document steps.
//!
//! ## Semantics
//!
//! - **Atomic**: a transaction applies completely or not at all. Steps
//!   run against a working copy; the first failing step aborts the whole
//!   batch and the previous tree is returned untouched.
//! - **Validated**: every step checks its target exists and has the
//!   right kind before mutating (structure errors never half-apply).
//! - **Identity-addressed**: steps name nodes by id, so a transaction
//!   built against a slightly stale view still lands on the right node
//!   or fails cleanly if it was deleted.

use crate::node::{Block, BlockKind, Document, NodeId, TableCell, TableRow};
use richdoc_schema::{ImageAttrs, Indent, SocialEmbedAttrs, TableCellAttrs, VideoEmbedAttrs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One document mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Step {
    /// Insert a block at a top-level index (clamped to the block count)
    Insert { index: usize, block: Block },

    /// Remove a block and all its descendants
    Remove { id: NodeId },

    SetImageAttrs { id: NodeId, attrs: ImageAttrs },

    SetVideoAttrs { id: NodeId, attrs: VideoEmbedAttrs },

    SetSocialAttrs { id: NodeId, attrs: SocialEmbedAttrs },

    /// Persist the open/closed state of a details block
    SetOpen { id: NodeId, open: bool },

    SetIndent { id: NodeId, indent: Indent },

    SetCellAttrs { id: NodeId, attrs: TableCellAttrs },

    InsertRow { table: NodeId, index: usize, row: TableRow },

    RemoveRow { table: NodeId, index: usize },

    /// Insert a column; one prepared cell per existing row
    InsertColumn { table: NodeId, index: usize, cells: Vec<TableCell> },

    RemoveColumn { table: NodeId, index: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {id} is not a {expected}")]
    WrongKind { id: NodeId, expected: &'static str },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Row index {index} out of bounds for table {table}")]
    RowOutOfBounds { table: NodeId, index: usize },

    #[error("Column index {index} out of bounds for table {table}")]
    ColumnOutOfBounds { table: NodeId, index: usize },
}

/// An atomic batch of steps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transaction {
    pub steps: Vec<Step>,
}

impl Transaction {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn single(step: Step) -> Self {
        Self { steps: vec![step] }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply to a document, producing the replacement tree. The input is
    /// untouched on error.
    pub fn apply(&self, doc: &Document) -> Result<Document, StepError> {
        let mut next = doc.clone();
        for step in &self.steps {
            apply_step(step, &mut next)?;
        }
        Ok(next)
    }
}

fn apply_step(step: &Step, doc: &mut Document) -> Result<(), StepError> {
    match step {
        Step::Insert { index, block } => {
            let insert_index = (*index).min(doc.blocks.len());
            doc.note_inserted(block);
            doc.blocks.insert(insert_index, block.clone());
            Ok(())
        }

        Step::Remove { id } => {
            if is_last_details_body_child(doc, id) {
                return Err(StepError::InvalidStructure(
                    "details body must keep at least one block".to_string(),
                ));
            }
            doc.remove(id)
                .map(|_| ())
                .ok_or_else(|| StepError::NodeNotFound(id.clone()))
        }

        Step::SetImageAttrs { id, attrs } => {
            let block = find(doc, id)?;
            match &mut block.kind {
                BlockKind::Image(current) => {
                    *current = attrs.clone();
                    Ok(())
                }
                _ => Err(wrong_kind(id, "image")),
            }
        }

        Step::SetVideoAttrs { id, attrs } => {
            let block = find(doc, id)?;
            match &mut block.kind {
                BlockKind::VideoEmbed(current) => {
                    *current = attrs.clone();
                    Ok(())
                }
                _ => Err(wrong_kind(id, "video embed")),
            }
        }

        Step::SetSocialAttrs { id, attrs } => {
            let block = find(doc, id)?;
            match &mut block.kind {
                BlockKind::SocialEmbed(current) => {
                    *current = attrs.clone();
                    Ok(())
                }
                _ => Err(wrong_kind(id, "social embed")),
            }
        }

        Step::SetOpen { id, open } => {
            let block = find(doc, id)?;
            match &mut block.kind {
                BlockKind::Details { attrs, .. } => {
                    attrs.open = *open;
                    Ok(())
                }
                _ => Err(wrong_kind(id, "details block")),
            }
        }

        Step::SetIndent { id, indent } => {
            let block = find(doc, id)?;
            match &mut block.kind {
                BlockKind::Paragraph { indent: current, .. }
                | BlockKind::Heading { indent: current, .. } => {
                    *current = *indent;
                    Ok(())
                }
                _ => Err(wrong_kind(id, "paragraph or heading")),
            }
        }

        Step::SetCellAttrs { id, attrs } => {
            let cell = doc
                .find_cell_mut(id)
                .ok_or_else(|| StepError::NodeNotFound(id.clone()))?;
            cell.attrs = attrs.clone();
            Ok(())
        }

        Step::InsertRow { table, index, row } => {
            doc.note_inserted_row(row);
            let rows = find_table_rows(doc, table)?;
            if let Some(first) = rows.first() {
                if row.cells.len() != first.cells.len() {
                    return Err(StepError::InvalidStructure(format!(
                        "row has {} cells, table has {} columns",
                        row.cells.len(),
                        first.cells.len()
                    )));
                }
            }
            let insert_index = (*index).min(rows.len());
            rows.insert(insert_index, row.clone());
            Ok(())
        }

        Step::RemoveRow { table, index } => {
            let rows = find_table_rows(doc, table)?;
            if *index >= rows.len() {
                return Err(StepError::RowOutOfBounds {
                    table: table.clone(),
                    index: *index,
                });
            }
            if rows.len() == 1 {
                return Err(StepError::InvalidStructure(
                    "table must keep at least one row".to_string(),
                ));
            }
            rows.remove(*index);
            Ok(())
        }

        Step::InsertColumn { table, index, cells } => {
            doc.note_inserted_cells(cells);
            let rows = find_table_rows(doc, table)?;
            if cells.len() != rows.len() {
                return Err(StepError::InvalidStructure(format!(
                    "column has {} cells, table has {} rows",
                    cells.len(),
                    rows.len()
                )));
            }
            for (row, cell) in rows.iter_mut().zip(cells) {
                let insert_index = (*index).min(row.cells.len());
                row.cells.insert(insert_index, cell.clone());
            }
            Ok(())
        }

        Step::RemoveColumn { table, index } => {
            let rows = find_table_rows(doc, table)?;
            let columns = rows.first().map(|row| row.cells.len()).unwrap_or(0);
            if *index >= columns {
                return Err(StepError::ColumnOutOfBounds {
                    table: table.clone(),
                    index: *index,
                });
            }
            if columns == 1 {
                return Err(StepError::InvalidStructure(
                    "table must keep at least one column".to_string(),
                ));
            }
            for row in rows {
                if *index < row.cells.len() {
                    row.cells.remove(*index);
                }
            }
            Ok(())
        }
    }
}

fn find<'doc>(doc: &'doc mut Document, id: &NodeId) -> Result<&'doc mut Block, StepError> {
    doc.find_mut(id)
        .ok_or_else(|| StepError::NodeNotFound(id.clone()))
}

fn wrong_kind(id: &NodeId, expected: &'static str) -> StepError {
    StepError::WrongKind {
        id: id.clone(),
        expected,
    }
}

fn find_table_rows<'doc>(
    doc: &'doc mut Document,
    table: &NodeId,
) -> Result<&'doc mut Vec<TableRow>, StepError> {
    let block = doc
        .find_mut(table)
        .ok_or_else(|| StepError::NodeNotFound(table.clone()))?;
    match &mut block.kind {
        BlockKind::Table { rows } => Ok(rows),
        _ => Err(wrong_kind(table, "table")),
    }
}

fn is_last_details_body_child(doc: &Document, id: &str) -> bool {
    let mut result = false;
    doc.walk(&mut |block, _| {
        if let BlockKind::Details { body, .. } = &block.kind {
            if body.len() == 1 && body[0].id == id {
                result = true;
            }
        }
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::IdGenerator;
    use richdoc_schema::DetailsAttrs;

    fn sample_doc() -> Document {
        let mut ids = IdGenerator::new();
        let image = Block::image(ids.new_id(), ImageAttrs::new("https://x/y.png", "cat"));
        let details = Block::details(
            ids.new_id(),
            DetailsAttrs::default(),
            "Q",
            vec![Block::paragraph(ids.new_id(), "A")],
        );
        Document::new(vec![image, details], ids.counter())
    }

    #[test]
    fn test_step_serialization_round_trip() {
        let step = Step::SetOpen {
            id: "node-1".to_string(),
            open: false,
        };
        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(step, back);
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let doc = sample_doc();
        let tx = Transaction::single(Step::SetOpen {
            id: "node-1".to_string(),
            open: false,
        });
        let next = tx.apply(&doc).unwrap();

        // Old tree unchanged, new tree updated
        assert!(matches!(
            &doc.find("node-1").unwrap().kind,
            BlockKind::Details { attrs, .. } if attrs.open
        ));
        assert!(matches!(
            &next.find("node-1").unwrap().kind,
            BlockKind::Details { attrs, .. } if !attrs.open
        ));
    }

    #[test]
    fn test_failing_step_aborts_whole_batch() {
        let doc = sample_doc();
        let tx = Transaction::new(vec![
            Step::SetOpen {
                id: "node-1".to_string(),
                open: false,
            },
            Step::Remove {
                id: "missing".to_string(),
            },
        ]);

        let result = tx.apply(&doc);
        assert!(matches!(result, Err(StepError::NodeNotFound(_))));
        // First step must not have leaked into the original
        assert!(matches!(
            &doc.find("node-1").unwrap().kind,
            BlockKind::Details { attrs, .. } if attrs.open
        ));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let doc = sample_doc();
        let tx = Transaction::single(Step::SetOpen {
            id: "node-0".to_string(),
            open: false,
        });
        assert!(matches!(tx.apply(&doc), Err(StepError::WrongKind { .. })));
    }

    #[test]
    fn test_insert_index_clamped() {
        let doc = sample_doc();
        let block = Block::paragraph(doc.peek_id(0), "tail");
        let tx = Transaction::single(Step::Insert { index: 99, block });
        let next = tx.apply(&doc).unwrap();
        assert_eq!(next.blocks.last().unwrap().id, "node-3");
    }

    #[test]
    fn test_inserted_ids_advance_watermark() {
        let doc = sample_doc();
        let block = Block::paragraph(doc.peek_id(0), "new");
        let tx = Transaction::single(Step::Insert { index: 0, block });
        let next = tx.apply(&doc).unwrap();
        // The next peeked id must not collide with the inserted one
        assert_eq!(next.peek_id(0), "node-4");
    }

    #[test]
    fn test_cannot_remove_last_details_body_child() {
        let doc = sample_doc();
        let tx = Transaction::single(Step::Remove {
            id: "node-2".to_string(),
        });
        assert!(matches!(tx.apply(&doc), Err(StepError::InvalidStructure(_))));
    }
}
