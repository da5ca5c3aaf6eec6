//! Editor state: the document plus the host-driven selection.

use crate::node::{Block, Document, NodeId};
use serde::{Deserialize, Serialize};

/// Current selection, owned by the host; commands read it but only the
/// host (or the harness driving it) writes it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selection {
    #[default]
    None,
    /// Caret inside the block at this preorder position
    Caret { pos: usize },
    /// Text selection spanning the blocks in `from..=to` (preorder)
    Range { from: usize, to: usize },
    /// A whole node selected (image, embed, ...)
    Node { id: NodeId },
    /// Cursor inside a table cell
    Cell { id: NodeId },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorState {
    pub doc: Document,
    pub selection: Selection,
}

impl EditorState {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            selection: Selection::None,
        }
    }

    /// Top-level index where an insert command should place a new block:
    /// after the block under the caret, or at the end of the document
    pub fn insertion_index(&self) -> usize {
        let caret_pos = match self.selection {
            Selection::Caret { pos } => Some(pos),
            Selection::Range { to, .. } => Some(to),
            _ => None,
        };

        if let Some(target) = caret_pos {
            // Insert after the last top-level block that starts at or
            // before the caret's preorder position
            let mut index = 0;
            for (i, block) in self.doc.blocks.iter().enumerate() {
                match self.doc.position_of(&block.id) {
                    Some(pos) if pos <= target => index = i + 1,
                    _ => break,
                }
            }
            index
        } else {
            self.doc.blocks.len()
        }
    }
}

/// Weak back-reference to a node: position hint plus identity.
///
/// Valid for one render cycle only: always re-resolve before acting,
/// since the node may have moved or vanished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub pos: usize,
    pub id: NodeId,
}

impl NodeRef {
    pub fn new(pos: usize, id: impl Into<NodeId>) -> Self {
        Self { pos, id: id.into() }
    }

    /// Build a ref pointing at an existing node
    pub fn to_block(doc: &Document, id: &str) -> Option<Self> {
        doc.position_of(id).map(|pos| Self::new(pos, id))
    }

    /// Re-resolve against the current document; identity wins over the
    /// position hint
    pub fn resolve<'doc>(&self, doc: &'doc Document) -> Option<&'doc Block> {
        doc.find(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::IdGenerator;

    fn doc_with_paragraphs(texts: &[&str]) -> Document {
        let mut ids = IdGenerator::new();
        let blocks = texts
            .iter()
            .map(|text| Block::paragraph(ids.new_id(), *text))
            .collect();
        Document::new(blocks, ids.counter())
    }

    #[test]
    fn test_insertion_index_follows_caret() {
        let doc = doc_with_paragraphs(&["a", "b", "c"]);
        let mut state = EditorState::new(doc);

        state.selection = Selection::Caret { pos: 0 };
        assert_eq!(state.insertion_index(), 1);

        state.selection = Selection::Caret { pos: 2 };
        assert_eq!(state.insertion_index(), 3);

        state.selection = Selection::None;
        assert_eq!(state.insertion_index(), 3);
    }

    #[test]
    fn test_node_ref_resolves_by_identity() {
        let doc = doc_with_paragraphs(&["a", "b"]);
        // Stale position hint; identity still resolves
        let node_ref = NodeRef::new(99, "node-1");
        assert_eq!(node_ref.resolve(&doc).unwrap().id, "node-1");

        let gone = NodeRef::new(0, "node-9");
        assert!(gone.resolve(&doc).is_none());
    }
}
