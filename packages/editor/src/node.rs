//! Document tree: block nodes with stable identity.
//!
//! Every block carries a string id that survives position shifts; views
//! and commands address nodes by id and re-resolve at dispatch time.
//! Ids do NOT survive serialization; save/reload reconstructs the tree
//! from markup with fresh ids.

use richdoc_schema::{
    DetailsAttrs, ImageAttrs, Indent, SocialEmbedAttrs, TableCellAttrs, VideoEmbedAttrs,
};
use serde::{Deserialize, Serialize};

pub type NodeId = String;

/// Mints `node-N` ids for freshly constructed blocks
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(counter: u64) -> Self {
        Self { counter }
    }

    pub fn new_id(&mut self) -> NodeId {
        let id = format!("node-{}", self.counter);
        self.counter += 1;
        id
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }
}

/// A block node: stable id plus kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: NodeId,
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockKind {
    Paragraph {
        text: String,
        indent: Indent,
    },
    Heading {
        level: u8,
        text: String,
        indent: Indent,
    },
    Image(ImageAttrs),
    VideoEmbed(VideoEmbedAttrs),
    SocialEmbed(SocialEmbedAttrs),
    /// Disclosure block: one inline summary plus at least one body block
    Details {
        attrs: DetailsAttrs,
        summary: String,
        body: Vec<Block>,
    },
    Table {
        rows: Vec<TableRow>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: NodeId,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub id: NodeId,
    pub attrs: TableCellAttrs,
    pub content: Vec<Block>,
}

impl Block {
    pub fn paragraph(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            kind: BlockKind::Paragraph {
                text: text.into(),
                indent: Indent::default(),
            },
        }
    }

    pub fn heading(id: NodeId, level: u8, text: impl Into<String>) -> Self {
        Self {
            id,
            kind: BlockKind::Heading {
                level: level.clamp(1, 6),
                text: text.into(),
                indent: Indent::default(),
            },
        }
    }

    pub fn image(id: NodeId, attrs: ImageAttrs) -> Self {
        Self {
            id,
            kind: BlockKind::Image(attrs),
        }
    }

    pub fn video_embed(id: NodeId, attrs: VideoEmbedAttrs) -> Self {
        Self {
            id,
            kind: BlockKind::VideoEmbed(attrs),
        }
    }

    pub fn social_embed(id: NodeId, attrs: SocialEmbedAttrs) -> Self {
        Self {
            id,
            kind: BlockKind::SocialEmbed(attrs),
        }
    }

    pub fn details(id: NodeId, attrs: DetailsAttrs, summary: impl Into<String>, body: Vec<Block>) -> Self {
        Self {
            id,
            kind: BlockKind::Details {
                attrs,
                summary: summary.into(),
                body,
            },
        }
    }

    pub fn table(id: NodeId, rows: Vec<TableRow>) -> Self {
        Self {
            id,
            kind: BlockKind::Table { rows },
        }
    }

    /// Can this block carry the indent attribute?
    pub fn is_indentable(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Paragraph { .. } | BlockKind::Heading { .. }
        )
    }

    pub fn indent(&self) -> Option<Indent> {
        match &self.kind {
            BlockKind::Paragraph { indent, .. } | BlockKind::Heading { indent, .. } => Some(*indent),
            _ => None,
        }
    }
}

/// The document: a sequence of top-level blocks plus the id watermark
/// used to mint fresh ids deterministically
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    next_id: u64,
}

impl Document {
    pub fn new(blocks: Vec<Block>, next_id: u64) -> Self {
        Self { blocks, next_id }
    }

    /// Id the `offset`-th fresh block would get, without minting it.
    /// Commands use this to stay pure: the id only becomes real when the
    /// insert step applies.
    pub fn peek_id(&self, offset: u64) -> NodeId {
        format!("node-{}", self.next_id + offset)
    }

    /// Advance the id watermark past every id in a newly inserted block
    pub(crate) fn note_inserted(&mut self, block: &Block) {
        let mut watermark = self.next_id;
        visit_ids(block, &mut |id| note_id(&mut watermark, id));
        self.next_id = watermark;
    }

    pub(crate) fn note_inserted_row(&mut self, row: &TableRow) {
        let mut watermark = self.next_id;
        note_id(&mut watermark, &row.id);
        for cell in &row.cells {
            note_id(&mut watermark, &cell.id);
            for child in &cell.content {
                visit_ids(child, &mut |id| note_id(&mut watermark, id));
            }
        }
        self.next_id = watermark;
    }

    pub(crate) fn note_inserted_cells(&mut self, cells: &[TableCell]) {
        let mut watermark = self.next_id;
        for cell in cells {
            note_id(&mut watermark, &cell.id);
            for child in &cell.content {
                visit_ids(child, &mut |id| note_id(&mut watermark, id));
            }
        }
        self.next_id = watermark;
    }

    pub fn find(&self, id: &str) -> Option<&Block> {
        find_in(&self.blocks, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Block> {
        find_in_mut(&mut self.blocks, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Preorder position of a block, counting every nested block
    pub fn position_of(&self, id: &str) -> Option<usize> {
        let mut result = None;
        self.walk(&mut |block, pos| {
            if block.id == id && result.is_none() {
                result = Some(pos);
            }
        });
        result
    }

    /// Preorder walk over all blocks (top-level, details bodies, cell
    /// contents), with each block's preorder position
    pub fn walk(&self, visit: &mut dyn FnMut(&Block, usize)) {
        let mut pos = 0;
        walk_blocks(&self.blocks, visit, &mut pos);
    }

    /// Ids of indentable blocks whose preorder position falls in
    /// `from..=to`
    pub fn indentable_in_range(&self, from: usize, to: usize) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.walk(&mut |block, pos| {
            if pos >= from && pos <= to && block.is_indentable() {
                ids.push(block.id.clone());
            }
        });
        ids
    }

    /// Remove a block wherever it lives; `None` if absent
    pub(crate) fn remove(&mut self, id: &str) -> Option<Block> {
        remove_in(&mut self.blocks, id)
    }

    pub fn find_cell(&self, id: &str) -> Option<&TableCell> {
        self.tables().find_map(|rows| {
            rows.iter()
                .flat_map(|row| row.cells.iter())
                .find(|cell| cell.id == id)
        })
    }

    pub fn find_cell_mut(&mut self, id: &str) -> Option<&mut TableCell> {
        find_cell_in_mut(&mut self.blocks, id)
    }

    /// Locate the table containing a cell: (table id, row index, column index)
    pub fn locate_cell(&self, cell_id: &str) -> Option<(NodeId, usize, usize)> {
        let mut found = None;
        self.walk(&mut |block, _| {
            if found.is_some() {
                return;
            }
            if let BlockKind::Table { rows } = &block.kind {
                for (row_index, row) in rows.iter().enumerate() {
                    for (col_index, cell) in row.cells.iter().enumerate() {
                        if cell.id == cell_id {
                            found = Some((block.id.clone(), row_index, col_index));
                        }
                    }
                }
            }
        });
        found
    }

    fn tables(&self) -> impl Iterator<Item = &Vec<TableRow>> {
        let mut tables = Vec::new();
        collect_tables(&self.blocks, &mut tables);
        tables.into_iter()
    }
}

fn collect_tables<'a>(blocks: &'a [Block], out: &mut Vec<&'a Vec<TableRow>>) {
    for block in blocks {
        match &block.kind {
            BlockKind::Table { rows } => {
                out.push(rows);
                for row in rows {
                    for cell in &row.cells {
                        collect_tables(&cell.content, out);
                    }
                }
            }
            BlockKind::Details { body, .. } => collect_tables(body, out),
            _ => {}
        }
    }
}

fn walk_blocks(blocks: &[Block], visit: &mut dyn FnMut(&Block, usize), pos: &mut usize) {
    for block in blocks {
        visit(block, *pos);
        *pos += 1;
        match &block.kind {
            BlockKind::Details { body, .. } => walk_blocks(body, visit, pos),
            BlockKind::Table { rows } => {
                for row in rows {
                    for cell in &row.cells {
                        walk_blocks(&cell.content, visit, pos);
                    }
                }
            }
            _ => {}
        }
    }
}

fn find_in<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        let nested = match &block.kind {
            BlockKind::Details { body, .. } => find_in(body, id),
            BlockKind::Table { rows } => rows
                .iter()
                .flat_map(|row| row.cells.iter())
                .find_map(|cell| find_in(&cell.content, id)),
            _ => None,
        };
        if nested.is_some() {
            return nested;
        }
    }
    None
}

fn find_in_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut Block> {
    for block in blocks {
        if block.id == id {
            return Some(block);
        }
        let nested = match &mut block.kind {
            BlockKind::Details { body, .. } => find_in_mut(body, id),
            BlockKind::Table { rows } => rows
                .iter_mut()
                .flat_map(|row| row.cells.iter_mut())
                .find_map(|cell| find_in_mut(&mut cell.content, id)),
            _ => None,
        };
        if nested.is_some() {
            return nested;
        }
    }
    None
}

fn find_cell_in_mut<'a>(blocks: &'a mut [Block], id: &str) -> Option<&'a mut TableCell> {
    for block in blocks {
        match &mut block.kind {
            BlockKind::Table { rows } => {
                for row in rows {
                    for cell in &mut row.cells {
                        if cell.id == id {
                            return Some(cell);
                        }
                        if let Some(found) = find_cell_in_mut(&mut cell.content, id) {
                            return Some(found);
                        }
                    }
                }
            }
            BlockKind::Details { body, .. } => {
                if let Some(found) = find_cell_in_mut(body, id) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

fn remove_in(blocks: &mut Vec<Block>, id: &str) -> Option<Block> {
    if let Some(index) = blocks.iter().position(|block| block.id == id) {
        return Some(blocks.remove(index));
    }
    for block in blocks {
        let removed = match &mut block.kind {
            BlockKind::Details { body, .. } => remove_in(body, id),
            BlockKind::Table { rows } => rows
                .iter_mut()
                .flat_map(|row| row.cells.iter_mut())
                .find_map(|cell| remove_in(&mut cell.content, id)),
            _ => None,
        };
        if removed.is_some() {
            return removed;
        }
    }
    None
}

fn note_id(watermark: &mut u64, id: &str) {
    if let Some(n) = id.strip_prefix("node-").and_then(|s| s.parse::<u64>().ok()) {
        *watermark = (*watermark).max(n + 1);
    }
}

fn visit_ids(block: &Block, visit: &mut dyn FnMut(&str)) {
    visit(&block.id);
    match &block.kind {
        BlockKind::Details { body, .. } => {
            for child in body {
                visit_ids(child, visit);
            }
        }
        BlockKind::Table { rows } => {
            for row in rows {
                visit(&row.id);
                for cell in &row.cells {
                    visit(&cell.id);
                    for child in &cell.content {
                        visit_ids(child, visit);
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richdoc_schema::DetailsAttrs;

    fn sample_doc() -> Document {
        let mut ids = IdGenerator::new();
        let p1 = Block::paragraph(ids.new_id(), "first");
        let details = Block::details(
            ids.new_id(),
            DetailsAttrs::default(),
            "Summary",
            vec![Block::paragraph(ids.new_id(), "inside")],
        );
        let p2 = Block::paragraph(ids.new_id(), "last");
        Document::new(vec![p1, details, p2], ids.counter())
    }

    #[test]
    fn test_find_nested_block() {
        let doc = sample_doc();
        let inner = doc.find("node-2").unwrap();
        assert!(matches!(&inner.kind, BlockKind::Paragraph { text, .. } if text == "inside"));
    }

    #[test]
    fn test_preorder_positions() {
        let doc = sample_doc();
        assert_eq!(doc.position_of("node-0"), Some(0));
        assert_eq!(doc.position_of("node-1"), Some(1));
        assert_eq!(doc.position_of("node-2"), Some(2));
        assert_eq!(doc.position_of("node-3"), Some(3));
        assert_eq!(doc.position_of("missing"), None);
    }

    #[test]
    fn test_indentable_in_range_skips_non_blocks() {
        let doc = sample_doc();
        let ids = doc.indentable_in_range(0, 3);
        // Details itself is not indentable; its body paragraph is
        assert_eq!(ids, vec!["node-0", "node-2", "node-3"]);
    }

    #[test]
    fn test_remove_nested() {
        let mut doc = sample_doc();
        let removed = doc.remove("node-2").unwrap();
        assert_eq!(removed.id, "node-2");
        assert!(doc.find("node-2").is_none());
    }

    #[test]
    fn test_peek_id_is_stable() {
        let doc = sample_doc();
        assert_eq!(doc.peek_id(0), "node-4");
        assert_eq!(doc.peek_id(2), "node-6");
        // Peeking does not mint
        assert_eq!(doc.peek_id(0), "node-4");
    }
}
