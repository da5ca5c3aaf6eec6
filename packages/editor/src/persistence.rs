//! Persistence: document ⇄ markup conversion and the storage layer.
//!
//! Node ids are runtime-only. Serialization writes pure markup;
//! loading reconstructs the tree through the schema registry and mints
//! fresh ids. Everything needed to restore render state (widths,
//! alignment, captions, spans, open flags, indents) rides in the markup
//! itself.

use crate::error::EditorError;
use crate::node::{Block, BlockKind, Document, IdGenerator, TableCell, TableRow};
use richdoc_markup::{parse_fragment, serialize_fragment, MarkupElement, MarkupNode};
use richdoc_schema::{
    parse_indent, serialize_indent, CellSchema, DetailsSchema, ImageSchema, NodeKind, NodeSchema,
    SchemaRegistry, SocialEmbedSchema, VideoEmbedSchema,
};
use std::collections::BTreeMap;

/// Key the persisted document lives under
pub const STORAGE_KEY: &str = "richdoc-content";

pub fn serialize_document(doc: &Document) -> String {
    let nodes: Vec<MarkupNode> = doc.blocks.iter().map(serialize_block).collect();
    serialize_fragment(&nodes)
}

pub fn parse_document(source: &str) -> Result<Document, EditorError> {
    let registry = SchemaRegistry::default();
    let mut ids = IdGenerator::new();
    let nodes = parse_fragment(source)?;

    let blocks = nodes
        .iter()
        .filter_map(MarkupNode::as_element)
        .filter_map(|element| parse_block(&registry, element, &mut ids))
        .collect();
    Ok(Document::new(blocks, ids.counter()))
}

/// The document a fresh session starts from, also used when the stored
/// payload is missing or unreadable
pub fn default_document() -> Document {
    let mut ids = IdGenerator::new();
    let blocks = vec![
        Block::heading(ids.new_id(), 1, "Welcome"),
        Block::paragraph(ids.new_id(), "Start writing, or insert an image, video or table."),
    ];
    Document::new(blocks, ids.counter())
}

fn serialize_block(block: &Block) -> MarkupNode {
    let element = match &block.kind {
        BlockKind::Paragraph { text, indent } => {
            serialize_indent(MarkupElement::new("p").with_text(text.clone()), *indent)
        }
        BlockKind::Heading { level, text, indent } => serialize_indent(
            MarkupElement::new(format!("h{level}")).with_text(text.clone()),
            *indent,
        ),
        BlockKind::Image(attrs) => ImageSchema::serialize(attrs),
        BlockKind::VideoEmbed(attrs) => VideoEmbedSchema::serialize(attrs),
        BlockKind::SocialEmbed(attrs) => SocialEmbedSchema::serialize(attrs),
        BlockKind::Details { attrs, summary, body } => {
            let content = MarkupElement::new("div")
                .with_flag("data-details-content")
                .with_children(body.iter().map(serialize_block).collect());
            DetailsSchema::serialize(attrs)
                .with_child(MarkupNode::Element(
                    MarkupElement::new("summary").with_text(summary.clone()),
                ))
                .with_child(MarkupNode::Element(content))
        }
        BlockKind::Table { rows } => MarkupElement::new("table")
            .with_children(rows.iter().map(serialize_row).collect()),
    };
    MarkupNode::Element(element)
}

fn serialize_row(row: &TableRow) -> MarkupNode {
    MarkupNode::Element(
        MarkupElement::new("tr").with_children(row.cells.iter().map(serialize_cell).collect()),
    )
}

fn serialize_cell(cell: &TableCell) -> MarkupNode {
    MarkupNode::Element(
        CellSchema::serialize(&cell.attrs)
            .with_children(cell.content.iter().map(serialize_block).collect()),
    )
}

fn parse_block(
    registry: &SchemaRegistry,
    element: &MarkupElement,
    ids: &mut IdGenerator,
) -> Option<Block> {
    match registry.classify(element) {
        Some(NodeKind::Image) => Some(Block::image(ids.new_id(), ImageSchema::parse(element)?)),
        Some(NodeKind::VideoEmbed) => Some(Block::video_embed(
            ids.new_id(),
            VideoEmbedSchema::parse(element)?,
        )),
        Some(NodeKind::SocialEmbed) => match SocialEmbedSchema::parse(element) {
            Some(attrs) => Some(Block::social_embed(ids.new_id(), attrs)),
            None => {
                tracing::warn!(tag = %element.tag, "dropping social embed with no post id");
                None
            }
        },
        Some(NodeKind::Details) => parse_details(registry, element, ids),
        Some(NodeKind::TableCell) => None, // only valid inside a table
        None => parse_plain(registry, element, ids),
    }
}

fn parse_details(
    registry: &SchemaRegistry,
    element: &MarkupElement,
    ids: &mut IdGenerator,
) -> Option<Block> {
    let attrs = DetailsSchema::parse(element)?;
    let id = ids.new_id();

    let summary = element
        .child_elements()
        .find(|child| child.tag == "summary")
        .map(|child| child.text_content())
        .unwrap_or_default();

    let mut body: Vec<Block> = element
        .child_elements()
        .filter(|child| child.tag != "summary")
        .flat_map(|child| {
            if child.has_attr("data-details-content") {
                child
                    .child_elements()
                    .filter_map(|inner| parse_block(registry, inner, ids))
                    .collect::<Vec<_>>()
            } else {
                parse_block(registry, child, ids).into_iter().collect()
            }
        })
        .collect();

    // Body must never be empty
    if body.is_empty() {
        body.push(Block::paragraph(ids.new_id(), ""));
    }

    Some(Block::details(id, attrs, summary, body))
}

fn parse_plain(
    registry: &SchemaRegistry,
    element: &MarkupElement,
    ids: &mut IdGenerator,
) -> Option<Block> {
    match element.tag.as_str() {
        "p" => Some(Block {
            id: ids.new_id(),
            kind: BlockKind::Paragraph {
                text: element.text_content(),
                indent: parse_indent(element),
            },
        }),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = element.tag[1..].parse::<u8>().ok()?;
            Some(Block {
                id: ids.new_id(),
                kind: BlockKind::Heading {
                    level,
                    text: element.text_content(),
                    indent: parse_indent(element),
                },
            })
        }
        "table" => parse_table(registry, element, ids),
        _ => {
            tracing::debug!(tag = %element.tag, "skipping unrecognized element");
            None
        }
    }
}

fn parse_table(
    registry: &SchemaRegistry,
    element: &MarkupElement,
    ids: &mut IdGenerator,
) -> Option<Block> {
    let id = ids.new_id();
    let rows: Vec<TableRow> = element
        .child_elements()
        .filter(|child| child.tag == "tr")
        .map(|row| TableRow {
            id: ids.new_id(),
            cells: row
                .child_elements()
                .filter_map(|cell| parse_cell(registry, cell, ids))
                .collect(),
        })
        .filter(|row| !row.cells.is_empty())
        .collect();

    if rows.is_empty() {
        return None;
    }
    Some(Block::table(id, rows))
}

fn parse_cell(
    registry: &SchemaRegistry,
    element: &MarkupElement,
    ids: &mut IdGenerator,
) -> Option<TableCell> {
    let attrs = CellSchema::parse(element)?;
    let id = ids.new_id();
    let mut content: Vec<Block> = element
        .child_elements()
        .filter_map(|child| parse_block(registry, child, ids))
        .collect();
    if content.is_empty() {
        content.push(Block::paragraph(ids.new_id(), ""));
    }
    Some(TableCell { id, attrs, content })
}

/// Minimal persistence backend; the demo host provides localStorage,
/// tests use the in-memory one
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), EditorError>;
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), EditorError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Saves and restores the document under [`STORAGE_KEY`]
pub struct DocumentStore<S> {
    store: S,
}

impl<S: KeyValueStore> DocumentStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, doc: &Document) -> Result<(), EditorError> {
        self.store.set(STORAGE_KEY, &serialize_document(doc))
    }

    /// Load the stored document; a missing or unreadable payload falls
    /// back to the default document instead of failing the session
    pub fn load(&self) -> Document {
        match self.store.get(STORAGE_KEY) {
            Some(markup) => match parse_document(&markup) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(error = %err, "stored document unreadable, using default");
                    default_document()
                }
            },
            None => default_document(),
        }
    }

    pub fn clear(&mut self) {
        self.store.remove(STORAGE_KEY);
    }
}
