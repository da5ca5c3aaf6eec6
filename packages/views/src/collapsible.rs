//! Collapsible (details) view: renders the native disclosure element
//! and echoes the browser's toggle back into the document so the open
//! flag survives serialization.

use richdoc_editor::commands::set_collapsible_open;
use richdoc_editor::{BlockKind, EditorState, NodeRef, Transaction};
use richdoc_markup::{MarkupElement, MarkupNode};

pub struct CollapsibleView {
    node_ref: NodeRef,
}

impl CollapsibleView {
    pub fn new(node_ref: NodeRef) -> Self {
        Self { node_ref }
    }

    /// The browser already flipped the element; persist the new state.
    /// A vanished node is a silent no-op.
    pub fn native_toggle(&self, state: &EditorState, now_open: bool) -> Option<Transaction> {
        let result = set_collapsible_open(state, &self.node_ref, now_open);
        if result.is_rejected() {
            tracing::debug!(id = %self.node_ref.id, "toggle on a vanished collapsible");
        }
        result.into_transaction()
    }

    pub fn render(&self, state: &EditorState) -> Option<MarkupElement> {
        let BlockKind::Details { attrs, summary, .. } = &self.node_ref.resolve(&state.doc)?.kind
        else {
            return None;
        };

        let mut element = MarkupElement::new("details")
            .with_attr("class", "collapsible-view")
            .with_child(MarkupNode::Element(
                MarkupElement::new("summary").with_text(summary.clone()),
            ));
        if attrs.open {
            element = element.with_flag("open");
        }
        // Body blocks are mounted by the host inside this slot
        element = element.with_child(MarkupNode::Element(
            MarkupElement::new("div").with_flag("data-details-content"),
        ));
        Some(element)
    }
}
