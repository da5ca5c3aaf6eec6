//! Interactive image view: hover chrome, drag-to-resize, caption.

use crate::controller::{InteractionState, PointerEvent, ViewPhase};
use richdoc_editor::commands::{delete_node, update_image_attrs, ImagePatch};
use richdoc_editor::{BlockKind, EditorState, NodeRef, Selection, Transaction};
use richdoc_markup::{MarkupElement, MarkupNode};
use richdoc_schema::{Align, ImageAttrs};

pub struct ImageView {
    node_ref: NodeRef,
    interaction: InteractionState,
}

impl ImageView {
    pub fn new(node_ref: NodeRef) -> Self {
        Self {
            node_ref,
            interaction: InteractionState::default(),
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.interaction.phase()
    }

    /// Selection is host-driven; the alignment buttons and delete
    /// affordance only show on the selected node
    pub fn is_selected(&self, state: &EditorState) -> bool {
        matches!(&state.selection, Selection::Node { id } if *id == self.node_ref.id)
    }

    pub fn set_align(&self, state: &EditorState, align: Align) -> Option<Transaction> {
        update_image_attrs(state, &self.node_ref, &ImagePatch::align(align)).into_transaction()
    }

    pub fn delete(&self, state: &EditorState) -> Option<Transaction> {
        delete_node(state, &self.node_ref).into_transaction()
    }

    fn attrs<'doc>(&self, state: &'doc EditorState) -> Option<&'doc ImageAttrs> {
        match &self.node_ref.resolve(&state.doc)?.kind {
            BlockKind::Image(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Feed a pointer event through the interaction machine. Only a
    /// move during an active drag produces a transaction; every move
    /// dispatches so the width tracks the pointer live.
    pub fn handle_pointer(
        &mut self,
        state: &EditorState,
        event: PointerEvent,
    ) -> Option<Transaction> {
        let Some(attrs) = self.attrs(state) else {
            // Node deleted out from under the view
            tracing::debug!(id = %self.node_ref.id, "image view lost its node");
            self.interaction.detach();
            return None;
        };
        let current_width = attrs.width;

        let drag = self.interaction.on_pointer(event, current_width)?;
        let PointerEvent::Move { x } = event else {
            return None;
        };

        let width = drag.width_at(x, ImageAttrs::clamp_width);
        if width == current_width {
            return None;
        }
        update_image_attrs(state, &self.node_ref, &ImagePatch::width(width as i64))
            .into_transaction()
    }

    /// Render the node into markup for the host to mount
    pub fn render(&self, state: &EditorState) -> Option<MarkupElement> {
        let attrs = self.attrs(state)?;

        let img = MarkupElement::new("img")
            .with_attr("src", &attrs.src)
            .with_attr("alt", &attrs.alt)
            .with_style("width", format!("{}px", attrs.width));

        let mut wrapper = MarkupElement::new("div")
            .with_attr("class", wrapper_class(self.interaction.phase()))
            .with_style("text-align", attrs.align.as_str())
            .with_child(MarkupNode::Element(img));

        if matches!(self.interaction.phase(), ViewPhase::Hovered | ViewPhase::Resizing) {
            wrapper = wrapper.with_child(MarkupNode::Element(
                MarkupElement::new("span").with_attr("class", "resize-handle"),
            ));
        }
        if !attrs.caption.is_empty() {
            wrapper = wrapper.with_child(MarkupNode::Element(
                MarkupElement::new("figcaption").with_text(attrs.caption.clone()),
            ));
        }
        Some(wrapper)
    }
}

fn wrapper_class(phase: ViewPhase) -> &'static str {
    match phase {
        ViewPhase::Idle | ViewPhase::Detached => "image-view",
        ViewPhase::Hovered => "image-view hovered",
        ViewPhase::Resizing => "image-view resizing",
    }
}
