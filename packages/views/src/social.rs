//! Social post embed view. Renders the raw blockquote form; the host
//! hydrates it into the provider's widget once the widget script is
//! ready (see [`crate::script`]).

use crate::controller::{InteractionState, PointerEvent, ViewPhase};
use richdoc_editor::commands::{delete_node, update_social_attrs, EmbedPatch};
use richdoc_editor::{BlockKind, EditorState, NodeRef, Selection, Transaction};
use richdoc_markup::{MarkupElement, MarkupNode};
use richdoc_schema::{Align, SocialEmbedAttrs};

pub struct SocialView {
    node_ref: NodeRef,
    interaction: InteractionState,
}

impl SocialView {
    pub fn new(node_ref: NodeRef) -> Self {
        Self {
            node_ref,
            interaction: InteractionState::default(),
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.interaction.phase()
    }

    pub fn is_selected(&self, state: &EditorState) -> bool {
        matches!(&state.selection, Selection::Node { id } if *id == self.node_ref.id)
    }

    pub fn set_align(&self, state: &EditorState, align: Align) -> Option<Transaction> {
        update_social_attrs(state, &self.node_ref, &EmbedPatch::align(align)).into_transaction()
    }

    pub fn delete(&self, state: &EditorState) -> Option<Transaction> {
        delete_node(state, &self.node_ref).into_transaction()
    }

    fn attrs<'doc>(&self, state: &'doc EditorState) -> Option<&'doc SocialEmbedAttrs> {
        match &self.node_ref.resolve(&state.doc)?.kind {
            BlockKind::SocialEmbed(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn handle_pointer(
        &mut self,
        state: &EditorState,
        event: PointerEvent,
    ) -> Option<Transaction> {
        let Some(attrs) = self.attrs(state) else {
            tracing::debug!(id = %self.node_ref.id, "social view lost its node");
            self.interaction.detach();
            return None;
        };
        let current_width = attrs.width;

        let drag = self.interaction.on_pointer(event, current_width)?;
        let PointerEvent::Move { x } = event else {
            return None;
        };

        let width = drag.width_at(x, SocialEmbedAttrs::clamp_width);
        if width == current_width {
            return None;
        }
        update_social_attrs(state, &self.node_ref, &EmbedPatch::width(width as i64))
            .into_transaction()
    }

    pub fn render(&self, state: &EditorState) -> Option<MarkupElement> {
        let attrs = self.attrs(state)?;

        let quote = MarkupElement::new("blockquote")
            .with_attr("class", "social-post")
            .with_attr("data-post-id", &attrs.post_id)
            .with_child(MarkupNode::Element(
                MarkupElement::new("a")
                    .with_attr("href", &attrs.post_url)
                    .with_text(attrs.post_url.clone()),
            ));

        Some(
            MarkupElement::new("div")
                .with_attr("class", "social-view")
                .with_style("text-align", attrs.align.as_str())
                .with_style("max-width", format!("{}px", attrs.width))
                .with_child(MarkupNode::Element(quote)),
        )
    }
}
