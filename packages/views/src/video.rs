//! Video embed view: iframe player with a fallback placeholder for
//! URLs no video id can be extracted from.

use crate::controller::{InteractionState, PointerEvent, ViewPhase};
use richdoc_editor::commands::{delete_node, update_video_attrs, EmbedPatch};
use richdoc_editor::{BlockKind, EditorState, NodeRef, Selection, Transaction};
use richdoc_schema::Align;
use richdoc_markup::{MarkupElement, MarkupNode};
use richdoc_schema::{extract_video_id, video_embed_url, video_height, VideoEmbedAttrs, VideoEmbedOptions};

pub struct VideoView {
    node_ref: NodeRef,
    interaction: InteractionState,
    options: VideoEmbedOptions,
}

impl VideoView {
    pub fn new(node_ref: NodeRef) -> Self {
        Self {
            node_ref,
            interaction: InteractionState::default(),
            options: VideoEmbedOptions::default(),
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.interaction.phase()
    }

    pub fn is_selected(&self, state: &EditorState) -> bool {
        matches!(&state.selection, Selection::Node { id } if *id == self.node_ref.id)
    }

    pub fn set_align(&self, state: &EditorState, align: Align) -> Option<Transaction> {
        update_video_attrs(state, &self.node_ref, &EmbedPatch::align(align)).into_transaction()
    }

    pub fn delete(&self, state: &EditorState) -> Option<Transaction> {
        delete_node(state, &self.node_ref).into_transaction()
    }

    fn attrs<'doc>(&self, state: &'doc EditorState) -> Option<&'doc VideoEmbedAttrs> {
        match &self.node_ref.resolve(&state.doc)?.kind {
            BlockKind::VideoEmbed(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn handle_pointer(
        &mut self,
        state: &EditorState,
        event: PointerEvent,
    ) -> Option<Transaction> {
        let Some(attrs) = self.attrs(state) else {
            tracing::debug!(id = %self.node_ref.id, "video view lost its node");
            self.interaction.detach();
            return None;
        };
        let current_width = attrs.width;

        let drag = self.interaction.on_pointer(event, current_width)?;
        let PointerEvent::Move { x } = event else {
            return None;
        };

        let width = drag.width_at(x, VideoEmbedAttrs::clamp_width);
        if width == current_width {
            return None;
        }
        update_video_attrs(state, &self.node_ref, &EmbedPatch::width(width as i64))
            .into_transaction()
    }

    /// Render: the player when the URL yields a video id, otherwise an
    /// inert placeholder (the node stays in the document either way)
    pub fn render(&self, state: &EditorState) -> Option<MarkupElement> {
        let attrs = self.attrs(state)?;

        let content = match extract_video_id(&attrs.src) {
            Some(video_id) => MarkupElement::new("iframe")
                .with_attr("src", video_embed_url(&video_id, &self.options))
                .with_attr("width", attrs.width.to_string())
                .with_attr("height", video_height(attrs.width).to_string())
                .with_attr("frameborder", "0")
                .with_flag("allowfullscreen"),
            None => MarkupElement::new("div")
                .with_attr("class", "video-placeholder")
                .with_text("Invalid video URL"),
        };

        Some(
            MarkupElement::new("div")
                .with_attr("class", "video-view")
                .with_style("text-align", attrs.align.as_str())
                .with_child(MarkupNode::Element(content)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richdoc_editor::commands::{insert_video_embed, CommandResult};
    use richdoc_editor::Document;

    fn state_with_video(url: &str) -> (EditorState, NodeRef) {
        let state = EditorState::new(Document::default());
        let CommandResult::Applied(tx) = insert_video_embed(&state, url, None, None) else {
            panic!("insert applies");
        };
        let doc = tx.apply(&state.doc).unwrap();
        let id = doc.blocks[0].id.clone();
        let state = EditorState::new(doc);
        let node_ref = NodeRef::to_block(&state.doc, &id).unwrap();
        (state, node_ref)
    }

    #[test]
    fn test_renders_player_with_sixteen_nine_height() {
        let (state, node_ref) =
            state_with_video("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        let view = VideoView::new(node_ref);

        let element = view.render(&state).unwrap();
        let iframe = element
            .child_elements()
            .find(|child| child.tag == "iframe")
            .expect("player rendered");
        assert_eq!(iframe.attr("width"), Some("640"));
        assert_eq!(iframe.attr("height"), Some("360"));
        assert!(iframe.attr("src").unwrap().contains("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_invalid_url_renders_placeholder_not_player() {
        let (state, node_ref) = state_with_video("https://example.com/clip");
        let view = VideoView::new(node_ref);

        let element = view.render(&state).unwrap();
        assert!(element.child_elements().all(|child| child.tag != "iframe"));
        assert!(element
            .child_elements()
            .any(|child| child.attr("class") == Some("video-placeholder")));
    }

    #[test]
    fn test_resize_clamps_to_video_domain() {
        let (state, node_ref) =
            state_with_video("https://youtu.be/dQw4w9WgXcQ");
        let mut view = VideoView::new(node_ref);

        view.handle_pointer(&state, PointerEvent::Enter);
        view.handle_pointer(&state, PointerEvent::Down { x: 0 });
        let tx = view
            .handle_pointer(&state, PointerEvent::Move { x: 1000 })
            .expect("width changed");
        let next = tx.apply(&state.doc).unwrap();
        let BlockKind::VideoEmbed(attrs) = &next.blocks[0].kind else {
            panic!("expected video");
        };
        assert_eq!(attrs.width, 900);
    }
}
