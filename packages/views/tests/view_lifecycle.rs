//! Lifecycle tests driving views and the editor dispatch loop together.

use richdoc_editor::commands::{self, CommandResult};
use richdoc_editor::{BlockKind, Document, Editor, NodeRef};
use richdoc_views::{ImageView, PointerEvent, ScriptHost, ScriptLoader, ScriptState, ViewPhase, POLL_INTERVAL_MS};

fn editor_with_image() -> (Editor, NodeRef) {
    let mut editor = Editor::new(Document::default());
    let CommandResult::Applied(tx) =
        commands::insert_image(editor.state(), "https://x/cat.png", "cat", None, None)
    else {
        panic!("insert applies");
    };
    editor.dispatch(tx).unwrap();
    let id = editor.doc().blocks[0].id.clone();
    let node_ref = NodeRef::to_block(editor.doc(), &id).unwrap();
    (editor, node_ref)
}

#[test]
fn drag_session_dispatches_every_move() {
    let (mut editor, node_ref) = editor_with_image();
    let mut view = ImageView::new(node_ref);

    view.handle_pointer(editor.state(), PointerEvent::Enter);
    view.handle_pointer(editor.state(), PointerEvent::Down { x: 0 });

    for x in [10, 25, 50] {
        if let Some(tx) = view.handle_pointer(editor.state(), PointerEvent::Move { x }) {
            editor.dispatch(tx).unwrap();
        }
    }
    view.handle_pointer(editor.state(), PointerEvent::Up);

    let BlockKind::Image(attrs) = &editor.doc().blocks[0].kind else {
        panic!("expected image");
    };
    assert_eq!(attrs.width, 600);
    assert_eq!(editor.version(), 4); // insert + three moves
    assert_eq!(view.phase(), ViewPhase::Hovered);
}

#[test]
fn view_goes_inert_when_node_deleted_mid_hover() {
    let (mut editor, node_ref) = editor_with_image();
    let mut view = ImageView::new(node_ref.clone());

    view.handle_pointer(editor.state(), PointerEvent::Enter);

    let CommandResult::Applied(tx) = commands::delete_node(editor.state(), &node_ref) else {
        panic!("delete applies");
    };
    editor.dispatch(tx).unwrap();

    assert!(view
        .handle_pointer(editor.state(), PointerEvent::Down { x: 0 })
        .is_none());
    assert_eq!(view.phase(), ViewPhase::Detached);
    assert!(view.render(editor.state()).is_none());
}

#[derive(Default)]
struct RecordingHost {
    injected: Vec<String>,
    ready: bool,
}

impl ScriptHost for RecordingHost {
    fn inject(&mut self, url: &str) {
        self.injected.push(url.to_string());
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

#[test]
fn two_social_views_share_one_script_load() {
    let mut host = RecordingHost::default();
    let mut loader = ScriptLoader::new("https://platform.example/widgets.js");

    // Both embeds mount before the script arrives
    loader.request(&mut host, || {});
    loader.request(&mut host, || {});
    assert_eq!(host.injected.len(), 1);
    assert!(matches!(loader.state(), ScriptState::Loading { .. }));

    // Script lands on the third poll
    loader.tick(&host, POLL_INTERVAL_MS);
    loader.tick(&host, POLL_INTERVAL_MS);
    host.ready = true;
    loader.tick(&host, POLL_INTERVAL_MS);

    assert_eq!(loader.state(), ScriptState::Ready);
    assert_eq!(host.injected.len(), 1);
}
