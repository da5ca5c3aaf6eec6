//! End-to-end editing sessions driven through the public API.

use richdoc_editor::commands::{self, CommandResult, ImagePatch, SpanDimension};
use richdoc_editor::indent;
use richdoc_editor::keymap::{handle_key, Key};
use richdoc_editor::persistence::{self, DocumentStore, MemoryStore};
use richdoc_editor::table::{self, Placement};
use richdoc_editor::{BlockKind, Document, Editor, EditorState, NodeRef, Selection};
use richdoc_schema::Align;

fn trace_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn dispatch(editor: &mut Editor, command: impl FnOnce(&EditorState) -> CommandResult) {
    let tx = command(editor.state())
        .into_transaction()
        .expect("command applied");
    editor.dispatch(tx).expect("transaction applies");
}

fn last_block_ref(editor: &Editor) -> NodeRef {
    let id = &editor.doc().blocks.last().expect("non-empty").id;
    NodeRef::to_block(editor.doc(), id).expect("block exists")
}

#[test]
fn image_insert_then_resize_session() {
    trace_init();
    let mut editor = Editor::new(Document::default());

    dispatch(&mut editor, |state| {
        commands::insert_image(state, "https://x/cat.png", "cat", None, None)
    });
    let image_ref = last_block_ref(&editor);

    // Defaults: 500 wide, centered
    let BlockKind::Image(attrs) = &editor.doc().blocks[0].kind else {
        panic!("expected image");
    };
    assert_eq!((attrs.width, attrs.align), (500, Align::Center));

    // A 50px handle drag doubles: 500 + 100
    dispatch(&mut editor, |state| {
        commands::update_image_attrs(state, &image_ref, &ImagePatch::width(600))
    });
    let BlockKind::Image(attrs) = &editor.doc().blocks[0].kind else {
        panic!("expected image");
    };
    assert_eq!(attrs.width, 600);
    assert_eq!(editor.version(), 2);
}

#[test]
fn social_embed_insert_rejects_without_post_id() {
    trace_init();
    let mut editor = Editor::new(Document::default());

    assert!(commands::insert_social_embed(editor.state(), "https://example.com/page").is_rejected());
    assert!(editor.doc().blocks.is_empty());
    assert_eq!(editor.version(), 0);

    dispatch(&mut editor, |state| {
        commands::insert_social_embed(state, "https://twitter.com/user/status/12345")
    });
    let BlockKind::SocialEmbed(attrs) = &editor.doc().blocks[0].kind else {
        panic!("expected social embed");
    };
    assert_eq!(attrs.post_id, "12345");
}

#[test]
fn collapsible_toggle_survives_save_and_load() {
    trace_init();
    let mut editor = Editor::new(Document::default());
    dispatch(&mut editor, commands::insert_collapsible);

    let details_ref = last_block_ref(&editor);
    dispatch(&mut editor, |state| {
        commands::set_collapsible_open(state, &details_ref, false)
    });

    let mut store = DocumentStore::new(MemoryStore::default());
    store.save(editor.doc()).unwrap();
    let loaded = store.load();

    let BlockKind::Details { attrs, summary, .. } = &loaded.blocks[0].kind else {
        panic!("expected details");
    };
    assert!(!attrs.open);
    assert_eq!(summary, "Click to expand");
}

#[test]
fn indent_session_with_keyboard() {
    trace_init();
    let mut editor = Editor::new(persistence::default_document());
    editor.set_selection(Selection::Caret { pos: 1 });

    // Tab twice, Shift+Tab once: paragraph lands on rung 1 (40px)
    for _ in 0..2 {
        let tx = handle_key(editor.state(), Key::Tab).expect("tab claimed");
        editor.dispatch(tx).unwrap();
    }
    let tx = handle_key(editor.state(), Key::ShiftTab).expect("shift-tab claimed");
    editor.dispatch(tx).unwrap();

    assert_eq!(editor.doc().blocks[1].indent().unwrap().px(), 40);

    // Markup carries the indent; a reload keeps it
    let loaded =
        persistence::parse_document(&persistence::serialize_document(editor.doc())).unwrap();
    assert_eq!(loaded.blocks[1].indent().unwrap().px(), 40);
}

#[test]
fn table_session_grow_then_style_cell() {
    trace_init();
    // Build a 1x1 table through the markup layer
    let doc = persistence::parse_document("<table><tr><td><p>seed</p></td></tr></table>").unwrap();
    let mut editor = Editor::new(doc);
    let cell_id = match &editor.doc().blocks[0].kind {
        BlockKind::Table { rows } => rows[0].cells[0].id.clone(),
        _ => panic!("expected table"),
    };

    dispatch(&mut editor, |state| {
        table::add_row(state, &cell_id, Placement::After)
    });
    dispatch(&mut editor, |state| {
        table::add_column(state, &cell_id, Placement::After)
    });

    let BlockKind::Table { rows } = &editor.doc().blocks[0].kind else {
        panic!("expected table");
    };
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.cells.len() == 2));

    editor.set_selection(Selection::Cell { id: cell_id.clone() });
    dispatch(&mut editor, |state| {
        commands::set_cell_background(state, Some("#dbeafe".to_string()))
    });
    dispatch(&mut editor, |state| {
        commands::adjust_cell_span(state, SpanDimension::Col, 1)
    });

    let cell = editor.doc().find_cell(&cell_id).unwrap();
    assert_eq!(cell.attrs.background.as_deref(), Some("#dbeafe"));
    assert_eq!(cell.attrs.colspan, 2);
}

#[test]
fn range_indent_spares_non_indentable_blocks() {
    trace_init();
    let doc = persistence::parse_document(
        "<p>one</p><div data-custom-image data-src=\"https://x/a.png\"></div><p>two</p>",
    )
    .unwrap();
    let mut editor = Editor::new(doc);
    editor.set_selection(Selection::Range { from: 0, to: 2 });

    let result = indent::increase_indent(editor.state());
    let tx = result.transaction().expect("applied").clone();
    // The image in the middle carries no indent; only the paragraphs move
    assert_eq!(tx.steps.len(), 2);
    editor.dispatch(tx).unwrap();

    for block in editor.doc().blocks.iter().filter(|block| block.is_indentable()) {
        assert_eq!(block.indent().unwrap().px(), 40);
    }
}
