#![forbid(unsafe_code)]

//! End-to-end undo/redo sessions against a full editor.
//!
//! Each manipulation is checked the same way:
//! 1. start markup, optional selection, history reset
//! 2. run the manipulation and compare with the expected markup
//! 3. undo and compare with the start markup
//! 4. redo and compare with the expected markup again
//!
//! Run:
//!   cargo test -p folio --test e2e_undo_redo

use folio::{
    ActionOutcome, ChangeOutcome, DialogKind, DialogPayload, Editor, ExecCommand, ImageAttrs,
    KeyCode, KeyEvent, LinkAttrs, Modifiers, NodePath, Point, TableSpec,
};

// ============================================================================
// Harness
// ============================================================================

struct Manipulation {
    name: &'static str,
    start: &'static str,
    prepare: fn(&mut Editor),
    manipulate: fn(&mut Editor),
    expected: &'static str,
}

fn no_prepare(_: &mut Editor) {}

fn select_text(editor: &mut Editor, path: &[usize], from: usize, to: usize) {
    editor.document_mut().select(
        Point::new(path.to_vec(), from),
        Point::new(path.to_vec(), to),
    );
}

fn run(m: &Manipulation) -> Editor {
    let mut editor = Editor::new(m.start).unwrap();
    (m.prepare)(&mut editor);
    editor.reset_history();

    (m.manipulate)(&mut editor);
    assert_eq!(editor.markup(), m.expected, "{}: manipulation", m.name);

    editor.undo().unwrap();
    assert_eq!(editor.markup(), m.start, "{}: undo", m.name);

    editor.redo().unwrap();
    assert_eq!(editor.markup(), m.expected, "{}: redo", m.name);
    editor
}

fn select_foo(editor: &mut Editor) {
    select_text(editor, &[0, 0], 0, 3);
}

fn caret_in_paragraph(editor: &mut Editor) {
    editor.document_mut().set_caret_in([0]);
}

fn caret_in_root(editor: &mut Editor) {
    editor.document_mut().set_caret_in(NodePath::root());
}

// ============================================================================
// Formatting and insertion commands
// ============================================================================

#[test]
fn bold() {
    run(&Manipulation {
        name: "Bold",
        start: "<p>Foo</p>",
        prepare: select_foo,
        manipulate: |ed| {
            ed.exec(ExecCommand::Bold).unwrap();
        },
        expected: "<p><strong>Foo</strong></p>",
    });
}

#[test]
fn bold_by_key_combo() {
    run(&Manipulation {
        name: "Bold (ctrl+b)",
        start: "<p>Foo</p>",
        prepare: select_foo,
        manipulate: |ed| {
            ed.handle_key(&KeyEvent::ctrl_char('b')).unwrap();
        },
        expected: "<p><strong>Foo</strong></p>",
    });
}

#[test]
fn italic() {
    run(&Manipulation {
        name: "Italic",
        start: "<p>Foo</p>",
        prepare: select_foo,
        manipulate: |ed| {
            ed.exec(ExecCommand::Italic).unwrap();
        },
        expected: "<p><em>Foo</em></p>",
    });
}

#[test]
fn superscript() {
    run(&Manipulation {
        name: "Superscript",
        start: "<p>Foo</p>",
        prepare: select_foo,
        manipulate: |ed| {
            ed.exec(ExecCommand::Superscript).unwrap();
        },
        expected: "<p><sup>Foo</sup></p>",
    });
}

#[test]
fn subscript() {
    run(&Manipulation {
        name: "Subscript",
        start: "<p>Foo</p>",
        prepare: select_foo,
        manipulate: |ed| {
            ed.exec(ExecCommand::Subscript).unwrap();
        },
        expected: "<p><sub>Foo</sub></p>",
    });
}

#[test]
fn link() {
    run(&Manipulation {
        name: "Link",
        start: "<p>Foobar</p>",
        prepare: |ed| select_text(ed, &[0, 0], 3, 6),
        manipulate: |ed| {
            ed.link(&LinkAttrs::new("http://example.com/")).unwrap();
        },
        expected: "<p>Foo<a href=\"http://example.com/\">bar</a></p>",
    });
}

#[test]
fn image() {
    run(&Manipulation {
        name: "Image",
        start: "<p>Foo</p>",
        prepare: caret_in_paragraph,
        manipulate: |ed| {
            ed.insert_image(&ImageAttrs::new("http://example.com/example.jpg"))
                .unwrap();
        },
        expected: "<p><img src=\"http://example.com/example.jpg\" />Foo</p>",
    });
}

#[test]
fn insert_table() {
    run(&Manipulation {
        name: "Insert table",
        start: "<br />",
        prepare: caret_in_root,
        manipulate: |ed| {
            ed.insert_table(&TableSpec::new(1, 1, "foo", "bar")).unwrap();
        },
        expected: "<br /><table summary=\"bar\"><caption>foo</caption>\
                   <tbody><tr><td></td></tr></tbody></table>",
    });
}

#[test]
fn paste() {
    run(&Manipulation {
        name: "Paste",
        start: "<br />",
        prepare: caret_in_root,
        manipulate: |ed| {
            ed.paste("Foo").unwrap();
        },
        expected: "<br /><p>Foo</p>",
    });
}

// ============================================================================
// List and link structure commands
// ============================================================================

const NESTED_FOO: &str = "<ol><li class=\"spacer_li\"><ol><li>Foo</li></ol></li></ol>";

#[test]
fn insert_ordered_list() {
    run(&Manipulation {
        name: "Insert ordered list",
        start: "<p>Foo</p>",
        prepare: caret_in_paragraph,
        manipulate: |ed| {
            ed.exec(ExecCommand::InsertOrderedList).unwrap();
        },
        expected: "<ol><li>Foo</li></ol>",
    });
}

#[test]
fn insert_unordered_list() {
    run(&Manipulation {
        name: "Insert unordered list",
        start: "<p>Foo</p>",
        prepare: caret_in_paragraph,
        manipulate: |ed| {
            ed.exec(ExecCommand::InsertUnorderedList).unwrap();
        },
        expected: "<ul><li>Foo</li></ul>",
    });
}

#[test]
fn list_indent() {
    run(&Manipulation {
        name: "List indent",
        start: "<ol><li>Foo</li></ol>",
        prepare: |ed| {
            ed.document_mut().set_caret_in([0, 0]);
        },
        manipulate: |ed| {
            ed.exec(ExecCommand::Indent).unwrap();
        },
        expected: NESTED_FOO,
    });
}

#[test]
fn list_outdent() {
    run(&Manipulation {
        name: "List outdent",
        start: NESTED_FOO,
        prepare: |ed| {
            ed.document_mut().set_caret_in([0, 0, 0, 0]);
        },
        manipulate: |ed| {
            ed.exec(ExecCommand::Outdent).unwrap();
        },
        expected: "<ol><li>Foo</li></ol>",
    });
}

#[test]
fn unlink() {
    run(&Manipulation {
        name: "Unlink",
        start: "<p><a href=\"http://example.com/\">Foo</a></p>",
        prepare: |ed| select_text(ed, &[0, 0, 0], 0, 3),
        manipulate: |ed| {
            ed.exec(ExecCommand::Unlink).unwrap();
        },
        expected: "<p>Foo</p>",
    });
}

#[test]
fn same_kind_list_is_unchanged() {
    let mut editor = Editor::new("<ol><li>Foo</li></ol>").unwrap();
    editor.document_mut().set_caret_in([0, 0, 0]);
    editor.reset_history();
    assert_eq!(
        editor.exec(ExecCommand::InsertOrderedList).unwrap(),
        ChangeOutcome::Unchanged
    );
    assert_eq!(
        editor.exec(ExecCommand::InsertUnorderedList).unwrap(),
        ChangeOutcome::Recorded
    );
    assert_eq!(editor.markup(), "<ul><li>Foo</li></ul>");
}

// ============================================================================
// History edge cases
// ============================================================================

const DAWN_OF_HISTORY: &str = "<h1>Dawn of History</h1>";

#[test]
fn no_going_back_before_dawn_of_history() {
    let mut editor = Editor::new(DAWN_OF_HISTORY).unwrap();
    editor.register_change();
    assert!(!editor.undo().unwrap());
    assert_eq!(editor.markup(), DAWN_OF_HISTORY);
    assert_eq!(editor.history_status().position, 0);
    assert!(!editor.undo().unwrap());
    assert_eq!(editor.markup(), DAWN_OF_HISTORY);
    assert_eq!(editor.history_status().position, 0);
}

#[test]
fn restores_selection_across_unchanged_round_trip() {
    let mut editor = Editor::new("<p>Foo</p><p>Bar</p>").unwrap();
    editor
        .document_mut()
        .select(Point::new([0, 0], 0), Point::new([1, 0], 3));
    editor.reset_history();

    editor.register_change();
    editor.undo().unwrap();
    editor.redo().unwrap();

    assert_eq!(editor.markup(), "<p>Foo</p><p>Bar</p>");
    assert_eq!(editor.selection_text(), "FooBar");
}

#[test]
fn undo_restores_recorded_selection() {
    let mut editor = Editor::new("<p>Foo</p><p>Bar</p>").unwrap();
    editor
        .document_mut()
        .select(Point::new([0, 0], 0), Point::new([1, 0], 3));
    editor.reset_history();

    editor.document_mut().append_markup("<p>Zad</p>").unwrap();
    editor.document_mut().set_caret_in([2, 0]);
    editor.register_change();
    assert_eq!(editor.selection_text(), "");

    editor.undo().unwrap();
    assert_eq!(editor.markup(), "<p>Foo</p><p>Bar</p>");
    assert_eq!(editor.selection_text(), "FooBar");
}

#[test]
fn redo_when_everything_has_been_redone() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    editor.reset_history();

    editor.document_mut().append_markup("<p>Bar</p>").unwrap();
    editor.register_change();
    assert_eq!(editor.markup(), "<p>Foo</p><p>Bar</p>", "performed and registered");

    editor.undo().unwrap();
    assert_eq!(editor.markup(), "<p>Foo</p>", "undid change");

    editor.redo().unwrap();
    assert_eq!(editor.markup(), "<p>Foo</p><p>Bar</p>", "redid change");

    assert!(!editor.redo().unwrap());
    assert_eq!(editor.markup(), "<p>Foo</p><p>Bar</p>", "nothing more to redo");
}

#[test]
fn nothing_to_redo_after_change() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    editor.reset_history();

    editor.document_mut().append_markup("<p>Bar</p>").unwrap();
    editor.register_change();
    assert_eq!(editor.markup(), "<p>Foo</p><p>Bar</p>");

    editor.undo().unwrap();
    assert_eq!(editor.markup(), "<p>Foo</p>");

    editor.document_mut().append_markup("<p>Zad</p>").unwrap();
    editor.register_change();
    assert!(!editor.redo().unwrap());
    assert_eq!(editor.markup(), "<p>Foo</p><p>Zad</p>");
}

#[test]
fn unwinds_every_registered_change() {
    let mut editor = Editor::new("<p>0</p>").unwrap();
    for i in 1..=5 {
        editor.set_content(&format!("<p>{i}</p>")).unwrap();
    }
    let mut undone = 0;
    while editor.undo().unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 5);
    assert_eq!(editor.markup(), "<p>0</p>");
    assert!(!editor.can_undo());
    assert!(editor.can_redo());
}

// ============================================================================
// Bindings
// ============================================================================

#[test]
fn toolbar_buttons() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    editor.reset_history();

    editor.document_mut().append_markup("<p>Bar</p>").unwrap();
    editor.register_change();
    assert_eq!(editor.markup(), "<p>Foo</p><p>Bar</p>", "made change and registered it");

    assert_eq!(
        editor.click_button("Undo").unwrap(),
        Some(ActionOutcome::History(true))
    );
    assert_eq!(editor.markup(), "<p>Foo</p>", "undo by button click");

    assert_eq!(
        editor.click_button("Redo").unwrap(),
        Some(ActionOutcome::History(true))
    );
    assert_eq!(editor.markup(), "<p>Foo</p><p>Bar</p>", "redo by button click");

    // At the top: Redo is disabled and its click does nothing.
    assert_eq!(editor.click_button("Redo").unwrap(), None);
}

#[test]
fn undo_keyboard_shortcut() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    select_foo(&mut editor);
    editor.reset_history();
    editor.exec(ExecCommand::Bold).unwrap();
    assert_eq!(editor.markup(), "<p><strong>Foo</strong></p>");

    let outcome = editor.handle_key(&KeyEvent::ctrl_char('z')).unwrap();
    assert_eq!(outcome, Some(ActionOutcome::History(true)));
    assert_eq!(editor.markup(), "<p>Foo</p>");
}

#[test]
fn redo_keyboard_shortcuts() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    select_foo(&mut editor);
    editor.reset_history();
    editor.exec(ExecCommand::Bold).unwrap();
    editor.undo().unwrap();
    assert_eq!(editor.markup(), "<p>Foo</p>");

    editor.handle_key(&KeyEvent::ctrl_char('y')).unwrap();
    assert_eq!(editor.markup(), "<p><strong>Foo</strong></p>");

    editor.undo().unwrap();
    let shift_z = KeyEvent::new(KeyCode::Char('Z')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
    editor.handle_key(&shift_z).unwrap();
    assert_eq!(editor.markup(), "<p><strong>Foo</strong></p>");
}

#[test]
fn undo_list_by_keyboard_shortcut() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    caret_in_paragraph(&mut editor);
    editor.reset_history();
    editor.exec(ExecCommand::InsertOrderedList).unwrap();
    assert_eq!(editor.markup(), "<ol><li>Foo</li></ol>");

    let outcome = editor.handle_key(&KeyEvent::ctrl_char('z')).unwrap();
    assert_eq!(outcome, Some(ActionOutcome::History(true)));
    assert_eq!(editor.markup(), "<p>Foo</p>");

    // Nothing older than the reset.
    let outcome = editor.handle_key(&KeyEvent::ctrl_char('z')).unwrap();
    assert_eq!(outcome, Some(ActionOutcome::History(false)));
    assert_eq!(editor.markup(), "<p>Foo</p>");
}

#[test]
fn redo_list_by_keyboard_shortcut() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    caret_in_paragraph(&mut editor);
    editor.reset_history();
    editor.exec(ExecCommand::InsertOrderedList).unwrap();
    editor.handle_key(&KeyEvent::ctrl_char('z')).unwrap();
    assert_eq!(editor.markup(), "<p>Foo</p>");

    let outcome = editor.handle_key(&KeyEvent::ctrl_char('y')).unwrap();
    assert_eq!(outcome, Some(ActionOutcome::History(true)));
    assert_eq!(editor.markup(), "<ol><li>Foo</li></ol>");
}

#[test]
fn unbound_keys_pass_through() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    assert_eq!(editor.handle_key(&KeyEvent::new(KeyCode::Char('z'))).unwrap(), None);
    assert_eq!(editor.handle_key(&KeyEvent::ctrl_char('q')).unwrap(), None);
}

// ============================================================================
// Dialogs
// ============================================================================

#[test]
fn link_dialog_session() {
    let mut editor = Editor::new("<p>Foobar</p>").unwrap();
    assert_eq!(editor.open_dialog(DialogKind::CreateLink), None);

    select_text(&mut editor, &[0, 0], 3, 6);
    editor.reset_history();
    let opened = editor.open_dialog(DialogKind::CreateLink).unwrap();
    assert_eq!(opened.spec.title, "Link");
    assert_eq!(opened.payload, DialogPayload::Link(LinkAttrs::default()));

    let outcome = editor
        .submit_dialog(
            DialogKind::CreateLink,
            DialogPayload::Link(LinkAttrs {
                href: "http://example.com/".into(),
                title: "Example".into(),
                rel: String::new(),
            }),
        )
        .unwrap();
    assert_eq!(outcome, ChangeOutcome::Recorded);
    assert_eq!(
        editor.markup(),
        "<p>Foo<a href=\"http://example.com/\" title=\"Example\">bar</a></p>"
    );

    // Reopening with the caret inside the link prefills its attributes.
    editor.document_mut().set_caret_in([0, 1, 0]);
    let reopened = editor.open_dialog(DialogKind::CreateLink).unwrap();
    assert_eq!(
        reopened.payload,
        DialogPayload::Link(LinkAttrs {
            href: "http://example.com/".into(),
            title: "Example".into(),
            rel: String::new(),
        })
    );

    editor.undo().unwrap();
    assert_eq!(editor.markup(), "<p>Foobar</p>");
}

#[test]
fn table_dialog_session() {
    let mut editor = Editor::new("<p>Foo</p>").unwrap();
    editor.document_mut().set_caret_in([0, 0]);
    let Some(ActionOutcome::Dialog(Some(opened))) = editor.click_button("InsertTable").unwrap()
    else {
        panic!("table dialog should open with a caret");
    };
    let DialogPayload::Table(mut spec) = opened.payload else {
        panic!("table dialog carries a table payload");
    };
    assert_eq!((spec.rows, spec.cols), (3, 2));

    spec.rows = 1;
    editor
        .submit_dialog(DialogKind::InsertTable, DialogPayload::Table(spec))
        .unwrap();
    assert_eq!(
        editor.markup(),
        "<p>Foo</p><table><tbody><tr><td></td><td></td></tr></tbody></table>"
    );
    assert_eq!(editor.history_status().len, 2);
}
