#![no_main]

use arbitrary::Arbitrary;
use folio::{Editor, EditorConfig, ExecCommand, HistoryConfig, Point};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Select { path: Vec<u8>, from: u8, to: u8 },
    Caret { path: Vec<u8>, offset: u8 },
    Exec(u8),
    Paste(String),
    Append(String),
    Register,
    Undo,
    Redo,
    BeginBatch,
    EndBatch,
    Reset,
    SetDepth(u8),
}

#[derive(Debug, Arbitrary)]
struct Session {
    max_depth: u8,
    ops: Vec<Op>,
}

fn path(raw: &[u8]) -> Vec<usize> {
    raw.iter().take(6).map(|i| usize::from(i % 8)).collect()
}

fuzz_target!(|session: Session| {
    let config = EditorConfig::default()
        .with_history(HistoryConfig::default().with_max_depth(usize::from(session.max_depth)));
    let Ok(mut editor) = Editor::with_config("<p>Foo</p><p>Bar</p>", config) else {
        return;
    };

    for op in session.ops.iter().take(256) {
        match op {
            Op::Select { path: raw, from, to } => {
                let p = path(raw);
                editor.document_mut().select(
                    Point::new(p.clone(), usize::from(*from)),
                    Point::new(p, usize::from(*to)),
                );
            }
            Op::Caret { path: raw, offset } => {
                let point = Point::new(path(raw), usize::from(*offset));
                editor.document_mut().select(point.clone(), point);
            }
            Op::Exec(i) => {
                let command = ExecCommand::ALL[usize::from(*i) % ExecCommand::ALL.len()];
                let _ = editor.exec(command);
            }
            Op::Paste(text) => {
                let _ = editor.paste(text);
            }
            Op::Append(text) => {
                let _ = editor.document_mut().append_markup(text);
            }
            Op::Register => {
                editor.register_change();
            }
            Op::Undo => {
                editor.undo().expect("stored snapshots always reparse");
            }
            Op::Redo => {
                editor.redo().expect("stored snapshots always reparse");
            }
            Op::BeginBatch => editor.begin_batch(),
            Op::EndBatch => {
                editor.end_batch();
            }
            Op::Reset => editor.reset_history(),
            Op::SetDepth(depth) => {
                editor.set_max_depth(usize::from(*depth));
            }
        }

        let status = editor.history_status();
        assert!(status.len >= 1, "history must never be empty");
        assert!(status.position < status.len, "position out of range");
        assert_eq!(status.can_undo, status.position > 0);
        assert_eq!(status.can_redo, status.position + 1 < status.len);
        assert_eq!(editor.toolbar().is_enabled("Undo"), Some(status.can_undo));
    }
});
