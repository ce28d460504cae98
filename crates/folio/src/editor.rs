#![forbid(unsafe_code)]

//! One editor instance.
//!
//! [`Editor`] owns the live [`Document`] and its [`UndoRedo`] history, and
//! routes key events and toolbar clicks to actions. Every mutating command
//! registers exactly one change; the toolbar's Undo/Redo buttons are kept in
//! step with the history after each operation.
//!
//! # Example
//!
//! ```
//! use folio::{Editor, ExecCommand, KeyEvent, Point};
//!
//! let mut editor = Editor::new("<p>Foo</p>").unwrap();
//! editor
//!     .document_mut()
//!     .select(Point::new([0, 0], 0), Point::new([0, 0], 3));
//! editor.exec(ExecCommand::Bold).unwrap();
//! assert_eq!(editor.markup(), "<p><strong>Foo</strong></p>");
//!
//! editor.handle_key(&KeyEvent::ctrl_char('z')).unwrap();
//! assert_eq!(editor.markup(), "<p>Foo</p>");
//! ```

use folio_bindings::{Action, DialogKind, ExecCommand, KeyEvent, ShortcutMapper, Toolbar};
use folio_doc::{Document, Element, ListKind, Node, edit};
use folio_history::{ChangeOutcome, CoalesceWindow, HistoryStatus, UndoRedo};
use web_time::Instant;

use crate::config::EditorConfig;
use crate::dialog::{
    self, DialogPayload, ImageAttrs, LinkAttrs, OpenedDialog, TableSpec, command_for,
};
use crate::Result;

/// What [`Editor::perform`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Undo or redo ran; `false` when there was nothing to do.
    History(bool),
    /// A formatting command ran.
    Changed(ChangeOutcome),
    /// A dialog was requested; `None` when it may not open right now.
    Dialog(Option<OpenedDialog>),
}

/// A document with history, shortcuts, and toolbar state.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    history: UndoRedo,
    shortcuts: ShortcutMapper,
    toolbar: Toolbar,
    coalesce: CoalesceWindow,
}

impl Editor {
    /// Parse `markup` into a new editor with default configuration.
    pub fn new(markup: &str) -> Result<Self> {
        Self::with_config(markup, EditorConfig::default())
    }

    /// Parse `markup` into a new editor.
    pub fn with_config(markup: &str, config: EditorConfig) -> Result<Self> {
        Ok(Self::from_document(Document::from_markup(markup)?, config))
    }

    /// Wrap an existing document. Its current state seeds the history.
    #[must_use]
    pub fn from_document(document: Document, config: EditorConfig) -> Self {
        let config = config.validated();
        let history = UndoRedo::new(&document, config.history);
        let mut toolbar = Toolbar::standard();
        toolbar.sync(history.status());
        Self {
            document,
            history,
            shortcuts: ShortcutMapper::new(config.shortcuts),
            toolbar,
            coalesce: CoalesceWindow::new(config.history.coalesce_window()),
        }
    }

    // ====================================================================
    // Content
    // ====================================================================

    /// The live document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the live document.
    ///
    /// Direct mutations are not recorded until
    /// [`register_change`](Self::register_change) is called.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Serialized content.
    #[must_use]
    pub fn markup(&self) -> String {
        self.document.to_markup()
    }

    /// Text under the selection.
    #[must_use]
    pub fn selection_text(&self) -> String {
        self.document.selection_text()
    }

    /// Replace the content and register the change.
    pub fn set_content(&mut self, markup: &str) -> Result<ChangeOutcome> {
        self.document.set_markup(markup)?;
        Ok(self.commit())
    }

    // ====================================================================
    // History
    // ====================================================================

    /// Record the document's current state.
    pub fn register_change(&mut self) -> ChangeOutcome {
        self.commit()
    }

    /// Note a keystroke-level mutation at `now`.
    ///
    /// With coalescing disabled the change is registered immediately and
    /// its outcome returned. Otherwise `None`; call
    /// [`poll_coalesce`](Self::poll_coalesce) later to register the burst.
    pub fn note_mutation(&mut self, now: Instant) -> Option<ChangeOutcome> {
        if self.coalesce.note_mutation(now) {
            return Some(self.commit());
        }
        None
    }

    /// Register a pending burst once input has been quiet long enough.
    pub fn poll_coalesce(&mut self, now: Instant) -> Option<ChangeOutcome> {
        if self.coalesce.poll(now) {
            return Some(self.commit());
        }
        None
    }

    /// Register a pending burst right away.
    pub fn flush_coalesce(&mut self) -> Option<ChangeOutcome> {
        if self.coalesce.is_pending() {
            return Some(self.commit());
        }
        None
    }

    /// Step back one entry. Pending coalesced edits are registered first.
    pub fn undo(&mut self) -> Result<bool> {
        self.flush_coalesce();
        let moved = self.history.undo(&mut self.document);
        self.sync_toolbar();
        Ok(moved?)
    }

    /// Step forward one entry. Pending coalesced edits are registered
    /// first, which discards the redo branch.
    pub fn redo(&mut self) -> Result<bool> {
        self.flush_coalesce();
        let moved = self.history.redo(&mut self.document);
        self.sync_toolbar();
        Ok(moved?)
    }

    /// Forget all history; the current state becomes the floor.
    pub fn reset_history(&mut self) {
        self.coalesce.flush();
        self.history.reset(&self.document);
        self.sync_toolbar();
    }

    /// Open a batch; see [`UndoRedo::begin_batch`].
    pub fn begin_batch(&mut self) {
        self.history.begin_batch();
        self.sync_toolbar();
    }

    /// Close a batch; see [`UndoRedo::end_batch`].
    pub fn end_batch(&mut self) -> ChangeOutcome {
        self.coalesce.flush();
        let outcome = self.history.end_batch(&self.document);
        self.sync_toolbar();
        outcome
    }

    /// Whether undo would do something.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo would do something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// History state for status lines.
    #[must_use]
    pub fn history_status(&self) -> HistoryStatus {
        self.history.status()
    }

    /// The history controller.
    #[must_use]
    pub fn history(&self) -> &UndoRedo {
        &self.history
    }

    /// Change the history depth bound. Returns how many entries were evicted.
    pub fn set_max_depth(&mut self, max_depth: usize) -> usize {
        let evicted = self.history.set_max_depth(max_depth);
        self.sync_toolbar();
        evicted
    }

    fn commit(&mut self) -> ChangeOutcome {
        self.coalesce.flush();
        let outcome = self.history.register_change(&self.document);
        self.sync_toolbar();
        outcome
    }

    fn sync_toolbar(&mut self) {
        self.toolbar.sync(self.history.status());
    }

    // ====================================================================
    // Commands
    // ====================================================================

    /// Run a selection command: inline formatting, lists, or unlink.
    pub fn exec(&mut self, command: ExecCommand) -> Result<ChangeOutcome> {
        let _span = tracing::debug_span!("editor.exec", command = command.name()).entered();
        let document = &mut self.document;
        match command {
            ExecCommand::InsertOrderedList => edit::insert_list(document, ListKind::Ordered)?,
            ExecCommand::InsertUnorderedList => {
                edit::insert_list(document, ListKind::Unordered)?
            }
            ExecCommand::Indent => edit::indent(document)?,
            ExecCommand::Outdent => edit::outdent(document)?,
            ExecCommand::Unlink => edit::unlink(document)?,
            ExecCommand::Bold
            | ExecCommand::Italic
            | ExecCommand::Superscript
            | ExecCommand::Subscript => {
                let tag = command.inline_tag().unwrap_or_default();
                edit::wrap_selection(document, Element::new(tag))?
            }
        };
        Ok(self.commit())
    }

    /// Create or update a link over the selection.
    pub fn link(&mut self, attrs: &LinkAttrs) -> Result<ChangeOutcome> {
        let _span = tracing::debug_span!("editor.exec", command = "CreateLink").entered();
        edit::link(
            &mut self.document,
            &[
                ("href", attrs.href.as_str()),
                ("title", attrs.title.as_str()),
                ("rel", attrs.rel.as_str()),
            ],
        )?;
        Ok(self.commit())
    }

    /// Insert an image at the caret.
    pub fn insert_image(&mut self, attrs: &ImageAttrs) -> Result<ChangeOutcome> {
        let _span = tracing::debug_span!("editor.exec", command = "InsertImage").entered();
        edit::insert_at_caret(&mut self.document, Node::Element(dialog::image_element(attrs)))?;
        Ok(self.commit())
    }

    /// Insert an empty table after the caret's block.
    pub fn insert_table(&mut self, spec: &TableSpec) -> Result<ChangeOutcome> {
        let _span = tracing::debug_span!(
            "editor.exec",
            command = "InsertTable",
            rows = spec.rows,
            cols = spec.cols,
        )
        .entered();
        let table = dialog::table_element(spec)?;
        edit::insert_blocks(&mut self.document, vec![Node::Element(table)])?;
        Ok(self.commit())
    }

    /// Insert plain text as paragraphs after the caret's block.
    pub fn paste(&mut self, text: &str) -> Result<ChangeOutcome> {
        let _span = tracing::debug_span!("editor.exec", command = "Paste").entered();
        let blocks = edit::paragraphs_from_text(text);
        if blocks.is_empty() {
            tracing::debug!("nothing to paste");
        }
        edit::insert_blocks(&mut self.document, blocks)?;
        Ok(self.commit())
    }

    // ====================================================================
    // Dialogs
    // ====================================================================

    /// Request a dialog. `None` when it may not open in the current state.
    #[must_use]
    pub fn open_dialog(&self, kind: DialogKind) -> Option<OpenedDialog> {
        let command = command_for(kind);
        if !command.should_open(self) {
            tracing::debug!(dialog = kind.name(), "dialog refused to open");
            return None;
        }
        Some(OpenedDialog {
            spec: command.spec(),
            payload: command.template(self),
        })
    }

    /// Request a dialog by identifier. Unknown identifiers are an error.
    pub fn open_dialog_named(&self, name: &str) -> Result<Option<OpenedDialog>> {
        let kind: DialogKind = name.parse()?;
        Ok(self.open_dialog(kind))
    }

    /// Submit a dialog's fields, performing its mutation.
    pub fn submit_dialog(
        &mut self,
        kind: DialogKind,
        payload: DialogPayload,
    ) -> Result<ChangeOutcome> {
        let _span = tracing::debug_span!("editor.dialog", dialog = kind.name()).entered();
        command_for(kind).run(self, payload)
    }

    // ====================================================================
    // Input
    // ====================================================================

    /// Route a key event through the shortcut table.
    ///
    /// Returns `Ok(None)` when the key is not bound.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Option<ActionOutcome>> {
        let Some(action) = self.shortcuts.map(event) else {
            return Ok(None);
        };
        self.perform(action).map(Some)
    }

    /// Click a toolbar button by name.
    ///
    /// Returns `Ok(None)` when the button is unknown or disabled.
    pub fn click_button(&mut self, name: &str) -> Result<Option<ActionOutcome>> {
        let Some(action) = self.toolbar.click(name) else {
            return Ok(None);
        };
        self.perform(action).map(Some)
    }

    /// Carry out an action.
    pub fn perform(&mut self, action: Action) -> Result<ActionOutcome> {
        tracing::debug!(action = action.name(), "performing action");
        match action {
            Action::Undo => self.undo().map(ActionOutcome::History),
            Action::Redo => self.redo().map(ActionOutcome::History),
            Action::Exec(command) => self.exec(command).map(ActionOutcome::Changed),
            Action::OpenDialog(kind) => Ok(ActionOutcome::Dialog(self.open_dialog(kind))),
        }
    }

    /// Toolbar state.
    #[must_use]
    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// Shortcut table.
    #[must_use]
    pub fn shortcuts(&self) -> &ShortcutMapper {
        &self.shortcuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_bindings::ShortcutConfig;
    use folio_doc::{EditError, Point};
    use folio_history::HistoryConfig;
    use web_time::Duration;

    use crate::EditorError;

    fn selected(markup: &str, path: &[usize], from: usize, to: usize) -> Editor {
        let mut editor = Editor::new(markup).unwrap();
        editor.document_mut().select(
            Point::new(path.to_vec(), from),
            Point::new(path.to_vec(), to),
        );
        editor
    }

    #[test]
    fn new_editor_has_no_history() {
        let editor = Editor::new("<p>Foo</p>").unwrap();
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
        assert_eq!(editor.toolbar().is_enabled("Undo"), Some(false));
    }

    #[test]
    fn bad_markup_is_an_error() {
        assert!(matches!(
            Editor::new("<p>Foo"),
            Err(EditorError::Markup(_))
        ));
    }

    #[test]
    fn exec_records_one_entry_and_enables_undo() {
        let mut editor = selected("<p>Foo</p>", &[0, 0], 0, 3);
        assert_eq!(editor.exec(ExecCommand::Bold).unwrap(), ChangeOutcome::Recorded);
        assert_eq!(editor.history_status().len, 2);
        assert_eq!(editor.toolbar().is_enabled("Undo"), Some(true));
        assert_eq!(editor.toolbar().is_enabled("Redo"), Some(false));
    }

    #[test]
    fn backward_selection_around_line_break_is_wrapped() {
        let mut editor = selected("<p>a<br />b</p>", &[0], 2, 1);
        editor.reset_history();
        assert_eq!(editor.exec(ExecCommand::Bold).unwrap(), ChangeOutcome::Recorded);
        assert_eq!(editor.markup(), "<p>a<strong><br /></strong>b</p>");
        assert!(editor.undo().unwrap());
        assert_eq!(editor.markup(), "<p>a<br />b</p>");
    }

    #[test]
    fn list_commands_need_a_list_item() {
        let mut editor = Editor::new("<p>Foo</p>").unwrap();
        editor.document_mut().set_caret_in([0, 0]);
        assert!(matches!(
            editor.exec(ExecCommand::Indent),
            Err(EditorError::Edit(EditError::NotInElement { tag: "li" }))
        ));
        assert!(!editor.can_undo());
    }

    #[test]
    fn failed_command_changes_nothing() {
        let mut editor = Editor::new("<p>Foo</p>").unwrap();
        let err = editor.exec(ExecCommand::Italic).unwrap_err();
        assert!(matches!(err, EditorError::Edit(EditError::NoSelection)));
        assert_eq!(editor.markup(), "<p>Foo</p>");
        assert!(!editor.can_undo());
    }

    #[test]
    fn toolbar_follows_undo_and_redo() {
        let mut editor = selected("<p>Foo</p>", &[0, 0], 0, 3);
        editor.exec(ExecCommand::Superscript).unwrap();
        editor.undo().unwrap();
        assert_eq!(editor.toolbar().is_enabled("Undo"), Some(false));
        assert_eq!(editor.toolbar().is_enabled("Redo"), Some(true));
        editor.redo().unwrap();
        assert_eq!(editor.toolbar().is_enabled("Undo"), Some(true));
        assert_eq!(editor.toolbar().is_enabled("Redo"), Some(false));
    }

    #[test]
    fn disabled_button_click_is_ignored() {
        let mut editor = Editor::new("<p>Foo</p>").unwrap();
        assert_eq!(editor.click_button("Undo").unwrap(), None);
        assert_eq!(editor.click_button("NoSuchButton").unwrap(), None);
    }

    #[test]
    fn formatting_shortcut_runs_command() {
        let mut editor = selected("<p>Foo</p>", &[0, 0], 0, 3);
        let outcome = editor.handle_key(&KeyEvent::ctrl_char('i')).unwrap();
        assert_eq!(outcome, Some(ActionOutcome::Changed(ChangeOutcome::Recorded)));
        assert_eq!(editor.markup(), "<p><em>Foo</em></p>");
    }

    #[test]
    fn shortcuts_can_be_disabled() {
        let config = EditorConfig::default().with_shortcuts(ShortcutConfig::disabled());
        let mut editor = Editor::with_config("<p>Foo</p>", config).unwrap();
        editor.set_content("<p>Bar</p>").unwrap();
        assert_eq!(editor.handle_key(&KeyEvent::ctrl_char('z')).unwrap(), None);
        assert_eq!(editor.markup(), "<p>Bar</p>");
    }

    #[test]
    fn coalesced_typing_is_one_entry() {
        let config = EditorConfig::default()
            .with_history(HistoryConfig::default().with_coalesce_window(Duration::from_millis(300)));
        let mut editor = Editor::with_config("<p>Foo</p>", config).unwrap();
        let t0 = Instant::now();

        for (i, markup) in ["<p>Foo!</p>", "<p>Foo!!</p>", "<p>Foo!!!</p>"].iter().enumerate() {
            editor.document_mut().set_markup(markup).unwrap();
            let at = t0 + Duration::from_millis(100 * i as u64);
            assert_eq!(editor.note_mutation(at), None);
        }
        assert_eq!(editor.poll_coalesce(t0 + Duration::from_millis(250)), None);
        assert_eq!(
            editor.poll_coalesce(t0 + Duration::from_millis(600)),
            Some(ChangeOutcome::Recorded)
        );
        assert_eq!(editor.history_status().len, 2);

        editor.undo().unwrap();
        assert_eq!(editor.markup(), "<p>Foo</p>");
    }

    #[test]
    fn undo_flushes_pending_burst() {
        let config = EditorConfig::default()
            .with_history(HistoryConfig::default().with_coalesce_window(Duration::from_millis(300)));
        let mut editor = Editor::with_config("<p>Foo</p>", config).unwrap();
        editor.document_mut().set_markup("<p>Foo!</p>").unwrap();
        assert_eq!(editor.note_mutation(Instant::now()), None);

        assert!(editor.undo().unwrap());
        assert_eq!(editor.markup(), "<p>Foo</p>");
        assert!(editor.redo().unwrap());
        assert_eq!(editor.markup(), "<p>Foo!</p>");
    }

    #[test]
    fn uncoalesced_mutation_registers_immediately() {
        let mut editor = Editor::new("<p>Foo</p>").unwrap();
        editor.document_mut().append_markup("<p>Bar</p>").unwrap();
        assert_eq!(
            editor.note_mutation(Instant::now()),
            Some(ChangeOutcome::Recorded)
        );
    }

    #[test]
    fn batch_groups_commands() {
        let mut editor = selected("<p>Foobar</p>", &[0, 0], 0, 3);
        editor.begin_batch();
        assert_eq!(editor.exec(ExecCommand::Bold).unwrap(), ChangeOutcome::Deferred);
        editor.document_mut().append_markup("<p>Baz</p>").unwrap();
        assert_eq!(editor.end_batch(), ChangeOutcome::Recorded);
        assert_eq!(editor.history_status().len, 2);
        editor.undo().unwrap();
        assert_eq!(editor.markup(), "<p>Foobar</p>");
    }

    #[test]
    fn open_dialog_by_name() {
        let mut editor = Editor::new("<p>Foo</p>").unwrap();
        assert!(matches!(
            editor.open_dialog_named("InsertVideo"),
            Err(EditorError::UnknownCommand(_))
        ));
        assert_eq!(editor.open_dialog_named("InsertImage").unwrap(), None);
        editor.document_mut().set_caret_in([0]);
        let opened = editor.open_dialog_named("InsertImage").unwrap().unwrap();
        assert_eq!(opened.spec.title, "Image");
        assert_eq!(opened.payload, DialogPayload::Image(ImageAttrs::default()));
    }

    #[test]
    fn toolbar_dialog_button_opens_dialog() {
        let mut editor = Editor::new("<p>Foo</p>").unwrap();
        let outcome = editor.click_button("Preview").unwrap();
        let Some(ActionOutcome::Dialog(Some(opened))) = outcome else {
            panic!("preview should open: {outcome:?}");
        };
        assert_eq!(opened.payload, DialogPayload::Preview("<p>Foo</p>".into()));
    }

    #[test]
    fn submit_dialog_registers_once() {
        let mut editor = Editor::new("<p>Foo</p>").unwrap();
        editor.document_mut().set_caret_in([0]);
        let outcome = editor
            .submit_dialog(DialogKind::Paste, DialogPayload::Paste("One\n\nTwo".into()))
            .unwrap();
        assert_eq!(outcome, ChangeOutcome::Recorded);
        assert_eq!(editor.markup(), "<p>Foo</p><p>One</p><p>Two</p>");
        assert_eq!(editor.history_status().len, 2);
    }

    #[test]
    fn empty_paste_is_unchanged() {
        let mut editor = Editor::new("<p>Foo</p>").unwrap();
        editor.document_mut().set_caret_in([0]);
        assert_eq!(editor.paste("   ").unwrap(), ChangeOutcome::Unchanged);
    }

    #[test]
    fn shrinking_depth_updates_toolbar() {
        let mut editor = Editor::new("<p>A</p>").unwrap();
        editor.set_content("<p>B</p>").unwrap();
        assert!(editor.can_undo());
        assert_eq!(editor.set_max_depth(1), 1);
        assert!(!editor.can_undo());
        assert_eq!(editor.toolbar().is_enabled("Undo"), Some(false));
    }

    #[test]
    fn reset_history_clears_both_directions() {
        let mut editor = Editor::new("<p>A</p>").unwrap();
        editor.set_content("<p>B</p>").unwrap();
        editor.set_content("<p>C</p>").unwrap();
        editor.undo().unwrap();
        editor.reset_history();
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
        assert_eq!(editor.markup(), "<p>B</p>");
    }
}
