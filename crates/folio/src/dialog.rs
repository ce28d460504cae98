#![forbid(unsafe_code)]

//! Dialog commands.
//!
//! A dialog gathers input (a link target, an image source, table
//! dimensions, pasted text) and then performs one mutation that is recorded
//! as a single history entry. The form itself belongs to the host UI; this
//! module decides whether a dialog may open, what its fields start out as,
//! and what submitting it does.
//!
//! # Dialogs
//!
//! | Kind | Opens when | Submit |
//! |------|------------|--------|
//! | `CreateLink` | range selected, or caret inside an `<a>` | create or update link |
//! | `InsertImage` | collapsed caret | insert `<img>` at caret |
//! | `InsertTable` | collapsed caret | insert table after caret block |
//! | `Paste` | collapsed caret | insert text as paragraphs |
//! | `Preview` | always | none (read-only) |

use folio_bindings::DialogKind;
use folio_doc::edit;
use folio_doc::{Element, Node};
use folio_history::ChangeOutcome;

use crate::editor::Editor;
use crate::{EditorError, Result};

/// Window features used when a dialog does not supply its own.
pub const DEFAULT_WINDOW_FEATURES: &str =
    "menubar=no,titlebar=no,toolbar=no,resizable=no,width=560,height=300,top=0,left=0";

const PREVIEW_WINDOW_FEATURES: &str = "menubar=no,titlebar=no,toolbar=no,resizable=no,\
width=560,height=300,top=0,left=0,scrollbars=yes";

/// Static description of a dialog.
///
/// Capabilities a dialog may lack are `None` rather than absent methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogSpec {
    /// Which dialog this is.
    pub kind: DialogKind,
    /// Title key shown in the window title.
    pub title: &'static str,
    /// Class added to the dialog body.
    pub body_class: Option<&'static str>,
    /// Window features overriding [`DEFAULT_WINDOW_FEATURES`].
    pub window_features: Option<&'static str>,
    /// Label of the submit button; `None` for read-only dialogs.
    pub submit_label: Option<&'static str>,
}

impl DialogSpec {
    /// Window features to open with.
    #[must_use]
    pub fn features(&self) -> &'static str {
        self.window_features.unwrap_or(DEFAULT_WINDOW_FEATURES)
    }

    /// Whether the dialog has a submit action.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.submit_label.is_some()
    }
}

/// Link dialog fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAttrs {
    pub href: String,
    pub title: String,
    pub rel: String,
}

impl LinkAttrs {
    /// Link to `href` with no title or rel.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }
}

/// Image dialog fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAttrs {
    pub src: String,
    pub title: String,
    pub alt: String,
}

impl ImageAttrs {
    /// Image from `src` with no title or alt text.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }
}

/// Table dialog fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub rows: usize,
    pub cols: usize,
    pub caption: String,
    pub summary: String,
}

impl TableSpec {
    /// A `rows` x `cols` table with caption and summary.
    #[must_use]
    pub fn new(
        rows: usize,
        cols: usize,
        caption: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            rows,
            cols,
            caption: caption.into(),
            summary: summary.into(),
        }
    }
}

impl Default for TableSpec {
    fn default() -> Self {
        Self::new(3, 2, "", "")
    }
}

/// Field values exchanged with a dialog form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogPayload {
    Link(LinkAttrs),
    Image(ImageAttrs),
    Table(TableSpec),
    Paste(String),
    /// Markup to display; never submitted.
    Preview(String),
}

/// A dialog that passed its open check, with prefilled fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedDialog {
    pub spec: DialogSpec,
    pub payload: DialogPayload,
}

/// Behavior of one dialog kind.
pub trait DialogCommand: Send + Sync {
    /// Static description.
    fn spec(&self) -> DialogSpec;

    /// Whether the dialog may open in the editor's current state.
    fn should_open(&self, editor: &Editor) -> bool;

    /// Initial field values.
    fn template(&self, editor: &Editor) -> DialogPayload;

    /// Perform the dialog's mutation and register it.
    fn run(&self, editor: &mut Editor, payload: DialogPayload) -> Result<ChangeOutcome>;
}

/// Command implementing `kind`.
#[must_use]
pub fn command_for(kind: DialogKind) -> &'static dyn DialogCommand {
    match kind {
        DialogKind::CreateLink => &CreateLink,
        DialogKind::InsertImage => &InsertImage,
        DialogKind::InsertTable => &InsertTable,
        DialogKind::Paste => &Paste,
        DialogKind::Preview => &Preview,
    }
}

fn has_caret(editor: &Editor) -> bool {
    editor
        .document()
        .selection()
        .is_some_and(|selection| selection.is_collapsed())
}

/// Attribute of the selected container, or empty.
fn container_attr(editor: &Editor, name: &str) -> String {
    let document = editor.document();
    document
        .selected_container()
        .and_then(|path| document.node(&path))
        .and_then(Node::as_element)
        .and_then(|element| element.attr(name))
        .unwrap_or_default()
        .to_string()
}

fn mismatch(kind: DialogKind) -> EditorError {
    EditorError::PayloadMismatch { dialog: kind }
}

/// Link dialog.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateLink;

impl DialogCommand for CreateLink {
    fn spec(&self) -> DialogSpec {
        DialogSpec {
            kind: DialogKind::CreateLink,
            title: "Link",
            body_class: Some("wym_dialog_link"),
            window_features: None,
            submit_label: Some("Submit"),
        }
    }

    fn should_open(&self, editor: &Editor) -> bool {
        let document = editor.document();
        let Some(selection) = document.selection() else {
            return false;
        };
        let Some(container) = document.selected_container() else {
            return false;
        };
        if selection.is_collapsed() {
            return document.node(&container).and_then(Node::tag) == Some("a");
        }
        true
    }

    fn template(&self, editor: &Editor) -> DialogPayload {
        DialogPayload::Link(LinkAttrs {
            href: container_attr(editor, "href"),
            title: container_attr(editor, "title"),
            rel: container_attr(editor, "rel"),
        })
    }

    fn run(&self, editor: &mut Editor, payload: DialogPayload) -> Result<ChangeOutcome> {
        let DialogPayload::Link(attrs) = payload else {
            return Err(mismatch(DialogKind::CreateLink));
        };
        editor.link(&attrs)
    }
}

/// Image dialog.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertImage;

impl DialogCommand for InsertImage {
    fn spec(&self) -> DialogSpec {
        DialogSpec {
            kind: DialogKind::InsertImage,
            title: "Image",
            body_class: Some("wym_dialog_image"),
            window_features: None,
            submit_label: Some("Submit"),
        }
    }

    fn should_open(&self, editor: &Editor) -> bool {
        has_caret(editor)
    }

    fn template(&self, editor: &Editor) -> DialogPayload {
        DialogPayload::Image(ImageAttrs {
            src: container_attr(editor, "src"),
            title: container_attr(editor, "title"),
            alt: container_attr(editor, "alt"),
        })
    }

    fn run(&self, editor: &mut Editor, payload: DialogPayload) -> Result<ChangeOutcome> {
        let DialogPayload::Image(attrs) = payload else {
            return Err(mismatch(DialogKind::InsertImage));
        };
        editor.insert_image(&attrs)
    }
}

/// Table dialog.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertTable;

impl DialogCommand for InsertTable {
    fn spec(&self) -> DialogSpec {
        DialogSpec {
            kind: DialogKind::InsertTable,
            title: "Table",
            body_class: Some("wym_dialog_table"),
            window_features: None,
            submit_label: Some("Submit"),
        }
    }

    fn should_open(&self, editor: &Editor) -> bool {
        has_caret(editor)
    }

    fn template(&self, _editor: &Editor) -> DialogPayload {
        DialogPayload::Table(TableSpec::default())
    }

    fn run(&self, editor: &mut Editor, payload: DialogPayload) -> Result<ChangeOutcome> {
        let DialogPayload::Table(spec) = payload else {
            return Err(mismatch(DialogKind::InsertTable));
        };
        editor.insert_table(&spec)
    }
}

/// Plain-text paste dialog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paste;

impl DialogCommand for Paste {
    fn spec(&self) -> DialogSpec {
        DialogSpec {
            kind: DialogKind::Paste,
            title: "Paste_From_Word",
            body_class: Some("wym_dialog_paste"),
            window_features: None,
            submit_label: Some("Submit"),
        }
    }

    fn should_open(&self, editor: &Editor) -> bool {
        has_caret(editor)
    }

    fn template(&self, _editor: &Editor) -> DialogPayload {
        DialogPayload::Paste(String::new())
    }

    fn run(&self, editor: &mut Editor, payload: DialogPayload) -> Result<ChangeOutcome> {
        let DialogPayload::Paste(text) = payload else {
            return Err(mismatch(DialogKind::Paste));
        };
        editor.paste(&text)
    }
}

/// Read-only markup preview.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preview;

impl DialogCommand for Preview {
    fn spec(&self) -> DialogSpec {
        DialogSpec {
            kind: DialogKind::Preview,
            title: "Preview",
            body_class: Some("wym_dialog_preview"),
            window_features: Some(PREVIEW_WINDOW_FEATURES),
            submit_label: None,
        }
    }

    fn should_open(&self, _editor: &Editor) -> bool {
        true
    }

    fn template(&self, editor: &Editor) -> DialogPayload {
        DialogPayload::Preview(editor.markup())
    }

    fn run(&self, _editor: &mut Editor, _payload: DialogPayload) -> Result<ChangeOutcome> {
        Err(EditorError::NotSubmittable {
            dialog: DialogKind::Preview,
        })
    }
}

/// Build the `<img>` element for `attrs`, skipping empty attributes.
pub(crate) fn image_element(attrs: &ImageAttrs) -> Element {
    let mut img = Element::new("img");
    for (name, value) in [("src", &attrs.src), ("alt", &attrs.alt), ("title", &attrs.title)] {
        if !value.is_empty() {
            img.set_attr(name, value.as_str());
        }
    }
    img
}

/// Build the table element for `spec`.
pub(crate) fn table_element(spec: &TableSpec) -> Result<Element> {
    Ok(edit::table(spec.rows, spec.cols, &spec.caption, &spec.summary)?)
}
