#![forbid(unsafe_code)]

//! Editor actions produced by shortcuts and toolbar buttons.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An identifier that does not name a known command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no such {kind}: {name:?}")]
pub struct UnknownCommand {
    /// What was being looked up ("dialog", "command", "action").
    pub kind: &'static str,
    /// The identifier as given.
    pub name: String,
}

/// Commands that act on the selection without gathering input first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecCommand {
    /// Wrap in `<strong>`.
    Bold,
    /// Wrap in `<em>`.
    Italic,
    /// Wrap in `<sup>`.
    Superscript,
    /// Wrap in `<sub>`.
    Subscript,
    /// Turn the current block into an `<ol>` item.
    InsertOrderedList,
    /// Turn the current block into a `<ul>` item.
    InsertUnorderedList,
    /// Nest the current list item one level deeper.
    Indent,
    /// Move the current list item one level up.
    Outdent,
    /// Remove the link around the selection.
    Unlink,
}

impl ExecCommand {
    /// Every command.
    pub const ALL: [Self; 9] = [
        Self::Bold,
        Self::Italic,
        Self::Superscript,
        Self::Subscript,
        Self::InsertOrderedList,
        Self::InsertUnorderedList,
        Self::Indent,
        Self::Outdent,
        Self::Unlink,
    ];

    /// Command identifier, also used as the toolbar button name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Superscript => "Superscript",
            Self::Subscript => "Subscript",
            Self::InsertOrderedList => "InsertOrderedList",
            Self::InsertUnorderedList => "InsertUnorderedList",
            Self::Indent => "Indent",
            Self::Outdent => "Outdent",
            Self::Unlink => "Unlink",
        }
    }

    /// Element the selection is wrapped in, for inline formatting commands.
    #[must_use]
    pub const fn inline_tag(self) -> Option<&'static str> {
        match self {
            Self::Bold => Some("strong"),
            Self::Italic => Some("em"),
            Self::Superscript => Some("sup"),
            Self::Subscript => Some("sub"),
            _ => None,
        }
    }
}

impl FromStr for ExecCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.name() == s)
            .ok_or_else(|| UnknownCommand {
                kind: "command",
                name: s.to_string(),
            })
    }
}

/// Dialogs that gather input before mutating the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    /// Create or edit a link around the selection.
    CreateLink,
    /// Insert an image at the caret.
    InsertImage,
    /// Insert a table after the caret's block.
    InsertTable,
    /// Paste plain text as paragraphs.
    Paste,
    /// Show the current markup read-only.
    Preview,
}

impl DialogKind {
    /// Every dialog.
    pub const ALL: [Self; 5] = [
        Self::CreateLink,
        Self::InsertImage,
        Self::InsertTable,
        Self::Paste,
        Self::Preview,
    ];

    /// Dialog identifier, also used as the toolbar button name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateLink => "CreateLink",
            Self::InsertImage => "InsertImage",
            Self::InsertTable => "InsertTable",
            Self::Paste => "Paste",
            Self::Preview => "Preview",
        }
    }
}

impl FromStr for DialogKind {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownCommand {
                kind: "dialog",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// High-level editor actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Step back in history.
    Undo,
    /// Step forward in history.
    Redo,
    /// Apply inline formatting to the selection.
    Exec(ExecCommand),
    /// Open a dialog.
    OpenDialog(DialogKind),
}

impl Action {
    /// Whether this action moves through history.
    #[must_use]
    pub const fn is_history(&self) -> bool {
        matches!(self, Self::Undo | Self::Redo)
    }

    /// Identifier used for toolbar buttons.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Exec(cmd) => cmd.name(),
            Self::OpenDialog(kind) => kind.name(),
        }
    }
}

impl FromStr for Action {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Undo" => Ok(Self::Undo),
            "Redo" => Ok(Self::Redo),
            _ => s
                .parse::<ExecCommand>()
                .map(Self::Exec)
                .or_else(|_| s.parse::<DialogKind>().map(Self::OpenDialog))
                .map_err(|_| UnknownCommand {
                    kind: "action",
                    name: s.to_string(),
                }),
        }
    }
}
