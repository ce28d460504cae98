#![forbid(unsafe_code)]

//! The live editable document: a content tree plus the user's selection.

use crate::markup::{self, MarkupError};
use crate::node::{Element, Node, NodePath, ROOT_TAG};
use crate::selection::{self, Point, RestoreOutcome, Selection, SelectionSnapshot};
use crate::surface::{EditableSurface, SerializedDocument};

/// Editable content tree with an optional live selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Node,
    selection: Option<Selection>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with no selection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::Element(Element::new(ROOT_TAG)),
            selection: None,
        }
    }

    /// Parse a document from markup.
    pub fn from_markup(markup: &str) -> Result<Self, MarkupError> {
        let mut doc = Self::new();
        doc.set_markup(markup)?;
        Ok(doc)
    }

    /// Root node (a `body` element).
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top-level content nodes.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        self.root.children()
    }

    /// Mutable access to the root's children.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        match &mut self.root {
            Node::Element(element) => &mut element.children,
            Node::Text(_) => unreachable!("document root is always an element"),
        }
    }

    /// Resolve a node by path.
    #[must_use]
    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        self.root.descendant(path.indices())
    }

    /// Mutably resolve a node by path.
    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        self.root.descendant_mut(path.indices())
    }

    /// Serialize the content (not the selection) to canonical markup.
    #[must_use]
    pub fn to_markup(&self) -> String {
        markup::serialize_fragment(self.children())
    }

    /// Replace the whole content from markup.
    ///
    /// On error the document is left unchanged. Any live selection is
    /// re-resolved against the new tree so it never dangles.
    pub fn set_markup(&mut self, markup: &str) -> Result<(), MarkupError> {
        let nodes = markup::parse_fragment(markup)?;
        *self.children_mut() = nodes;
        if let Some(current) = self.selection.take() {
            let (resolved, _) = selection::resolve_selection(&self.root, &current);
            self.selection = Some(resolved);
        }
        Ok(())
    }

    /// Append parsed markup after the existing top-level content.
    pub fn append_markup(&mut self, markup: &str) -> Result<(), MarkupError> {
        let nodes = markup::parse_fragment(markup)?;
        self.children_mut().extend(nodes);
        Ok(())
    }

    /// Concatenated text content.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Replace the selection verbatim.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Select a range, resolving both points against the current tree.
    pub fn select(&mut self, anchor: Point, focus: Point) -> RestoreOutcome {
        let (resolved, outcome) =
            selection::resolve_selection(&self.root, &Selection::new(anchor, focus));
        self.selection = Some(resolved);
        outcome
    }

    /// Place a collapsed caret at the start of the node at `path`.
    pub fn set_caret_in(&mut self, path: impl Into<NodePath>) -> RestoreOutcome {
        let point = Point::new(path, 0);
        self.select(point.clone(), point)
    }

    /// Whether there is a live selection.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// Text covered by the selection, empty when there is none.
    #[must_use]
    pub fn selection_text(&self) -> String {
        self.selection
            .as_ref()
            .map(|sel| sel.to_text(&self.root))
            .unwrap_or_default()
    }

    /// Path of the element that contains the selection focus.
    ///
    /// For a focus inside a text node this is the text node's parent.
    /// Returns `None` when there is no selection or the focus sits directly
    /// in the root.
    #[must_use]
    pub fn selected_container(&self) -> Option<NodePath> {
        let focus = &self.selection.as_ref()?.focus;
        let path = match self.node(&focus.path)? {
            Node::Text(_) => focus.path.parent()?,
            Node::Element(_) => focus.path.clone(),
        };
        if path.is_root() { None } else { Some(path) }
    }

    /// Closest ancestor-or-self element of `path` with the given tag.
    #[must_use]
    pub fn closest(&self, path: &NodePath, tag: &str) -> Option<NodePath> {
        (1..=path.depth()).rev().map(|depth| path.truncated(depth)).find(|candidate| {
            self.node(candidate).and_then(Node::tag) == Some(tag)
        })
    }
}

impl EditableSurface for Document {
    fn serialize(&self) -> SerializedDocument {
        SerializedDocument::from(self.to_markup())
    }

    fn apply_content(&mut self, content: &SerializedDocument) -> Result<(), MarkupError> {
        self.set_markup(content.as_str())
    }

    fn capture_selection(&self) -> SelectionSnapshot {
        self.selection.clone()
    }

    fn restore_selection(&mut self, snapshot: &SelectionSnapshot) -> RestoreOutcome {
        let Some(recorded) = snapshot else {
            return RestoreOutcome::Skipped;
        };
        let (resolved, outcome) = selection::resolve_selection(&self.root, recorded);
        if outcome == RestoreOutcome::Collapsed {
            tracing::warn!(
                anchor = %recorded.anchor.path,
                focus = %recorded.focus.path,
                fallback = %resolved.focus.path,
                "selection no longer resolves; collapsed to fallback caret"
            );
        }
        self.selection = Some(resolved);
        outcome
    }
}
