#![forbid(unsafe_code)]

//! Structural edits driven by the live selection.
//!
//! These are the primitives formatting and insertion commands are built
//! from. Each one mutates the tree, leaves a sensible selection behind, and
//! returns the path of the node it created. Recording the change in history
//! is the caller's job.

use thiserror::Error;

use crate::document::Document;
use crate::markup::MAX_DEPTH;
use crate::node::{Element, Node, NodePath};
use crate::selection::{self, Point, Selection};

/// Class marking a list item that only exists to hold a nested list.
pub const SPACER_CLASS: &str = "spacer_li";

/// Elements a list item can be made from.
const TEXT_BLOCKS: [&str; 9] = ["p", "div", "pre", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Reasons a selection-driven edit cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The edit needs a selection and there is none.
    #[error("no selection")]
    NoSelection,

    /// The edit needs a non-empty range but the selection is a caret.
    #[error("selection is collapsed")]
    Collapsed,

    /// The edit needs a caret but the selection is a range.
    #[error("selection is a range; a caret is required")]
    NotCollapsed,

    /// The range crosses node boundaries the edit cannot split.
    #[error("selection spans {start} to {end}; only ranges within one node are supported")]
    SpansNodes { start: NodePath, end: NodePath },

    /// A selection point no longer resolves.
    #[error("no node at {path}")]
    InvalidPath { path: NodePath },

    /// A table needs at least one row and one column.
    #[error("table must have at least one row and one column (got {rows}x{cols})")]
    EmptyTable { rows: usize, cols: usize },

    /// The selection is not inside a block that can become a list item.
    #[error("selection is not inside a text block")]
    NotInBlock,

    /// The edit needs the selection inside a particular element.
    #[error("selection is not inside <{tag}>")]
    NotInElement { tag: &'static str },

    /// The list item is already at the outermost level.
    #[error("list item is already at the top level")]
    AtTopLevel,

    /// The edit would nest elements deeper than the parser accepts.
    #[error("edit would nest elements deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Ordered or unordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// `<ol>`
    Ordered,
    /// `<ul>`
    Unordered,
}

impl ListKind {
    /// The list element's tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ordered => "ol",
            Self::Unordered => "ul",
        }
    }
}

/// Wrap the selected range in `wrapper`.
///
/// Supports ranges inside a single text node (the text is split) and ranges
/// of whole children inside a single element. The new element ends up
/// selected.
pub fn wrap_selection(doc: &mut Document, mut wrapper: Element) -> Result<NodePath, EditError> {
    let selection = doc.selection().cloned().ok_or(EditError::NoSelection)?;
    if selection.is_collapsed() {
        return Err(EditError::Collapsed);
    }
    let (start, end) = {
        let (start, end) = selection.ordered(doc.root());
        (start.clone(), end.clone())
    };
    if start.path != end.path {
        return Err(EditError::SpansNodes {
            start: start.path,
            end: end.path,
        });
    }

    // Element offsets around an empty child share a text position, so
    // order by offset once both points are in the same node.
    let (from, to) = (start.offset.min(end.offset), start.offset.max(end.offset));
    let path = start.path;
    let node = doc
        .node(&path)
        .ok_or_else(|| EditError::InvalidPath { path: path.clone() })?;
    ensure_depth(&path, node, 1)?;

    match node {
        Node::Text(text) => {
            let (before, middle, after) = split_chars(text, from, to);
            let middle_len = middle.chars().count();
            wrapper.children.push(Node::Text(middle));
            let (parent, index) = parent_and_index(&path)?;
            let wrapped_index = replace_with_split(doc, &parent, index, before, wrapper, after)?;
            let wrapped = parent.child(wrapped_index);
            doc.set_selection(Some(Selection::new(
                Point::new(wrapped.child(0), 0),
                Point::new(wrapped.child(0), middle_len),
            )));
            Ok(wrapped)
        }
        Node::Element(_) => {
            let element = element_mut(doc, &path)?;
            let from = from.min(element.children.len());
            let to = to.min(element.children.len());
            wrapper.children.extend(element.children.drain(from..to));
            element.children.insert(from, Node::Element(wrapper));
            doc.set_selection(Some(Selection::new(
                Point::new(path.clone(), from),
                Point::new(path.clone(), from + 1),
            )));
            Ok(path.child(from))
        }
    }
}

/// Insert `node` at the caret, splitting a text node if needed.
///
/// The caret moves to just after the inserted node.
pub fn insert_at_caret(doc: &mut Document, node: Node) -> Result<NodePath, EditError> {
    let caret = caret(doc)?;
    let target = doc
        .node(&caret.path)
        .ok_or_else(|| EditError::InvalidPath {
            path: caret.path.clone(),
        })?;

    let (parent, index) = match target {
        Node::Text(text) => {
            let (before, _, after) = split_chars(text, caret.offset, caret.offset);
            let (parent, index) = parent_and_index(&caret.path)?;
            let index = match node {
                Node::Element(element) => {
                    replace_with_split(doc, &parent, index, before, element, after)?
                }
                Node::Text(inserted) => {
                    let merged = format!("{before}{inserted}{after}");
                    let end = before.chars().count() + inserted.chars().count();
                    if let Some(Node::Text(slot)) = doc.node_mut(&caret.path) {
                        *slot = merged;
                    }
                    let point = Point::new(caret.path.clone(), end);
                    doc.set_selection(Some(Selection::caret(point)));
                    return Ok(caret.path);
                }
            };
            (parent, index)
        }
        Node::Element(_) => {
            let element = element_mut(doc, &caret.path)?;
            let index = caret.offset.min(element.children.len());
            element.children.insert(index, node);
            (caret.path.clone(), index)
        }
    };

    doc.set_selection(Some(Selection::caret(Point::new(parent.clone(), index + 1))));
    Ok(parent.child(index))
}

/// Insert block-level nodes after the top-level block holding the caret.
///
/// With the caret directly in the root, or with no selection at all, the
/// blocks are appended at the end. The caret lands at the start of the last
/// inserted block. Returns the path of the first inserted block.
pub fn insert_blocks(doc: &mut Document, blocks: Vec<Node>) -> Result<NodePath, EditError> {
    let at = match doc.selection() {
        Some(selection) => match selection.focus.path.indices().first() {
            Some(&block) => block + 1,
            None => doc.children().len(),
        },
        None => doc.children().len(),
    };
    let count = blocks.len();
    let children = doc.children_mut();
    let at = at.min(children.len());
    children.splice(at..at, blocks);
    if count > 0 {
        let last = NodePath::from([at + count - 1]);
        doc.set_selection(Some(Selection::caret(Point::new(last, 0))));
    }
    Ok(NodePath::from([at]))
}

/// Create or update a link over the selection.
///
/// When the selection sits inside an existing `<a>`, its attributes are
/// updated; otherwise the selected range is wrapped in a new `<a>`.
/// Attributes with empty values are skipped.
pub fn link(doc: &mut Document, attrs: &[(&str, &str)]) -> Result<NodePath, EditError> {
    let container = doc.selected_container().ok_or(EditError::NoSelection)?;
    if let Some(anchor) = doc.closest(&container, "a") {
        let element = element_mut(doc, &anchor)?;
        for (name, value) in attrs.iter().filter(|(_, value)| !value.is_empty()) {
            element.set_attr(*name, *value);
        }
        return Ok(anchor);
    }
    let mut wrapper = Element::new("a");
    for (name, value) in attrs.iter().filter(|(_, value)| !value.is_empty()) {
        wrapper.set_attr(*name, *value);
    }
    wrap_selection(doc, wrapper)
}

/// Remove the link around the selection, keeping its content.
///
/// The former link text ends up selected.
pub fn unlink(doc: &mut Document) -> Result<NodePath, EditError> {
    let container = selected_container(doc)?;
    let anchor = doc
        .closest(&container, "a")
        .ok_or(EditError::NotInElement { tag: "a" })?;
    let (parent, index) = parent_and_index(&anchor)?;

    let parent_element = element_mut(doc, &parent)?;
    let start: usize = parent_element.children[..index]
        .iter()
        .map(Node::text_len)
        .sum();
    let link = parent_element.children.remove(index);
    let end = start + link.text_len();
    if let Node::Element(link) = link {
        parent_element.children.splice(index..index, link.children);
    }
    merge_text(&mut parent_element.children);

    let root = doc.root();
    let from = selection::point_in_text(root, &parent, start);
    let to = selection::point_in_text(root, &parent, end);
    if let (Some(from), Some(to)) = (from, to) {
        doc.set_selection(Some(Selection::new(from, to)));
    }
    Ok(parent)
}

/// Turn the block holding the selection into a list item of a new list.
///
/// Inside an existing list of the other kind the list is switched over;
/// inside a list of the same kind nothing changes. Returns the list's path.
pub fn insert_list(doc: &mut Document, kind: ListKind) -> Result<NodePath, EditError> {
    let container = selected_container(doc)?;
    if let Some(item) = doc.closest(&container, "li") {
        let (list, _) = parent_and_index(&item)?;
        let element = element_mut(doc, &list)?;
        if element.tag != kind.tag() {
            element.tag = kind.tag().to_string();
        }
        return Ok(list);
    }

    let block = (1..=container.depth())
        .rev()
        .map(|depth| container.truncated(depth))
        .find(|path| {
            doc.node(path)
                .and_then(Node::tag)
                .is_some_and(|tag| TEXT_BLOCKS.contains(&tag))
        })
        .ok_or(EditError::NotInBlock)?;
    let node = doc
        .node(&block)
        .ok_or_else(|| EditError::InvalidPath { path: block.clone() })?;
    ensure_depth(&block, node, 1)?;

    let previous = doc.selection().cloned();
    let element = element_mut(doc, &block)?;
    let mut item = Element::new("li");
    item.children = std::mem::take(&mut element.children);
    *element = Element::new(kind.tag()).with_child(item);
    carry_selection(doc, previous, &block, &block.child(0));
    Ok(block)
}

/// Nest the list item holding the selection one level deeper.
///
/// The item moves into a sub-list of its previous sibling. The first item
/// of a list has no sibling to join, so it is wrapped in a spacer item.
/// Returns the item's new path.
pub fn indent(doc: &mut Document) -> Result<NodePath, EditError> {
    let item_path = selected_item(doc)?;
    let node = doc.node(&item_path).ok_or_else(|| EditError::InvalidPath {
        path: item_path.clone(),
    })?;
    ensure_depth(&item_path, node, 2)?;
    let (list_path, index) = parent_and_index(&item_path)?;

    let previous = doc.selection().cloned();
    let list = element_mut(doc, &list_path)?;
    let list_tag = list.tag.clone();
    let item = list.children.remove(index);

    let sibling = index
        .checked_sub(1)
        .and_then(|prev| list.children.get_mut(prev))
        .and_then(Node::as_element_mut)
        .filter(|prev| prev.tag == "li");
    let new_path = match sibling {
        Some(sibling) => {
            let holder = list_path.child(index - 1);
            let last = sibling.children.len();
            match sibling.children.last_mut() {
                Some(Node::Element(sub)) if sub.tag == list_tag => {
                    sub.children.push(item);
                    holder.child(last - 1).child(sub.children.len() - 1)
                }
                _ => {
                    sibling
                        .children
                        .push(Node::Element(Element::new(list_tag).with_child(item)));
                    holder.child(last).child(0)
                }
            }
        }
        None => {
            let spacer = Element::new("li")
                .with_attr("class", SPACER_CLASS)
                .with_child(Element::new(list_tag).with_child(item));
            list.children.insert(index, Node::Element(spacer));
            item_path.child(0).child(0)
        }
    };

    carry_selection(doc, previous, &item_path, &new_path);
    Ok(new_path)
}

/// Move the list item holding the selection one level up.
///
/// Items after it in the same list become its own sub-list. A sub-list left
/// empty is removed, and so is a spacer item left empty. Returns the item's
/// new path.
pub fn outdent(doc: &mut Document) -> Result<NodePath, EditError> {
    let item_path = selected_item(doc)?;
    let (list_path, index) = parent_and_index(&item_path)?;
    let (holder_path, list_index) = parent_and_index(&list_path)?;
    if doc.node(&holder_path).and_then(Node::tag) != Some("li") {
        return Err(EditError::AtTopLevel);
    }
    let (outer_path, holder_index) = parent_and_index(&holder_path)?;

    let previous = doc.selection().cloned();
    let list = element_mut(doc, &list_path)?;
    let list_tag = list.tag.clone();
    let followers: Vec<Node> = list.children.drain(index + 1..).collect();
    let Node::Element(mut item) = list.children.remove(index) else {
        return Err(EditError::NotInElement { tag: "li" });
    };
    let list_emptied = list.children.is_empty();
    if !followers.is_empty() {
        let mut sub = Element::new(list_tag);
        sub.children = followers;
        item.children.push(Node::Element(sub));
    }

    let holder = element_mut(doc, &holder_path)?;
    if list_emptied {
        holder.children.remove(list_index);
    }
    let drop_holder = holder.children.is_empty() && is_spacer(holder);

    let outer = element_mut(doc, &outer_path)?;
    let at = if drop_holder {
        outer.children.remove(holder_index);
        holder_index
    } else {
        holder_index + 1
    };
    outer.children.insert(at, Node::Element(item));

    let new_path = outer_path.child(at);
    carry_selection(doc, previous, &item_path, &new_path);
    Ok(new_path)
}

/// Build paragraphs from plain text.
///
/// Blank lines separate paragraphs; single line breaks become `<br />`.
#[must_use]
pub fn paragraphs_from_text(text: &str) -> Vec<Node> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let mut paragraph = Element::new("p");
            for (i, line) in chunk.split('\n').enumerate() {
                if i > 0 {
                    paragraph.children.push(Node::Element(Element::new("br")));
                }
                if !line.is_empty() {
                    paragraph.children.push(Node::text(line));
                }
            }
            Node::Element(paragraph)
        })
        .collect()
}

/// Build an empty table.
///
/// `caption` and `summary` are omitted when empty.
pub fn table(rows: usize, cols: usize, caption: &str, summary: &str) -> Result<Element, EditError> {
    if rows == 0 || cols == 0 {
        return Err(EditError::EmptyTable { rows, cols });
    }
    let mut table = Element::new("table");
    if !summary.is_empty() {
        table.set_attr("summary", summary);
    }
    if !caption.is_empty() {
        table
            .children
            .push(Node::Element(Element::new("caption").with_child(caption)));
    }
    let mut body = Element::new("tbody");
    for _ in 0..rows {
        let mut row = Element::new("tr");
        for _ in 0..cols {
            row.children.push(Node::Element(Element::new("td")));
        }
        body.children.push(Node::Element(row));
    }
    table.children.push(Node::Element(body));
    Ok(table)
}

fn selected_container(doc: &Document) -> Result<NodePath, EditError> {
    if !doc.has_selection() {
        return Err(EditError::NoSelection);
    }
    doc.selected_container().ok_or(EditError::NotInBlock)
}

fn selected_item(doc: &Document) -> Result<NodePath, EditError> {
    let container = selected_container(doc)?;
    doc.closest(&container, "li")
        .ok_or(EditError::NotInElement { tag: "li" })
}

fn is_spacer(element: &Element) -> bool {
    element
        .attr("class")
        .is_some_and(|class| class.split_whitespace().any(|c| c == SPACER_CLASS))
}

/// Refuse edits that would push the subtree at `path` down by `extra`
/// levels past [`MAX_DEPTH`].
fn ensure_depth(path: &NodePath, node: &Node, extra: usize) -> Result<(), EditError> {
    let deepest = (path.depth() + node.height() + extra).saturating_sub(1);
    if deepest > MAX_DEPTH {
        return Err(EditError::TooDeep { limit: MAX_DEPTH });
    }
    Ok(())
}

/// Move selection points under `from` to the same place under `to`.
///
/// If either point was elsewhere the selection collapses to the start of
/// `to`.
fn carry_selection(doc: &mut Document, previous: Option<Selection>, from: &NodePath, to: &NodePath) {
    let remap = |point: &Point| {
        let rest = point.path.indices().strip_prefix(from.indices())?;
        let mut indices = to.indices().to_vec();
        indices.extend_from_slice(rest);
        Some(Point::new(indices, point.offset))
    };
    let moved = previous
        .as_ref()
        .and_then(|sel| Some(Selection::new(remap(&sel.anchor)?, remap(&sel.focus)?)));
    doc.set_selection(Some(
        moved.unwrap_or_else(|| Selection::caret(Point::new(to.clone(), 0))),
    ));
}

/// Merge adjacent text nodes and drop empty ones.
fn merge_text(children: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for node in children.drain(..) {
        match (merged.last_mut(), node) {
            (_, Node::Text(text)) if text.is_empty() => {}
            (Some(Node::Text(prev)), Node::Text(text)) => prev.push_str(&text),
            (_, node) => merged.push(node),
        }
    }
    *children = merged;
}

fn caret(doc: &Document) -> Result<Point, EditError> {
    let selection = doc.selection().ok_or(EditError::NoSelection)?;
    if !selection.is_collapsed() {
        return Err(EditError::NotCollapsed);
    }
    Ok(selection.focus.clone())
}

fn parent_and_index(path: &NodePath) -> Result<(NodePath, usize), EditError> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(EditError::InvalidPath { path: path.clone() }),
    }
}

fn element_mut<'a>(doc: &'a mut Document, path: &NodePath) -> Result<&'a mut Element, EditError> {
    doc.node_mut(path)
        .and_then(Node::as_element_mut)
        .ok_or_else(|| EditError::InvalidPath { path: path.clone() })
}

/// Split `text` at two char offsets into (before, middle, after).
fn split_chars(text: &str, from: usize, to: usize) -> (String, String, String) {
    let from = from.min(to);
    let mut before = String::new();
    let mut middle = String::new();
    let mut after = String::new();
    for (i, c) in text.chars().enumerate() {
        if i < from {
            before.push(c);
        } else if i < to {
            middle.push(c);
        } else {
            after.push(c);
        }
    }
    (before, middle, after)
}

/// Replace child `index` of `parent` with `[before?, element, after?]`.
///
/// Returns the index the element ended up at.
fn replace_with_split(
    doc: &mut Document,
    parent: &NodePath,
    index: usize,
    before: String,
    element: Element,
    after: String,
) -> Result<usize, EditError> {
    let parent_element = element_mut(doc, parent)?;
    let mut replacement = Vec::with_capacity(3);
    let has_before = !before.is_empty();
    if has_before {
        replacement.push(Node::Text(before));
    }
    replacement.push(Node::Element(element));
    if !after.is_empty() {
        replacement.push(Node::Text(after));
    }
    parent_element.children.splice(index..=index, replacement);
    Ok(index + usize::from(has_before))
}
