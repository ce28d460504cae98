#![forbid(unsafe_code)]

//! Selection capture and drift-tolerant restore.
//!
//! A [`Selection`] is a pair of [`Point`]s (anchor and focus). A point names
//! a node by [`NodePath`] plus an offset: a char offset inside text nodes, a
//! child index inside elements.
//!
//! Restoring never fails. Each point is resolved against the current tree:
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Path resolves, offset in range | Exact point (offset snapped to a grapheme boundary) |
//! | Path resolves, offset too large | Offset clamped to the node length |
//! | Path stops resolving below the root | Caret collapsed at the start of the deepest resolvable ancestor |
//! | Nothing below the root resolves | Caret at document start |
//!
//! When either point degrades the whole selection collapses to the
//! degraded caret.

use unicode_segmentation::UnicodeSegmentation;

use crate::node::{Node, NodePath};

/// One end of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Node the offset is relative to.
    pub path: NodePath,
    /// Char offset in text nodes, child index in elements.
    pub offset: usize,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub fn new(path: impl Into<NodePath>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    /// The first position in the document.
    #[must_use]
    pub fn document_start() -> Self {
        Self::default()
    }
}

/// An anchor/focus pair. Anchor and focus are equal for a caret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    /// Where the selection started.
    pub anchor: Point,
    /// Where the selection ends (the caret side).
    pub focus: Point,
}

/// Captured selection state; `None` means there was no selection.
pub type SelectionSnapshot = Option<Selection>;

/// How faithfully a selection was restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The snapshot had no selection; the live selection was left untouched.
    Skipped,
    /// Both points resolved as recorded.
    Exact,
    /// Offsets were clamped or snapped but paths resolved.
    Clamped,
    /// A path no longer resolved; the selection collapsed to a fallback caret.
    Collapsed,
}

impl Selection {
    /// Create a range selection.
    #[must_use]
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection.
    #[must_use]
    pub fn caret(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    /// Whether anchor and focus coincide.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Anchor and focus ordered by their text position in `root`.
    ///
    /// Points that no longer resolve order as document start.
    #[must_use]
    pub fn ordered<'a>(&'a self, root: &Node) -> (&'a Point, &'a Point) {
        let anchor = text_position(root, &self.anchor).unwrap_or(0);
        let focus = text_position(root, &self.focus).unwrap_or(0);
        if focus < anchor {
            (&self.focus, &self.anchor)
        } else {
            (&self.anchor, &self.focus)
        }
    }

    /// The selected text, read in document order.
    #[must_use]
    pub fn to_text(&self, root: &Node) -> String {
        let start = text_position(root, &self.anchor).unwrap_or(0);
        let end = text_position(root, &self.focus).unwrap_or(0);
        let (start, end) = (start.min(end), start.max(end));
        root.text_content()
            .chars()
            .skip(start)
            .take(end - start)
            .collect()
    }
}

/// Resolve a point against `root`, applying the drift rules.
///
/// Returns the usable point and whether its path resolved.
#[must_use]
pub fn resolve_point(root: &Node, point: &Point) -> (Point, RestoreOutcome) {
    let indices = point.path.indices();
    let mut node = root;
    for (depth, &index) in indices.iter().enumerate() {
        match node.children().get(index) {
            Some(child) => node = child,
            None if depth == 0 => return (Point::document_start(), RestoreOutcome::Collapsed),
            None => {
                return (
                    Point::new(point.path.truncated(depth), 0),
                    RestoreOutcome::Collapsed,
                );
            }
        }
    }

    let offset = match node {
        Node::Text(text) => snap_to_grapheme(text, point.offset),
        Node::Element(element) => point.offset.min(element.children.len()),
    };
    let outcome = if offset == point.offset {
        RestoreOutcome::Exact
    } else {
        RestoreOutcome::Clamped
    };
    (Point::new(point.path.clone(), offset), outcome)
}

/// Resolve a full selection against `root`.
#[must_use]
pub fn resolve_selection(root: &Node, selection: &Selection) -> (Selection, RestoreOutcome) {
    let (anchor, anchor_outcome) = resolve_point(root, &selection.anchor);
    if anchor_outcome == RestoreOutcome::Collapsed {
        return (Selection::caret(anchor), RestoreOutcome::Collapsed);
    }
    let (focus, focus_outcome) = resolve_point(root, &selection.focus);
    if focus_outcome == RestoreOutcome::Collapsed {
        return (Selection::caret(focus), RestoreOutcome::Collapsed);
    }
    let outcome = if anchor_outcome == RestoreOutcome::Exact && focus_outcome == RestoreOutcome::Exact
    {
        RestoreOutcome::Exact
    } else {
        RestoreOutcome::Clamped
    };
    (Selection::new(anchor, focus), outcome)
}

/// Clamp a char offset into `text` and move it back onto a grapheme boundary.
#[must_use]
pub fn snap_to_grapheme(text: &str, char_offset: usize) -> usize {
    let mut chars_seen = 0;
    let mut boundary = 0;
    for grapheme in text.graphemes(true) {
        let len = grapheme.chars().count();
        if chars_seen + len > char_offset {
            break;
        }
        chars_seen += len;
        boundary = chars_seen;
    }
    boundary
}

/// Position of `point` in the document's concatenated text, in chars.
///
/// Returns `None` when the path does not resolve.
#[must_use]
pub fn text_position(root: &Node, point: &Point) -> Option<usize> {
    let mut before = 0;
    let mut node = root;
    for &index in point.path.indices() {
        let children = node.children();
        let child = children.get(index)?;
        before += children[..index].iter().map(Node::text_len).sum::<usize>();
        node = child;
    }
    let within = match node {
        Node::Text(text) => point.offset.min(text.chars().count()),
        Node::Element(element) => {
            let end = point.offset.min(element.children.len());
            element.children[..end].iter().map(Node::text_len).sum()
        }
    };
    Some(before + within)
}

/// The point `offset` chars into the text of the subtree at `path`.
///
/// Prefers a text node when the offset falls on a boundary. Offsets past the
/// end land after the last child. Returns `None` when the path does not
/// resolve.
#[must_use]
pub fn point_in_text(root: &Node, path: &NodePath, offset: usize) -> Option<Point> {
    let mut node = root.descendant(path.indices())?;
    let mut path = path.clone();
    let mut remaining = offset;
    loop {
        let element = match node {
            Node::Text(text) => {
                return Some(Point::new(path, remaining.min(text.chars().count())));
            }
            Node::Element(element) => element,
        };
        let mut next = None;
        for (index, child) in element.children.iter().enumerate() {
            let len = child.text_len();
            if remaining <= len && (len > 0 || matches!(child, Node::Text(_))) {
                next = Some(index);
                break;
            }
            remaining -= len;
        }
        let Some(index) = next else {
            return Some(Point::new(path, element.children.len()));
        };
        node = &element.children[index];
        path = path.child(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;
    use crate::node::{Element, ROOT_TAG};

    fn root(markup: &str) -> Node {
        let mut body = Element::new(ROOT_TAG);
        body.children = parse_fragment(markup).unwrap();
        Node::Element(body)
    }

    #[test]
    fn text_across_paragraphs() {
        let doc = root("<p>Foo</p><p>Bar</p>");
        let sel = Selection::new(Point::new([0, 0], 0), Point::new([1, 0], 3));
        assert_eq!(sel.to_text(&doc), "FooBar");
    }

    #[test]
    fn backwards_selection_reads_forward() {
        let doc = root("<p>Foo</p><p>Bar</p>");
        let sel = Selection::new(Point::new([1, 0], 2), Point::new([0, 0], 1));
        assert_eq!(sel.to_text(&doc), "ooBa");
        let (start, end) = sel.ordered(&doc);
        assert_eq!(start, &Point::new([0, 0], 1));
        assert_eq!(end, &Point::new([1, 0], 2));
    }

    #[test]
    fn element_offsets_count_children() {
        let doc = root("<p>Foo<em>bar</em>baz</p>");
        // Between <em> and the trailing text.
        assert_eq!(text_position(&doc, &Point::new([0], 2)), Some(6));
        assert_eq!(text_position(&doc, &Point::new([], 1)), Some(9));
        assert_eq!(text_position(&doc, &Point::new([3], 0)), None);
    }

    #[test]
    fn exact_resolution() {
        let doc = root("<p>Foo</p>");
        let (point, outcome) = resolve_point(&doc, &Point::new([0, 0], 2));
        assert_eq!(point, Point::new([0, 0], 2));
        assert_eq!(outcome, RestoreOutcome::Exact);
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let doc = root("<p>Foo</p>");
        let (point, outcome) = resolve_point(&doc, &Point::new([0, 0], 10));
        assert_eq!(point, Point::new([0, 0], 3));
        assert_eq!(outcome, RestoreOutcome::Clamped);

        let (point, _) = resolve_point(&doc, &Point::new([0], 7));
        assert_eq!(point, Point::new([0], 1));
    }

    #[test]
    fn stale_path_collapses_to_ancestor() {
        let doc = root("<p>Foo</p>");
        let (point, outcome) = resolve_point(&doc, &Point::new([0, 3, 1], 2));
        assert_eq!(point, Point::new([0], 0));
        assert_eq!(outcome, RestoreOutcome::Collapsed);
    }

    #[test]
    fn nothing_resolves_goes_to_document_start() {
        let doc = root("<p>Foo</p>");
        let (point, outcome) = resolve_point(&doc, &Point::new([5, 0], 1));
        assert_eq!(point, Point::document_start());
        assert_eq!(outcome, RestoreOutcome::Collapsed);
    }

    #[test]
    fn degraded_focus_collapses_whole_selection() {
        let doc = root("<p>Foo</p>");
        let sel = Selection::new(Point::new([0, 0], 1), Point::new([0, 1], 0));
        let (resolved, outcome) = resolve_selection(&doc, &sel);
        assert_eq!(outcome, RestoreOutcome::Collapsed);
        assert!(resolved.is_collapsed());
        assert_eq!(resolved.focus, Point::new([0], 0));
    }

    #[test]
    fn grapheme_snapping() {
        // "e" + combining acute is one grapheme of two chars.
        let text = "ae\u{301}b";
        assert_eq!(snap_to_grapheme(text, 0), 0);
        assert_eq!(snap_to_grapheme(text, 1), 1);
        assert_eq!(snap_to_grapheme(text, 2), 1);
        assert_eq!(snap_to_grapheme(text, 3), 3);
        assert_eq!(snap_to_grapheme(text, 4), 4);
        assert_eq!(snap_to_grapheme(text, 99), 4);
    }

    #[test]
    fn text_offsets_map_back_to_points() {
        let doc = root("<p>Foo<br />bar<em>baz</em></p>");
        let p = NodePath::from([0]);
        assert_eq!(point_in_text(&doc, &p, 0), Some(Point::new([0, 0], 0)));
        assert_eq!(point_in_text(&doc, &p, 3), Some(Point::new([0, 0], 3)));
        assert_eq!(point_in_text(&doc, &p, 4), Some(Point::new([0, 2], 1)));
        assert_eq!(point_in_text(&doc, &p, 8), Some(Point::new([0, 3, 0], 2)));
        assert_eq!(point_in_text(&doc, &p, 20), Some(Point::new([0], 4)));
        assert_eq!(point_in_text(&doc, &NodePath::from([3]), 0), None);

        let point = point_in_text(&doc, &p, 5).unwrap();
        assert_eq!(text_position(&doc, &point), Some(5));
    }

    #[test]
    fn caret_is_collapsed() {
        let caret = Selection::caret(Point::new([0], 0));
        assert!(caret.is_collapsed());
        assert!(!Selection::new(Point::new([0], 0), Point::new([0], 1)).is_collapsed());
    }
}
