#![forbid(unsafe_code)]

//! Property tests for markup and selection restore.
//!
//! Validates:
//! - Serialized markup is canonical: parse then serialize is a fixed point.
//! - Resolving any point yields a point that resolves exactly.
//! - Restoring an arbitrary selection never fails and never leaves a
//!   dangling selection.

use proptest::prelude::*;

use folio_doc::markup::{parse_fragment, serialize_fragment};
use folio_doc::selection::{resolve_point, text_position};
use folio_doc::{Document, EditableSurface, Element, Node, Point, RestoreOutcome, Selection};

// ============================================================================
// Strategy helpers
// ============================================================================

fn text_strategy() -> impl Strategy<Value = Node> {
    "[a-zA-Z &<>\"é]{1,6}".prop_map(Node::text)
}

fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        4 => text_strategy(),
        1 => Just(Node::Element(Element::new("br"))),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop_oneof![Just("p"), Just("strong"), Just("em"), Just("a")],
            prop::option::of("[a-z:/.\"&]{0,8}"),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, href, children)| {
                let mut element = Element::new(tag);
                if let Some(href) = href {
                    element.set_attr("href", href);
                }
                element.children = children;
                Node::Element(element)
            })
    })
}

fn markup_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(node_strategy(), 0..5).prop_map(|nodes| serialize_fragment(&nodes))
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (prop::collection::vec(0usize..5, 0..5), 0usize..10)
        .prop_map(|(path, offset)| Point::new(path, offset))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn serialization_is_a_fixed_point(markup in markup_strategy()) {
        let nodes = parse_fragment(&markup).unwrap();
        prop_assert_eq!(serialize_fragment(&nodes), markup);
    }

    #[test]
    fn resolved_points_resolve_exactly(markup in markup_strategy(), point in point_strategy()) {
        let doc = Document::from_markup(&markup).unwrap();
        let (resolved, _) = resolve_point(doc.root(), &point);
        prop_assert!(doc.node(&resolved.path).is_some());
        let (again, outcome) = resolve_point(doc.root(), &resolved);
        prop_assert_eq!(outcome, RestoreOutcome::Exact);
        prop_assert_eq!(again, resolved);
    }

    #[test]
    fn restore_never_dangles(
        markup in markup_strategy(),
        anchor in point_strategy(),
        focus in point_strategy(),
    ) {
        let mut doc = Document::from_markup(&markup).unwrap();
        let outcome = doc.restore_selection(&Some(Selection::new(anchor, focus)));
        prop_assert_ne!(outcome, RestoreOutcome::Skipped);

        let selection = doc.selection().cloned().unwrap();
        prop_assert!(text_position(doc.root(), &selection.anchor).is_some());
        prop_assert!(text_position(doc.root(), &selection.focus).is_some());
        prop_assert!(doc.selection_text().chars().count() <= doc.text_content().chars().count());
        if outcome == RestoreOutcome::Collapsed {
            prop_assert!(selection.is_collapsed());
        }
    }

    #[test]
    fn restoring_nothing_keeps_live_selection(markup in markup_strategy()) {
        let mut doc = Document::from_markup(&markup).unwrap();
        doc.set_caret_in(folio_doc::NodePath::root());
        let before = doc.selection().cloned();
        prop_assert_eq!(doc.restore_selection(&None), RestoreOutcome::Skipped);
        prop_assert_eq!(doc.selection().cloned(), before);
    }
}
