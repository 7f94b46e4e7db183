//! Tests for DOM tree mutation methods: append_child, remove_child,
//! insert_before, move_children and their error paths.

use quill_dom::{
    AttributesMap, DomError, DomTree, ElementData, Namespace, NodeId, NodeType, QuirksMode,
};

/// Helper to create an HTML element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::html(
        tag,
        AttributesMap::new(),
    )))
}

/// A `div` under the document with children `a`, `b`, `c`.
fn three_children(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent).unwrap();
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    for id in [a, b, c] {
        tree.append_child(parent, id).unwrap();
    }
    (parent, a, b, c)
}

// ========== append_child ==========

#[test]
fn test_append_child_links_siblings() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(c));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.parent(b), Some(parent));
}

#[test]
fn test_append_child_moves_from_previous_parent() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let other = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, other).unwrap();

    tree.append_child(other, b).unwrap();

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.children(other), &[b]);
    assert_eq!(tree.parent(b), Some(other));
    assert_eq!(tree.prev_sibling(b), None);
}

#[test]
fn test_append_child_rejects_cycle() {
    let mut tree = DomTree::new();
    let (parent, a, _, _) = three_children(&mut tree);

    let err = tree.append_child(a, parent).unwrap_err();
    assert_eq!(err, DomError::HierarchyRequest { parent: a, child: parent });
    assert!(matches!(
        tree.append_child(a, a),
        Err(DomError::HierarchyRequest { .. })
    ));
    // Tree is unchanged.
    assert_eq!(tree.parent(parent), Some(NodeId::ROOT));
}

#[test]
fn test_unknown_node_is_reported() {
    let mut tree = DomTree::new();
    let err = tree.append_child(NodeId::ROOT, NodeId(42)).unwrap_err();
    assert_eq!(err, DomError::NodeNotFound(NodeId(42)));
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent).unwrap();

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child).unwrap();
    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child).unwrap();

    assert_eq!(tree.children(parent).len(), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_first_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, a).unwrap();

    // b is now first child, c is second
    assert_eq!(tree.children(parent), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.remove_child(parent, b).unwrap();

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_not_a_child_is_an_error() {
    let mut tree = DomTree::new();
    let (parent, a, _, _) = three_children(&mut tree);
    let stray = alloc_element(&mut tree, "span");

    let err = tree.remove_child(parent, stray).unwrap_err();
    assert_eq!(err, DomError::NotAChild { parent, child: stray });
    assert_eq!(tree.first_child(parent), Some(a));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    tree.insert_before(parent, x, a).unwrap();

    assert_eq!(tree.children(parent), &[x, a, b, c]);
    assert_eq!(tree.prev_sibling(x), None);
    assert_eq!(tree.next_sibling(x), Some(a));
    assert_eq!(tree.prev_sibling(a), Some(x));
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    let x = alloc_element(&mut tree, "x");

    tree.insert_before(parent, x, c).unwrap();

    assert_eq!(tree.children(parent), &[a, b, x, c]);
    assert_eq!(tree.next_sibling(b), Some(x));
    assert_eq!(tree.prev_sibling(c), Some(x));
}

#[test]
fn test_insert_before_reorders_existing_child() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);

    tree.insert_before(parent, c, a).unwrap();

    assert_eq!(tree.children(parent), &[c, a, b]);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.prev_sibling(a), Some(c));
}

#[test]
fn test_insert_before_detached_reference_is_api_misuse() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = three_children(&mut tree);
    tree.remove_child(parent, b).unwrap();
    let x = alloc_element(&mut tree, "x");

    let err = tree.insert_before(parent, x, b).unwrap_err();

    assert_eq!(err, DomError::NotAChild { parent, child: b });
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.parent(x), None);
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_in_order() {
    let mut tree = DomTree::new();
    let (from, a, b, c) = three_children(&mut tree);
    let to = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, to).unwrap();
    let existing = alloc_element(&mut tree, "em");
    tree.append_child(to, existing).unwrap();

    tree.move_children(from, to).unwrap();

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, a, b, c]);
    assert_eq!(tree.prev_sibling(a), Some(existing));
    assert_eq!(tree.next_sibling(existing), Some(a));
    assert_eq!(tree.parent(c), Some(to));
}

#[test]
fn test_move_children_into_descendant_is_rejected() {
    let mut tree = DomTree::new();
    let (from, a, _, _) = three_children(&mut tree);

    assert!(matches!(
        tree.move_children(from, a),
        Err(DomError::HierarchyRequest { .. })
    ));
}

// ========== accessors ==========

#[test]
fn test_document_element_body_and_text_content() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html).unwrap();
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head).unwrap();
    tree.append_child(html, body).unwrap();
    let hello = tree.alloc(NodeType::Text("Hello, ".to_string()));
    let b = alloc_element(&mut tree, "b");
    let world = tree.alloc(NodeType::Text("world".to_string()));
    let comment = tree.alloc(NodeType::Comment("ignored".to_string()));
    tree.append_child(body, hello).unwrap();
    tree.append_child(body, b).unwrap();
    tree.append_child(b, world).unwrap();
    tree.append_child(body, comment).unwrap();

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.text_content(body), "Hello, world");
    assert!(tree.is_descendant_of(world, html));
    assert!(!tree.is_descendant_of(html, world));
}

#[test]
fn test_element_namespace_and_quirks_flag() {
    let mut tree = DomTree::new();
    let svg = tree.alloc(NodeType::Element(ElementData {
        tag_name: "svg".to_string(),
        namespace: Namespace::Svg,
        attrs: AttributesMap::new(),
    }));
    let element = tree.as_element(svg).unwrap();
    assert!(element.is(Namespace::Svg, "svg"));
    assert!(!element.is_html("svg"));
    assert_eq!(Namespace::Svg.url(), "http://www.w3.org/2000/svg");

    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
    tree.set_quirks_mode(QuirksMode::Quirks);
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
}

#[test]
fn test_enum_display_names() {
    assert_eq!(Namespace::Svg.to_string(), "svg");
    assert_eq!(Namespace::MathMl.to_string(), "math");
    assert_eq!(QuirksMode::NoQuirks.to_string(), "no-quirks");
    assert_eq!(QuirksMode::LimitedQuirks.to_string(), "limited-quirks");
}
