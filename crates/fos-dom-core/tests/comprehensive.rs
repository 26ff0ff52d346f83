//! Comprehensive tests for fos-dom-core
//!
//! Whole-tree scenarios across documents: building, editing, comparing,
//! importing and adopting.

use fos_dom_core::namespace::XMLNS_NAMESPACE;
use fos_dom_core::{ContentType, DocumentPosition, DomConfig, DomError, DomTree, NodeId, NodeType};

fn build(tree: &mut DomTree, doc: NodeId, parent: NodeId, names: &[&str]) -> Vec<NodeId> {
    names
        .iter()
        .map(|name| {
            let el = tree.create_element(doc, name).unwrap();
            tree.append_child(parent, el).unwrap();
            el
        })
        .collect()
}

fn document_with_root(tree: &mut DomTree) -> (NodeId, NodeId) {
    let doc = tree.create_document().unwrap();
    let root = tree.create_element(doc, "root").unwrap();
    tree.append_child(doc, root).unwrap();
    (doc, root)
}

// ============================================================================
// STRUCTURE
// ============================================================================

#[test]
fn test_remove_middle_child_relinks_siblings() {
    let mut tree = DomTree::new();
    let (doc, root) = document_with_root(&mut tree);
    let kids = build(&mut tree, doc, root, &["a", "b", "c"]);

    tree.remove_child(root, kids[1]).unwrap();

    assert_eq!(tree.next_sibling(kids[0]), Some(kids[2]));
    assert_eq!(tree.previous_sibling(kids[2]), Some(kids[0]));
    assert_eq!(tree.parent_node(kids[1]), None);
    assert_eq!(tree.owner_document(kids[1]), Some(doc));
}

#[test]
fn test_child_nodes_tracks_mutations() {
    let mut tree = DomTree::new();
    let (doc, root) = document_with_root(&mut tree);
    let list = tree.child_nodes(root);
    assert!(list.is_empty(&tree));

    let kids = build(&mut tree, doc, root, &["a", "b"]);
    assert_eq!(list.len(&tree), 2);
    assert_eq!(list.to_vec(&tree), kids);

    tree.remove_child(root, kids[0]).unwrap();
    assert_eq!(list.item(&tree, 0), Some(kids[1]));
    assert_eq!(list.iter(&tree).count(), 1);
}

#[test]
fn test_document_element_is_not_cached() {
    let mut tree = DomTree::new();
    let (doc, root) = document_with_root(&mut tree);
    assert_eq!(tree.document_element(doc), Some(root));

    let replacement = tree.create_element(doc, "other").unwrap();
    tree.replace_child(doc, replacement, root).unwrap();
    assert_eq!(tree.document_element(doc), Some(replacement));
    assert!(!tree.is_connected(root));
    assert!(tree.is_connected(replacement));
}

#[test]
fn test_fragment_assembly() {
    let mut tree = DomTree::new();
    let (doc, root) = document_with_root(&mut tree);
    let frag = tree.create_document_fragment(doc).unwrap();
    let items = build(&mut tree, doc, frag, &["one", "two", "three"]);

    assert_eq!(tree.append_child(root, frag), Ok(frag));
    assert_eq!(tree.children(root).collect::<Vec<_>>(), items);
    assert!(!tree.has_child_nodes(frag));
    for item in items {
        assert_eq!(tree.parent_node(item), Some(root));
    }
}

// ============================================================================
// NORMALIZE AND TEXT CONTENT
// ============================================================================

#[test]
fn test_normalize_comment_breaks_runs() {
    let mut tree = DomTree::new();
    let (doc, root) = document_with_root(&mut tree);
    let master = tree.create_text_node(doc, "master").unwrap();
    let of = tree.create_text_node(doc, "of").unwrap();
    let comment = tree.create_comment(doc, "x").unwrap();
    let puppets = tree.create_text_node(doc, "puppets").unwrap();
    tree.append(root, &[master, of, comment, puppets]).unwrap();

    tree.normalize(root).unwrap();

    let children: Vec<_> = tree.children(root).collect();
    assert_eq!(children, vec![master, comment, puppets]);
    assert_eq!(tree.data(master), Some("masterof"));
    assert_eq!(tree.data(puppets), Some("puppets"));
    assert!(!tree.is_alive(of));
}

#[test]
fn test_text_content_round_trip() {
    let mut tree = DomTree::new();
    let (doc, root) = document_with_root(&mut tree);
    let inner = build(&mut tree, doc, root, &["p"])[0];
    let text = tree.create_text_node(doc, "Hello, ").unwrap();
    let bold = tree.create_element(doc, "b").unwrap();
    let bold_text = tree.create_text_node(doc, "World").unwrap();
    tree.append(inner, &[text, bold]).unwrap();
    tree.append_child(bold, bold_text).unwrap();

    assert_eq!(tree.text_content(doc), None);
    assert_eq!(tree.text_content(root).as_deref(), Some("Hello, World"));

    tree.set_text_content(inner, "replaced").unwrap();
    assert_eq!(tree.text_content(root).as_deref(), Some("replaced"));
    assert!(!tree.is_alive(bold_text));
}

// ============================================================================
// EQUALITY
// ============================================================================

#[test]
fn test_equal_elements_with_reordered_attributes() {
    let mut tree = DomTree::new();
    let doc = tree.create_document().unwrap();
    let make = |tree: &mut DomTree, attrs: [(&str, &str); 2], text: &str| {
        let el = tree.create_element(doc, "item").unwrap();
        for (name, value) in attrs {
            tree.set_attribute(el, name, value).unwrap();
        }
        let t = tree.create_text_node(doc, text).unwrap();
        tree.append_child(el, t).unwrap();
        el
    };
    let a = make(&mut tree, [("id", "1"), ("class", "x")], "same");
    let b = make(&mut tree, [("class", "x"), ("id", "1")], "same");

    assert!(tree.is_equal_node(a, Some(b)));
    assert!(tree.is_equal_node(b, Some(a)));

    let b_text = tree.first_child(b).unwrap();
    tree.set_data(b_text, "different").unwrap();
    assert!(!tree.is_equal_node(a, Some(b)));
}

// ============================================================================
// IMPORT AND ADOPT
// ============================================================================

#[test]
fn test_import_across_documents() {
    let mut tree = DomTree::new();
    let (d1, root1) = document_with_root(&mut tree);
    let d2 = tree.create_document().unwrap();
    let section = build(&mut tree, d1, root1, &["section"])[0];
    let nested = build(&mut tree, d1, section, &["p", "p"]);
    tree.set_attribute(section, "id", "main").unwrap();
    tree.set_attribute(nested[1], "class", "last").unwrap();

    let clone = tree.import_node(d2, section, true).unwrap();

    assert_eq!(tree.parent_node(clone), None);
    let mut subtree = vec![clone];
    subtree.extend(tree.descendants(clone));
    assert_eq!(subtree.len(), 3);
    for node in subtree {
        assert_eq!(tree.owner_document(node), Some(d2));
        for &attr in tree.attributes(node) {
            assert_eq!(tree.owner_document(attr), Some(d2));
        }
    }

    // Original untouched
    assert_eq!(tree.parent_node(section), Some(root1));
    assert_eq!(tree.owner_document(section), Some(d1));
    assert_eq!(tree.get_attribute(section, "id").as_deref(), Some("main"));
    assert!(tree.is_equal_node(section, Some(clone)));
}

#[test]
fn test_adopt_attached_node() {
    let mut tree = DomTree::new();
    let (d1, root1) = document_with_root(&mut tree);
    let (d2, root2) = document_with_root(&mut tree);
    let moving = build(&mut tree, d1, root1, &["moving"])[0];
    build(&mut tree, d1, moving, &["inner"]);

    assert_eq!(tree.adopt_node(d2, moving), Ok(moving));
    assert_eq!(tree.parent_node(moving), None);
    assert_eq!(tree.owner_document(moving), Some(d2));
    assert!(tree.descendants(moving).all(|d| tree.owner_document(d) == Some(d2)));

    tree.append_child(root2, moving).unwrap();
    assert_eq!(tree.root_node(moving), d2);
}

#[test]
fn test_moving_between_documents_adopts() {
    let mut tree = DomTree::new();
    let (d1, root1) = document_with_root(&mut tree);
    let (d2, root2) = document_with_root(&mut tree);
    let el = build(&mut tree, d1, root1, &["el"])[0];
    tree.set_attribute(el, "a", "1").unwrap();

    tree.append_child(root2, el).unwrap();
    assert!(!tree.has_child_nodes(root1));
    assert_eq!(tree.owner_document(el), Some(d2));
    let attr = tree.get_attribute_node(el, "a").unwrap();
    assert_eq!(tree.owner_document(attr), Some(d2));
}

// ============================================================================
// NAMES AND DOCUMENTS
// ============================================================================

#[test]
fn test_invalid_element_name() {
    let mut tree = DomTree::new();
    let doc = tree.create_document().unwrap();
    let err = tree.create_element(doc, "in valid").unwrap_err();
    assert!(matches!(err, DomError::InvalidCharacter(_)));
    assert_eq!(err.name(), "InvalidCharacterError");
}

#[test]
fn test_namespace_inheritance() {
    let mut tree = DomTree::new();
    let doc = tree.create_document().unwrap();
    let root = tree.create_element_ns(doc, Some("urn:books"), "b:library").unwrap();
    tree.append_child(doc, root).unwrap();
    tree.set_attribute_ns(root, Some(XMLNS_NAMESPACE), "xmlns:b", "urn:books").unwrap();
    tree.set_attribute_ns(root, Some(XMLNS_NAMESPACE), "xmlns", "urn:default").unwrap();
    let shelf = tree.create_element_ns(doc, Some("urn:default"), "shelf").unwrap();
    tree.append_child(root, shelf).unwrap();
    let note = tree.create_comment(doc, "note").unwrap();
    tree.append_child(shelf, note).unwrap();

    assert_eq!(tree.lookup_namespace_uri(note, Some("b")).as_deref(), Some("urn:books"));
    assert_eq!(tree.lookup_prefix(shelf, Some("urn:books")).as_deref(), Some("b"));
    assert!(tree.is_default_namespace(shelf, Some("urn:default")));
    assert_eq!(tree.lookup_namespace_uri(doc, None).as_deref(), Some("urn:default"));
}

#[test]
fn test_configured_documents() {
    let mut tree = DomTree::with_config(DomConfig {
        default_url: "http://example.com/index.html".to_string(),
        content_type: ContentType::Html,
    });
    let doc = tree.create_document().unwrap();
    let div = tree.create_element(doc, "DIV").unwrap();

    assert_eq!(tree.url(doc), Some("http://example.com/index.html"));
    assert_eq!(tree.base_uri(div).as_deref(), Some("http://example.com/index.html"));
    assert_eq!(tree.node_name(div).as_deref(), Some("DIV"));
    assert_eq!(tree.local_name(div).as_deref(), Some("div"));
    assert!(tree.is_html_document(div));
}

#[test]
fn test_html_document_skeleton() {
    let mut tree = DomTree::new();
    let blank = tree.create_document().unwrap();
    let doc = tree
        .implementation(blank)
        .unwrap()
        .create_html_document(&mut tree, Some("Title"))
        .unwrap();

    let html = tree.document_element(doc).unwrap();
    let names: Vec<_> = tree.element_children(html).filter_map(|c| tree.local_name(c)).collect();
    assert_eq!(names, ["head", "body"]);
    assert_eq!(tree.node_type(tree.doctype(doc).unwrap()), Some(NodeType::DocumentType));
}

// ============================================================================
// DOCUMENT ORDER
// ============================================================================

#[test]
fn test_document_order_in_one_tree() {
    let mut tree = DomTree::new();
    let (doc, root) = document_with_root(&mut tree);
    let kids = build(&mut tree, doc, root, &["a", "b"]);
    let deep = build(&mut tree, doc, kids[0], &["deep"])[0];

    assert_eq!(
        tree.compare_document_position(kids[1], deep),
        DocumentPosition::PRECEDING
    );
    assert_eq!(
        tree.compare_document_position(deep, kids[1]),
        DocumentPosition::FOLLOWING
    );
    assert_eq!(
        tree.compare_document_position(deep, doc),
        DocumentPosition::CONTAINS | DocumentPosition::PRECEDING
    );
    assert_eq!(
        tree.compare_document_position(doc, deep),
        DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING
    );
}

#[test]
fn test_unsupported_surface_fails_fast() {
    let mut tree = DomTree::new();
    let doc = tree.create_document().unwrap();
    for result in [
        tree.create_event("MouseEvent").map(|_| ()),
        tree.create_range(doc).map(|_| ()),
        tree.create_node_iterator(doc, 0).map(|_| ()),
        tree.create_tree_walker(doc, 0).map(|_| ()),
        tree.query_selector(doc, "p").map(|_| ()),
        tree.query_selector_all(doc, "p").map(|_| ()),
    ] {
        assert_eq!(result.unwrap_err().name(), "NotSupportedError");
    }
}
