//! Namespace Resolution
//!
//! Prefix and namespace lookups that walk from a node up through its
//! element ancestors, reading each element's own name and its `xmlns` /
//! `xmlns:*` declaration attributes.

use crate::node::{Node, NodeData, QualName};
use crate::tree::DomTree;
use crate::NodeId;

/// Well-known namespace URIs
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Prefix declared by an `xmlns` / `xmlns:p` attribute name
///
/// `Some(None)` for a default declaration, `Some(Some(p))` for a prefixed
/// one, `None` for any other attribute. Matches on the qualified name, so
/// declarations made with plain `set_attribute` count too.
fn declared_prefix(name: &QualName) -> Option<Option<&str>> {
    match (name.prefix.as_deref(), name.local.as_str()) {
        (None, "xmlns") => Some(None),
        (Some("xmlns"), local) => Some(Some(local)),
        (None, local) => local.strip_prefix("xmlns:").map(Some),
        _ => None,
    }
}

/// Where a lookup continues for a node that is not an element
enum Delegate {
    To(NodeId),
    Nowhere,
}

impl DomTree {
    /// Namespace bound to `prefix` (`None` or `""` for the default namespace)
    pub fn lookup_namespace_uri(&self, id: NodeId, prefix: Option<&str>) -> Option<String> {
        let prefix = prefix.filter(|p| !p.is_empty());
        let mut current = id;
        loop {
            let node = self.get(current)?;
            let NodeData::Element(element) = &node.data else {
                match self.delegate(current, node) {
                    Delegate::To(next) => {
                        current = next;
                        continue;
                    }
                    Delegate::Nowhere => return None,
                }
            };

            match prefix {
                Some("xml") => return Some(XML_NAMESPACE.to_string()),
                Some("xmlns") => return Some(XMLNS_NAMESPACE.to_string()),
                _ => {}
            }

            if element.name.namespace.is_some() && element.name.prefix.as_deref() == prefix {
                return element.name.namespace.clone();
            }

            for attr in element.attrs.iter().filter_map(|&a| self.get(a)?.as_attr()) {
                let declares = match (prefix, declared_prefix(&attr.name)) {
                    (Some(p), Some(Some(declared))) => declared == p,
                    (None, Some(None)) => true,
                    _ => false,
                };
                if declares {
                    return (!attr.value.is_empty()).then(|| attr.value.clone());
                }
            }

            current = self.parent_element(current)?;
        }
    }

    /// True if `namespace` is the default namespace in scope at `id`
    pub fn is_default_namespace(&self, id: NodeId, namespace: Option<&str>) -> bool {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.lookup_namespace_uri(id, None).as_deref() == namespace
    }

    /// Prefix bound to `namespace` in scope at `id`
    pub fn lookup_prefix(&self, id: NodeId, namespace: Option<&str>) -> Option<String> {
        let namespace = namespace.filter(|ns| !ns.is_empty())?;
        let mut current = id;
        loop {
            let node = self.get(current)?;
            let NodeData::Element(element) = &node.data else {
                match self.delegate(current, node) {
                    Delegate::To(next) => {
                        current = next;
                        continue;
                    }
                    Delegate::Nowhere => return None,
                }
            };

            if element.name.namespace.as_deref() == Some(namespace) {
                if let Some(prefix) = &element.name.prefix {
                    return Some(prefix.clone());
                }
            }

            for attr in element.attrs.iter().filter_map(|&a| self.get(a)?.as_attr()) {
                if let Some(Some(declared)) = declared_prefix(&attr.name) {
                    if attr.value == namespace {
                        return Some(declared.to_string());
                    }
                }
            }

            current = self.parent_element(current)?;
        }
    }

    /// Next node to ask on behalf of a non-element
    fn delegate(&self, id: NodeId, node: &Node) -> Delegate {
        let next = match &node.data {
            NodeData::Element(_) => Some(id),
            NodeData::Document(_) => self.document_element(id),
            NodeData::DocumentType(_) | NodeData::DocumentFragment => None,
            NodeData::Attr(attr) => attr.owner_element,
            _ => self.parent_element(id),
        };
        match next {
            Some(next) if next != id => Delegate::To(next),
            _ => Delegate::Nowhere,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped_tree() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();
        let root = tree.create_element_ns(doc, Some("urn:root"), "r:root").unwrap();
        tree.append_child(doc, root).unwrap();
        tree.set_attribute_ns(root, Some(XMLNS_NAMESPACE), "xmlns:x", "urn:x").unwrap();
        tree.set_attribute_ns(root, Some(XMLNS_NAMESPACE), "xmlns", "urn:default").unwrap();
        let child = tree.create_element(doc, "child").unwrap();
        tree.append_child(root, child).unwrap();
        let text = tree.create_text_node(doc, "leaf").unwrap();
        tree.append_child(child, text).unwrap();
        (tree, doc, root, text)
    }

    #[test]
    fn test_lookup_from_own_name() {
        let (tree, _, root, _) = scoped_tree();
        assert_eq!(tree.lookup_namespace_uri(root, Some("r")).as_deref(), Some("urn:root"));
        assert_eq!(tree.lookup_prefix(root, Some("urn:root")).as_deref(), Some("r"));
    }

    #[test]
    fn test_lookup_through_ancestors() {
        let (tree, doc, _, text) = scoped_tree();
        assert_eq!(tree.lookup_namespace_uri(text, Some("x")).as_deref(), Some("urn:x"));
        assert_eq!(tree.lookup_namespace_uri(text, None).as_deref(), Some("urn:default"));
        assert_eq!(tree.lookup_prefix(text, Some("urn:x")).as_deref(), Some("x"));
        assert_eq!(tree.lookup_namespace_uri(doc, Some("x")).as_deref(), Some("urn:x"));
        assert_eq!(tree.lookup_namespace_uri(text, Some("missing")), None);
        assert_eq!(tree.lookup_prefix(text, Some("urn:missing")), None);
    }

    #[test]
    fn test_default_namespace() {
        let (tree, _, _, text) = scoped_tree();
        assert!(tree.is_default_namespace(text, Some("urn:default")));
        assert!(!tree.is_default_namespace(text, Some("urn:x")));
        assert!(!tree.is_default_namespace(text, None));
    }

    #[test]
    fn test_lookup_prefix_null_namespace() {
        let (tree, _, root, _) = scoped_tree();
        assert_eq!(tree.lookup_prefix(root, None), None);
        assert_eq!(tree.lookup_prefix(root, Some("")), None);
    }

    #[test]
    fn test_plain_declaration_attributes() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();
        let el = tree.create_element(doc, "el").unwrap();
        tree.set_attribute(el, "xmlns:p", "urn:p").unwrap();

        assert_eq!(tree.lookup_namespace_uri(el, Some("p")).as_deref(), Some("urn:p"));
        assert_eq!(tree.lookup_prefix(el, Some("urn:p")).as_deref(), Some("p"));
        tree.set_attribute_ns(el, Some(XMLNS_NAMESPACE), "xmlns:q", "urn:q").unwrap();
        assert_eq!(tree.lookup_namespace_uri(el, Some("q")).as_deref(), Some("urn:q"));
    }

    #[test]
    fn test_builtin_prefixes_and_detached_nodes() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();
        let el = tree.create_element(doc, "el").unwrap();
        let frag = tree.create_document_fragment(doc).unwrap();

        assert_eq!(tree.lookup_namespace_uri(el, Some("xml")).as_deref(), Some(XML_NAMESPACE));
        assert_eq!(tree.lookup_namespace_uri(doc, None), None);
        assert_eq!(tree.lookup_namespace_uri(frag, Some("xml")), None);
    }
}
