//! DOM Tree (arena-based allocation)
//!
//! Navigation and read-only queries over the node arena. Queries on a
//! released handle answer `None` (or the empty value); they never panic.

use crate::arena::GenArena;
use crate::config::DomConfig;
use crate::error::{DomError, DomResult};
use crate::node::{Node, NodeData, NodeType};
use crate::NodeId;

/// Arena holding every node of every document
#[derive(Debug, Default)]
pub struct DomTree {
    nodes: GenArena<Node>,
    config: DomConfig,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self::with_config(DomConfig::default())
    }

    /// Create an empty tree with custom configuration
    pub fn with_config(config: DomConfig) -> Self {
        Self {
            nodes: GenArena::with_capacity(64),
            config,
        }
    }

    pub fn config(&self) -> &DomConfig {
        &self.config
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Get a node, failing for released handles
    pub(crate) fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(id).ok_or(DomError::StaleNode(id))
    }

    /// True while `id` refers to a live node
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Number of live nodes across all documents
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn alloc(&mut self, owner_document: NodeId, data: NodeData) -> DomResult<NodeId> {
        self.nodes
            .insert_with(|_| Node::new(owner_document, data))
            .ok_or(DomError::CapacityExceeded)
    }

    /// Allocate a node whose owner document is itself
    pub(crate) fn alloc_document(&mut self, data: NodeData) -> DomResult<NodeId> {
        self.nodes
            .insert_with(|id| Node::new(id, data))
            .ok_or(DomError::CapacityExceeded)
    }

    pub(crate) fn node_data(&self, id: NodeId) -> Option<&NodeData> {
        self.get(id).map(|node| &node.data)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Parent, if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent_node(id).filter(|&p| self.is_element(p))
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling
    }

    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        self.first_child(id).is_some()
    }

    /// Live view of the children of `id`
    pub fn child_nodes(&self, id: NodeId) -> ChildNodes {
        ChildNodes { parent: id }
    }

    /// Iterate over children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            front: self.first_child(id),
            back: self.last_child(id),
        }
    }

    /// Iterate over ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent_node(id),
        }
    }

    /// Iterate over descendants in document order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Next node in document order that stays inside `root`
    pub(crate) fn following_within(&self, node: NodeId, root: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        loop {
            if current == root {
                return None;
            }
            if let Some(sibling) = self.next_sibling(current) {
                return Some(sibling);
            }
            current = self.parent_node(current)?;
        }
    }

    /// Position of `id` among its siblings
    pub fn index_of(&self, id: NodeId) -> usize {
        let mut index = 0;
        let mut current = self.previous_sibling(id);
        while let Some(prev) = current {
            index += 1;
            current = self.previous_sibling(prev);
        }
        index
    }

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    /// Topmost ancestor (the node itself when detached)
    pub fn root_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent_node(current) {
            current = parent;
        }
        current
    }

    /// True if the root of `id` is a Document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.node_type(self.root_node(id)) == Some(NodeType::Document)
    }

    /// True if `other` is `id` or one of its descendants
    pub fn contains(&self, id: NodeId, other: Option<NodeId>) -> bool {
        let Some(other) = other else {
            return false;
        };
        if !self.is_alive(id) || !self.is_alive(other) {
            return false;
        }
        other == id || self.ancestors(other).any(|a| a == id)
    }

    /// Identity comparison
    pub fn is_same_node(&self, id: NodeId, other: Option<NodeId>) -> bool {
        other == Some(id)
    }

    pub(crate) fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node_data(id), Some(NodeData::Element(_)))
    }

    /// Owner document; `None` for a Document, as DOM `ownerDocument`
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        match node.data {
            NodeData::Document(_) => None,
            _ => Some(node.owner_document),
        }
    }

    /// Owner document; a Document answers itself
    pub fn node_document(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|node| node.owner_document)
    }

    /// DOM `nodeName`
    pub fn node_name(&self, id: NodeId) -> Option<String> {
        let name = match &self.get(id)?.data {
            NodeData::Document(_) => "#document".to_string(),
            NodeData::DocumentFragment => "#document-fragment".to_string(),
            NodeData::DocumentType(doctype) => doctype.name.clone(),
            NodeData::Element(_) => return self.tag_name(id),
            NodeData::Attr(attr) => attr.name.qualified(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::CDataSection(_) => "#cdata-section".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::ProcessingInstruction { target, .. } => target.clone(),
        };
        Some(name)
    }

    /// Base URI: the explicit override, else the owner document's URL
    pub fn base_uri(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        if let Some(base) = &node.base_uri {
            return Some(base.clone());
        }
        match self.node_data(node.owner_document)? {
            NodeData::Document(doc) => Some(doc.url.clone()),
            _ => None,
        }
    }

    /// Override the base URI (`None` restores the document URL)
    pub fn set_base_uri(&mut self, id: NodeId, base: Option<&str>) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::StaleNode(id))?;
        node.base_uri = base.map(str::to_string);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Linking primitives (no validation)
    // ------------------------------------------------------------------

    /// Link a detached `node` into `parent` before `reference` (or last)
    pub(crate) fn link_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        let prev = match reference {
            Some(reference) => self.previous_sibling(reference),
            None => self.last_child(parent),
        };

        if let Some(n) = self.get_mut(node) {
            n.parent = Some(parent);
            n.prev_sibling = prev;
            n.next_sibling = reference;
        }

        match prev {
            Some(prev) => {
                if let Some(p) = self.get_mut(prev) {
                    p.next_sibling = Some(node);
                }
            }
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.first_child = Some(node);
                }
            }
        }

        match reference {
            Some(reference) => {
                if let Some(r) = self.get_mut(reference) {
                    r.prev_sibling = Some(node);
                }
            }
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.last_child = Some(node);
                }
            }
        }
    }

    /// Detach `node` from its parent, clearing its links
    pub(crate) fn unlink(&mut self, node: NodeId) {
        let Some((parent, prev, next)) = self
            .get(node)
            .and_then(|n| n.parent.map(|p| (p, n.prev_sibling, n.next_sibling)))
        else {
            return;
        };

        match prev {
            Some(prev) => {
                if let Some(p) = self.get_mut(prev) {
                    p.next_sibling = next;
                }
            }
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.first_child = next;
                }
            }
        }

        match next {
            Some(next) => {
                if let Some(n) = self.get_mut(next) {
                    n.prev_sibling = prev;
                }
            }
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.last_child = prev;
                }
            }
        }

        if let Some(n) = self.get_mut(node) {
            n.parent = None;
            n.prev_sibling = None;
            n.next_sibling = None;
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Free a detached subtree (the node, its descendants and their
    /// attributes). Returns the number of nodes freed.
    ///
    /// Every handle into the subtree is dead afterwards.
    pub fn release(&mut self, id: NodeId) -> DomResult<usize> {
        let node = self.node(id)?;
        if node.parent.is_some() {
            return Err(DomError::InvalidState("node is still attached to a parent"));
        }
        match &node.data {
            NodeData::Attr(attr) if attr.owner_element.is_some() => {
                return Err(DomError::InvalidState("attribute is still attached to an element"));
            }
            NodeData::Document(_) if self.has_foreign_nodes(id) => {
                return Err(DomError::InvalidState("document still owns nodes outside its tree"));
            }
            _ => {}
        }

        let freed = self.free_subtree(id);
        tracing::debug!("Released {} nodes under {:?}", freed, id);
        Ok(freed)
    }

    /// Remove `id`, its descendants and their attributes from the arena
    pub(crate) fn free_subtree(&mut self, id: NodeId) -> usize {
        let doomed = self.subtree_with_attrs(id);
        for &node in &doomed {
            self.nodes.remove(node);
        }
        doomed.len()
    }

    /// `id`, its descendants, and every attribute of those elements
    pub(crate) fn subtree_with_attrs(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            out.push(current);
            if let Some(element) = self.get(current).and_then(Node::as_element) {
                out.extend_from_slice(&element.attrs);
            }
            next = self.following_within(current, id);
        }
        out
    }

    /// Root of the tree a node lives in; attributes live in their element's tree
    fn tree_root(&self, id: NodeId) -> NodeId {
        let owner = self
            .get(id)
            .and_then(Node::as_attr)
            .and_then(|attr| attr.owner_element);
        self.root_node(owner.unwrap_or(id))
    }

    fn has_foreign_nodes(&self, document: NodeId) -> bool {
        self.nodes.ids().any(|other| {
            self.get(other).is_some_and(|n| n.owner_document == document)
                && self.tree_root(other) != document
        })
    }
}

/// Live list of a node's children
///
/// Holds only the parent handle; every call reads the current tree, so
/// length and contents follow later mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildNodes {
    parent: NodeId,
}

impl ChildNodes {
    pub fn parent(self) -> NodeId {
        self.parent
    }

    pub fn len(self, tree: &DomTree) -> usize {
        tree.children(self.parent).count()
    }

    pub fn is_empty(self, tree: &DomTree) -> bool {
        !tree.has_child_nodes(self.parent)
    }

    /// Child at `index`
    pub fn item(self, tree: &DomTree, index: usize) -> Option<NodeId> {
        tree.children(self.parent).nth(index)
    }

    pub fn iter(self, tree: &DomTree) -> Children<'_> {
        tree.children(self.parent)
    }

    /// Snapshot of the current children
    pub fn to_vec(self, tree: &DomTree) -> Vec<NodeId> {
        tree.children(self.parent).collect()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.front?;
        if self.back == Some(current) {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.tree.next_sibling(current);
        }
        Some(current)
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        let current = self.back?;
        if self.front == Some(current) {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.tree.previous_sibling(current);
        }
        Some(current)
    }
}

/// Iterator over ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent_node(current);
        Some(current)
    }
}

/// Pre-order iterator over descendants
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.following_within(current, self.root);
        Some(current)
    }
}
