//! DOM Node Operations
//!
//! Core node manipulation: insertBefore, appendChild, replaceChild,
//! removeChild, normalize, textContent, plus the ParentNode/ChildNode
//! conveniences built on them.
//!
//! Every operation validates completely before touching a link, so a failed
//! call leaves the tree unchanged. Nodes an operation discards without
//! handing them back (merged text in `normalize`, old children in
//! `set_text_content`) are released.

use crate::error::{DomError, DomResult};
use crate::node::{NodeData, NodeType};
use crate::tree::DomTree;
use crate::NodeId;

impl DomTree {
    // ------------------------------------------------------------------
    // Validity
    // ------------------------------------------------------------------

    /// Checks shared by insertion and replacement
    ///
    /// `child` is the reference child (insert) or the child being replaced.
    /// `moving` lists nodes that leave their place before the insertion and
    /// so do not count against the document's single element/doctype.
    fn ensure_hierarchy(
        &self,
        parent: NodeId,
        nodes: &[NodeId],
        child: Option<NodeId>,
        replacing: bool,
        moving: &[NodeId],
    ) -> DomResult<()> {
        let parent_data = &self.node(parent)?.data;
        if !matches!(
            parent_data,
            NodeData::Document(_) | NodeData::DocumentFragment | NodeData::Element(_)
        ) {
            return Err(DomError::HierarchyRequest("parent cannot have children"));
        }
        let parent_is_document = matches!(parent_data, NodeData::Document(_));

        for &node in nodes {
            self.node(node)?;
            if node == parent || self.ancestors(parent).any(|a| a == node) {
                return Err(DomError::HierarchyRequest("node is an inclusive ancestor of the parent"));
            }
        }

        if let Some(child) = child {
            if self.node(child)?.parent != Some(parent) {
                return Err(DomError::NotFound("reference node is not a child of the parent"));
            }
        }

        // Several nodes travel as one implicit fragment
        let staged = nodes.len() > 1;
        let mut elements = 0;
        let mut has_text = false;
        let mut has_doctype = false;

        for &node in nodes {
            match &self.node(node)?.data {
                NodeData::Document(_) | NodeData::Attr(_) => {
                    return Err(DomError::HierarchyRequest("node cannot be inserted into a tree"));
                }
                NodeData::DocumentType(_) if staged || !parent_is_document => {
                    return Err(DomError::HierarchyRequest("doctype can only be a child of a document"));
                }
                NodeData::DocumentType(_) => has_doctype = true,
                NodeData::Text(_) | NodeData::CDataSection(_) => has_text = true,
                NodeData::Element(_) => elements += 1,
                NodeData::DocumentFragment => {
                    for grandchild in self.children(node) {
                        match self.node_data(grandchild) {
                            Some(NodeData::Element(_)) => elements += 1,
                            Some(d) if d.is_text_like() => has_text = true,
                            _ => {}
                        }
                    }
                }
                NodeData::Comment(_) | NodeData::ProcessingInstruction { .. } => {}
            }
        }

        if !parent_is_document {
            return Ok(());
        }

        if has_text {
            return Err(DomError::HierarchyRequest("document cannot contain text"));
        }
        if elements > 1 {
            return Err(DomError::HierarchyRequest("document can have only one element"));
        }

        let counts = |c: &NodeId| !moving.contains(c) && !(replacing && Some(*c) == child);
        let has_element = self.children(parent).filter(counts).any(|c| self.is_element(c));
        let has_doctype_child = self.children(parent).filter(counts).any(|c| self.is_doctype(c));
        let child_is_doctype = !replacing && child.is_some_and(|c| self.is_doctype(c));
        let doctype_following = child.is_some_and(|c| {
            self.following_siblings(c).filter(counts).any(|s| self.is_doctype(s))
        });
        let element_preceding = child.is_some_and(|c| {
            self.preceding_siblings(c).filter(counts).any(|s| self.is_element(s))
        });

        if elements == 1 && (has_element || child_is_doctype || doctype_following) {
            return Err(DomError::HierarchyRequest("document already has a document element"));
        }
        if has_doctype {
            let element_blocks = if replacing || child.is_some() {
                element_preceding
            } else {
                has_element
            };
            if has_doctype_child || element_blocks {
                return Err(DomError::HierarchyRequest("document already has a doctype or element"));
            }
        }
        Ok(())
    }

    fn is_doctype(&self, id: NodeId) -> bool {
        matches!(self.node_data(id), Some(NodeData::DocumentType(_)))
    }

    fn following_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.next_sibling(id), move |&s| self.next_sibling(s))
    }

    fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.previous_sibling(id), move |&s| self.previous_sibling(s))
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Link `node` (or a fragment's children) before `reference`, adopting
    /// it into the parent's document first. Validity must already hold.
    fn insert_node(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        if let Some(document) = self.node_document(parent) {
            if self.node_document(node) != Some(document) {
                self.assign_owner(node, document);
            }
        }

        let moved: Vec<NodeId> = match self.node_data(node) {
            Some(NodeData::DocumentFragment) => self.children(node).collect(),
            _ => vec![node],
        };
        for &n in &moved {
            self.unlink(n);
            self.link_before(parent, n, reference);
        }
        tracing::trace!("Inserted {} node(s) into {:?}", moved.len(), parent);
    }

    /// `insertBefore`: insert `node` before `child` (`None` appends)
    ///
    /// A node that already has a parent is moved. A fragment moves its
    /// children in order and ends up empty; the fragment itself is returned.
    pub fn insert_before(&mut self, parent: NodeId, node: NodeId, child: Option<NodeId>) -> DomResult<NodeId> {
        self.ensure_hierarchy(parent, &[node], child, false, &[])?;
        let mut reference = child;
        if reference == Some(node) {
            reference = self.next_sibling(node);
        }
        self.insert_node(parent, node, reference);
        Ok(node)
    }

    /// `appendChild`
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, node, None)
    }

    /// `replaceChild`: put `node` where `child` is and return `child`
    pub fn replace_child(&mut self, parent: NodeId, node: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.ensure_hierarchy(parent, &[node], Some(child), true, &[])?;
        let mut reference = self.next_sibling(child);
        if reference == Some(node) {
            reference = self.next_sibling(node);
        }
        self.unlink(child);
        self.insert_node(parent, node, reference);
        tracing::trace!("Replaced {:?} in {:?}", child, parent);
        Ok(child)
    }

    /// `removeChild`: detach `child`; its owner document is kept
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotFound("node is not a child of the parent"));
        }
        self.unlink(child);
        tracing::trace!("Removed {:?} from {:?}", child, parent);
        Ok(child)
    }

    /// Merge adjacent Text siblings and drop empty Text nodes, depth-first
    pub fn normalize(&mut self, id: NodeId) -> DomResult<()> {
        self.node(id)?;
        let texts: Vec<NodeId> = self
            .descendants(id)
            .filter(|&d| matches!(self.node_data(d), Some(NodeData::Text(_))))
            .collect();

        let mut dropped = 0;
        for text in texts {
            // Already merged into an earlier run
            if !self.is_alive(text) {
                continue;
            }

            let mut run = Vec::new();
            let mut merged = String::new();
            let mut next = self.next_sibling(text);
            while let Some(sibling) = next {
                let Some(NodeData::Text(data)) = self.node_data(sibling) else {
                    break;
                };
                merged.push_str(data);
                run.push(sibling);
                next = self.next_sibling(sibling);
            }

            if let Some(NodeData::Text(data)) = self.get_mut(text).map(|n| &mut n.data) {
                data.push_str(&merged);
                if data.is_empty() {
                    run.push(text);
                }
            }

            for node in run {
                self.unlink(node);
                self.free_subtree(node);
                dropped += 1;
            }
        }
        tracing::trace!("Normalized {:?}, dropped {} text nodes", id, dropped);
        Ok(())
    }

    /// `textContent`: descendant Text/CDATA data for elements and fragments,
    /// own data for character data and attributes, `None` for documents and
    /// doctypes
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        match &self.get(id)?.data {
            NodeData::Document(_) | NodeData::DocumentType(_) => None,
            NodeData::Attr(attr) => Some(attr.value.clone()),
            NodeData::Element(_) | NodeData::DocumentFragment => Some(
                self.descendants(id)
                    .filter_map(|d| match self.node_data(d) {
                        Some(NodeData::Text(t)) | Some(NodeData::CDataSection(t)) => Some(t.as_str()),
                        _ => None,
                    })
                    .collect(),
            ),
            data => data.character_data().map(str::to_string),
        }
    }

    /// Set `textContent`
    ///
    /// Elements and fragments lose all children (released) and gain one
    /// Text node when `value` is non-empty. Documents and doctypes ignore it.
    pub fn set_text_content(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let node = self.node(id)?;
        let document = node.owner_document;
        match node.node_type() {
            NodeType::Document | NodeType::DocumentType => Ok(()),
            NodeType::Element | NodeType::DocumentFragment => {
                let text = if value.is_empty() {
                    None
                } else {
                    Some(self.alloc(document, NodeData::Text(value.to_string()))?)
                };
                let old: Vec<NodeId> = self.children(id).collect();
                for child in old {
                    self.unlink(child);
                    self.free_subtree(child);
                }
                if let Some(text) = text {
                    self.link_before(id, text, None);
                }
                Ok(())
            }
            NodeType::Attribute => {
                if let Some(attr) = self.get_mut(id).and_then(|n| n.as_attr_mut()) {
                    attr.value = value.to_string();
                }
                Ok(())
            }
            _ => self.set_data(id, value),
        }
    }

    // ------------------------------------------------------------------
    // ParentNode / ChildNode
    // ------------------------------------------------------------------

    /// Insert `nodes` in order before `reference`, validating them as one
    /// batch first
    fn insert_batch(
        &mut self,
        parent: NodeId,
        nodes: &[NodeId],
        reference: Option<NodeId>,
        replacing: Option<NodeId>,
    ) -> DomResult<()> {
        match (nodes, replacing) {
            ([], _) => {}
            ([node], None) => self.ensure_hierarchy(parent, &[*node], reference, false, &[])?,
            ([node], Some(old)) => self.ensure_hierarchy(parent, &[*node], Some(old), true, &[])?,
            (_, None) => self.ensure_hierarchy(parent, nodes, reference, false, nodes)?,
            (_, Some(old)) => self.ensure_hierarchy(parent, nodes, Some(old), true, nodes)?,
        }
        for &node in nodes {
            self.insert_node(parent, node, reference);
        }
        Ok(())
    }

    /// First child of `parent` that is not in `nodes`
    fn first_child_outside(&self, parent: NodeId, nodes: &[NodeId]) -> Option<NodeId> {
        self.children(parent).find(|c| !nodes.contains(c))
    }

    /// First sibling after `id` that is not in `nodes`
    fn next_sibling_outside(&self, id: NodeId, nodes: &[NodeId]) -> Option<NodeId> {
        self.following_siblings(id).find(|s| !nodes.contains(s))
    }

    /// `prepend`: insert `nodes` before the first child
    pub fn prepend(&mut self, parent: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let reference = self.first_child_outside(parent, nodes);
        self.insert_batch(parent, nodes, reference, None)
    }

    /// `append`: insert `nodes` after the last child
    pub fn append(&mut self, parent: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        self.insert_batch(parent, nodes, None, None)
    }

    /// `before`: insert `nodes` just before `id`; no-op without a parent
    pub fn before(&mut self, id: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        let viable_prev = self.preceding_siblings(id).find(|s| !nodes.contains(s));
        let reference = match viable_prev {
            Some(prev) => self.next_sibling_outside(prev, nodes),
            None => self.first_child_outside(parent, nodes),
        };
        self.insert_batch(parent, nodes, reference, None)
    }

    /// `after`: insert `nodes` just after `id`; no-op without a parent
    pub fn after(&mut self, id: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        let reference = self.next_sibling_outside(id, nodes);
        self.insert_batch(parent, nodes, reference, None)
    }

    /// `replaceWith`: put `nodes` where `id` is; no-op without a parent
    pub fn replace_with(&mut self, id: NodeId, nodes: &[NodeId]) -> DomResult<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        let reference = self.next_sibling_outside(id, nodes);
        if nodes.contains(&id) {
            return self.insert_batch(parent, nodes, reference, None);
        }
        self.insert_batch(parent, nodes, reference, Some(id))?;
        self.unlink(id);
        Ok(())
    }

    /// `remove`: detach `id` from its parent, if any
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        self.node(id)?;
        self.unlink(id);
        Ok(())
    }
}
