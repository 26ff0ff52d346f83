//! Cloning, importing and adoption
//!
//! Clones copy payloads and attributes into fresh arena slots; adoption
//! only rewrites owner-document handles.

use crate::error::{DomError, DomResult};
use crate::node::{Node, NodeData};
use crate::tree::DomTree;
use crate::NodeId;

impl DomTree {
    /// `cloneNode`: copy `id` (and its subtree when `deep`) into a new
    /// detached node owned by the same document
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let document = self.node(id)?.owner_document;
        self.clone_into(id, document, deep)
    }

    /// `importNode`: clone `node` into `doc`
    pub fn import_node(&mut self, doc: NodeId, node: NodeId, deep: bool) -> DomResult<NodeId> {
        self.ensure_document(doc)?;
        if matches!(self.node(node)?.data, NodeData::Document(_)) {
            return Err(DomError::NotSupported("importing a document"));
        }
        let imported = self.clone_into(node, doc, deep)?;
        tracing::debug!("Imported {:?} into {:?} as {:?}", node, doc, imported);
        Ok(imported)
    }

    /// `adoptNode`: move `node` (and its subtree) into `doc`
    ///
    /// The node is detached from its parent first; an attribute leaves its
    /// owner element. Returns the adopted node.
    pub fn adopt_node(&mut self, doc: NodeId, node: NodeId) -> DomResult<NodeId> {
        self.ensure_document(doc)?;
        let attr_owner = match &self.node(node)?.data {
            NodeData::Document(_) => return Err(DomError::NotSupported("adopting a document")),
            NodeData::Attr(attr) => Some(attr.owner_element),
            _ => None,
        };
        match attr_owner {
            Some(Some(owner)) => {
                self.remove_attribute_node(owner, node)?;
            }
            Some(None) => {}
            None => self.unlink(node),
        }
        if self.node_document(node) != Some(doc) {
            self.assign_owner(node, doc);
            tracing::debug!("Adopted {:?} into {:?}", node, doc);
        }
        Ok(node)
    }

    fn ensure_document(&self, doc: NodeId) -> DomResult<()> {
        match self.node(doc)?.data {
            NodeData::Document(_) => Ok(()),
            _ => Err(DomError::InvalidState("node is not a document")),
        }
    }

    /// Point every node under `root` (attributes included) at `doc`
    pub(crate) fn assign_owner(&mut self, root: NodeId, doc: NodeId) {
        for id in self.subtree_with_attrs(root) {
            if let Some(node) = self.get_mut(id) {
                node.owner_document = doc;
            }
        }
    }

    /// Clone `id` for `document`; a clone that fails halfway is freed
    fn clone_into(&mut self, id: NodeId, document: NodeId, deep: bool) -> DomResult<NodeId> {
        let source = self.node(id)?;
        let base_uri = source.base_uri.clone();
        let data = source.data.clone();

        let copy = match data {
            NodeData::Document(_) => self.alloc_document(data)?,
            NodeData::Element(mut shell) => {
                shell.attrs.clear();
                self.alloc(document, NodeData::Element(shell))?
            }
            NodeData::Attr(mut attr) => {
                attr.owner_element = None;
                self.alloc(document, NodeData::Attr(attr))?
            }
            data => self.alloc(document, data)?,
        };
        if let Some(node) = self.get_mut(copy) {
            node.base_uri = base_uri;
        }

        if let Err(err) = self.fill_clone(id, copy, document, deep) {
            self.free_subtree(copy);
            return Err(err);
        }
        tracing::trace!("Cloned {:?} into {:?} (deep: {})", id, copy, deep);
        Ok(copy)
    }

    /// Copy attributes and, when `deep`, children of `id` onto `copy`
    fn fill_clone(&mut self, id: NodeId, copy: NodeId, document: NodeId, deep: bool) -> DomResult<()> {
        let attrs = self.attributes(id).to_vec();
        for attr in attrs {
            let attr_copy = self.clone_attr(attr, document, copy)?;
            if let Some(element) = self.get_mut(copy).and_then(Node::as_element_mut) {
                element.attrs.push(attr_copy);
            }
        }

        if deep {
            // A cloned document owns its cloned children
            let child_owner = match self.node_data(copy) {
                Some(NodeData::Document(_)) => copy,
                _ => document,
            };
            let children: Vec<NodeId> = self.children(id).collect();
            for child in children {
                let child_copy = self.clone_into(child, child_owner, true)?;
                self.link_before(copy, child_copy, None);
            }
        }
        Ok(())
    }

    fn clone_attr(&mut self, attr: NodeId, document: NodeId, owner: NodeId) -> DomResult<NodeId> {
        let NodeData::Attr(mut data) = self.node(attr)?.data.clone() else {
            return Err(DomError::InvalidState("element attribute list holds a non-attribute"));
        };
        data.owner_element = Some(owner);
        self.alloc(document, NodeData::Attr(data))
    }
}
