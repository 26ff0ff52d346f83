//! Element names, attributes and element-only navigation
//!
//! Attributes are Attr nodes in the arena. An element keeps their handles
//! in insertion order; each Attr points back at its owner element.

use crate::error::{DomError, DomResult};
use crate::names::{validate_and_extract, validate_name};
use crate::namespace::HTML_NAMESPACE;
use crate::node::{ElementData, Node, NodeData, QualName};
use crate::tree::DomTree;
use crate::NodeId;

impl DomTree {
    fn element_data(&self, id: NodeId) -> DomResult<&ElementData> {
        self.node(id)?
            .as_element()
            .ok_or(DomError::InvalidState("node is not an element"))
    }

    /// Name of an Element or Attr
    fn qual_name(&self, id: NodeId) -> Option<&QualName> {
        match &self.get(id)?.data {
            NodeData::Element(element) => Some(&element.name),
            NodeData::Attr(attr) => Some(&attr.name),
            _ => None,
        }
    }

    /// HTML element in an HTML document
    fn is_html_element(&self, id: NodeId) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.name.namespace.as_deref() == Some(HTML_NAMESPACE))
            && self.is_html_document(id)
    }

    /// Attribute names are matched lowercased on HTML elements
    fn attribute_query(&self, id: NodeId, name: &str) -> String {
        if self.is_html_element(id) {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    /// `tagName`: qualified name, uppercased for HTML elements in HTML
    /// documents
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        let element = self.get(id)?.as_element()?;
        let qualified = element.name.qualified();
        if self.is_html_element(id) {
            Some(qualified.to_ascii_uppercase())
        } else {
            Some(qualified)
        }
    }

    pub fn local_name(&self, id: NodeId) -> Option<String> {
        self.qual_name(id).map(|n| n.local.clone())
    }

    pub fn namespace_uri(&self, id: NodeId) -> Option<String> {
        self.qual_name(id)?.namespace.clone()
    }

    pub fn prefix(&self, id: NodeId) -> Option<String> {
        self.qual_name(id)?.prefix.clone()
    }

    // ------------------------------------------------------------------
    // Attribute lookup
    // ------------------------------------------------------------------

    /// Attr handles of an element in insertion order (empty otherwise)
    pub fn attributes(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(Node::as_element)
            .map(ElementData::attrs)
            .unwrap_or_default()
    }

    pub fn has_attributes(&self, id: NodeId) -> bool {
        !self.attributes(id).is_empty()
    }

    /// Qualified names of all attributes, in order
    pub fn get_attribute_names(&self, id: NodeId) -> Vec<String> {
        self.attributes(id)
            .iter()
            .filter_map(|&a| self.qual_name(a).map(QualName::qualified))
            .collect()
    }

    /// First attribute whose qualified name is `name`
    pub fn get_attribute_node(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let name = self.attribute_query(id, name);
        self.attributes(id)
            .iter()
            .copied()
            .find(|&a| self.qual_name(a).is_some_and(|n| n.qualified() == name))
    }

    /// Attribute with the given namespace and local name
    pub fn get_attribute_node_ns(&self, id: NodeId, namespace: Option<&str>, local_name: &str) -> Option<NodeId> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.attributes(id)
            .iter()
            .copied()
            .find(|&a| self.qual_name(a).is_some_and(|n| n.same_key(namespace, local_name)))
    }

    fn attr_value(&self, attr: NodeId) -> Option<String> {
        self.get(attr)?.as_attr().map(|a| a.value.clone())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.attr_value(self.get_attribute_node(id, name)?)
    }

    pub fn get_attribute_ns(&self, id: NodeId, namespace: Option<&str>, local_name: &str) -> Option<String> {
        self.attr_value(self.get_attribute_node_ns(id, namespace, local_name)?)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute_node(id, name).is_some()
    }

    pub fn has_attribute_ns(&self, id: NodeId, namespace: Option<&str>, local_name: &str) -> bool {
        self.get_attribute_node_ns(id, namespace, local_name).is_some()
    }

    /// Element holding an Attr
    pub fn owner_element(&self, attr: NodeId) -> Option<NodeId> {
        self.get(attr)?.as_attr()?.owner_element
    }

    // ------------------------------------------------------------------
    // Attribute mutation
    // ------------------------------------------------------------------

    fn set_attr_value(&mut self, attr: NodeId, value: &str) {
        if let Some(data) = self.get_mut(attr).and_then(Node::as_attr_mut) {
            data.value = value.to_string();
        }
    }

    /// Append a detached Attr to an element's list
    fn attach_attr(&mut self, id: NodeId, attr: NodeId) {
        if let Some(data) = self.get_mut(attr).and_then(Node::as_attr_mut) {
            data.owner_element = Some(id);
        }
        if let Some(element) = self.get_mut(id).and_then(Node::as_element_mut) {
            element.attrs.push(attr);
        }
    }

    /// Take an Attr out of its element's list; the node stays alive
    fn detach_attr(&mut self, id: NodeId, attr: NodeId) {
        if let Some(element) = self.get_mut(id).and_then(Node::as_element_mut) {
            element.attrs.retain(|&a| a != attr);
        }
        if let Some(data) = self.get_mut(attr).and_then(Node::as_attr_mut) {
            data.owner_element = None;
        }
    }

    /// `setAttribute`: update the first attribute named `name`, or append a
    /// new one without a namespace
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        validate_name(name)?;
        self.element_data(id)?;
        let name = self.attribute_query(id, name);
        match self.get_attribute_node(id, &name) {
            Some(attr) => self.set_attr_value(attr, value),
            None => {
                let doc = self.node(id)?.owner_document;
                let attr = self.alloc_attr(doc, QualName::local(name), value.to_string())?;
                self.attach_attr(id, attr);
            }
        }
        Ok(())
    }

    /// `setAttributeNS`: an existing attribute keeps its prefix
    pub fn set_attribute_ns(
        &mut self,
        id: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> DomResult<()> {
        let name = validate_and_extract(namespace, qualified_name)?;
        self.element_data(id)?;
        match self.get_attribute_node_ns(id, name.namespace.as_deref(), &name.local) {
            Some(attr) => self.set_attr_value(attr, value),
            None => {
                let doc = self.node(id)?.owner_document;
                let attr = self.alloc_attr(doc, name, value.to_string())?;
                self.attach_attr(id, attr);
            }
        }
        Ok(())
    }

    /// Detach an Attr nobody gets back and free it
    fn discard_attr(&mut self, id: NodeId, attr: NodeId) {
        self.detach_attr(id, attr);
        self.free_subtree(attr);
        tracing::trace!("Discarded attribute {:?} of {:?}", attr, id);
    }

    /// `removeAttribute`; absent names are ignored. The removed Attr is
    /// released.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        self.element_data(id)?;
        if let Some(attr) = self.get_attribute_node(id, name) {
            self.discard_attr(id, attr);
        }
        Ok(())
    }

    pub fn remove_attribute_ns(&mut self, id: NodeId, namespace: Option<&str>, local_name: &str) -> DomResult<()> {
        self.element_data(id)?;
        if let Some(attr) = self.get_attribute_node_ns(id, namespace, local_name) {
            self.discard_attr(id, attr);
        }
        Ok(())
    }

    /// `toggleAttribute`: returns whether the attribute is present afterwards
    pub fn toggle_attribute(&mut self, id: NodeId, name: &str, force: Option<bool>) -> DomResult<bool> {
        validate_name(name)?;
        self.element_data(id)?;
        let present = self.has_attribute(id, name);
        match (present, force) {
            (true, Some(true)) => Ok(true),
            (false, Some(false)) => Ok(false),
            (true, _) => {
                self.remove_attribute(id, name)?;
                Ok(false)
            }
            (false, _) => {
                self.set_attribute(id, name, "")?;
                Ok(true)
            }
        }
    }

    /// `setAttributeNode`: attach `attr`, replacing the attribute with the
    /// same namespace and local name in place. Returns the replaced node.
    pub fn set_attribute_node(&mut self, id: NodeId, attr: NodeId) -> DomResult<Option<NodeId>> {
        self.element_data(id)?;
        let data = self
            .node(attr)?
            .as_attr()
            .ok_or(DomError::InvalidState("node is not an attribute"))?;
        match data.owner_element {
            Some(owner) if owner == id => return Ok(Some(attr)),
            Some(_) => return Err(DomError::InUseAttribute),
            None => {}
        }
        let key = data.name.clone();

        let doc = self.node(id)?.owner_document;
        if self.node_document(attr) != Some(doc) {
            self.assign_owner(attr, doc);
        }

        let old = self.get_attribute_node_ns(id, key.namespace.as_deref(), &key.local);
        match old {
            Some(old) => {
                if let Some(element) = self.get_mut(id).and_then(Node::as_element_mut) {
                    for slot in element.attrs.iter_mut().filter(|slot| **slot == old) {
                        *slot = attr;
                    }
                }
                if let Some(data) = self.get_mut(old).and_then(Node::as_attr_mut) {
                    data.owner_element = None;
                }
                if let Some(data) = self.get_mut(attr).and_then(Node::as_attr_mut) {
                    data.owner_element = Some(id);
                }
            }
            None => self.attach_attr(id, attr),
        }
        Ok(old)
    }

    /// `removeAttributeNode`: `attr` must belong to `id`
    pub fn remove_attribute_node(&mut self, id: NodeId, attr: NodeId) -> DomResult<NodeId> {
        if !self.element_data(id)?.attrs.contains(&attr) {
            return Err(DomError::NotFound("attribute does not belong to the element"));
        }
        self.detach_attr(id, attr);
        Ok(attr)
    }

    // ------------------------------------------------------------------
    // Element queries
    // ------------------------------------------------------------------

    /// Descendant elements matching a qualified name (`"*"` matches all),
    /// as a snapshot in document order
    pub fn get_elements_by_tag_name(&self, root: NodeId, qualified_name: &str) -> Vec<NodeId> {
        let lowered = qualified_name.to_ascii_lowercase();
        self.descendants(root)
            .filter(|&d| {
                let Some(element) = self.get(d).and_then(Node::as_element) else {
                    return false;
                };
                if qualified_name == "*" {
                    return true;
                }
                let wanted = if self.is_html_element(d) { lowered.as_str() } else { qualified_name };
                element.name.qualified() == wanted
            })
            .collect()
    }

    /// Descendant elements by namespace and local name; `"*"` is a wildcard
    /// for either
    pub fn get_elements_by_tag_name_ns(&self, root: NodeId, namespace: Option<&str>, local_name: &str) -> Vec<NodeId> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.descendants(root)
            .filter(|&d| {
                let Some(element) = self.get(d).and_then(Node::as_element) else {
                    return false;
                };
                let ns_matches = namespace == Some("*") || element.name.namespace.as_deref() == namespace;
                let local_matches = local_name == "*" || element.name.local == local_name;
                ns_matches && local_matches
            })
            .collect()
    }

    /// Element children in order
    pub fn element_children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children(id).filter(|&c| self.is_element(c))
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next_back()
    }

    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.element_children(id).count()
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.previous_sibling(id);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.previous_sibling(sibling);
        }
        None
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.next_sibling(sibling);
        }
        None
    }
}
