//! CharacterData, Text and the small per-type accessors
//!
//! Offsets and counts are in Unicode scalar values.

use crate::error::{DomError, DomResult};
use crate::node::{DoctypeData, NodeData};
use crate::tree::DomTree;
use crate::NodeId;

/// Byte position of the `chars`-th scalar value (clamped to the end)
fn byte_index(data: &str, chars: usize) -> usize {
    data.char_indices().nth(chars).map_or(data.len(), |(i, _)| i)
}

impl DomTree {
    fn char_data(&self, id: NodeId) -> DomResult<&str> {
        self.node(id)?
            .data
            .character_data()
            .ok_or(DomError::InvalidState("node has no character data"))
    }

    fn char_data_mut(&mut self, id: NodeId) -> DomResult<&mut String> {
        self.get_mut(id)
            .ok_or(DomError::StaleNode(id))?
            .data
            .character_data_mut()
            .ok_or(DomError::InvalidState("node has no character data"))
    }

    /// Character data of a Text, CDATA, Comment or PI node
    pub fn data(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.data.character_data()
    }

    pub fn set_data(&mut self, id: NodeId, data: &str) -> DomResult<()> {
        *self.char_data_mut(id)? = data.to_string();
        Ok(())
    }

    /// Data length in scalar values; 0 for nodes without character data
    pub fn length(&self, id: NodeId) -> usize {
        self.data(id).map_or(0, |d| d.chars().count())
    }

    /// `substringData`: `count` is clamped to the end of the data
    pub fn substring_data(&self, id: NodeId, offset: usize, count: usize) -> DomResult<String> {
        let data = self.char_data(id)?;
        let length = data.chars().count();
        if offset > length {
            return Err(DomError::IndexSize { offset, length });
        }
        Ok(data.chars().skip(offset).take(count).collect())
    }

    pub fn append_data(&mut self, id: NodeId, data: &str) -> DomResult<()> {
        self.char_data_mut(id)?.push_str(data);
        Ok(())
    }

    pub fn insert_data(&mut self, id: NodeId, offset: usize, data: &str) -> DomResult<()> {
        self.replace_data(id, offset, 0, data)
    }

    pub fn delete_data(&mut self, id: NodeId, offset: usize, count: usize) -> DomResult<()> {
        self.replace_data(id, offset, count, "")
    }

    /// `replaceData`: replace `count` scalar values at `offset`
    pub fn replace_data(&mut self, id: NodeId, offset: usize, count: usize, data: &str) -> DomResult<()> {
        let current = self.char_data(id)?;
        let length = current.chars().count();
        if offset > length {
            return Err(DomError::IndexSize { offset, length });
        }
        let count = count.min(length - offset);
        let start = byte_index(current, offset);
        let end = byte_index(current, offset + count);
        self.char_data_mut(id)?.replace_range(start..end, data);
        Ok(())
    }

    /// `splitText`: keep the data before `offset`, move the rest into a new
    /// node of the same kind placed right after this one
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> DomResult<NodeId> {
        let node = self.node(id)?;
        if !node.data.is_text_like() {
            return Err(DomError::InvalidState("node is not a text node"));
        }
        let document = node.owner_document;
        let parent = node.parent;
        let next = node.next_sibling;

        let tail = self.substring_data(id, offset, usize::MAX)?;
        let new_data = match &self.node(id)?.data {
            NodeData::CDataSection(_) => NodeData::CDataSection(tail),
            _ => NodeData::Text(tail),
        };
        let new_node = self.alloc(document, new_data)?;
        if let Some(parent) = parent {
            self.link_before(parent, new_node, next);
        }
        let data = self.char_data_mut(id)?;
        let cut = byte_index(data, offset);
        data.truncate(cut);

        tracing::trace!("Split {:?} at {}, tail in {:?}", id, offset, new_node);
        Ok(new_node)
    }

    /// `wholeText`: data of the contiguous Text/CDATA run around `id`
    pub fn whole_text(&self, id: NodeId) -> Option<String> {
        if !self.get(id)?.data.is_text_like() {
            return None;
        }
        let is_text = |n: &NodeId| self.get(*n).is_some_and(|node| node.data.is_text_like());
        let mut start = id;
        while let Some(prev) = self.previous_sibling(start).filter(is_text) {
            start = prev;
        }
        let mut whole = String::new();
        let mut current = Some(start);
        while let Some(node) = current.filter(is_text) {
            whole.push_str(self.data(node).unwrap_or_default());
            current = self.next_sibling(node);
        }
        Some(whole)
    }

    /// `nodeValue`: Attr value or character data; `None` for other nodes
    pub fn node_value(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::Attr(attr) => Some(attr.value.clone()),
            data => data.character_data().map(str::to_string),
        }
    }

    /// Set `nodeValue`; ignored by nodes without a value
    pub fn set_node_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::StaleNode(id))?;
        if let Some(attr) = node.as_attr_mut() {
            attr.value = value.to_string();
        } else if let Some(data) = node.data.character_data_mut() {
            *data = value.to_string();
        }
        Ok(())
    }

    /// Processing instruction target
    pub fn target(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::ProcessingInstruction { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn doctype_name(&self, id: NodeId) -> Option<&str> {
        self.doctype_data(id).map(|d| d.name.as_str())
    }

    pub fn public_id(&self, id: NodeId) -> Option<&str> {
        self.doctype_data(id).map(|d| d.public_id.as_str())
    }

    pub fn system_id(&self, id: NodeId) -> Option<&str> {
        self.doctype_data(id).map(|d| d.system_id.as_str())
    }

    fn doctype_data(&self, id: NodeId) -> Option<&DoctypeData> {
        match &self.get(id)?.data {
            NodeData::DocumentType(doctype) => Some(doctype),
            _ => None,
        }
    }
}
