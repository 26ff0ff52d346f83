//! Document Position
//!
//! `compareDocumentPosition`: where a node sits relative to a reference
//! node in document order.

use std::ops::BitOr;

use crate::node::NodeData;
use crate::tree::DomTree;
use crate::NodeId;

/// Document position bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DocumentPosition(u16);

impl DocumentPosition {
    pub const DISCONNECTED: DocumentPosition = DocumentPosition(0x01);
    pub const PRECEDING: DocumentPosition = DocumentPosition(0x02);
    pub const FOLLOWING: DocumentPosition = DocumentPosition(0x04);
    pub const CONTAINS: DocumentPosition = DocumentPosition(0x08);
    pub const CONTAINED_BY: DocumentPosition = DocumentPosition(0x10);
    pub const IMPLEMENTATION_SPECIFIC: DocumentPosition = DocumentPosition(0x20);

    /// Raw bits
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Check if every flag of `other` is set
    pub fn contains(self, other: DocumentPosition) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for DocumentPosition {
    type Output = DocumentPosition;

    fn bitor(self, rhs: DocumentPosition) -> DocumentPosition {
        DocumentPosition(self.0 | rhs.0)
    }
}

impl DomTree {
    /// Position of `other` relative to `reference`
    ///
    /// Nodes in different trees are DISCONNECTED | IMPLEMENTATION_SPECIFIC
    /// plus PRECEDING or FOLLOWING, decided by comparing the two roots'
    /// handles. The order is consistent for as long as both roots live and
    /// carries no other meaning.
    pub fn compare_document_position(&self, reference: NodeId, other: NodeId) -> DocumentPosition {
        if reference == other {
            return DocumentPosition::default();
        }

        let mut node1 = Some(other);
        let mut node2 = Some(reference);
        let mut attr1 = None;
        let mut attr2 = None;

        if let Some(NodeData::Attr(attr)) = self.node_data(other) {
            attr1 = Some(other);
            node1 = attr.owner_element;
        }
        if let Some(NodeData::Attr(attr)) = self.node_data(reference) {
            attr2 = Some(reference);
            node2 = attr.owner_element;

            // Two attributes of the same element: attribute-list order
            if let (Some(a1), Some(owner)) = (attr1, node2) {
                if node1 == Some(owner) {
                    let attrs = self.get(owner).and_then(|n| n.as_element()).map(|e| e.attrs.as_slice());
                    for &attr in attrs.unwrap_or_default() {
                        if attr == a1 {
                            return DocumentPosition::IMPLEMENTATION_SPECIFIC | DocumentPosition::PRECEDING;
                        }
                        if attr == reference {
                            return DocumentPosition::IMPLEMENTATION_SPECIFIC | DocumentPosition::FOLLOWING;
                        }
                    }
                }
            }
        }

        let root1 = self.root_node(node1.or(attr1).unwrap_or(other));
        let root2 = self.root_node(node2.or(attr2).unwrap_or(reference));
        let (Some(node1), Some(node2)) = (node1, node2) else {
            return disconnected(root1, root2);
        };
        if root1 != root2 || !self.is_alive(node1) || !self.is_alive(node2) {
            return disconnected(root1, root2);
        }

        if (attr1.is_none() && self.ancestors(node2).any(|a| a == node1))
            || (node1 == node2 && attr2.is_some())
        {
            return DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        }

        if (attr2.is_none() && self.ancestors(node1).any(|a| a == node2))
            || (node1 == node2 && attr1.is_some())
        {
            return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        }

        if self.precedes(node1, node2) {
            DocumentPosition::PRECEDING
        } else {
            DocumentPosition::FOLLOWING
        }
    }

    /// True if `a` comes before `b` in document order (same tree, neither
    /// an ancestor of the other)
    fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        let mut chain_a: Vec<NodeId> = std::iter::once(a).chain(self.ancestors(a)).collect();
        let mut chain_b: Vec<NodeId> = std::iter::once(b).chain(self.ancestors(b)).collect();
        chain_a.reverse();
        chain_b.reverse();

        // Both chains start at the shared root; find the first divergence
        let split = chain_a
            .iter()
            .zip(&chain_b)
            .take_while(|(x, y)| x == y)
            .count();
        match (chain_a.get(split), chain_b.get(split)) {
            (Some(&x), Some(&y)) => self.index_of(x) < self.index_of(y),
            _ => chain_a.len() < chain_b.len(),
        }
    }
}

fn disconnected(root_other: NodeId, root_reference: NodeId) -> DocumentPosition {
    let direction = if root_other < root_reference {
        DocumentPosition::PRECEDING
    } else {
        DocumentPosition::FOLLOWING
    };
    DocumentPosition::DISCONNECTED | DocumentPosition::IMPLEMENTATION_SPECIFIC | direction
}
