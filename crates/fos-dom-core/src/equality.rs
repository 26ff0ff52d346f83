//! Structural node equality (`isEqualNode`)

use crate::node::{NodeData, QualName};
use crate::tree::DomTree;
use crate::NodeId;

impl DomTree {
    /// True if `a` and `b` have the same type, payload, attributes (in any
    /// order) and pairwise-equal children
    pub fn is_equal_node(&self, a: NodeId, b: Option<NodeId>) -> bool {
        let Some(b) = b else {
            return false;
        };
        if a == b {
            return self.is_alive(a);
        }
        let (Some(left), Some(right)) = (self.node_data(a), self.node_data(b)) else {
            return false;
        };

        let same_payload = match (left, right) {
            (NodeData::Document(_), NodeData::Document(_))
            | (NodeData::DocumentFragment, NodeData::DocumentFragment)
            | (NodeData::DocumentType(_), NodeData::DocumentType(_)) => true,
            (NodeData::Element(x), NodeData::Element(y)) => {
                same_name(&x.name, &y.name) && self.same_attributes(x.attrs(), y.attrs())
            }
            (NodeData::Attr(x), NodeData::Attr(y)) => {
                x.name.same_key(y.name.namespace.as_deref(), &y.name.local) && x.value == y.value
            }
            (NodeData::Text(x), NodeData::Text(y))
            | (NodeData::CDataSection(x), NodeData::CDataSection(y))
            | (NodeData::Comment(x), NodeData::Comment(y)) => x == y,
            (
                NodeData::ProcessingInstruction { target: t1, data: d1 },
                NodeData::ProcessingInstruction { target: t2, data: d2 },
            ) => t1 == t2 && d1 == d2,
            _ => false,
        };
        if !same_payload {
            return false;
        }

        let mut left_children = self.children(a);
        let mut right_children = self.children(b);
        loop {
            match (left_children.next(), right_children.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) if self.is_equal_node(x, Some(y)) => {}
                _ => return false,
            }
        }
    }

    /// Same (namespace, local name, value) triples regardless of order
    fn same_attributes(&self, left: &[NodeId], right: &[NodeId]) -> bool {
        left.len() == right.len()
            && left.iter().all(|&l| {
                let Some(attr) = self.get(l).and_then(|n| n.as_attr()) else {
                    return false;
                };
                right.iter().any(|&r| {
                    self.get(r).and_then(|n| n.as_attr()).is_some_and(|other| {
                        other.name.same_key(attr.name.namespace.as_deref(), &attr.name.local)
                            && other.value == attr.value
                    })
                })
            })
    }
}

fn same_name(x: &QualName, y: &QualName) -> bool {
    x.namespace == y.namespace && x.prefix == y.prefix && x.local == y.local
}
