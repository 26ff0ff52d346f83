//! fOS DOM Core
//!
//! In-memory node tree for XML/HTML-like documents: the node model, validated
//! tree mutation, navigation and document-order comparison, namespace lookup,
//! structural equality, and cloning/adoption across documents.
//!
//! All nodes of all documents live in one [`DomTree`] arena and are addressed
//! by [`NodeId`] handles. Parent, owner-document and owner-element links are
//! lookups only; a node is owned by its parent's child chain, and a detached
//! subtree is freed with [`DomTree::release`].
//!
//! # Example
//! ```
//! use fos_dom_core::DomTree;
//!
//! let mut tree = DomTree::new();
//! let blank = tree.create_document()?;
//! let doc = tree.implementation(blank)?.create_document(&mut tree, None, "root", None)?;
//! let root = tree.document_element(doc).unwrap();
//! let child = tree.create_element(doc, "child")?;
//! tree.append_child(root, child)?;
//! assert_eq!(tree.parent_node(child), Some(root));
//! # Ok::<(), fos_dom_core::DomError>(())
//! ```

mod arena;
mod character_data;
mod clone;
mod config;
mod document;
mod element;
mod equality;
mod error;
mod implementation;
mod mutation;
pub mod names;
pub mod namespace;
mod node;
mod position;
mod tree;

pub use config::{ContentType, DomConfig};
pub use error::{DomError, DomResult};
pub use implementation::DomImplementation;
pub use node::{AttrData, DoctypeData, DocumentData, ElementData, Node, NodeData, NodeType, QualName};
pub use position::DocumentPosition;
pub use tree::{Ancestors, ChildNodes, Children, Descendants, DomTree};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Node handle (generational index into the tree arena)
///
/// A handle stays valid until the node is released; afterwards it is dead
/// even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index
    pub fn index(self) -> u32 {
        self.index
    }
}
