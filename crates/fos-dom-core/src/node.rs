//! DOM Node
//!
//! A node is a shared link record (parent, children, siblings, owner
//! document) plus one closed [`NodeData`] variant. Every link is a
//! [`NodeId`] lookup into the tree's arena; only the child chain owns.

use crate::config::ContentType;
use crate::NodeId;

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element,
    Attribute,
    Text,
    CDataSection,
    ProcessingInstruction,
    Comment,
    Document,
    DocumentType,
    DocumentFragment,
}

impl NodeType {
    pub fn from_code(value: u16) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CDataSection),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            _ => None,
        }
    }

    /// DOM `nodeType` code
    pub fn code(self) -> u16 {
        match self {
            NodeType::Element => 1,
            NodeType::Attribute => 2,
            NodeType::Text => 3,
            NodeType::CDataSection => 4,
            NodeType::ProcessingInstruction => 7,
            NodeType::Comment => 8,
            NodeType::Document => 9,
            NodeType::DocumentType => 10,
            NodeType::DocumentFragment => 11,
        }
    }
}

/// Namespace-qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualName {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local: String,
}

impl QualName {
    /// Name with no namespace and no prefix
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local: local.into(),
        }
    }

    pub fn new(namespace: Option<String>, prefix: Option<String>, local: impl Into<String>) -> Self {
        Self {
            namespace,
            prefix,
            local: local.into(),
        }
    }

    /// `prefix:local`, or `local` without a prefix
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }

    /// Same attribute key: (namespace, local name)
    pub fn same_key(&self, namespace: Option<&str>, local: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local == local
    }
}

/// Document payload
#[derive(Debug, Clone)]
pub struct DocumentData {
    pub url: String,
    pub content_type: ContentType,
}

/// DOCTYPE payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctypeData {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

/// Element payload
#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: QualName,
    /// Attr nodes in insertion order, unique per (namespace, local name)
    pub(crate) attrs: Vec<NodeId>,
}

impl ElementData {
    pub fn new(name: QualName) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    /// Attribute node ids in insertion order
    pub fn attrs(&self) -> &[NodeId] {
        &self.attrs
    }
}

/// Attr payload
#[derive(Debug, Clone)]
pub struct AttrData {
    pub name: QualName,
    pub value: String,
    /// Element holding this attribute (non-owning)
    pub(crate) owner_element: Option<NodeId>,
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    Document(DocumentData),
    DocumentFragment,
    DocumentType(DoctypeData),
    Element(ElementData),
    Attr(AttrData),
    Text(String),
    CDataSection(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Document(_) => NodeType::Document,
            NodeData::DocumentFragment => NodeType::DocumentFragment,
            NodeData::DocumentType(_) => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Attr(_) => NodeType::Attribute,
            NodeData::Text(_) => NodeType::Text,
            NodeData::CDataSection(_) => NodeType::CDataSection,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
        }
    }

    /// Character data of Text, CDATA, Comment and PI nodes
    pub fn character_data(&self) -> Option<&str> {
        match self {
            NodeData::Text(data)
            | NodeData::CDataSection(data)
            | NodeData::Comment(data)
            | NodeData::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    pub(crate) fn character_data_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeData::Text(data)
            | NodeData::CDataSection(data)
            | NodeData::Comment(data)
            | NodeData::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Text and CDATA sections (the DOM `Text` interface)
    pub fn is_text_like(&self) -> bool {
        matches!(self, NodeData::Text(_) | NodeData::CDataSection(_))
    }
}

/// DOM Node - link record plus payload
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    /// Creating document; a Document points at itself
    pub(crate) owner_document: NodeId,
    pub(crate) base_uri: Option<String>,
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(owner_document: NodeId, data: NodeData) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            owner_document,
            base_uri: None,
            data,
        }
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    #[inline]
    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    #[inline]
    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    #[inline]
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    #[inline]
    pub fn owner_document(&self) -> NodeId {
        self.owner_document
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_attr(&self) -> Option<&AttrData> {
        match &self.data {
            NodeData::Attr(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_attr_mut(&mut self) -> Option<&mut AttrData> {
        match &mut self.data {
            NodeData::Attr(a) => Some(a),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}
