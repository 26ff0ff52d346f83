//! Document - node factories and document-level queries
//!
//! Every node is created detached and owned by the document passed to the
//! factory. Names are checked against the XML `Name` grammar before any
//! node is allocated.

use std::convert::Infallible;

use crate::config::ContentType;
use crate::error::{DomError, DomResult};
use crate::names::{validate_and_extract, validate_name, validate_qualified_name};
use crate::namespace::HTML_NAMESPACE;
use crate::node::{AttrData, DoctypeData, DocumentData, ElementData, NodeData, QualName};
use crate::tree::DomTree;
use crate::NodeId;

impl DomTree {
    /// Create an empty XML document using the configured URL and content type
    pub fn create_document(&mut self) -> DomResult<NodeId> {
        let url = self.config().default_url.clone();
        let content_type = self.config().content_type;
        self.create_document_with(&url, content_type)
    }

    /// Create an empty document with an explicit URL and content type
    pub fn create_document_with(&mut self, url: &str, content_type: ContentType) -> DomResult<NodeId> {
        let doc = self.alloc_document(NodeData::Document(DocumentData {
            url: url.to_string(),
            content_type,
        }))?;
        tracing::debug!("Created {} document {:?} at {}", content_type.mime(), doc, url);
        Ok(doc)
    }

    fn document_data(&self, doc: NodeId) -> DomResult<&DocumentData> {
        match &self.node(doc)?.data {
            NodeData::Document(data) => Ok(data),
            _ => Err(DomError::InvalidState("node is not a document")),
        }
    }

    /// Document URL
    pub fn url(&self, doc: NodeId) -> Option<&str> {
        self.document_data(doc).ok().map(|d| d.url.as_str())
    }

    pub fn content_type(&self, doc: NodeId) -> Option<ContentType> {
        self.document_data(doc).ok().map(|d| d.content_type)
    }

    /// True if the node's owner document is an HTML document
    pub fn is_html_document(&self, id: NodeId) -> bool {
        self.node_document(id)
            .and_then(|doc| self.content_type(doc))
            .is_some_and(|ct| ct == ContentType::Html)
    }

    /// First Element child of the document
    pub fn document_element(&self, doc: NodeId) -> Option<NodeId> {
        self.children(doc).find(|&c| self.is_element(c))
    }

    /// First DocumentType child of the document
    pub fn doctype(&self, doc: NodeId) -> Option<NodeId> {
        self.children(doc)
            .find(|&c| matches!(self.node_data(c), Some(NodeData::DocumentType(_))))
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// `createElement`: HTML documents lowercase the name and use the
    /// HTML namespace, XHTML documents use the HTML namespace, XML
    /// documents use none
    pub fn create_element(&mut self, doc: NodeId, local_name: &str) -> DomResult<NodeId> {
        validate_name(local_name)?;
        let content_type = self.document_data(doc)?.content_type;
        let (local, namespace) = match content_type {
            ContentType::Html => (local_name.to_ascii_lowercase(), Some(HTML_NAMESPACE.to_string())),
            ContentType::Xhtml => (local_name.to_string(), Some(HTML_NAMESPACE.to_string())),
            ContentType::Xml => (local_name.to_string(), None),
        };
        let name = QualName::new(namespace, None, local);
        self.alloc(doc, NodeData::Element(ElementData::new(name)))
    }

    /// `createElementNS`
    pub fn create_element_ns(
        &mut self,
        doc: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<NodeId> {
        let name = validate_and_extract(namespace, qualified_name)?;
        self.document_data(doc)?;
        self.alloc(doc, NodeData::Element(ElementData::new(name)))
    }

    pub fn create_document_fragment(&mut self, doc: NodeId) -> DomResult<NodeId> {
        self.document_data(doc)?;
        self.alloc(doc, NodeData::DocumentFragment)
    }

    pub fn create_text_node(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        self.document_data(doc)?;
        self.alloc(doc, NodeData::Text(data.to_string()))
    }

    /// `createCDATASection`: rejects `]]>` in the data and HTML documents
    pub fn create_cdata_section(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        if self.document_data(doc)?.content_type == ContentType::Html {
            return Err(DomError::NotSupported("CDATA sections in HTML documents"));
        }
        if data.contains("]]>") {
            return Err(DomError::InvalidCharacter("CDATA section data contains ']]>'".into()));
        }
        self.alloc(doc, NodeData::CDataSection(data.to_string()))
    }

    pub fn create_comment(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        self.document_data(doc)?;
        self.alloc(doc, NodeData::Comment(data.to_string()))
    }

    /// `createProcessingInstruction`: target must be a Name, data must not
    /// contain `?>`
    pub fn create_processing_instruction(
        &mut self,
        doc: NodeId,
        target: &str,
        data: &str,
    ) -> DomResult<NodeId> {
        validate_name(target)?;
        if data.contains("?>") {
            return Err(DomError::InvalidCharacter(
                "processing instruction data contains '?>'".into(),
            ));
        }
        self.document_data(doc)?;
        self.alloc(
            doc,
            NodeData::ProcessingInstruction {
                target: target.to_string(),
                data: data.to_string(),
            },
        )
    }

    /// `createAttribute`: HTML documents lowercase the name
    pub fn create_attribute(&mut self, doc: NodeId, local_name: &str) -> DomResult<NodeId> {
        validate_name(local_name)?;
        let local = match self.document_data(doc)?.content_type {
            ContentType::Html => local_name.to_ascii_lowercase(),
            _ => local_name.to_string(),
        };
        self.alloc_attr(doc, QualName::local(local), String::new())
    }

    /// `createAttributeNS`
    pub fn create_attribute_ns(
        &mut self,
        doc: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<NodeId> {
        let name = validate_and_extract(namespace, qualified_name)?;
        self.document_data(doc)?;
        self.alloc_attr(doc, name, String::new())
    }

    pub(crate) fn alloc_attr(&mut self, doc: NodeId, name: QualName, value: String) -> DomResult<NodeId> {
        self.alloc(
            doc,
            NodeData::Attr(AttrData {
                name,
                value,
                owner_element: None,
            }),
        )
    }

    /// Create a detached DocumentType owned by `doc`
    pub fn create_document_type(
        &mut self,
        doc: NodeId,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> DomResult<NodeId> {
        validate_qualified_name(name)?;
        self.document_data(doc)?;
        self.alloc(
            doc,
            NodeData::DocumentType(DoctypeData {
                name: name.to_string(),
                public_id: public_id.to_string(),
                system_id: system_id.to_string(),
            }),
        )
    }

    // ------------------------------------------------------------------
    // Unsupported surface
    // ------------------------------------------------------------------

    /// Events are handled outside this crate
    pub fn create_event(&self, _interface: &str) -> DomResult<Infallible> {
        Err(unsupported("createEvent"))
    }

    /// Ranges are handled outside this crate
    pub fn create_range(&self, _doc: NodeId) -> DomResult<Infallible> {
        Err(unsupported("createRange"))
    }

    pub fn create_node_iterator(&self, _root: NodeId, _what_to_show: u32) -> DomResult<Infallible> {
        Err(unsupported("createNodeIterator"))
    }

    pub fn create_tree_walker(&self, _root: NodeId, _what_to_show: u32) -> DomResult<Infallible> {
        Err(unsupported("createTreeWalker"))
    }

    /// Selector matching lives in a separate component
    pub fn query_selector(&self, _root: NodeId, _selectors: &str) -> DomResult<Option<NodeId>> {
        Err(unsupported("querySelector"))
    }

    pub fn query_selector_all(&self, _root: NodeId, _selectors: &str) -> DomResult<Vec<NodeId>> {
        Err(unsupported("querySelectorAll"))
    }
}

fn unsupported(operation: &'static str) -> DomError {
    tracing::warn!("{} is not supported by fos-dom-core", operation);
    DomError::NotSupported(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use crate::namespace::SVG_NAMESPACE;

    #[test]
    fn test_create_element_rejects_bad_names() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();
        let before = tree.len();

        let err = tree.create_element(doc, "in valid").unwrap_err();
        assert!(matches!(err, DomError::InvalidCharacter(_)));
        assert_eq!(err.name(), "InvalidCharacterError");
        assert!(tree.create_element(doc, "").is_err());
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_nodes_start_detached_and_owned() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();
        let created = [
            tree.create_element(doc, "el").unwrap(),
            tree.create_text_node(doc, "text").unwrap(),
            tree.create_comment(doc, "comment").unwrap(),
            tree.create_cdata_section(doc, "raw").unwrap(),
            tree.create_processing_instruction(doc, "pi", "data").unwrap(),
            tree.create_document_fragment(doc).unwrap(),
            tree.create_attribute(doc, "attr").unwrap(),
            tree.create_document_type(doc, "html", "", "").unwrap(),
        ];
        for id in created {
            assert_eq!(tree.parent_node(id), None);
            assert_eq!(tree.owner_document(id), Some(doc));
        }
    }

    #[test]
    fn test_cdata_and_pi_terminators() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();

        assert!(matches!(
            tree.create_cdata_section(doc, "a]]>b"),
            Err(DomError::InvalidCharacter(_))
        ));
        assert!(matches!(
            tree.create_processing_instruction(doc, "pi", "a?>b"),
            Err(DomError::InvalidCharacter(_))
        ));
        assert!(matches!(
            tree.create_processing_instruction(doc, "bad target", "x"),
            Err(DomError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_html_document_factories() {
        let mut tree = DomTree::new();
        let doc = tree.create_document_with("http://example.com/", ContentType::Html).unwrap();
        let div = tree.create_element(doc, "DIV").unwrap();

        let element = tree.get(div).unwrap().as_element().unwrap();
        assert_eq!(element.name.local, "div");
        assert_eq!(element.name.namespace.as_deref(), Some(HTML_NAMESPACE));
        assert_eq!(tree.tag_name(div).as_deref(), Some("DIV"));
        assert!(matches!(
            tree.create_cdata_section(doc, "x"),
            Err(DomError::NotSupported(_))
        ));

        let attr = tree.create_attribute(doc, "CLASS").unwrap();
        assert_eq!(tree.node_name(attr).as_deref(), Some("class"));
    }

    #[test]
    fn test_create_element_ns() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();
        let rect = tree
            .create_element_ns(doc, Some(SVG_NAMESPACE), "svg:rect")
            .unwrap();

        assert_eq!(tree.local_name(rect).as_deref(), Some("rect"));
        assert_eq!(tree.prefix(rect).as_deref(), Some("svg"));
        assert_eq!(tree.tag_name(rect).as_deref(), Some("svg:rect"));
        assert!(matches!(
            tree.create_element_ns(doc, None, "svg:rect"),
            Err(DomError::Namespace(_))
        ));
    }

    #[test]
    fn test_document_element_and_doctype_follow_tree() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();
        assert_eq!(tree.document_element(doc), None);
        assert_eq!(tree.doctype(doc), None);

        let doctype = tree.create_document_type(doc, "root", "", "root.dtd").unwrap();
        let root = tree.create_element(doc, "root").unwrap();
        tree.append_child(doc, doctype).unwrap();
        tree.append_child(doc, root).unwrap();
        assert_eq!(tree.document_element(doc), Some(root));
        assert_eq!(tree.doctype(doc), Some(doctype));

        tree.remove_child(doc, root).unwrap();
        assert_eq!(tree.document_element(doc), None);
        assert_eq!(tree.node_type(doctype), Some(NodeType::DocumentType));
    }

    #[test]
    fn test_factories_need_a_document() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();
        let el = tree.create_element(doc, "el").unwrap();

        assert!(matches!(tree.create_text_node(el, "x"), Err(DomError::InvalidState(_))));
        tree.release(el).unwrap();
        assert_eq!(tree.create_comment(el, "x"), Err(DomError::StaleNode(el)));
    }

    #[test]
    fn test_unsupported_surface() {
        let mut tree = DomTree::new();
        let doc = tree.create_document().unwrap();

        assert!(matches!(tree.create_event("Event"), Err(DomError::NotSupported(_))));
        assert!(matches!(tree.create_range(doc), Err(DomError::NotSupported(_))));
        assert!(matches!(tree.create_node_iterator(doc, 0xFFFF_FFFF), Err(DomError::NotSupported(_))));
        assert!(matches!(tree.create_tree_walker(doc, 0x1), Err(DomError::NotSupported(_))));
        assert_eq!(tree.query_selector(doc, "div"), Err(DomError::NotSupported("querySelector")));
        assert_eq!(
            tree.query_selector_all(doc, "div"),
            Err(DomError::NotSupported("querySelectorAll"))
        );
    }
}
