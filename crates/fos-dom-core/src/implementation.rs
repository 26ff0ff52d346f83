//! DOMImplementation
//!
//! Obtained per document with [`DomTree::implementation`]. It holds only
//! the document handle, so copies are free and there is no shared state.

use crate::config::ContentType;
use crate::error::{DomError, DomResult};
use crate::names::validate_and_extract;
use crate::namespace::HTML_NAMESPACE;
use crate::node::NodeData;
use crate::tree::DomTree;
use crate::NodeId;

/// Document-independent factories, bound to the document they came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomImplementation {
    document: NodeId,
}

impl DomTree {
    /// `document.implementation`
    pub fn implementation(&self, doc: NodeId) -> DomResult<DomImplementation> {
        match self.node(doc)?.data {
            NodeData::Document(_) => Ok(DomImplementation { document: doc }),
            _ => Err(DomError::InvalidState("node is not a document")),
        }
    }
}

impl DomImplementation {
    /// Document this implementation belongs to
    pub fn document(self) -> NodeId {
        self.document
    }

    /// `createDocumentType`: a detached doctype owned by this document
    pub fn create_document_type(
        self,
        tree: &mut DomTree,
        qualified_name: &str,
        public_id: &str,
        system_id: &str,
    ) -> DomResult<NodeId> {
        tree.create_document_type(self.document, qualified_name, public_id, system_id)
    }

    /// `createDocument`: a new XML document holding `doctype` and then a
    /// document element named `qualified_name` (none when it is empty)
    ///
    /// Documents in the HTML namespace get the XHTML content type.
    pub fn create_document(
        self,
        tree: &mut DomTree,
        namespace: Option<&str>,
        qualified_name: &str,
        doctype: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let name = if qualified_name.is_empty() {
            None
        } else {
            Some(validate_and_extract(namespace, qualified_name)?)
        };
        if let Some(doctype) = doctype {
            if !matches!(tree.node(doctype)?.data, NodeData::DocumentType(_)) {
                return Err(DomError::InvalidState("node is not a doctype"));
            }
        }

        let content_type = match name.as_ref().and_then(|n| n.namespace.as_deref()) {
            Some(HTML_NAMESPACE) => ContentType::Xhtml,
            _ => ContentType::Xml,
        };
        let url = tree.config().default_url.clone();
        let doc = tree.create_document_with(&url, content_type)?;

        if let Some(doctype) = doctype {
            tree.append_child(doc, doctype)?;
        }
        if let Some(name) = name {
            let element = tree.create_element_ns(doc, name.namespace.as_deref(), &name.qualified())?;
            tree.append_child(doc, element)?;
        }
        Ok(doc)
    }

    /// `createHTMLDocument`: doctype, `<html>` with `<head>` (holding a
    /// `<title>` when one is given) and `<body>`
    pub fn create_html_document(self, tree: &mut DomTree, title: Option<&str>) -> DomResult<NodeId> {
        let url = tree.config().default_url.clone();
        let doc = tree.create_document_with(&url, ContentType::Html)?;

        let doctype = tree.create_document_type(doc, "html", "", "")?;
        let html = tree.create_element(doc, "html")?;
        let head = tree.create_element(doc, "head")?;
        let body = tree.create_element(doc, "body")?;
        tree.append(doc, &[doctype, html])?;
        tree.append(html, &[head, body])?;

        if let Some(title) = title {
            let title_element = tree.create_element(doc, "title")?;
            let text = tree.create_text_node(doc, title)?;
            tree.append_child(title_element, text)?;
            tree.append_child(head, title_element)?;
        }
        Ok(doc)
    }

    /// `hasFeature` always answers true
    pub fn has_feature(self) -> bool {
        true
    }
}
