//! DOM Errors
//!
//! Every fallible tree operation returns [`DomResult`]. An operation that
//! fails leaves the tree exactly as it found it.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A name fails the XML `Name`/`QName` grammar, or a CDATA/PI payload
    /// contains its terminator
    #[error("Invalid character: {0}")]
    InvalidCharacter(String),

    /// The edit would create a cycle, put a node under a parent that cannot
    /// hold it, or break the single document element/doctype rule
    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(&'static str),

    /// A reference or old child is not a child of the given parent
    #[error("Not found: {0}")]
    NotFound(&'static str),

    /// Deliberately unimplemented surface, or a variant that forbids the call
    #[error("Not supported: {0}")]
    NotSupported(&'static str),

    /// Namespace and prefix do not agree
    #[error("Namespace error: {0}")]
    Namespace(String),

    /// Character offset past the end of the data
    #[error("Offset {offset} exceeds length {length}")]
    IndexSize { offset: usize, length: usize },

    /// The attribute already belongs to another element
    #[error("Attribute is in use by another element")]
    InUseAttribute,

    /// The node is in a state that forbids the operation
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// Every arena slot index is in use
    #[error("Node arena is full")]
    CapacityExceeded,

    /// The handle refers to a node that has been released
    #[error("Stale node handle {0:?}")]
    StaleNode(NodeId),
}

impl DomError {
    /// DOM exception name for this error
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidCharacter(_) => "InvalidCharacterError",
            Self::HierarchyRequest(_) => "HierarchyRequestError",
            Self::NotFound(_) => "NotFoundError",
            Self::NotSupported(_) => "NotSupportedError",
            Self::Namespace(_) => "NamespaceError",
            Self::IndexSize { .. } => "IndexSizeError",
            Self::InUseAttribute => "InUseAttributeError",
            Self::CapacityExceeded => "QuotaExceededError",
            Self::InvalidState(_) | Self::StaleNode(_) => "InvalidStateError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names() {
        assert_eq!(DomError::HierarchyRequest("cycle").name(), "HierarchyRequestError");
        assert_eq!(DomError::NotFound("child").name(), "NotFoundError");
        assert_eq!(DomError::InvalidCharacter("a b".into()).name(), "InvalidCharacterError");
        assert_eq!(DomError::NotSupported("createRange").name(), "NotSupportedError");
        assert_eq!(DomError::CapacityExceeded.name(), "QuotaExceededError");
    }

    #[test]
    fn test_error_display() {
        let err = DomError::IndexSize { offset: 7, length: 3 };
        assert_eq!(err.to_string(), "Offset 7 exceeds length 3");
    }
}
