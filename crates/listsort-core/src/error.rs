//! Error types for the document tree.

use std::fmt;

use crate::document::NodeId;

/// Errors that can occur during document operations.
#[derive(Debug)]
pub enum DomError {
    /// The node ID is invalid or the node has been destroyed.
    InvalidNodeId,
    /// Attempted to insert a node into its own subtree.
    CircularParentage,
    /// The reference node is not a child of the given parent.
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node that was expected to be one of its children.
        child: NodeId,
    },
    /// An attribute selector could not be parsed.
    InvalidSelector {
        /// The offending selector text.
        selector: String,
        /// What went wrong.
        message: String,
    },
    /// A markup fragment could not be parsed.
    Markup(String),
    /// The underlying XML reader failed.
    Xml(quick_xml::Error),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNodeId => write!(f, "Invalid or destroyed node ID"),
            Self::CircularParentage => {
                write!(f, "Cannot insert a node into its own subtree")
            }
            Self::NotAChild { parent, child } => {
                write!(f, "Node {child:?} is not a child of {parent:?}")
            }
            Self::InvalidSelector { selector, message } => {
                write!(f, "Invalid selector '{selector}': {message}")
            }
            Self::Markup(msg) => write!(f, "Malformed markup: {msg}"),
            Self::Xml(err) => write!(f, "Markup reader error: {err}"),
        }
    }
}

impl std::error::Error for DomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for DomError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err)
    }
}

impl DomError {
    /// Create a selector error.
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}

/// Result type for document operations.
pub type DomResult<T> = std::result::Result<T, DomError>;
