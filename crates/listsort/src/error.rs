//! Error types for the list widget.

use listsort_core::{DomError, NodeId};

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, sorting, or paginating a list.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration argument was not a structured options object.
    #[error("the config parameter should be a literal object, got {found}")]
    ConfigNotObject { found: &'static str },

    /// An option carried a value of the wrong type or out of range.
    #[error("Invalid value for option '{option}': {message}")]
    InvalidOption {
        option: &'static str,
        message: String,
    },

    /// The root node the widget was constructed with no longer exists.
    #[error("Root node {0:?} does not exist")]
    RootNotFound(NodeId),

    /// No element inside the root carries the list marker.
    #[error("No list container matching [{attribute}] inside the root node")]
    ListNotFound { attribute: String },

    /// The list container has no parent, so it cannot be replaced.
    #[error("List container {0:?} is not attached to a parent")]
    ListDetached(NodeId),

    /// An operation needing discovered markup ran before `init`.
    #[error("The list widget has not been initialized")]
    NotInitialized,

    /// No filter control declared the requested filter name.
    #[error("No filter named '{name}'")]
    UnknownFilter { name: String },

    /// The node does not carry a filter name.
    #[error("Node {0:?} is not a filter control")]
    NotAFilterControl(NodeId),

    /// Page selection was requested while no page selector exists.
    #[error("Pagination is not active")]
    PaginationInactive,

    /// The requested page does not exist.
    #[error("Page {page} is out of range (1..={page_count})")]
    PageOutOfRange { page: usize, page_count: usize },

    /// A document operation failed.
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl Error {
    /// Create an invalid option error.
    pub fn invalid_option(option: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            message: message.into(),
        }
    }

    /// Create an unknown filter error.
    pub fn unknown_filter(name: impl Into<String>) -> Self {
        Self::UnknownFilter { name: name.into() }
    }
}
