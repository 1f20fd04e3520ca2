//! Prelude module for ListSort.
//!
//! ```ignore
//! use listsort::prelude::*;
//! ```
//!
//! This provides access to:
//! - The widget and its configuration (`ListSort`, `ListSortConfig`)
//! - Rendered state (`ViewHandle`, `FilterIndex`, `SortDirection`)
//! - The document substrate (`SharedDocument`, `Document`, `NodeId`, `Selector`)

// ============================================================================
// Widget
// ============================================================================

pub use crate::{Error, ListSort, ListSortConfig, Result};

// ============================================================================
// Rendered State
// ============================================================================

pub use crate::{FilterEntry, FilterIndex, FilterKind, PageLayout, SortDirection, ViewHandle};

// ============================================================================
// Document
// ============================================================================

pub use listsort_core::{Document, EventKind, NodeId, Selector, SharedDocument};
