//! Markup discovery.

use listsort_core::logging::targets;
use listsort_core::{Document, NodeId};

use crate::config::ListSortConfig;
use crate::error::{Error, Result};

/// The nodes a configuration selects inside a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMarkup {
    /// The list container (first match in document order).
    pub list: NodeId,
    /// Rows inside the list container, in document order.
    pub rows: Vec<NodeId>,
    /// Filter controls inside the root.
    pub filter_controls: Vec<NodeId>,
    /// Sort-key elements inside the root.
    pub sorting_elements: Vec<NodeId>,
}

/// Locate the list container, its rows, the filter controls and the
/// sort-key elements below `root`.
///
/// A missing list container is fatal. An empty list is not.
pub fn resolve(doc: &Document, root: NodeId, config: &ListSortConfig) -> Result<ResolvedMarkup> {
    if !doc.contains(root) {
        return Err(Error::RootNotFound(root));
    }

    let list = doc
        .query_selector(root, &config.list_selector())?
        .ok_or_else(|| Error::ListNotFound {
            attribute: config.list.clone(),
        })?;
    let rows = doc.query_selector_all(list, &config.row_selector())?;
    let filter_controls = doc.query_selector_all(root, &config.filter_selector())?;
    let sorting_elements = doc.query_selector_all(root, &config.sorting_selector())?;

    if rows.is_empty() {
        tracing::warn!(target: targets::CONFIG, attribute = %config.list_items, "list has no rows");
    }
    tracing::debug!(
        target: targets::CONFIG,
        rows = rows.len(),
        filters = filter_controls.len(),
        sort_keys = sorting_elements.len(),
        "markup resolved"
    );

    Ok(ResolvedMarkup {
        list,
        rows,
        filter_controls,
        sorting_elements,
    })
}
