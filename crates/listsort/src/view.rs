//! Snapshot of the rendered list.

use listsort_core::NodeId;

/// The list container and rows produced by the latest render.
///
/// Every render replaces the list subtree, so node ids from an older handle
/// refer to destroyed nodes. Compare [`generation`](Self::generation) to tell
/// handles apart and always re-fetch after an activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHandle {
    list: NodeId,
    rows: Vec<NodeId>,
    generation: u64,
}

impl ViewHandle {
    pub(crate) fn new(list: NodeId, rows: Vec<NodeId>, generation: u64) -> Self {
        Self {
            list,
            rows,
            generation,
        }
    }

    /// The list container.
    pub fn list(&self) -> NodeId {
        self.list
    }

    /// Rows in rendered order.
    pub fn rows(&self) -> &[NodeId] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render counter: 0 for the markup found at initialization, incremented
    /// by every render.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
