//! Filter name to sort-key element mapping.

use listsort_core::logging::targets;
use listsort_core::{Document, NodeId};

use crate::config::{markup, ListSortConfig};
use crate::error::Result;
use crate::sort_key::{FilterKind, SortDirection};

/// Per-filter record: current direction and the sort-key elements it orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    /// The filter name shared by the controls and the sort keys.
    pub name: String,
    /// How the raw values are compared.
    pub kind: FilterKind,
    /// Direction used by the next activation.
    pub direction: SortDirection,
    /// Sort-key elements whose back-reference names this filter, in
    /// document order.
    pub elements: Vec<NodeId>,
    /// Filter controls declaring this name.
    pub controls: Vec<NodeId>,
}

impl FilterEntry {
    fn new(name: String, direction: SortDirection, control: NodeId) -> Self {
        Self {
            kind: FilterKind::from_filter_name(&name),
            name,
            direction,
            elements: Vec::new(),
            controls: vec![control],
        }
    }
}

/// All filter entries, in order of first declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterIndex {
    entries: Vec<FilterEntry>,
}

impl FilterIndex {
    /// Build the index from discovered filter controls and sort-key elements.
    ///
    /// Controls without a name are skipped. A direction other than `asc` or
    /// `desc` is read as `desc`. Controls sharing a name share one entry whose
    /// direction comes from the last of them. Sort keys whose back-reference
    /// matches no filter are left out.
    pub fn build(
        doc: &Document,
        config: &ListSortConfig,
        filter_controls: &[NodeId],
        sorting_elements: &[NodeId],
    ) -> Result<Self> {
        let mut index = Self::default();
        for &control in filter_controls {
            let Some(name) = doc.attribute(control, &config.filters)?.filter(|n| !n.is_empty()) else {
                tracing::warn!(target: targets::FILTER_INDEX, ?control, "filter control without a name skipped");
                continue;
            };

            let declared = doc.attribute(control, markup::DIRECTION_ATTR)?;
            let direction = match declared.and_then(SortDirection::from_markup) {
                Some(direction) => direction,
                None => {
                    tracing::warn!(
                        target: targets::FILTER_INDEX,
                        filter = name,
                        value = declared.unwrap_or_default(),
                        "unknown sort direction, using desc"
                    );
                    SortDirection::Descending
                }
            };

            match index.get_mut(name) {
                Some(entry) => {
                    entry.controls.push(control);
                    entry.direction = direction;
                }
                None => {
                    let name = name.to_string();
                    index.entries.push(FilterEntry::new(name, direction, control));
                }
            }
        }

        index.bind_elements(doc, sorting_elements)?;
        tracing::debug!(target: targets::FILTER_INDEX, filters = index.len(), "filter index built");
        Ok(index)
    }

    /// Point every entry at a fresh set of sort-key elements.
    ///
    /// Used after a render, when the previous elements were destroyed with
    /// the old list subtree.
    pub fn rebind(&mut self, doc: &Document, sorting_elements: &[NodeId]) -> Result<()> {
        for entry in &mut self.entries {
            entry.elements.clear();
        }
        self.bind_elements(doc, sorting_elements)
    }

    fn bind_elements(&mut self, doc: &Document, sorting_elements: &[NodeId]) -> Result<()> {
        for &element in sorting_elements {
            let target = doc.attribute(element, markup::SORTING_TARGET_ATTR)?;
            match target.and_then(|name| self.get_mut(name)) {
                Some(entry) => entry.elements.push(element),
                None => tracing::trace!(
                    target: targets::FILTER_INDEX,
                    ?element,
                    sorting_target = target.unwrap_or_default(),
                    "sort key matches no filter"
                ),
            }
        }
        Ok(())
    }

    /// Look up an entry by filter name.
    pub fn get(&self, name: &str) -> Option<&FilterEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Look up an entry by filter name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FilterEntry> {
        self.entries.iter_mut().find(|entry| entry.name == name)
    }

    /// The entry owning a filter control.
    pub fn entry_for_control(&self, control: NodeId) -> Option<&FilterEntry> {
        self.entries
            .iter()
            .find(|entry| entry.controls.contains(&control))
    }

    /// Iterate over entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterEntry> {
        self.entries.iter()
    }

    /// Filter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Every filter control across all entries.
    pub fn controls(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries
            .iter()
            .flat_map(|entry| entry.controls.iter().copied())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
