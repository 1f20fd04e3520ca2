//! Pagination.
//!
//! [`PageLayout`] holds the page arithmetic. [`Paginator`] owns the
//! generated page selector: a container appended to the widget root holding
//! one button per page, exactly one of them active.

use std::ops::Range;

use listsort_core::logging::targets;
use listsort_core::{DomEvent, Document, EventKind, ListenerHandle, NodeId, PerfSpan, Selector};

use crate::config::markup;
use crate::error::{Error, Result};

const DISPLAY: &str = "display";
const HIDDEN: &str = "none";
const SHOWN: &str = "block";

/// Page arithmetic for a row count and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    row_count: usize,
    page_size: usize,
}

impl PageLayout {
    /// Create a layout. A page size of zero is treated as one.
    pub fn new(row_count: usize, page_size: usize) -> Self {
        Self {
            row_count,
            page_size: page_size.max(1),
        }
    }

    /// Number of rows laid out.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(row_count / page_size)`.
    pub fn page_count(&self) -> usize {
        self.row_count.div_ceil(self.page_size)
    }

    /// Row indices shown for a 1-based page number.
    ///
    /// Page numbers of 0 and 1 both map to the first page. The range is
    /// clipped to the rows that exist.
    pub fn bounds(&self, page: usize) -> Range<usize> {
        let start = if page <= 1 {
            0
        } else {
            self.page_size.saturating_mul(page - 1)
        };
        let end = start.saturating_add(self.page_size);
        start.min(self.row_count)..end.min(self.row_count)
    }

    /// Rows hidden when the selector is first built: everything after the
    /// first page.
    pub fn initially_hidden(&self) -> Range<usize> {
        self.page_size.min(self.row_count)..self.row_count
    }
}

/// Remove every page selector container in the document holding `node`.
///
/// Returns the number of containers removed.
pub fn remove_selectors(doc: &mut Document, node: NodeId) -> Result<usize> {
    let top = doc.tree_root(node)?;
    let marker = Selector::has(markup::PAGINATION_CONTAINER_ATTR);
    let mut containers = doc.query_selector_all(top, &marker)?;
    if doc.matches(top, &marker) {
        containers.push(top);
    }
    for &container in &containers {
        if doc.contains(container) {
            doc.destroy(container)?;
        }
    }
    if !containers.is_empty() {
        tracing::trace!(target: targets::PAGINATION, removed = containers.len(), "page selector removed");
    }
    Ok(containers.len())
}

/// The live page selector.
#[derive(Debug)]
pub struct Paginator {
    container: NodeId,
    buttons: Vec<NodeId>,
    listeners: Vec<ListenerHandle>,
    layout: PageLayout,
}

impl Paginator {
    /// Build a page selector for `rows` under `root`.
    ///
    /// Any existing selector in the document is removed first. Rows after
    /// the first page are hidden and the first button is marked active.
    /// `make_handler` is called once per page number to produce that
    /// button's click handler.
    #[tracing::instrument(skip_all, target = "listsort::pagination", level = "debug")]
    pub fn build<F, H>(
        doc: &mut Document,
        root: NodeId,
        rows: &[NodeId],
        page_size: usize,
        mut make_handler: F,
    ) -> Result<Self>
    where
        F: FnMut(usize) -> H,
        H: Fn(&DomEvent) + Send + Sync + 'static,
    {
        let _perf = PerfSpan::new("paginate");
        let layout = PageLayout::new(rows.len(), page_size);

        remove_selectors(doc, root)?;

        let container = doc.create_element(markup::PAGINATION_CONTAINER_TAG);
        doc.add_class(container, markup::PAGINATION_CONTAINER_CLASS)?;
        doc.set_attribute(container, markup::PAGINATION_CONTAINER_ATTR, "")?;
        doc.append_child(root, container)?;

        for &row in &rows[layout.initially_hidden()] {
            doc.set_style_property(row, DISPLAY, HIDDEN)?;
        }

        let page_count = layout.page_count();
        let mut buttons = Vec::with_capacity(page_count);
        let mut listeners = Vec::with_capacity(page_count);
        for page in 1..=page_count {
            let button = doc.create_element(markup::PAGINATION_BUTTON_TAG);
            doc.set_text_content(button, page.to_string())?;
            doc.add_class(button, markup::PAGINATION_BUTTON_CLASS)?;
            if page == 1 {
                doc.add_class(button, markup::ACTIVE_CLASS)?;
            }
            doc.set_attribute(button, markup::PAGINATION_BUTTON_ATTR, page.to_string())?;
            doc.append_child(container, button)?;
            listeners.push(doc.add_event_listener(button, EventKind::Click, make_handler(page))?);
            buttons.push(button);
        }

        tracing::debug!(
            target: targets::PAGINATION,
            rows = layout.row_count(),
            page_size = layout.page_size(),
            page_count,
            "page selector built"
        );
        Ok(Self {
            container,
            buttons,
            listeners,
            layout,
        })
    }

    /// The container element.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Buttons in page order.
    pub fn buttons(&self) -> &[NodeId] {
        &self.buttons
    }

    /// The layout the selector was built for.
    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.layout.page_count()
    }

    /// Make `page` the active page: move the active class to its button,
    /// hide every row, then show the rows in its bounds.
    ///
    /// `rows` is the current row collection; indices past its end are
    /// skipped.
    pub fn show_page(&self, doc: &mut Document, rows: &[NodeId], page: usize) -> Result<()> {
        if page == 0 || page > self.page_count() {
            return Err(Error::PageOutOfRange {
                page,
                page_count: self.page_count(),
            });
        }

        self.mark_active(doc, page)?;

        for &row in rows {
            doc.set_style_property(row, DISPLAY, HIDDEN)?;
        }
        let bounds = PageLayout::new(rows.len(), self.layout.page_size()).bounds(page);
        for &row in &rows[bounds.clone()] {
            doc.set_style_property(row, DISPLAY, SHOWN)?;
        }
        tracing::debug!(target: targets::PAGINATION, page, start = bounds.start, end = bounds.end, "page shown");
        Ok(())
    }

    fn mark_active(&self, doc: &mut Document, page: usize) -> Result<()> {
        for &button in &self.buttons {
            if doc.contains(button) {
                doc.remove_class(button, markup::ACTIVE_CLASS)?;
            }
        }
        if let Some(&button) = self.buttons.get(page - 1) {
            doc.add_class(button, markup::ACTIVE_CLASS)?;
        }
        Ok(())
    }

    /// The 1-based number of the button carrying the active class.
    pub fn active_page(&self, doc: &Document) -> Option<usize> {
        self.buttons
            .iter()
            .position(|&button| doc.has_class(button, markup::ACTIVE_CLASS).unwrap_or(false))
            .map(|index| index + 1)
    }

    /// Unregister the button handlers and remove the container.
    pub fn teardown(self, doc: &mut Document) -> Result<()> {
        for handle in self.listeners {
            doc.remove_event_listener(handle);
        }
        if doc.contains(self.container) {
            doc.destroy(self.container)?;
        }
        Ok(())
    }
}
