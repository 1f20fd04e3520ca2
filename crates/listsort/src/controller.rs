//! The list widget.
//!
//! [`ListSort`] binds to a root node of a [`SharedDocument`]. Nothing is
//! read from the document until [`ListSort::init`], which resolves the
//! markup, builds the filter index, registers click handlers on the filter
//! controls and, when enabled, builds the page selector.
//!
//! Click handlers reach the widget through a weak reference, so dropping
//! every `ListSort` handle turns them into no-ops. Call
//! [`ListSort::destroy`] to unregister them and remove the page selector.
//!
//! # Locking
//!
//! Widget state is locked before the document. Do not call into a
//! `ListSort` while holding a guard from [`SharedDocument::read`] or
//! [`SharedDocument::write`].

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;

use listsort_core::logging::targets;
use listsort_core::{DomEvent, Document, EventKind, ListenerHandle, NodeId, SharedDocument};

use crate::config::{markup, ListSortConfig};
use crate::error::{Error, Result};
use crate::filter_index::FilterIndex;
use crate::pagination::Paginator;
use crate::render::render;
use crate::resolve::resolve;
use crate::view::ViewHandle;

/// Sortable, paginated list bound to a root node.
///
/// Cloning yields another handle to the same widget.
#[derive(Clone)]
pub struct ListSort {
    state: Arc<Mutex<ControllerState>>,
}

struct ControllerState {
    document: SharedDocument,
    root: NodeId,
    this: Weak<Mutex<ControllerState>>,
    config: ListSortConfig,
    session: Option<Session>,
}

/// Everything created by `init` and released by `destroy`.
struct Session {
    view: ViewHandle,
    index: FilterIndex,
    filter_listeners: Vec<ListenerHandle>,
    paginator: Option<Paginator>,
    current_page: usize,
}

impl ListSort {
    /// Bind a widget to `root`. The document is not scanned yet.
    pub fn new(document: SharedDocument, root: NodeId) -> Self {
        let state = Arc::new_cyclic(|this| {
            Mutex::new(ControllerState {
                document,
                root,
                this: this.clone(),
                config: ListSortConfig::default(),
                session: None,
            })
        });
        Self { state }
    }

    /// Initialize from a JSON options object, or with the current
    /// configuration when `config` is `None`.
    ///
    /// See [`ListSortConfig::from_value`] for the merge rules.
    pub fn init(&self, config: Option<Value>) -> Result<ViewHandle> {
        let config = match config {
            Some(value) => ListSortConfig::from_value(&value)?,
            None => self.config(),
        };
        self.init_with(config)
    }

    /// Initialize with a typed configuration.
    ///
    /// Initializing again first tears down the previous initialization.
    #[tracing::instrument(skip_all, target = "listsort::controller", level = "debug")]
    pub fn init_with(&self, config: ListSortConfig) -> Result<ViewHandle> {
        config.validate()?;
        let mut state = self.state.lock();
        if state.session.is_some() {
            tracing::debug!(target: targets::CONTROLLER, "re-initializing");
            state.teardown()?;
        }
        state.config = config;
        state.start()
    }

    /// Sort by the filter named `name`, as a click on its control would.
    pub fn activate(&self, name: &str) -> Result<ViewHandle> {
        self.state.lock().activate(name)
    }

    /// Sort by the filter declared on `control`.
    pub fn activate_control(&self, control: NodeId) -> Result<ViewHandle> {
        self.state.lock().activate_control(control)
    }

    /// Show a 1-based page, as a click on its button would.
    pub fn select_page(&self, page: usize) -> Result<()> {
        self.state.lock().select_page(page)
    }

    /// The selected page, or `None` when no page selector is shown.
    pub fn current_page(&self) -> Option<usize> {
        let state = self.state.lock();
        let session = state.session.as_ref()?;
        session.paginator.as_ref().map(|_| session.current_page)
    }

    /// Number of pages, 0 when no page selector is shown.
    pub fn page_count(&self) -> usize {
        self.state
            .lock()
            .session
            .as_ref()
            .and_then(|session| session.paginator.as_ref())
            .map_or(0, Paginator::page_count)
    }

    /// The latest rendered view.
    pub fn view(&self) -> Option<ViewHandle> {
        self.state
            .lock()
            .session
            .as_ref()
            .map(|session| session.view.clone())
    }

    /// Snapshot of the filter index.
    pub fn filter_index(&self) -> Option<FilterIndex> {
        self.state
            .lock()
            .session
            .as_ref()
            .map(|session| session.index.clone())
    }

    /// The page selector container, when one is shown.
    pub fn pagination_container(&self) -> Option<NodeId> {
        self.state
            .lock()
            .session
            .as_ref()
            .and_then(|session| session.paginator.as_ref())
            .map(Paginator::container)
    }

    /// The active configuration.
    pub fn config(&self) -> ListSortConfig {
        self.state.lock().config.clone()
    }

    /// Whether `init` has run since construction or the last `destroy`.
    pub fn is_initialized(&self) -> bool {
        self.state.lock().session.is_some()
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.state.lock().root
    }

    /// The document the widget is bound to.
    pub fn document(&self) -> SharedDocument {
        self.state.lock().document.clone()
    }

    /// Unregister every handler and remove the page selector.
    ///
    /// The list is left as last rendered. Does nothing if not initialized.
    pub fn destroy(&self) -> Result<()> {
        self.state.lock().teardown()
    }
}

impl std::fmt::Debug for ListSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ListSort")
            .field("root", &state.root)
            .field("config", &state.config)
            .field("initialized", &state.session.is_some())
            .finish()
    }
}

impl ControllerState {
    fn start(&mut self) -> Result<ViewHandle> {
        let document = self.document.clone();
        let mut doc = document.write();

        let resolved = resolve(&doc, self.root, &self.config)?;
        let index = FilterIndex::build(
            &doc,
            &self.config,
            &resolved.filter_controls,
            &resolved.sorting_elements,
        )?;

        let mut filter_listeners = Vec::new();
        for control in index.controls() {
            let this = self.this.clone();
            let handle = doc.add_event_listener(control, EventKind::Click, move |_| {
                if let Some(state) = this.upgrade() {
                    if let Err(err) = state.lock().activate_control(control) {
                        tracing::error!(target: targets::CONTROLLER, ?control, %err, "filter activation failed");
                    }
                }
            })?;
            filter_listeners.push(handle);
        }

        let view = ViewHandle::new(resolved.list, resolved.rows, 0);
        let paginator = if self.config.paginates(view.row_count()) {
            Some(self.build_paginator(&mut doc, &view)?)
        } else {
            None
        };

        tracing::debug!(
            target: targets::CONTROLLER,
            rows = view.row_count(),
            filters = index.len(),
            paginated = paginator.is_some(),
            "initialized"
        );
        self.session = Some(Session {
            view: view.clone(),
            index,
            filter_listeners,
            paginator,
            current_page: 1,
        });
        Ok(view)
    }

    fn build_paginator(&self, doc: &mut Document, view: &ViewHandle) -> Result<Paginator> {
        Paginator::build(doc, self.root, view.rows(), self.config.pagination_max, |page| {
            let this = self.this.clone();
            move |_: &DomEvent| {
                if let Some(state) = this.upgrade() {
                    if let Err(err) = state.lock().select_page(page) {
                        tracing::error!(target: targets::CONTROLLER, page, %err, "page selection failed");
                    }
                }
            }
        })
    }

    fn activate_control(&mut self, control: NodeId) -> Result<ViewHandle> {
        let session = self.session.as_ref().ok_or(Error::NotInitialized)?;
        let name = session
            .index
            .entry_for_control(control)
            .map(|entry| entry.name.clone())
            .ok_or(Error::NotAFilterControl(control))?;
        self.activate(&name)
    }

    fn activate(&mut self, name: &str) -> Result<ViewHandle> {
        let session = self.session.as_ref().ok_or(Error::NotInitialized)?;
        let entry = session
            .index
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_filter(name))?;

        let document = self.document.clone();
        let mut doc = document.write();

        let view = render(&mut doc, &session.view, &entry, &self.config)?;
        let sorting_elements = doc.query_selector_all(self.root, &self.config.sorting_selector())?;

        let paginator = if self.config.paginates(view.row_count()) {
            Some(self.build_paginator(&mut doc, &view)?)
        } else {
            None
        };

        let Some(session) = self.session.as_mut() else {
            return Err(Error::NotInitialized);
        };
        session.index.rebind(&doc, &sorting_elements)?;
        if let Some(paginator) = paginator {
            if let Some(previous) = session.paginator.replace(paginator) {
                // The old container is already gone; this only drops its handles.
                previous.teardown(&mut doc)?;
            }
            session.current_page = 1;
        }
        session.view = view.clone();

        let direction = entry.direction.toggled();
        if let Some(stored) = session.index.get_mut(name) {
            stored.direction = direction;
        }
        for &control in &entry.controls {
            if doc.contains(control) {
                doc.set_attribute(control, markup::DIRECTION_ATTR, direction.as_markup())?;
            }
        }

        tracing::debug!(
            target: targets::CONTROLLER,
            filter = name,
            next = %direction,
            generation = view.generation(),
            "filter activated"
        );
        Ok(view)
    }

    fn select_page(&mut self, page: usize) -> Result<()> {
        let session = self.session.as_mut().ok_or(Error::NotInitialized)?;
        let paginator = session.paginator.as_ref().ok_or(Error::PaginationInactive)?;
        let mut doc = self.document.write();
        paginator.show_page(&mut doc, session.view.rows(), page)?;
        session.current_page = page;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let mut doc = self.document.write();
        let mut released = 0;
        for handle in session.filter_listeners {
            if doc.remove_event_listener(handle) {
                released += 1;
            }
        }
        if let Some(paginator) = session.paginator {
            paginator.teardown(&mut doc)?;
        }
        tracing::debug!(target: targets::CONTROLLER, released, "torn down");
        Ok(())
    }
}

static_assertions::assert_impl_all!(ListSort: Send, Sync, Clone);
