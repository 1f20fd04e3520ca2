//! Retained-mode document tree.
//!
//! Provides the element tree the list widget operates on:
//! - Stable node identifiers via arena-based storage
//! - Parent-child relationships with cascade destruction
//! - Ordered attributes, with `class` and `style` exposed as token and
//!   declaration lists the way the DOM reflects them
//! - Attribute-selector queries in document order
//! - Shallow and deep cloning (listeners are never cloned)
//! - Per-node event subscriptions backed by [`Signal`]
//!
//! # Key Types
//!
//! - [`Document`] - The arena holding every node
//! - [`NodeId`] - Stable handle to a node
//! - [`SharedDocument`] - Thread-safe handle used by event dispatch
//!
//! # Example
//!
//! ```
//! use listsort_core::{Document, Selector};
//!
//! let mut doc = Document::new();
//! let list = doc.create_element("ul");
//! let item = doc.create_element("li");
//! doc.set_attribute(item, "data-lf-sort-item", "").unwrap();
//! doc.append_child(list, item).unwrap();
//!
//! let rows = doc.query_selector_all(list, &Selector::has("data-lf-sort-item")).unwrap();
//! assert_eq!(rows, vec![item]);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use slotmap::{new_key_type, SlotMap};

use crate::error::{DomError, DomResult};
use crate::event::{DomEvent, EventKind, ListenerHandle};
use crate::logging::targets;
use crate::selector::Selector;
use crate::signal::Signal;

new_key_type! {
    /// A unique identifier for a node in a [`Document`].
    ///
    /// `NodeId`s remain valid while the tree around them changes and become
    /// invalid once the node is destroyed.
    pub struct NodeId;
}

/// What a node holds.
#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

/// Internal data stored in the arena for each node.
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: HashMap<EventKind, Arc<Signal<DomEvent>>>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: HashMap::new(),
        }
    }
}

/// Arena of element and text nodes.
///
/// Nodes are created detached and become part of a tree through
/// [`append_child`](Self::append_child) or
/// [`replace_child`](Self::replace_child). A node without a parent is a root;
/// several roots may coexist (detached subtrees, clones being assembled).
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let tag = tag.into();
        tracing::trace!(target: targets::DOCUMENT, %tag, "create element");
        self.nodes.insert(NodeData::new(NodeKind::Element {
            tag,
            attributes: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(NodeData::new(NodeKind::Text(text.into())))
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> DomResult<&NodeData> {
        self.nodes.get(id).ok_or(DomError::InvalidNodeId)
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(DomError::InvalidNodeId)
    }

    /// Whether the node is an element (as opposed to text).
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(id).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    /// Tag name of an element, `#text` for text nodes.
    pub fn tag_name(&self, id: NodeId) -> DomResult<&str> {
        Ok(match &self.node(id)?.kind {
            NodeKind::Element { tag, .. } => tag.as_str(),
            NodeKind::Text(_) => "#text",
        })
    }

    // =========================================================================
    // Tree Structure
    // =========================================================================

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> DomResult<Option<NodeId>> {
        self.node(id).map(|n| n.parent)
    }

    /// Get the children of a node, text nodes included.
    pub fn children(&self, id: NodeId) -> DomResult<&[NodeId]> {
        self.node(id).map(|n| n.children.as_slice())
    }

    /// Get the element children of a node.
    pub fn element_children(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        Ok(self
            .children(id)?
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
            .collect())
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    fn is_ancestor_or_self(&self, potential_ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|n| n.parent);
        }
        false
    }

    /// Unlink a node from its parent, if it has one.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent_id) = parent {
            if let Some(parent_data) = self.nodes.get_mut(parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::CircularParentage);
        }

        self.detach(child)?;
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays alive as a root.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Put `new_child` where `old_child` is, detaching `old_child`.
    ///
    /// The swap is a single tree mutation: no observer of the document can
    /// see `parent` with both or neither child attached.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<()> {
        if self.node(old_child)?.parent != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if new_child == old_child {
            return Ok(());
        }
        self.node(new_child)?;
        if self.is_ancestor_or_self(new_child, parent) {
            return Err(DomError::CircularParentage);
        }

        self.detach(new_child)?;
        let parent_data = self.node_mut(parent)?;
        let position = parent_data
            .children
            .iter()
            .position(|&c| c == old_child)
            .ok_or(DomError::NotAChild {
                parent,
                child: old_child,
            })?;
        parent_data.children[position] = new_child;
        self.node_mut(old_child)?.parent = None;
        self.node_mut(new_child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove a node and its whole subtree from the arena.
    ///
    /// Listeners attached anywhere in the subtree are dropped with it.
    #[tracing::instrument(skip(self), target = "listsort_core::document", level = "trace")]
    pub fn destroy(&mut self, id: NodeId) -> DomResult<()> {
        let doomed = self.subtree(id)?;
        self.detach(id)?;
        tracing::trace!(target: targets::DOCUMENT, node_count = doomed.len(), "destroying subtree");
        for node in doomed {
            self.nodes.remove(node);
        }
        Ok(())
    }

    /// Get all ancestors of a node from immediate parent to root.
    pub fn ancestors(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut current = self.node(id)?.parent;
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.nodes.get(current_id).and_then(|n| n.parent);
        }
        Ok(result)
    }

    /// The topmost ancestor of a node (the node itself if it is a root).
    pub fn tree_root(&self, id: NodeId) -> DomResult<NodeId> {
        Ok(self.ancestors(id)?.last().copied().unwrap_or(id))
    }

    /// The node and all of its descendants, in pre-order.
    fn subtree(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.preorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn preorder_recursive(&self, id: NodeId, result: &mut Vec<NodeId>) -> DomResult<()> {
        let data = self.node(id)?;
        result.push(id);
        for &child in &data.children {
            self.preorder_recursive(child, result)?;
        }
        Ok(())
    }

    /// All descendants of a node in document (pre-)order, excluding the node.
    pub fn descendants(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        let mut all = self.subtree(id)?;
        all.remove(0);
        Ok(all)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn attributes_mut(&mut self, id: NodeId) -> DomResult<Option<&mut Vec<(String, String)>>> {
        Ok(match &mut self.node_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text(_) => None,
        })
    }

    /// All attributes of an element in insertion order (empty for text nodes).
    pub fn attributes(&self, id: NodeId) -> DomResult<&[(String, String)]> {
        Ok(match &self.node(id)?.kind {
            NodeKind::Element { attributes, .. } => attributes.as_slice(),
            NodeKind::Text(_) => &[],
        })
    }

    /// Read an attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> DomResult<Option<&str>> {
        Ok(self
            .attributes(id)?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str()))
    }

    /// Check whether an attribute is present.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.attribute(id, name)?.is_some())
    }

    /// Set an attribute, replacing any previous value in place.
    ///
    /// Setting an attribute on a text node is a no-op.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> DomResult<()> {
        let name = name.into();
        let value = value.into();
        if let Some(attributes) = self.attributes_mut(id)? {
            match attributes.iter_mut().find(|(key, _)| *key == name) {
                Some(slot) => slot.1 = value,
                None => attributes.push((name, value)),
            }
        }
        Ok(())
    }

    /// Remove an attribute. Returns `true` if it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(match self.attributes_mut(id)? {
            Some(attributes) => {
                let before = attributes.len();
                attributes.retain(|(key, _)| key != name);
                attributes.len() != before
            }
            None => false,
        })
    }

    /// The element's class tokens.
    pub fn class_list(&self, id: NodeId) -> DomResult<Vec<String>> {
        Ok(self
            .attribute(id, "class")?
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default())
    }

    /// Check for a class token.
    pub fn has_class(&self, id: NodeId, class: &str) -> DomResult<bool> {
        Ok(self
            .attribute(id, "class")?
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)))
    }

    /// Add a class token (no-op if already present).
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let mut classes = self.class_list(id)?;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_attribute(id, "class", classes.join(" "))?;
        }
        Ok(())
    }

    /// Remove a class token. Returns `true` if it was present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<bool> {
        let mut classes = self.class_list(id)?;
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() == before {
            return Ok(false);
        }
        self.set_attribute(id, "class", classes.join(" "))?;
        Ok(true)
    }

    /// Inline style declarations as `(property, value)` pairs.
    pub fn style_declarations(&self, id: NodeId) -> DomResult<Vec<(String, String)>> {
        Ok(self
            .attribute(id, "style")?
            .map(parse_style)
            .unwrap_or_default())
    }

    /// Read one inline style property.
    pub fn style_property(&self, id: NodeId, property: &str) -> DomResult<Option<String>> {
        Ok(self
            .style_declarations(id)?
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value))
    }

    /// Set one inline style property, keeping the others.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        let mut declarations = self.style_declarations(id)?;
        match declarations.iter_mut().find(|(name, _)| name == property) {
            Some(slot) => slot.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }
        let style = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "style", style)
    }

    /// `false` when the element's own inline style says `display: none`.
    pub fn is_displayed(&self, id: NodeId) -> DomResult<bool> {
        Ok(self.style_property(id, "display")?.as_deref() != Some("none"))
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, id: NodeId) -> DomResult<String> {
        let mut text = String::new();
        for node in self.subtree(id)? {
            if let Some(NodeData {
                kind: NodeKind::Text(value),
                ..
            }) = self.nodes.get(node)
            {
                text.push_str(value);
            }
        }
        Ok(text)
    }

    /// Replace all children of an element with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: impl Into<String>) -> DomResult<()> {
        if let NodeKind::Text(value) = &mut self.node_mut(id)?.kind {
            *value = text.into();
            return Ok(());
        }
        let children = self.children(id)?.to_vec();
        for child in children {
            self.destroy(child)?;
        }
        let text_node = self.create_text(text);
        self.append_child(id, text_node)
    }

    /// Raw value of a text node, `None` for elements.
    pub fn text(&self, id: NodeId) -> DomResult<Option<&str>> {
        Ok(match &self.node(id)?.kind {
            NodeKind::Text(value) => Some(value.as_str()),
            NodeKind::Element { .. } => None,
        })
    }

    // =========================================================================
    // Cloning
    // =========================================================================

    /// Clone a node into a new detached node.
    ///
    /// A shallow clone copies the tag and attributes only. A deep clone
    /// copies the whole subtree. Event listeners are never copied.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let kind = self.node(id)?.kind.clone();
        let copy = self.nodes.insert(NodeData::new(kind));
        if deep {
            let children = self.children(id)?.to_vec();
            for child in children {
                let child_copy = self.clone_node(child, true)?;
                self.append_child(copy, child_copy)?;
            }
        }
        Ok(copy)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// First descendant element of `scope` matching the selector, in document order.
    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> DomResult<Option<NodeId>> {
        Ok(self
            .descendants(scope)?
            .into_iter()
            .find(|&node| self.matches(node, selector)))
    }

    /// All descendant elements of `scope` matching the selector, in document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> DomResult<Vec<NodeId>> {
        Ok(self
            .descendants(scope)?
            .into_iter()
            .filter(|&node| self.matches(node, selector))
            .collect())
    }

    /// Check a single node against a selector.
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.attribute(id, &selector.attribute)
            .ok()
            .flatten()
            .map_or(false, |value| selector.matches_value(Some(value)))
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe a handler to events of `kind` on `node`.
    ///
    /// The returned handle is the unregister capability; pass it to
    /// [`remove_event_listener`](Self::remove_event_listener).
    pub fn add_event_listener<F>(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: F,
    ) -> DomResult<ListenerHandle>
    where
        F: Fn(&DomEvent) + Send + Sync + 'static,
    {
        let signal = self
            .node_mut(node)?
            .listeners
            .entry(kind)
            .or_insert_with(|| Arc::new(Signal::new()))
            .clone();
        let connection = signal.connect(handler);
        tracing::trace!(target: targets::DOCUMENT, ?node, ?kind, "listener added");
        Ok(ListenerHandle {
            node,
            kind,
            connection,
        })
    }

    /// Unsubscribe a handler. Returns `false` if it was already gone
    /// (including when its node has been destroyed).
    pub fn remove_event_listener(&mut self, handle: ListenerHandle) -> bool {
        self.nodes
            .get(handle.node)
            .and_then(|n| n.listeners.get(&handle.kind))
            .is_some_and(|signal| signal.disconnect(handle.connection))
    }

    /// Number of handlers subscribed to `kind` on `node`.
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.nodes
            .get(node)
            .and_then(|n| n.listeners.get(&kind))
            .map_or(0, |signal| signal.connection_count())
    }

    fn listeners(&self, node: NodeId, kind: EventKind) -> Option<Arc<Signal<DomEvent>>> {
        self.nodes.get(node)?.listeners.get(&kind).cloned()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("node_count", &self.nodes.len())
            .finish()
    }
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// A thread-safe, cloneable handle to a [`Document`].
///
/// Event dispatch goes through this handle so that listeners can lock the
/// document themselves: no lock is held while a listener runs.
#[derive(Clone, Default)]
pub struct SharedDocument {
    inner: Arc<RwLock<Document>>,
}

impl SharedDocument {
    /// Create a handle around an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing document.
    pub fn from_document(document: Document) -> Self {
        Self {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    /// Lock for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.inner.read()
    }

    /// Lock for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Document> {
        self.inner.write()
    }

    /// Run a closure with read access.
    pub fn with_read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run a closure with write access.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Deliver an event to `target` and, for bubbling kinds, its ancestors.
    ///
    /// The propagation path is fixed before the first listener runs; nodes
    /// destroyed by an earlier listener are skipped. Returns the number of
    /// handlers invoked.
    #[tracing::instrument(skip(self), target = "listsort_core::document", level = "debug")]
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> DomResult<usize> {
        let path = {
            let doc = self.read();
            let mut path = vec![target];
            if kind.bubbles() {
                path.extend(doc.ancestors(target)?);
            } else {
                doc.node(target)?;
            }
            path
        };

        let mut invoked = 0;
        for current_target in path {
            let Some(signal) = self.read().listeners(current_target, kind) else {
                continue;
            };
            invoked += signal.emit(DomEvent {
                kind,
                target,
                current_target,
            });
        }
        tracing::debug!(target: targets::DOCUMENT, invoked, "event dispatched");
        Ok(invoked)
    }

    /// Dispatch a click at `target`.
    pub fn click(&self, target: NodeId) -> DomResult<usize> {
        self.dispatch(target, EventKind::Click)
    }

    /// Whether two handles point to the same document.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SharedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedDocument").field(&*self.inner.read()).finish()
    }
}

impl From<Document> for SharedDocument {
    fn from(document: Document) -> Self {
        Self::from_document(document)
    }
}

static_assertions::assert_impl_all!(SharedDocument: Send, Sync);
