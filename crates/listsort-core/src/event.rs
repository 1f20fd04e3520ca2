//! Event types delivered to document listeners.

use crate::document::NodeId;
use crate::signal::ConnectionId;

/// Kinds of events a node can be subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Primary activation (mouse click, tap, keyboard activation).
    Click,
}

impl EventKind {
    /// Whether events of this kind propagate to ancestors after the target.
    pub fn bubbles(self) -> bool {
        match self {
            Self::Click => true,
        }
    }
}

/// An event being delivered to a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    /// What happened.
    pub kind: EventKind,
    /// The node the event was dispatched at.
    pub target: NodeId,
    /// The node whose listener is currently running (differs from
    /// `target` while bubbling).
    pub current_target: NodeId,
}

/// Unregister capability returned by
/// [`Document::add_event_listener`](crate::Document::add_event_listener).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    pub(crate) node: NodeId,
    pub(crate) kind: EventKind,
    pub(crate) connection: ConnectionId,
}

impl ListenerHandle {
    /// The node the listener is attached to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The event kind the listener receives.
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}
