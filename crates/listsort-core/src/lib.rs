//! Core systems for the list-sort widget.
//!
//! This crate provides the retained-mode substrate the widget runs on:
//!
//! - **Document**: Arena-backed element tree with attributes, classes and
//!   inline style, attribute-selector queries, and clone-and-replace support
//! - **Events**: Per-node click subscriptions with bubbling dispatch and an
//!   explicit unregister handle
//! - **Signal/Slot System**: Type-safe callbacks backing the event listeners
//! - **Markup**: Reading XHTML-style fragments and serializing subtrees
//! - **Logging**: Tracing targets, tree dumps and performance spans
//!
//! # Example
//!
//! ```
//! use listsort_core::{EventKind, SharedDocument, Selector};
//!
//! let shared = SharedDocument::new();
//! let button = shared.with_write(|doc| {
//!     let root = doc
//!         .parse_fragment(r#"<div><button data-lf-filter="price">Price</button></div>"#)
//!         .unwrap();
//!     doc.query_selector(root, &Selector::has("data-lf-filter")).unwrap().unwrap()
//! });
//!
//! let handle = shared
//!     .write()
//!     .add_event_listener(button, EventKind::Click, |event| {
//!         println!("clicked {:?}", event.target);
//!     })
//!     .unwrap();
//!
//! assert_eq!(shared.click(button).unwrap(), 1);
//! assert!(shared.write().remove_event_listener(handle));
//! ```

pub mod document;
mod error;
pub mod event;
pub mod logging;
mod markup;
pub mod selector;
pub mod signal;

pub use document::{Document, NodeId, SharedDocument};
pub use error::{DomError, DomResult};
pub use event::{DomEvent, EventKind, ListenerHandle};
pub use logging::{DocumentTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use markup::FRAGMENT_ROOT_TAG;
pub use selector::Selector;
pub use signal::{ConnectionId, Signal};
