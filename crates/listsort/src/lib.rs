//! ListSort - declarative sorting and pagination for lists in a document tree.
//!
//! The widget binds to a root node, discovers its list, rows, filter controls
//! and sort keys from marker attributes, and re-renders the list whenever a
//! filter control is clicked. Optionally the rows are split into pages behind
//! a generated page selector.
//!
//! # Example
//!
//! ```
//! use listsort::prelude::*;
//! use serde_json::json;
//!
//! let document = SharedDocument::new();
//! let root = document
//!     .write()
//!     .parse_fragment(
//!         r#"<div>
//!   <button data-lf-filter="price" data-lf-sort="asc">Price</button>
//!   <ul data-lf-order-list="">
//!     <li data-lf-sort-item=""><b data-lf-order-element="3" data-lf-sorting-target="price">3</b></li>
//!     <li data-lf-sort-item=""><b data-lf-order-element="1" data-lf-sorting-target="price">1</b></li>
//!   </ul>
//! </div>"#,
//!     )
//!     .unwrap();
//!
//! let widget = ListSort::new(document.clone(), root);
//! widget.init(Some(json!({ "pagination": false }))).unwrap();
//!
//! let button = widget.filter_index().unwrap().get("price").unwrap().controls[0];
//! document.click(button).unwrap();
//!
//! let view = widget.view().unwrap();
//! let doc = document.read();
//! assert_eq!(doc.text_content(view.rows()[0]).unwrap(), "1");
//! assert_eq!(doc.attribute(button, "data-lf-sort").unwrap(), Some("desc"));
//! ```

pub mod config;
mod controller;
mod error;
pub mod filter_index;
pub mod pagination;
pub mod prelude;
pub mod render;
mod resolve;
pub mod sort_key;
mod view;

pub use config::ListSortConfig;
pub use controller::ListSort;
pub use error::{Error, Result};
pub use filter_index::{FilterEntry, FilterIndex};
pub use pagination::{PageLayout, Paginator};
pub use resolve::{resolve, ResolvedMarkup};
pub use sort_key::{FilterKind, SortDirection, SortKey};
pub use view::ViewHandle;
