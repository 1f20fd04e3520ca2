//! Logging and debugging facilities.
//!
//! This module provides:
//! - Target names for filtering `tracing` output per subsystem
//! - Debug visualization for document subtrees
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Nothing here installs a subscriber. To see logs, install one in the host
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("listsort=debug,listsort_core=info")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```
//! use listsort_core::{Document, DocumentTreeDebug};
//!
//! let mut doc = Document::new();
//! let root = doc.parse_fragment(r#"<ul data-lf-order-list=""><li>a</li></ul>"#).unwrap();
//! let dump = DocumentTreeDebug::new().format_subtree(&doc, root).unwrap();
//! assert!(dump.starts_with("<ul data-lf-order-list>"));
//! ```

use std::fmt::Write as FmtWrite;

use crate::document::{Document, NodeId};
use crate::error::DomResult;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Document tree target.
    pub const DOCUMENT: &str = "listsort_core::document";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "listsort_core::signal";
    /// Configuration resolution target.
    pub const CONFIG: &str = "listsort::config";
    /// Filter index target.
    pub const FILTER_INDEX: &str = "listsort::filter_index";
    /// Sort & render target.
    pub const RENDER: &str = "listsort::render";
    /// Pagination target.
    pub const PAGINATION: &str = "listsort::pagination";
    /// Widget lifecycle target.
    pub const CONTROLLER: &str = "listsort::controller";
    /// Performance spans target.
    pub const PERF: &str = "listsort::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node IDs.
    pub show_ids: bool,
    /// Whether to show attribute values (names are always shown).
    pub show_values: bool,
    /// Whether to show text nodes.
    pub show_text: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_values: false,
            show_text: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_values: true,
            ..Default::default()
        }
    }

    /// Options for minimal output: elements and attribute names only.
    pub fn minimal() -> Self {
        Self {
            show_text: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing document subtrees.
#[derive(Debug, Clone, Default)]
pub struct DocumentTreeDebug {
    options: TreeFormatOptions,
}

impl DocumentTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format a subtree starting from `root`.
    pub fn format_subtree(&self, doc: &Document, root: NodeId) -> DomResult<String> {
        let mut output = String::new();
        self.format_subtree_into(doc, root, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_subtree_into(
        &self,
        doc: &Document,
        id: NodeId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> DomResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        if let Some(text) = doc.text(id)? {
            if self.options.show_text {
                output.push_str(&self.build_prefix(depth, is_last));
                let _ = writeln!(output, "{:?}", text);
            }
            return Ok(());
        }

        output.push_str(&self.build_prefix(depth, is_last));
        output.push('<');
        output.push_str(doc.tag_name(id)?);
        for (key, value) in doc.attributes(id)? {
            if self.options.show_values && !value.is_empty() {
                let _ = write!(output, " {key}={value:?}");
            } else {
                let _ = write!(output, " {key}");
            }
        }
        output.push('>');
        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        output.push('\n');

        let children = doc.children(id)?;
        let child_count = children.len();
        for (i, &child) in children.iter().enumerate() {
            self.format_subtree_into(doc, child, depth + 1, i + 1 == child_count, output)?;
        }
        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time renders and pagination passes.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span for `name`.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
