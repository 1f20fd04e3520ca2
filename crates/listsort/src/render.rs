//! Sort & render.
//!
//! A render orders the rows by one filter's sort keys, builds a new list
//! container off-tree holding deep clones of the rows in that order, and
//! swaps it in for the old container in a single [`Document::replace_child`].
//! The old subtree is destroyed afterwards.

use std::collections::HashSet;

use listsort_core::logging::targets;
use listsort_core::{Document, NodeId, PerfSpan};

use crate::config::ListSortConfig;
use crate::error::{Error, Result};
use crate::filter_index::FilterEntry;
use crate::sort_key::SortKey;
use crate::view::ViewHandle;

/// Inline style attribute cleared from every freshly rendered row.
const STYLE_ATTR: &str = "style";

/// Compute the row order an activation of `entry` produces.
///
/// Rows are ordered by their first sort key for the filter. Unparseable
/// keys come last and keep their relative order. Rows of `view` that have
/// no key for the filter follow in their current order, so the result is a
/// permutation of `view.rows()`.
pub fn compute_order(
    doc: &Document,
    view: &ViewHandle,
    entry: &FilterEntry,
    config: &ListSortConfig,
) -> Result<Vec<NodeId>> {
    let mut keyed = Vec::with_capacity(entry.elements.len());
    for &element in &entry.elements {
        let raw = doc.attribute(element, &config.sorting_elements)?;
        keyed.push((SortKey::parse(entry.kind, raw), element));
    }

    let direction = entry.kind.effective_direction(entry.direction);
    keyed.sort_by(|(a, _), (b, _)| a.compare(b, direction));

    let rows: HashSet<NodeId> = view.rows().iter().copied().collect();
    let mut placed = HashSet::with_capacity(view.row_count());
    let mut order = Vec::with_capacity(view.row_count());
    for (_, element) in keyed {
        match owning_row(doc, view.list(), &rows, element, config)? {
            Some(row) => {
                if placed.insert(row) {
                    order.push(row);
                }
            }
            None => {
                tracing::warn!(target: targets::RENDER, ?element, filter = %entry.name, "sort key outside any row skipped");
            }
        }
    }

    let unkeyed = view.rows().iter().filter(|row| !placed.contains(*row));
    order.extend(unkeyed);
    Ok(order)
}

/// The row a sort-key element belongs to: the element itself or its nearest
/// ancestor carrying the row marker, provided that row is one of `rows`.
fn owning_row(
    doc: &Document,
    list: NodeId,
    rows: &HashSet<NodeId>,
    element: NodeId,
    config: &ListSortConfig,
) -> Result<Option<NodeId>> {
    let mut current = Some(element);
    while let Some(node) = current {
        if node == list || doc.has_attribute(node, &config.list)? {
            return Ok(None);
        }
        if doc.has_attribute(node, &config.list_items)? {
            return Ok(rows.contains(&node).then_some(node));
        }
        current = doc.parent(node)?;
    }
    Ok(None)
}

/// Re-render the list of `view` ordered by `entry` and return the new view.
///
/// The direction of `entry` is not changed here.
#[tracing::instrument(skip_all, target = "listsort::render", level = "debug", fields(filter = %entry.name))]
pub fn render(
    doc: &mut Document,
    view: &ViewHandle,
    entry: &FilterEntry,
    config: &ListSortConfig,
) -> Result<ViewHandle> {
    let _perf = PerfSpan::new("render");

    let old_list = view.list();
    let parent = doc.parent(old_list)?.ok_or(Error::ListDetached(old_list))?;
    let order = compute_order(doc, view, entry, config)?;

    let new_list = doc.clone_node(old_list, false)?;
    for &row in &order {
        let copy = doc.clone_node(row, true)?;
        doc.append_child(new_list, copy)?;
    }
    doc.replace_child(parent, new_list, old_list)?;
    doc.destroy(old_list)?;

    let rows = doc.query_selector_all(new_list, &config.row_selector())?;
    for &row in &rows {
        doc.remove_attribute(row, STYLE_ATTR)?;
    }

    let generation = view.generation() + 1;
    tracing::debug!(
        target: targets::RENDER,
        rows = rows.len(),
        direction = %entry.direction,
        generation,
        "list rendered"
    );
    Ok(ViewHandle::new(new_list, rows, generation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_index::FilterIndex;
    use crate::resolve::resolve;
    use crate::sort_key::SortDirection;

    struct Fixture {
        doc: Document,
        root: NodeId,
        view: ViewHandle,
        index: FilterIndex,
        config: ListSortConfig,
    }

    fn fixture(rows: &str) -> Fixture {
        let markup = format!(
            r#"<div>
  <button data-lf-filter="price" data-lf-sort="asc">Price</button>
  <button data-lf-filter="date" data-lf-sort="asc">Date</button>
  <h2>Items</h2>
  <ul data-lf-order-list="" class="items">{rows}</ul>
  <footer>end</footer>
</div>"#
        );
        let mut doc = Document::new();
        let root = doc.parse_fragment(&markup).unwrap();
        let config = ListSortConfig::default();
        let resolved = resolve(&doc, root, &config).unwrap();
        let index = FilterIndex::build(
            &doc,
            &config,
            &resolved.filter_controls,
            &resolved.sorting_elements,
        )
        .unwrap();
        let view = ViewHandle::new(resolved.list, resolved.rows, 0);
        Fixture {
            doc,
            root,
            view,
            index,
            config,
        }
    }

    fn price_row(name: &str, price: &str) -> String {
        format!(
            r#"<li data-lf-sort-item=""><span>{name}</span><b data-lf-order-element="{price}" data-lf-sorting-target="price">{price}</b></li>"#
        )
    }

    fn names(doc: &Document, rows: &[NodeId]) -> Vec<String> {
        rows.iter()
            .map(|&row| doc.text_content(doc.element_children(row).unwrap()[0]).unwrap())
            .collect()
    }

    #[test]
    fn test_numeric_order_both_directions() {
        let rows = [price_row("c", "3"), price_row("a", "1"), price_row("b", "2")].concat();
        let mut f = fixture(&rows);

        let entry = f.index.get("price").unwrap().clone();
        let order = compute_order(&f.doc, &f.view, &entry, &f.config).unwrap();
        assert_eq!(names(&f.doc, &order), vec!["a", "b", "c"]);

        let descending = FilterEntry {
            direction: SortDirection::Descending,
            ..entry
        };
        let order = compute_order(&f.doc, &f.view, &descending, &f.config).unwrap();
        assert_eq!(names(&f.doc, &order), vec!["c", "b", "a"]);

        let view = render(&mut f.doc, &f.view, &descending, &f.config).unwrap();
        assert_eq!(names(&f.doc, view.rows()), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_render_replaces_list_in_place() {
        let rows = [price_row("b", "2"), price_row("a", "1")].concat();
        let mut f = fixture(&rows);
        let old_list = f.view.list();
        let position = f.doc.children(f.root).unwrap().iter().position(|&c| c == old_list);

        let entry = f.index.get("price").unwrap().clone();
        let view = render(&mut f.doc, &f.view, &entry, &f.config).unwrap();

        assert!(!f.doc.contains(old_list));
        assert!(f.view.rows().iter().all(|&row| !f.doc.contains(row)));
        let new_position = f.doc.children(f.root).unwrap().iter().position(|&c| c == view.list());
        assert_eq!(position, new_position);
        assert_eq!(f.doc.attribute(view.list(), "class").unwrap(), Some("items"));
        assert_eq!(view.generation(), 1);
        assert_eq!(view.row_count(), 2);
    }

    #[test]
    fn test_render_strips_row_styles() {
        let rows = [price_row("b", "2"), price_row("a", "1")].concat();
        let mut f = fixture(&rows);
        for &row in f.view.rows() {
            f.doc.set_style_property(row, "display", "none").unwrap();
        }
        let entry = f.index.get("price").unwrap().clone();
        let view = render(&mut f.doc, &f.view, &entry, &f.config).unwrap();
        for &row in view.rows() {
            assert!(!f.doc.has_attribute(row, "style").unwrap());
            assert!(f.doc.is_displayed(row).unwrap());
        }
    }

    #[test]
    fn test_unparseable_last_and_unkeyed_appended() {
        let rows = [
            price_row("bad", "n/a"),
            r#"<li data-lf-sort-item=""><span>plain</span></li>"#.to_string(),
            price_row("two", "2"),
            price_row("one", "1"),
        ]
        .concat();
        let f = fixture(&rows);
        let entry = f.index.get("price").unwrap().clone();

        let order = compute_order(&f.doc, &f.view, &entry, &f.config).unwrap();
        assert_eq!(names(&f.doc, &order), vec!["one", "two", "bad", "plain"]);

        let descending = FilterEntry {
            direction: SortDirection::Descending,
            ..entry
        };
        let order = compute_order(&f.doc, &f.view, &descending, &f.config).unwrap();
        assert_eq!(names(&f.doc, &order), vec!["two", "one", "bad", "plain"]);
    }

    #[test]
    fn test_row_with_two_keys_rendered_once() {
        let rows = [
            r#"<li data-lf-sort-item=""><span>x</span><b data-lf-order-element="5" data-lf-sorting-target="price">5</b><b data-lf-order-element="0" data-lf-sorting-target="price">0</b></li>"#.to_string(),
            price_row("y", "3"),
        ]
        .concat();
        let mut f = fixture(&rows);
        let entry = f.index.get("price").unwrap().clone();
        let view = render(&mut f.doc, &f.view, &entry, &f.config).unwrap();
        assert_eq!(names(&f.doc, view.rows()), vec!["x", "y"]);
    }

    #[test]
    fn test_orphan_sort_key_skipped() {
        let rows = [price_row("b", "2"), price_row("a", "1")].concat();
        let mut f = fixture(&rows);
        let stray = f.doc.create_element("b");
        f.doc.set_attribute(stray, "data-lf-order-element", "0").unwrap();
        f.doc.set_attribute(stray, "data-lf-sorting-target", "price").unwrap();
        f.doc.append_child(f.root, stray).unwrap();
        let mut entry = f.index.get("price").unwrap().clone();
        entry.elements.push(stray);

        let view = render(&mut f.doc, &f.view, &entry, &f.config).unwrap();
        assert_eq!(names(&f.doc, view.rows()), vec!["a", "b"]);
    }

    #[test]
    fn test_long_list_orders_every_row() {
        let rows: String = (0..2000)
            .rev()
            .map(|n| price_row(&n.to_string(), &n.to_string()))
            .collect();
        let mut f = fixture(&rows);
        let entry = f.index.get("price").unwrap().clone();

        let view = render(&mut f.doc, &f.view, &entry, &f.config).unwrap();
        let expected: Vec<String> = (0..2000).map(|n| n.to_string()).collect();
        assert_eq!(names(&f.doc, view.rows()), expected);
    }

    #[test]
    fn test_key_in_row_of_another_list_skipped() {
        let rows = [price_row("b", "2"), price_row("a", "1")].concat();
        let mut f = fixture(&rows);
        let other = f.doc.parse_fragment(&price_row("elsewhere", "0")).unwrap();
        f.doc.append_child(f.root, other).unwrap();
        let key = f.doc.element_children(other).unwrap()[1];
        let mut entry = f.index.get("price").unwrap().clone();
        entry.elements.push(key);

        let order = compute_order(&f.doc, &f.view, &entry, &f.config).unwrap();
        assert_eq!(names(&f.doc, &order), vec!["a", "b"]);
    }

    #[test]
    fn test_date_declared_asc_yields_newest_first() {
        let rows = r#"
<li data-lf-sort-item=""><span>old</span><i data-lf-order-element="2023-01-01" data-lf-sorting-target="date">2023</i></li>
<li data-lf-sort-item=""><span>new</span><i data-lf-order-element="2024-01-01" data-lf-sorting-target="date">2024</i></li>"#;
        let f = fixture(rows);
        let entry = f.index.get("date").unwrap().clone();
        assert_eq!(entry.direction, SortDirection::Ascending);
        let order = compute_order(&f.doc, &f.view, &entry, &f.config).unwrap();
        assert_eq!(names(&f.doc, &order), vec!["new", "old"]);
    }

    #[test]
    fn test_detached_list_fails() {
        let rows = price_row("a", "1");
        let mut f = fixture(&rows);
        f.doc.detach(f.view.list()).unwrap();
        let entry = f.index.get("price").unwrap().clone();
        assert!(matches!(
            render(&mut f.doc, &f.view, &entry, &f.config),
            Err(Error::ListDetached(_))
        ));
    }
}
