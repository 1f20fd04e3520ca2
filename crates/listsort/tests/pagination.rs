//! Pagination through the widget: initial layout, page clicks, re-pagination
//! after a render, and teardown.

use listsort::prelude::*;
use serde_json::json;

const CONTAINER: &str = "data-list-sort-pagination-container";
const BUTTON: &str = "data-list-sort-pagination";

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("listsort=debug")
        .with_test_writer()
        .try_init();
}

/// `count` rows with prices `0..count` in document order.
fn catalog(count: usize, page_size: usize) -> (SharedDocument, NodeId, ListSort) {
    let rows: String = (0..count)
        .map(|i| {
            format!(
                r#"<li data-lf-sort-item=""><b data-lf-order-element="{i}" data-lf-sorting-target="price">{i}</b></li>"#
            )
        })
        .collect();
    let markup = format!(
        r#"<div>
  <button data-lf-filter="price" data-lf-sort="desc">Price</button>
  <ul data-lf-order-list="">{rows}</ul>
</div>"#
    );
    let document = SharedDocument::new();
    let root = document.write().parse_fragment(&markup).unwrap();
    let widget = ListSort::new(document.clone(), root);
    widget
        .init(Some(json!({ "pagination": true, "paginationMax": page_size })))
        .unwrap();
    (document, root, widget)
}

fn visible(document: &SharedDocument, widget: &ListSort) -> Vec<usize> {
    let view = widget.view().unwrap();
    let doc = document.read();
    view.rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| doc.is_displayed(**row).unwrap())
        .map(|(index, _)| index)
        .collect()
}

fn buttons(document: &SharedDocument, root: NodeId) -> Vec<NodeId> {
    document
        .read()
        .query_selector_all(root, &Selector::has(BUTTON))
        .unwrap()
}

fn active_buttons(document: &SharedDocument, root: NodeId) -> Vec<String> {
    let buttons = buttons(document, root);
    let doc = document.read();
    buttons
        .into_iter()
        .filter(|&b| doc.has_class(b, "active").unwrap())
        .map(|b| doc.attribute(b, BUTTON).unwrap().unwrap().to_string())
        .collect()
}

#[test]
fn test_initial_pagination() {
    setup();
    let (document, root, widget) = catalog(14, 6);

    assert_eq!(widget.page_count(), 3);
    assert_eq!(widget.current_page(), Some(1));
    assert_eq!(visible(&document, &widget), (0..6).collect::<Vec<_>>());

    let buttons = buttons(&document, root);
    let doc = document.read();
    let labels: Vec<String> = buttons.iter().map(|&b| doc.text_content(b).unwrap()).collect();
    assert_eq!(labels, vec!["1", "2", "3"]);
    let container = doc.parent(buttons[0]).unwrap().unwrap();
    assert!(doc.has_attribute(container, CONTAINER).unwrap());
    assert!(doc.has_class(container, "list-sort-pagination").unwrap());
    assert_eq!(doc.parent(container).unwrap(), Some(root));
    assert_eq!(doc.children(root).unwrap().last(), Some(&container));
}

#[test]
fn test_page_clicks_partition_rows() {
    setup();
    let (document, root, widget) = catalog(14, 6);
    let buttons = buttons(&document, root);

    document.click(buttons[1]).unwrap();
    assert_eq!(visible(&document, &widget), (6..12).collect::<Vec<_>>());
    assert_eq!(active_buttons(&document, root), vec!["2"]);
    assert_eq!(widget.current_page(), Some(2));

    document.click(buttons[2]).unwrap();
    assert_eq!(visible(&document, &widget), vec![12, 13]);
    assert_eq!(active_buttons(&document, root), vec!["3"]);

    document.click(buttons[0]).unwrap();
    assert_eq!(visible(&document, &widget), (0..6).collect::<Vec<_>>());
    assert_eq!(active_buttons(&document, root), vec!["1"]);
}

#[test]
fn test_select_page_programmatically() {
    setup();
    let (document, root, widget) = catalog(14, 6);
    widget.select_page(2).unwrap();
    assert_eq!(visible(&document, &widget), (6..12).collect::<Vec<_>>());
    assert_eq!(active_buttons(&document, root), vec!["2"]);
    assert!(matches!(
        widget.select_page(4),
        Err(Error::PageOutOfRange { page: 4, page_count: 3 })
    ));
    assert_eq!(widget.current_page(), Some(2));
}

#[test]
fn test_render_repaginates_from_first_page() {
    setup();
    let (document, root, widget) = catalog(14, 6);
    widget.select_page(3).unwrap();

    let control = widget.filter_index().unwrap().get("price").unwrap().controls[0];
    document.click(control).unwrap();

    assert_eq!(widget.current_page(), Some(1));
    assert_eq!(active_buttons(&document, root), vec!["1"]);
    assert_eq!(visible(&document, &widget), (0..6).collect::<Vec<_>>());

    let view = widget.view().unwrap();
    let doc = document.read();
    assert_eq!(doc.text_content(view.rows()[0]).unwrap(), "13");
}

#[test]
fn test_page_buttons_follow_the_current_rows() {
    setup();
    let (document, root, widget) = catalog(14, 6);
    widget.activate("price").unwrap();

    let buttons = buttons(&document, root);
    document.click(buttons[1]).unwrap();

    let view = widget.view().unwrap();
    let doc = document.read();
    let shown: Vec<String> = view
        .rows()
        .iter()
        .filter(|&&row| doc.is_displayed(row).unwrap())
        .map(|&row| doc.text_content(row).unwrap())
        .collect();
    assert_eq!(shown, vec!["7", "6", "5", "4", "3", "2"]);
}

#[test]
fn test_single_selector_after_repeated_renders() {
    setup();
    let (document, root, widget) = catalog(14, 6);
    for _ in 0..5 {
        widget.activate("price").unwrap();
    }
    let containers = document
        .read()
        .query_selector_all(root, &Selector::has(CONTAINER))
        .unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(buttons(&document, root).len(), 3);
}

#[test]
fn test_no_selector_when_rows_fit() {
    setup();
    let (document, root, widget) = catalog(6, 6);
    assert_eq!(widget.page_count(), 0);
    assert_eq!(widget.current_page(), None);
    assert!(buttons(&document, root).is_empty());
    assert_eq!(visible(&document, &widget).len(), 6);
    assert!(matches!(widget.select_page(1), Err(Error::PaginationInactive)));
}

#[test]
fn test_destroy_releases_everything() {
    setup();
    let (document, root, widget) = catalog(14, 6);
    let control = widget.filter_index().unwrap().get("price").unwrap().controls[0];
    let page_two = buttons(&document, root)[1];
    let before = widget.view().unwrap();

    widget.destroy().unwrap();
    assert!(!widget.is_initialized());
    assert!(document
        .read()
        .query_selector(root, &Selector::has(CONTAINER))
        .unwrap()
        .is_none());
    assert!(!document.read().contains(page_two));

    assert_eq!(document.click(control).unwrap(), 0);
    let list = document
        .read()
        .query_selector(root, &Selector::has("data-lf-order-list"))
        .unwrap()
        .unwrap();
    assert_eq!(list, before.list());
    assert_eq!(
        document.read().attribute(control, "data-lf-sort").unwrap(),
        Some("desc")
    );
}

#[test]
fn test_dropped_widget_handlers_do_nothing() {
    setup();
    let (document, root, widget) = catalog(8, 3);
    let control = widget.filter_index().unwrap().get("price").unwrap().controls[0];
    let list = widget.view().unwrap().list();
    drop(widget);

    document.click(control).unwrap();
    let doc = document.read();
    assert!(doc.contains(list));
    assert_eq!(doc.attribute(control, "data-lf-sort").unwrap(), Some("desc"));
    assert_eq!(
        doc.query_selector_all(root, &Selector::has(CONTAINER)).unwrap().len(),
        1
    );
}
