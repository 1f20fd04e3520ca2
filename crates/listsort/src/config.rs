//! Widget configuration.
//!
//! Options can be given as a typed [`ListSortConfig`] or as a JSON object
//! merged with the defaults by [`ListSortConfig::from_value`]. Any option
//! whose value is absent or falsy (`null`, `false`, `0`, `""`) takes its
//! default.
//!
//! # Example
//!
//! ```
//! use listsort::ListSortConfig;
//! use serde_json::json;
//!
//! let config = ListSortConfig::from_value(&json!({
//!     "pagination": true,
//!     "paginationMax": 10,
//!     "list": "",
//! }))
//! .unwrap();
//!
//! assert_eq!(config.list, "data-lf-order-list");
//! assert_eq!(config.pagination_max, 10);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use listsort_core::logging::targets;
use listsort_core::Selector;

use crate::error::{Error, Result};

/// Attribute names and classes that are part of the markup contract but not
/// configurable.
pub mod markup {
    /// Sort direction on a filter control (`asc` or `desc`).
    pub const DIRECTION_ATTR: &str = "data-lf-sort";
    /// Back-reference from a sort-key element to its filter name.
    pub const SORTING_TARGET_ATTR: &str = "data-lf-sorting-target";
    /// Filter name whose keys are compared as dates.
    pub const DATE_FILTER: &str = "date";

    /// Marker attribute of the page selector container.
    pub const PAGINATION_CONTAINER_ATTR: &str = "data-list-sort-pagination-container";
    /// Page number attribute of a page selector button.
    pub const PAGINATION_BUTTON_ATTR: &str = "data-list-sort-pagination";
    /// Tag of the page selector container.
    pub const PAGINATION_CONTAINER_TAG: &str = "div";
    /// Tag of a page selector button.
    pub const PAGINATION_BUTTON_TAG: &str = "span";
    /// Class of the page selector container.
    pub const PAGINATION_CONTAINER_CLASS: &str = "list-sort-pagination";
    /// Class of a page selector button.
    pub const PAGINATION_BUTTON_CLASS: &str = "list-sort-pagination__button";
    /// Class marking the selected page button.
    pub const ACTIVE_CLASS: &str = "active";
}

/// Default list container attribute.
pub const DEFAULT_LIST: &str = "data-lf-order-list";
/// Default row attribute.
pub const DEFAULT_LIST_ITEMS: &str = "data-lf-sort-item";
/// Default filter control attribute.
pub const DEFAULT_FILTERS: &str = "data-lf-filter";
/// Default sort-key attribute.
pub const DEFAULT_SORTING_ELEMENTS: &str = "data-lf-order-element";
/// Default page size.
pub const DEFAULT_PAGINATION_MAX: usize = 6;

/// Options controlling which markup the widget binds to and how it pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListSortConfig {
    /// Attribute marking the list container.
    pub list: String,
    /// Attribute marking each sortable row.
    pub list_items: String,
    /// Attribute marking a filter control; its value is the filter name.
    pub filters: String,
    /// Attribute holding a row's raw sort value.
    pub sorting_elements: String,
    /// Whether rows are split into pages.
    pub pagination: bool,
    /// Rows per page.
    pub pagination_max: usize,
}

impl Default for ListSortConfig {
    fn default() -> Self {
        Self {
            list: DEFAULT_LIST.to_string(),
            list_items: DEFAULT_LIST_ITEMS.to_string(),
            filters: DEFAULT_FILTERS.to_string(),
            sorting_elements: DEFAULT_SORTING_ELEMENTS.to_string(),
            pagination: false,
            pagination_max: DEFAULT_PAGINATION_MAX,
        }
    }
}

impl ListSortConfig {
    /// Merge a JSON options object with the defaults.
    ///
    /// Fails with [`Error::ConfigNotObject`] if `value` is not an object, and
    /// with [`Error::InvalidOption`] if a truthy value has the wrong type.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::ConfigNotObject {
                found: json_type_name(value),
            });
        };

        let defaults = Self::default();
        let config = Self {
            list: string_option(map, "list")?.unwrap_or(defaults.list),
            list_items: string_option(map, "listItems")?.unwrap_or(defaults.list_items),
            filters: string_option(map, "filters")?.unwrap_or(defaults.filters),
            sorting_elements: string_option(map, "sortingElements")?
                .unwrap_or(defaults.sorting_elements),
            pagination: bool_option(map, "pagination")?.unwrap_or(defaults.pagination),
            pagination_max: size_option(map, "paginationMax")?.unwrap_or(defaults.pagination_max),
        };

        for key in map.keys() {
            if !KNOWN_OPTIONS.contains(&key.as_str()) {
                tracing::debug!(target: targets::CONFIG, option = %key, "ignoring unknown option");
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants: attribute options are usable attribute names
    /// and the page size is positive.
    pub fn validate(&self) -> Result<()> {
        for (option, name) in [
            ("list", &self.list),
            ("listItems", &self.list_items),
            ("filters", &self.filters),
            ("sortingElements", &self.sorting_elements),
        ] {
            if name.is_empty() {
                return Err(Error::invalid_option(option, "attribute name must not be empty"));
            }
            let selector = Selector::parse(&format!("[{name}]"))
                .map_err(|err| Error::invalid_option(option, err.to_string()))?;
            if selector.value.is_some() {
                return Err(Error::invalid_option(option, "attribute name must not contain '='"));
            }
        }
        if self.pagination_max == 0 {
            return Err(Error::invalid_option("paginationMax", "page size must be positive"));
        }
        Ok(())
    }

    /// Set the list container attribute.
    pub fn with_list(mut self, attribute: impl Into<String>) -> Self {
        self.list = attribute.into();
        self
    }

    /// Set the row attribute.
    pub fn with_list_items(mut self, attribute: impl Into<String>) -> Self {
        self.list_items = attribute.into();
        self
    }

    /// Set the filter control attribute.
    pub fn with_filters(mut self, attribute: impl Into<String>) -> Self {
        self.filters = attribute.into();
        self
    }

    /// Set the sort-key attribute.
    pub fn with_sorting_elements(mut self, attribute: impl Into<String>) -> Self {
        self.sorting_elements = attribute.into();
        self
    }

    /// Enable pagination with the given page size.
    pub fn with_pagination(mut self, page_size: usize) -> Self {
        self.pagination = true;
        self.pagination_max = page_size;
        self
    }

    /// Selector for the list container.
    pub fn list_selector(&self) -> Selector {
        Selector::has(&self.list)
    }

    /// Selector for rows.
    pub fn row_selector(&self) -> Selector {
        Selector::has(&self.list_items)
    }

    /// Selector for filter controls.
    pub fn filter_selector(&self) -> Selector {
        Selector::has(&self.filters)
    }

    /// Selector for sort-key elements.
    pub fn sorting_selector(&self) -> Selector {
        Selector::has(&self.sorting_elements)
    }

    /// Whether a list of `row_count` rows needs a page selector.
    pub fn paginates(&self, row_count: usize) -> bool {
        self.pagination && self.pagination_max < row_count
    }
}

const KNOWN_OPTIONS: [&str; 6] = [
    "list",
    "listItems",
    "filters",
    "sortingElements",
    "pagination",
    "paginationMax",
];

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn truthy<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !is_falsy(value))
}

fn string_option(map: &Map<String, Value>, key: &'static str) -> Result<Option<String>> {
    match truthy(map, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::invalid_option(
            key,
            format!("expected a string, got {}", json_type_name(other)),
        )),
    }
}

fn bool_option(map: &Map<String, Value>, key: &'static str) -> Result<Option<bool>> {
    match truthy(map, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(Error::invalid_option(
            key,
            format!("expected a boolean, got {}", json_type_name(other)),
        )),
    }
}

fn size_option(map: &Map<String, Value>, key: &'static str) -> Result<Option<usize>> {
    match truthy(map, key) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| Error::invalid_option(key, format!("expected a positive integer, got {n}"))),
        Some(other) => Err(Error::invalid_option(
            key,
            format!("expected a number, got {}", json_type_name(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_is_defaults() {
        let config = ListSortConfig::from_value(&json!({})).unwrap();
        assert_eq!(config, ListSortConfig::default());
        assert_eq!(config.pagination_max, 6);
        assert!(!config.pagination);
    }

    #[test]
    fn test_falsy_values_take_defaults() {
        let config = ListSortConfig::from_value(&json!({
            "list": "",
            "listItems": null,
            "filters": false,
            "sortingElements": 0,
            "pagination": false,
            "paginationMax": 0,
        }))
        .unwrap();
        assert_eq!(config, ListSortConfig::default());
    }

    #[test]
    fn test_supplied_values_win() {
        let config = ListSortConfig::from_value(&json!({
            "list": "data-products",
            "listItems": "data-product",
            "filters": "data-sort-by",
            "sortingElements": "data-sort-value",
            "pagination": true,
            "paginationMax": 4,
            "somethingElse": [1, 2],
        }))
        .unwrap();
        assert_eq!(config.list, "data-products");
        assert_eq!(config.list_items, "data-product");
        assert_eq!(config.filters, "data-sort-by");
        assert_eq!(config.sorting_elements, "data-sort-value");
        assert!(config.pagination);
        assert_eq!(config.pagination_max, 4);
    }

    #[test]
    fn test_non_object_is_rejected() {
        for value in [json!("config"), json!(42), json!([1]), json!(null), json!(true)] {
            assert!(matches!(
                ListSortConfig::from_value(&value),
                Err(Error::ConfigNotObject { .. })
            ));
        }
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(matches!(
            ListSortConfig::from_value(&json!({ "list": 5 })),
            Err(Error::InvalidOption { option: "list", .. })
        ));
        assert!(matches!(
            ListSortConfig::from_value(&json!({ "pagination": "yes" })),
            Err(Error::InvalidOption { option: "pagination", .. })
        ));
        assert!(matches!(
            ListSortConfig::from_value(&json!({ "paginationMax": -3 })),
            Err(Error::InvalidOption { option: "paginationMax", .. })
        ));
        assert!(matches!(
            ListSortConfig::from_value(&json!({ "paginationMax": 2.5 })),
            Err(Error::InvalidOption { option: "paginationMax", .. })
        ));
        assert!(matches!(
            ListSortConfig::from_value(&json!({ "filters": "data filter" })),
            Err(Error::InvalidOption { option: "filters", .. })
        ));
    }

    #[test]
    fn test_validate_typed_config() {
        assert!(ListSortConfig::default().validate().is_ok());
        let zero = ListSortConfig {
            pagination_max: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
        assert!(ListSortConfig::default().with_list("").validate().is_err());
    }

    #[test]
    fn test_serde_round_trip_uses_option_names() {
        let config = ListSortConfig::default().with_pagination(3);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["paginationMax"], json!(3));
        assert_eq!(value["sortingElements"], json!("data-lf-order-element"));

        let partial: ListSortConfig = serde_json::from_value(json!({ "pagination": true })).unwrap();
        assert!(partial.pagination);
        assert_eq!(partial.list_items, "data-lf-sort-item");
    }

    #[test]
    fn test_paginates_only_when_rows_exceed_page() {
        let config = ListSortConfig::default().with_pagination(6);
        assert!(!config.paginates(6));
        assert!(config.paginates(7));
        assert!(!ListSortConfig::default().paginates(100));
    }
}
