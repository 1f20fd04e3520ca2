//! Attribute selectors.
//!
//! Only the attribute forms the list widget needs are supported:
//!
//! - `[name]` matches any element carrying the attribute
//! - `[name="value"]` / `[name=value]` matches an exact attribute value

use std::fmt;

use crate::error::{DomError, DomResult};

/// A parsed attribute selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Attribute name to match.
    pub attribute: String,
    /// Required value, or `None` for a presence test.
    pub value: Option<String>,
}

impl Selector {
    /// Presence selector (`[name]`).
    pub fn has(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: None,
        }
    }

    /// Exact value selector (`[name="value"]`).
    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: Some(value.into()),
        }
    }

    /// Parse selector text.
    pub fn parse(text: &str) -> DomResult<Self> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| DomError::invalid_selector(text, "expected [attribute] form"))?;

        let (name, value) = match inner.split_once('=') {
            Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
            None => (inner.trim(), None),
        };

        if name.is_empty() {
            return Err(DomError::invalid_selector(text, "empty attribute name"));
        }
        if name.chars().any(|c| c.is_whitespace() || matches!(c, '[' | ']' | '"' | '\'')) {
            return Err(DomError::invalid_selector(text, "illegal character in attribute name"));
        }

        Ok(Self {
            attribute: name.to_string(),
            value: value.map(str::to_string),
        })
    }

    /// Check an element's attribute value against this selector.
    pub fn matches_value(&self, actual: Option<&str>) -> bool {
        match (&self.value, actual) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        }
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "[{}=\"{}\"]", self.attribute, value),
            None => write!(f, "[{}]", self.attribute),
        }
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> DomResult<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presence() {
        let sel = Selector::parse("[data-lf-filter]").unwrap();
        assert_eq!(sel, Selector::has("data-lf-filter"));
        assert_eq!(sel.to_string(), "[data-lf-filter]");
    }

    #[test]
    fn test_parse_value_forms() {
        assert_eq!(
            Selector::parse(r#"[data-lf-filter="price"]"#).unwrap(),
            Selector::equals("data-lf-filter", "price")
        );
        assert_eq!(
            Selector::parse("[data-lf-filter='price']").unwrap(),
            Selector::equals("data-lf-filter", "price")
        );
        assert_eq!(
            Selector::parse("[ data-lf-filter = price ]").unwrap(),
            Selector::equals("data-lf-filter", "price")
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Selector::parse("div").is_err());
        assert!(Selector::parse("[]").is_err());
        assert!(Selector::parse("[a b]").is_err());
    }

    #[test]
    fn test_matches_value() {
        let presence = Selector::has("x");
        assert!(presence.matches_value(Some("")));
        assert!(!presence.matches_value(None));

        let exact = Selector::equals("x", "1");
        assert!(exact.matches_value(Some("1")));
        assert!(!exact.matches_value(Some("2")));
    }
}
