//! Convenience builder for HTTP query parameters.
//!
//! List endpoints accept filters as `filter[<field>]`, a `sort` key and a
//! `per_page` size. This builder collects them from optional values.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Return a copy of the pairs with `key` set to `value`, replacing any
    /// existing entry for that key.
    #[must_use]
    pub fn with_replaced<T>(&self, key: &'static str, value: T) -> Vec<(&'static str, String)>
    where
        T: Display,
    {
        let mut pairs: Vec<_> = self.pairs.iter().filter(|(k, _)| *k != key).cloned().collect();
        pairs.push((key, value.to_string()));
        pairs
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
