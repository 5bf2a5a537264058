//! Query-string builder for the backend's REST tables.
//!
//! Filters follow the `column=op.value` convention (`id=eq.4`,
//! `id=in.(1,2)`, `order=position.asc`).

use std::fmt::Display;

/// Sort direction for [`Query::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A table query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    /// An empty query (all columns, all rows).
    #[must_use]
    pub const fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Restrict returned columns (`select=id,name`).
    #[must_use]
    pub fn select(self, columns: &str) -> Self {
        self.set("select", columns.to_string())
    }

    /// `column = value`.
    ///
    /// Simple operators read the value literally, so it is never quoted.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// `column IN (values)`.
    #[must_use]
    pub fn is_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let list = values
            .into_iter()
            .map(|value| quote(&value.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        self.params
            .push((column.to_string(), format!("in.({list})")));
        self
    }

    /// Add a sort key. Later calls sort within earlier ones.
    #[must_use]
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        let key = format!("{column}.{}", direction.as_str());
        if let Some((_, existing)) = self.params.iter_mut().find(|(k, _)| k == "order") {
            existing.push(',');
            existing.push_str(&key);
            return self;
        }
        self.params.push(("order".to_string(), key));
        self
    }

    /// Return at most `n` rows.
    #[must_use]
    pub fn limit(self, n: u32) -> Self {
        self.set("limit", n.to_string())
    }

    /// Query-string pairs, in insertion order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Key identifying this query against `table`, for refetch de-duplication.
    #[must_use]
    pub fn cache_key(&self, table: &str) -> String {
        let pairs = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{table}?{pairs}")
    }

    fn set(mut self, key: &str, value: String) -> Self {
        if let Some((_, existing)) = self.params.iter_mut().find(|(k, _)| k == key) {
            *existing = value;
            return self;
        }
        self.params.push((key.to_string(), value));
        self
    }
}

/// Quote an `in.(...)` list item when it contains list-syntax characters.
fn quote(value: &str) -> String {
    if value.contains([',', '(', ')', '"', '\\', ':']) || value.trim() != value {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
