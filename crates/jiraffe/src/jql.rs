//! JQL search request construction.

use serde::Serialize;

/// Sort direction for an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Body of a `POST /search` request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JqlSearch {
    pub jql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand: Vec<String>,
}

impl JqlSearch {
    pub fn new(jql: impl Into<String>) -> Self {
        Self {
            jql: jql.into(),
            ..Self::default()
        }
    }

    /// Append an `ORDER BY` clause to the query string.
    pub fn order_by(mut self, clause: &str, order: SortOrder) -> Self {
        if self.jql.contains(" ORDER BY ") {
            self.jql.push_str(&format!(", {clause} {}", order.keyword()));
        } else {
            self.jql
                .push_str(&format!(" ORDER BY {clause} {}", order.keyword()));
        }
        self
    }

    /// Restrict the returned field set.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    pub fn expand(mut self, name: impl Into<String>) -> Self {
        self.expand.push(name.into());
        self
    }

    pub fn page(mut self, start_at: u32, max_results: u32) -> Self {
        self.start_at = Some(start_at);
        self.max_results = Some(max_results);
        self
    }
}

/// Clause names for commonly queried fields.
pub mod fields {
    pub const PRIORITY: &str = "priority";
    pub const STATUS: &str = "status";
    pub const SUMMARY: &str = "summary";
    pub const UPDATED: &str = "updated";
}
