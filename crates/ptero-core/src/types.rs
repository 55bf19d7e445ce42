//! Core panel types.
//!
//! This module provides the credential scopes, the JSON envelopes the panel
//! wraps every record in, and resource shapes shared by both scopes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credential scope of an API key.
///
/// Application keys and client keys are not interchangeable: each one is only
/// accepted under its own URL prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Administrative scope with access to every resource on the panel
    Application,
    /// End-user scope limited to resources the key's owner can access
    Client,
}

impl Scope {
    /// Returns the URL segment used under `/api/`.
    #[must_use]
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Single-record envelope: `{"attributes": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record<T> {
    /// The record itself.
    pub attributes: T,
}

impl<T> Record<T> {
    /// Unwraps the envelope.
    pub fn into_inner(self) -> T {
        self.attributes
    }
}

/// List envelope: `{"data": [{"attributes": {...}}], "meta": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordList<T> {
    /// Records on this page.
    pub data: Vec<Record<T>>,
    /// Pagination metadata; absent on unpaginated lists.
    #[serde(default)]
    pub meta: ListMeta,
}

impl<T> RecordList<T> {
    /// Returns the pagination metadata of this page.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.meta.pagination
    }

    /// Unwraps every record on this page, preserving order.
    pub fn into_items(self) -> Vec<T> {
        self.data.into_iter().map(Record::into_inner).collect()
    }
}

/// Metadata attached to list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMeta {
    /// Page position of the list.
    #[serde(default)]
    pub pagination: Pagination,
}

/// Pagination metadata of a single page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: u64,
    /// Number of items on this page.
    #[serde(default)]
    pub count: u64,
    /// Page size requested by the panel.
    #[serde(default)]
    pub per_page: u64,
    /// 1-based index of this page.
    #[serde(default)]
    pub current_page: u32,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Navigation links.
    #[serde(default, deserialize_with = "links_or_empty_array")]
    pub links: PaginationLinks,
}

impl Pagination {
    /// Returns true if the panel reports pages after this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Navigation links of a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationLinks {
    /// URL of the next page, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// URL of the previous page, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

// An empty `links` object is encoded as `[]` by the panel.
fn links_or_empty_array<'de, D>(deserializer: D) -> Result<PaginationLinks, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) if items.is_empty() => Ok(PaginationLinks::default()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

/// A partial view of a record sent as a PATCH body.
///
/// Every field of an implementor is optional; only fields that are present
/// are serialized.
pub trait FieldSubset: Serialize + Send + Sync {
    /// Name used in error messages, e.g. `build` or `details`.
    const KIND: &'static str;

    /// Returns true if no field is present.
    fn is_empty(&self) -> bool;
}

/// Resource limits of a server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Limits {
    /// Memory limit (MiB), 0 for unlimited.
    #[serde(default)]
    pub memory: i64,
    /// Swap limit (MiB), -1 for unlimited.
    #[serde(default)]
    pub swap: i64,
    /// Disk limit (MiB), 0 for unlimited.
    #[serde(default)]
    pub disk: i64,
    /// Block IO weight.
    #[serde(default)]
    pub io: i64,
    /// CPU limit in percent of a single thread.
    #[serde(default)]
    pub cpu: i64,
    /// CPU pinning, e.g. `0-1,3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<String>,
    /// Whether the OOM killer is disabled.
    #[serde(default)]
    pub oom_disabled: bool,
}

/// Feature limits of a server.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureLimits {
    /// Maximum number of databases.
    #[serde(default)]
    pub databases: u32,
    /// Maximum number of allocations.
    #[serde(default)]
    pub allocations: u32,
    /// Maximum number of backups.
    #[serde(default)]
    pub backups: u32,
}
