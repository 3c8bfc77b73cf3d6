//! Admin API Resource Types
//!
//! Read-only views of the resources the admin server owns. Field names follow
//! the server's JSON (camelCase); anything the client never reads is ignored.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Paged collection envelope returned by every list endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Paging metadata (absent when the server returns a single page)
    #[serde(default)]
    pub page: Option<PageMetadata>,
}

impl<T> Page<T> {
    /// Whether another page follows this one
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page
            .as_ref()
            .is_some_and(|p| p.number + 1 < p.total_pages)
    }
}

/// Paging metadata
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Total items across all pages
    #[serde(default)]
    pub total_elements: u64,
    /// Number of pages
    #[serde(default)]
    pub total_pages: u64,
    /// Zero-based index of this page
    #[serde(default)]
    pub number: u64,
}

/// A running worker container
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInfo {
    /// Container identifier
    #[serde(default)]
    pub container_id: String,
    /// Comma-separated group membership
    #[serde(default)]
    pub groups: Option<String>,
    /// Number of modules deployed to this container
    #[serde(default)]
    pub deployment_size: u32,
    /// Host, ip, pid and similar runtime attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl fmt::Display for ContainerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.container_id)?;
        if let Some(host) = self.attributes.get("host") {
            write!(f, " on {host}")?;
        }
        if let Some(ip) = self.attributes.get("ip") {
            write!(f, " ({ip})")?;
        }
        write!(f, ", {} module(s) deployed", self.deployment_size)
    }
}

/// A stream definition
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDefinition {
    /// Unique stream name
    pub name: String,
    /// Pipeline DSL
    #[serde(default)]
    pub definition: String,
    /// Deployment status as reported by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StreamDefinition {
    /// Create a definition value
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            status: None,
        }
    }
}

/// An entry of a metric listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MetricInfo {
    /// Metric name
    pub name: String,
}

/// A field-value counter with its observed counts
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValueCounter {
    /// Counter name
    pub name: String,
    /// Observed values and their counts, in server order
    #[serde(default, deserialize_with = "ordered_counts")]
    pub field_value_counts: Vec<(String, f64)>,
}

impl FieldValueCounter {
    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> f64 {
        self.field_value_counts.iter().map(|(_, count)| count).sum()
    }

    /// Whether no value has been counted yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_value_counts.is_empty()
    }
}

/// Deployment properties, sent as `key=value` pairs joined by commas
pub type DeploymentProperties = BTreeMap<String, String>;

/// Format deployment properties for the `properties` form field
#[must_use]
pub fn format_deployment_properties(properties: &DeploymentProperties) -> String {
    properties
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Outcome of a counter deletion that did not fail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterDeletion {
    /// The counter existed and was removed
    Deleted,
    /// There was nothing to remove
    NotFound,
}

// Keeps map order so equal counts stay in the order the server sent them.
fn ordered_counts<'de, D>(deserializer: D) -> Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedCounts;

    impl<'de> Visitor<'de> for OrderedCounts {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of field values to counts")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut counts = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((field, count)) = map.next_entry::<String, f64>()? {
                counts.push((field, count));
            }
            Ok(counts)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(OrderedCounts)
}
