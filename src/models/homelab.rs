use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reported metric value. Files mix quoted values ("45%") with bare numbers;
/// anything else (null, lists, nested objects) is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Other(serde_json::Value),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(value) => f.write_str(value),
            MetricValue::Number(value) => write!(f, "{}", value),
            MetricValue::Flag(value) => write!(f, "{}", value),
            MetricValue::Other(value) => write!(f, "{}", value),
        }
    }
}

pub type HomelabRecord = IndexMap<String, MetricValue>;

/// Homelab name → metrics, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HomelabDataset(IndexMap<String, HomelabRecord>);

impl HomelabDataset {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&HomelabRecord> {
        self.0.get(name)
    }

    pub fn metric(&self, name: &str, metric: &str) -> Option<&MetricValue> {
        self.get(name).and_then(|record| record.get(metric))
    }

    /// Metric names of the first homelab in the file.
    pub fn available_metrics(&self) -> Vec<&str> {
        self.0
            .values()
            .next()
            .map(|record| record.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
