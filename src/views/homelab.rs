use crate::models::{HomelabDataset, HomelabRecord};
use serde::Serialize;

#[derive(Debug, Serialize, Default)]
pub struct HomelabIndex {
    pub homelabs: Vec<String>,
    pub metrics: Vec<String>,
}

impl From<&HomelabDataset> for HomelabIndex {
    fn from(dataset: &HomelabDataset) -> Self {
        Self {
            homelabs: dataset.names().into_iter().map(String::from).collect(),
            metrics: dataset
                .available_metrics()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct Homelab {
    pub name: String,
    pub metrics: HomelabRecord,
}

impl Homelab {
    pub fn new(name: &str, record: &HomelabRecord) -> Self {
        Self {
            name: name.to_string(),
            metrics: record.clone(),
        }
    }
}
