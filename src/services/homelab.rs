use crate::models::HomelabDataset;
use std::path::Path;

/// Reads the homelab document. A missing or unreadable file yields an empty
/// dataset; the assistant keeps running and answers that nothing is known.
pub fn load(path: impl AsRef<Path>) -> HomelabDataset {
    let path = path.as_ref();

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Homelab data file not readable, using empty dataset");
            return HomelabDataset::default();
        }
    };

    match serde_json::from_str::<HomelabDataset>(&content) {
        Ok(dataset) => {
            tracing::info!(path = %path.display(), homelabs = dataset.len(), "Homelab data loaded");
            dataset
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Homelab data file is not valid, using empty dataset");
            HomelabDataset::default()
        }
    }
}
