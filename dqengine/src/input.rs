//! Loading datasets and rule sets from disk.

use dqengine_core::error::DqError;
use dqengine_core::{Dataset, Result, RuleSet};
use std::path::Path;

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DqError::io(format!("Failed to read {}", path.display()), e))
}

/// Loads a dataset file holding a JSON array of row objects.
pub async fn load_dataset(path: &Path) -> Result<Dataset> {
    let contents = read_file(path).await?;
    let dataset = Dataset::from_json_str(&contents)?;
    tracing::debug!("Loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Loads and validates a rule-set file.
pub async fn load_rules(path: &Path) -> Result<RuleSet> {
    let contents = read_file(path).await?;
    let rules = RuleSet::from_json_str(&contents)?;
    tracing::debug!("Loaded {} rules from {}", rules.len(), path.display());
    Ok(rules)
}

/// Label for a dataset: the explicit name if given, else the file stem.
pub fn dataset_label(explicit: Option<&str>, path: &Path) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "dataset".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_label_prefers_explicit_name() {
        let path = Path::new("/data/orders.json");
        assert_eq!(dataset_label(Some("sales"), path), "sales");
        assert_eq!(dataset_label(None, path), "orders");
        assert_eq!(dataset_label(None, Path::new("/")), "dataset");
    }
}
