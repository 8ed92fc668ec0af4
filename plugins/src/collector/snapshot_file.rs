use std::path::PathBuf;

use async_trait::async_trait;
use qgate_core::collector::MetricsCollector;
use qgate_core::error::CollectError;
use qgate_core::metrics::MetricsSnapshot;

/// Reads a pre-computed snapshot from a JSON file.
pub struct SnapshotFileCollector {
    path: PathBuf,
}

impl SnapshotFileCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetricsCollector for SnapshotFileCollector {
    fn name(&self) -> &str {
        "snapshot-file"
    }

    async fn collect(&self) -> Result<MetricsSnapshot, CollectError> {
        let path = self.path.display().to_string();

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CollectError::Read {
                path: path.clone(),
                source,
            })?;

        let snapshot: MetricsSnapshot =
            serde_json::from_str(&raw).map_err(|e| CollectError::Snapshot {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        for field in snapshot.out_of_range_ratios() {
            tracing::warn!(%path, field, "metric outside [0, 1]; producer should clamp");
        }

        Ok(snapshot)
    }
}
