use async_trait::async_trait;

use crate::error::CollectError;
use crate::metrics::MetricsSnapshot;

/// Producer of the snapshot the engine consumes.
///
/// Implementations must hand over ratios already clamped to `[0, 1]`. A
/// collector either returns a complete snapshot or an error; the engine is
/// never run on partial data.
#[async_trait]
pub trait MetricsCollector: Send + Sync {
    fn name(&self) -> &str;
    async fn collect(&self) -> Result<MetricsSnapshot, CollectError>;
}
