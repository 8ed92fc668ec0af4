use std::path::Path;

use qgate_core::collector::MetricsCollector;
use qgate_core::config::CollectorConfig;
use qgate_core::gatekeeper::{DefaultGateSource, GateSource};

use crate::collector::{ProjectCollector, SnapshotFileCollector};
use crate::gates::JsonFileGateSource;

/// A snapshot file, when given, replaces probing the project.
pub fn build_collector(
    metrics_file: Option<&Path>,
    project_root: &Path,
    cfg: &CollectorConfig,
) -> Box<dyn MetricsCollector> {
    match metrics_file {
        Some(path) => Box::new(SnapshotFileCollector::new(path)),
        None => Box::new(ProjectCollector::new(project_root, cfg.clone())),
    }
}

pub fn build_gate_source(config: Option<&Path>) -> Box<dyn GateSource> {
    match config {
        Some(path) => Box::new(JsonFileGateSource::new(path)),
        None => Box::new(DefaultGateSource),
    }
}
