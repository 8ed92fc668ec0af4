use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("gate '{gate}' expects a {expected} threshold, got {found}")]
    ThresholdType {
        gate: String,
        expected: &'static str,
        found: String,
    },
    #[error("duplicate gate name: {0}")]
    DuplicateGate(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
    #[error("{path} is not a gate list: {reason}")]
    Layout { path: String, reason: String },
    #[error("invalid gate registry in {path}: {source}")]
    Registry { path: String, source: GateError },
}

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("failed to read metrics file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid metrics snapshot in {path}: {reason}")]
    Snapshot { path: String, reason: String },
    #[error("collector '{collector}' failed: {source}")]
    Collector {
        collector: String,
        source: anyhow::Error,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("metrics collection failed: {0}")]
    Collect(#[from] CollectError),
    #[error("report write failed: {0}")]
    Report(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
