use std::sync::Mutex;

/// Logging capability handed to the engine explicitly, so evaluation stays
/// free of process-wide side effects.
pub trait EvalReporter: Send + Sync {
    fn debug(&self, _msg: &str) {}
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Forwards to `tracing` under the `qgate::gatekeeper` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl EvalReporter for TracingReporter {
    fn debug(&self, msg: &str) {
        tracing::debug!(target: "qgate::gatekeeper", "{}", msg);
    }

    fn info(&self, msg: &str) {
        tracing::info!(target: "qgate::gatekeeper", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "qgate::gatekeeper", "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "qgate::gatekeeper", "{}", msg);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl EvalReporter for NullReporter {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Keeps every message in memory; used by tests to assert on diagnostics.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<(ReportLevel, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(ReportLevel, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn messages_at(&self, level: ReportLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: ReportLevel, msg: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, msg.to_string()));
        }
    }
}

impl EvalReporter for RecordingReporter {
    fn debug(&self, msg: &str) {
        self.push(ReportLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.push(ReportLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(ReportLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(ReportLevel::Error, msg);
    }
}
