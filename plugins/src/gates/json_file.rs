use std::path::PathBuf;

use qgate_core::error::ConfigError;
use qgate_core::gatekeeper::{EvalReporter, GateDefinition, GateRegistry, GateSource};
use serde::Deserialize;

/// Accepted layouts of a gate configuration document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GateDocument {
    Wrapped { gates: Vec<GateDefinition> },
    Bare(Vec<GateDefinition>),
}

/// Parse a JSON gate document into a registry.
///
/// Malformed JSON is a [`ConfigError::Parse`]; well-formed JSON in another
/// shape is a [`ConfigError::Layout`].
pub fn parse_gate_document(path: &str, raw: &str) -> Result<GateRegistry, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| ConfigError::Parse {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let doc: GateDocument = serde_json::from_value(value).map_err(|e| ConfigError::Layout {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    let gates = match doc {
        GateDocument::Wrapped { gates } => gates,
        GateDocument::Bare(gates) => gates,
    };

    GateRegistry::new(gates).map_err(|source| ConfigError::Registry {
        path: path.to_string(),
        source,
    })
}

/// Gate source backed by a JSON file.
///
/// Known limitation: the document is read and validated, but custom gates
/// are not applied yet. The registry returned is always the default table.
pub struct JsonFileGateSource {
    path: PathBuf,
}

impl JsonFileGateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<GateRegistry, ConfigError> {
        let path = self.path.display().to_string();
        let raw = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        parse_gate_document(&path, &raw)
    }
}

impl GateSource for JsonFileGateSource {
    fn name(&self) -> &str {
        "json-file"
    }

    fn load(&self, reporter: &dyn EvalReporter) -> GateRegistry {
        if !self.path.exists() {
            reporter.debug(&format!(
                "gate config {} not found; using default gates",
                self.path.display()
            ));
            return GateRegistry::defaults();
        }

        match self.read() {
            Ok(parsed) => reporter.info(&format!(
                "Parsed {} gates from {}; custom gates are not applied, using default gates",
                parsed.len(),
                self.path.display()
            )),
            // Readable JSON counts as loaded even when it holds no usable gates.
            Err(e @ (ConfigError::Layout { .. } | ConfigError::Registry { .. })) => {
                reporter.info(&format!(
                    "Loaded config {} without usable gates ({e}); using default gates",
                    self.path.display()
                ))
            }
            Err(e) => reporter.warn(&format!(
                "Failed to load config {}: {e}",
                self.path.display()
            )),
        }

        GateRegistry::defaults()
    }
}
