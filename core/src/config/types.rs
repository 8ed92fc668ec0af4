use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub collector: CollectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "qgate_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Knobs for the project probing collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Upper bound for a single external probe command.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// File extension counted as source when measuring total LOC.
    #[serde(default = "default_loc_extension")]
    pub loc_extension: String,

    /// Git revision the change is compared against.
    #[serde(default = "default_base_rev")]
    pub base_rev: String,

    /// npm executable used for build, test and audit probes.
    #[serde(default = "default_npm_program")]
    pub npm_program: String,
}

fn default_probe_timeout_ms() -> u64 {
    600_000
}

fn default_loc_extension() -> String {
    "ts".to_string()
}

fn default_base_rev() -> String {
    "HEAD~1".to_string()
}

fn default_npm_program() -> String {
    "npm".to_string()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            loc_extension: default_loc_extension(),
            base_rev: default_base_rev(),
            npm_program: default_npm_program(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert!(cfg.logging.enabled);
        assert!(!cfg.logging.file);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.collector.probe_timeout_ms, 600_000);
        assert_eq!(cfg.collector.base_rev, "HEAD~1");
        assert_eq!(cfg.collector.npm_program, "npm");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"

            [collector]
            loc_extension = "js"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.console);
        assert_eq!(cfg.collector.loc_extension, "js");
        assert_eq!(cfg.collector.probe_timeout_ms, 600_000);
    }
}
