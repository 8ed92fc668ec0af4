use std::path::{Path, PathBuf};

use anyhow::Context;

use super::types::AppConfig;

/// Get the default qgate data directory: ~/.qgate
pub fn get_qgate_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".qgate"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.qgate/config.toml (highest)
    let home_config = get_qgate_data_dir().ok().map(|d| d.join("config.toml"));

    // Priority 2: ./qgate.toml (current directory)
    let local_config = Path::new("qgate.toml");

    let mut cfg = match home_config.filter(|p| p.exists()) {
        Some(p) => load_from_path(&p)?,
        None if local_config.exists() => load_from_path(local_config)?,
        None => AppConfig::default(),
    };

    // Environment variable overrides (Priority 0: highest)
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok())?;

    Ok(cfg)
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(cfg)
}

fn apply_env_overrides(
    cfg: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("QGATE_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v.trim().to_string();
        }
    }

    if let Some(v) = lookup("QGATE_PROBE_TIMEOUT_MS") {
        if !v.trim().is_empty() {
            cfg.collector.probe_timeout_ms = v
                .trim()
                .parse()
                .with_context(|| format!("invalid QGATE_PROBE_TIMEOUT_MS: {v}"))?;
        }
    }

    Ok(())
}
