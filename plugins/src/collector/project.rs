use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use qgate_core::collector::MetricsCollector;
use qgate_core::config::CollectorConfig;
use qgate_core::error::CollectError;
use qgate_core::metrics::MetricsSnapshot;
use serde_json::Value;

use super::parse;
use super::probe::{run_probe, ProbeOutput};

/// Used when the source tree cannot be measured.
const FALLBACK_TOTAL_LOC: usize = 1000;

/// Probes a JS/TS project through git and npm.
///
/// A failing probe is not fatal: it falls back to a conservative value and
/// logs a warning. Only an unusable project root aborts collection.
pub struct ProjectCollector {
    root: PathBuf,
    cfg: CollectorConfig,
}

impl ProjectCollector {
    pub fn new(root: impl Into<PathBuf>, cfg: CollectorConfig) -> Self {
        Self {
            root: root.into(),
            cfg,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.cfg.probe_timeout_ms)
    }

    async fn probe(&self, program: &str, args: &[&str]) -> anyhow::Result<ProbeOutput> {
        run_probe(&self.root, program, args, self.timeout()).await
    }

    async fn npm(&self, args: &[&str]) -> anyhow::Result<ProbeOutput> {
        let npm = self.cfg.npm_program.as_str();
        self.probe(npm, args).await
    }

    async fn npm_script(&self, script: &str) -> anyhow::Result<ProbeOutput> {
        self.npm(&["run", script]).await
    }

    async fn loc_delta(&self) -> f64 {
        let base = self.cfg.base_rev.as_str();
        let out = match self.probe("git", &["diff", "--stat", base, "HEAD"]).await {
            Ok(o) if o.success => o,
            Ok(_) => return 0.0,
            Err(e) => {
                tracing::warn!("Failed to collect LOC delta: {e}");
                return 0.0;
            }
        };

        let summary = out.stdout.trim().lines().last().unwrap_or("");
        let Some(changed) = parse::parse_changed_lines(summary) else {
            return 0.0;
        };
        parse::capped_ratio(changed, self.total_loc().await)
    }

    async fn total_loc(&self) -> usize {
        let root = self.root.clone();
        let ext = self.cfg.loc_extension.clone();
        match tokio::task::spawn_blocking(move || count_source_lines(&root, &ext)).await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                tracing::warn!("Failed to count source lines: {e}");
                FALLBACK_TOTAL_LOC
            }
            Err(e) => {
                tracing::warn!("Line counting task failed: {e}");
                FALLBACK_TOTAL_LOC
            }
        }
    }

    async fn novelty(&self) -> f64 {
        let base = self.cfg.base_rev.as_str();
        match self
            .probe("git", &["diff", "--name-status", base, "HEAD"])
            .await
        {
            Ok(o) if o.success => parse::novelty_from_name_status(&o.stdout),
            Ok(_) => 0.0,
            Err(e) => {
                tracing::warn!("Failed to collect novelty: {e}");
                0.0
            }
        }
    }

    async fn dependency_delta(&self) -> f64 {
        let base = self.cfg.base_rev.as_str();
        let diff = match self
            .probe("git", &["diff", base, "HEAD", "--", "package.json"])
            .await
        {
            Ok(o) if o.success && !o.stdout.is_empty() => o.stdout,
            Ok(_) => return 0.0,
            Err(e) => {
                tracing::warn!("Failed to collect dependency delta: {e}");
                return 0.0;
            }
        };

        let changes = parse::count_dependency_changes(&diff);
        parse::capped_ratio(changes, self.declared_dependencies().await)
    }

    async fn declared_dependencies(&self) -> usize {
        let path = self.root.join("package.json");
        let Ok(raw) = tokio::fs::read_to_string(&path).await else {
            return 1;
        };
        serde_json::from_str::<Value>(&raw)
            .map(|pkg| parse::count_declared_dependencies(&pkg))
            .unwrap_or(1)
    }

    async fn mutation_score(&self) -> f64 {
        match self.npm_script("test:mutation").await {
            Ok(o) if o.success => parse::parse_mutation_score(&o.stdout).unwrap_or(0.0),
            Ok(o) => {
                tracing::warn!("Mutation testing failed: {}", o.stderr.trim());
                0.0
            }
            Err(e) => {
                tracing::warn!("Failed to collect mutation score: {e}");
                0.0
            }
        }
    }

    async fn test_coverage(&self) -> f64 {
        match self.npm_script("test:coverage").await {
            Ok(o) if o.success => parse::parse_coverage(&o.stdout).unwrap_or(0.0),
            Ok(_) => 0.0,
            Err(e) => {
                tracing::warn!("Failed to collect test coverage: {e}");
                0.0
            }
        }
    }

    async fn sast_severity(&self) -> f64 {
        // npm audit exits non-zero whenever it finds something, so the
        // report is read regardless of the exit status.
        match self.npm(&["audit", "--json"]).await {
            Ok(o) => match serde_json::from_str::<Value>(&o.stdout) {
                Ok(audit) => parse::sast_severity(&audit),
                Err(e) => {
                    tracing::warn!("Failed to parse npm audit output: {e}");
                    0.0
                }
            },
            Err(e) => {
                tracing::warn!("Failed to collect SAST score: {e}");
                0.0
            }
        }
    }

    async fn build_success(&self) -> bool {
        match self.npm_script("build").await {
            Ok(o) if o.success => {}
            Ok(_) => return false,
            Err(e) => {
                tracing::warn!("Failed to check build success: {e}");
                return false;
            }
        }

        match self.npm(&["test"]).await {
            Ok(o) => o.success,
            Err(e) => {
                tracing::warn!("Failed to run tests: {e}");
                false
            }
        }
    }

    async fn devirt_success_rate(&self) -> f64 {
        match self.npm_script("test:devirt").await {
            Ok(o) if o.success => parse::parse_devirt_rate(&o.stdout).unwrap_or(0.0),
            Ok(_) => 0.0,
            Err(e) => {
                tracing::warn!("Failed to collect devirtualization metrics: {e}");
                0.0
            }
        }
    }

    async fn contract_pass_rate(&self) -> f64 {
        match self.npm_script("test:contracts").await {
            Ok(o) if o.success => parse::parse_contract_pass_rate(&o.stdout)
                .unwrap_or(MetricsSnapshot::NO_CONTRACTS_PASS_RATE),
            Ok(_) => 0.0,
            Err(e) => {
                tracing::warn!("Failed to collect contract metrics: {e}");
                MetricsSnapshot::NO_CONTRACTS_PASS_RATE
            }
        }
    }
}

#[async_trait]
impl MetricsCollector for ProjectCollector {
    fn name(&self) -> &str {
        "project"
    }

    async fn collect(&self) -> Result<MetricsSnapshot, CollectError> {
        if !self.root.is_dir() {
            return Err(CollectError::Collector {
                collector: self.name().to_string(),
                source: anyhow::anyhow!(
                    "project root is not a directory: {}",
                    self.root.display()
                ),
            });
        }

        tracing::info!(root = %self.root.display(), "Collecting quality metrics...");

        // git probes are read-only and can overlap.
        let (delta_loc, novelty, ext_dep_delta) = futures::join!(
            self.loc_delta(),
            self.novelty(),
            self.dependency_delta()
        );

        // npm scripts share node_modules and build output; keep them serial.
        let mutation = self.mutation_score().await;
        let test_coverage = self.test_coverage().await;
        let static_severity = self.sast_severity().await;
        let build_success = self.build_success().await;
        let devirt_success_rate = self.devirt_success_rate().await;
        let contract_pass_rate = self.contract_pass_rate().await;

        let snapshot = MetricsSnapshot {
            delta_loc,
            novelty,
            ext_dep_delta,
            mutation,
            // No probe exists for these yet.
            flakiness: 0.0,
            static_severity,
            test_coverage,
            devirt_success_rate,
            contract_pass_rate,
            build_success,
            parse_time_ms: 0.0,
            lift_time_ms: 0.0,
            memory_usage_mb: 0.0,
        };

        for field in snapshot.out_of_range_ratios() {
            tracing::warn!(field, "metric outside [0, 1]; producer should clamp");
        }

        Ok(snapshot)
    }
}

/// Total line count of `*.{ext}` files under `root`, skipping `node_modules`.
fn count_source_lines(root: &Path, ext: &str) -> anyhow::Result<usize> {
    let pattern = root.join("**").join(format!("*.{ext}"));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 project path: {}", root.display()))?;

    let mut total = 0usize;
    for entry in glob::glob(pattern)? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("skipping unreadable path: {e}");
                continue;
            }
        };
        if path.components().any(|c| c.as_os_str() == "node_modules") || !path.is_file() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(s) => total += s.lines().count(),
            Err(e) => tracing::debug!(path = %path.display(), "skipping file: {e}"),
        }
    }
    Ok(total)
}
