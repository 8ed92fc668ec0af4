//! CLI assembly: pick a collector and gate source, evaluate, report.
use std::path::Path;

use qgate_core::config::AppConfig;
use qgate_core::error::CliError;
use qgate_core::gatekeeper::{Decision, Gatekeeper, GatekeeperResult, TracingReporter};
use qgate_core::report::{self, GatekeeperReport};
use qgate_plugins::factory;

use crate::commands::cli::{Args, OutputFormat};

/// Exit code for any failure before a verdict exists.
pub const EXIT_EXECUTION_FAILURE: i32 = 3;

#[tracing::instrument(name = "cli.run", skip(args, cfg))]
pub async fn run(args: &Args, cfg: &AppConfig) -> Result<GatekeeperResult, CliError> {
    let project_root = match &args.project_root {
        Some(p) => p.clone(),
        None => std::env::current_dir()?,
    };

    let collector =
        factory::build_collector(args.metrics.as_deref(), &project_root, &cfg.collector);
    tracing::debug!(collector = collector.name(), "collecting metrics");
    let metrics = collector.collect().await?;

    tracing::info!(
        "Collected metrics: mutation={:.3}, risk_components=delta_loc:{:.3}, novelty:{:.3}",
        metrics.mutation,
        metrics.delta_loc,
        metrics.novelty
    );

    let reporter = TracingReporter;
    let source = factory::build_gate_source(args.config.as_deref());
    let gatekeeper = Gatekeeper::from_source(source.as_ref(), &reporter);
    let result = gatekeeper.evaluate(&metrics, &reporter);

    log_result(&result);

    let report = GatekeeperReport::from_result(&result, chrono::Utc::now());
    if let Some(path) = &args.output {
        write_report(path, &report)?;
    }

    match args.format {
        OutputFormat::Text => print!("{}", report::format_text(&result)),
        OutputFormat::Json => println!(
            "{}",
            report
                .to_json_pretty()
                .map_err(|e| CliError::Report(e.to_string()))?
        ),
    }

    Ok(result)
}

fn log_result(result: &GatekeeperResult) {
    tracing::info!("Quality gate decision: {}", result.decision);
    tracing::info!("Risk score: {:.3}", result.risk_score);
    tracing::info!("Passed gates: {:?}", result.passed_gates);

    if !result.failed_gates.is_empty() {
        tracing::warn!("Failed gates: {:?}", result.failed_gates);
    }
    for w in &result.warnings {
        tracing::warn!("{}", w);
    }

    match result.decision {
        Decision::Promote | Decision::ManualQA => {
            tracing::info!("{}", report::verdict_line(result.decision))
        }
        Decision::Refine => tracing::warn!("{}", report::verdict_line(result.decision)),
    }
}

pub fn write_report(path: &Path, report: &GatekeeperReport) -> Result<(), CliError> {
    let json = report
        .to_json_pretty()
        .map_err(|e| CliError::Report(e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| CliError::Report(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsString;

    fn write_metrics(dir: &Path, build_success: bool) -> std::path::PathBuf {
        let path = dir.join("metrics.json");
        let json = serde_json::json!({
            "delta_loc": 0.05, "novelty": 0.05, "ext_dep_delta": 0.0,
            "mutation": 0.85, "flakiness": 0.0, "static_severity": 0.0,
            "test_coverage": 0.9, "devirt_success_rate": 0.7,
            "contract_pass_rate": 1.0, "build_success": build_success,
            "parse_time_ms": 0.0, "lift_time_ms": 0.0, "memory_usage_mb": 0.0
        });
        std::fs::write(&path, json.to_string()).unwrap();
        path
    }

    fn args_for(dir: &Path, metrics: &Path) -> Args {
        let argv: Vec<OsString> = vec![
            "qgate".into(),
            "--project-root".into(),
            dir.into(),
            "--metrics".into(),
            metrics.into(),
            "--output".into(),
            dir.join("result.json").into(),
        ];
        Args::parse_from(argv)
    }

    #[tokio::test]
    async fn promotes_and_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = write_metrics(dir.path(), true);

        let result = run(&args_for(dir.path(), &metrics), &AppConfig::default())
            .await
            .unwrap();
        assert_eq!(result.decision, Decision::Promote);
        assert_eq!(result.decision.exit_code(), 0);

        let raw = std::fs::read_to_string(dir.path().join("result.json")).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["decision"], "PROMOTE");
        assert_eq!(v["failed_gates"], serde_json::json!([]));
        assert!(v["timestamp"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn failed_build_refines() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = write_metrics(dir.path(), false);

        let result = run(&args_for(dir.path(), &metrics), &AppConfig::default())
            .await
            .unwrap();
        assert_eq!(result.decision, Decision::Refine);
        assert_eq!(result.decision.exit_code(), 2);
    }

    #[tokio::test]
    async fn collection_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        let err = run(&args_for(dir.path(), &missing), &AppConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Collect(_)));
        assert!(!dir.path().join("result.json").exists());
    }
}
