use std::path::PathBuf;

use clap::Parser;
use qgate_cli::app::{self, EXIT_EXECUTION_FAILURE};
use qgate_cli::commands::cli;
use qgate_core::config::LoggingConfig;
use qgate_core::error::CliError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Gatekeeper execution failed: {e}");
            eprintln!("{e}");
            EXIT_EXECUTION_FAILURE
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = qgate_core::config::load_default().map_err(|e| CliError::Config(e.to_string()))?;
    init_tracing(&cfg.logging, args.verbose).map_err(CliError::Config)?;

    tracing::info!("Starting quality gatekeeper");

    let result = app::run(&args, &cfg).await?;
    Ok(result.decision.exit_code())
}

/// Where log lines go for this run. `--verbose` turns on stderr at debug
/// level even when the config disables logging.
struct LogPlan {
    filter: String,
    console: bool,
    file_dir: Option<PathBuf>,
}

impl LogPlan {
    fn resolve(logging: &LoggingConfig, verbose: bool) -> Option<Self> {
        if verbose {
            return Some(Self {
                filter: "debug".to_string(),
                console: true,
                file_dir: logging.enabled.then(|| log_dir(logging)).flatten(),
            });
        }
        if !logging.enabled {
            return None;
        }

        let filter = std::env::var("RUST_LOG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| logging.level.clone());

        Some(Self {
            filter,
            console: logging.console,
            file_dir: log_dir(logging),
        })
    }
}

fn log_dir(logging: &LoggingConfig) -> Option<PathBuf> {
    if !logging.file {
        return None;
    }
    let dir = logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("qgate"));
    Some(dir)
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<(), String> {
    let Some(plan) = LogPlan::resolve(logging, verbose) else {
        return Ok(());
    };
    if !plan.console && plan.file_dir.is_none() {
        return Err("logging enabled but neither console nor file output is on".to_string());
    }

    let filter = EnvFilter::try_new(&plan.filter).map_err(|e| e.to_string())?;

    let file_layer = match &plan.file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("create log dir {} failed: {e}", dir.display()))?;
            let appender = tracing_appender::rolling::never(
                dir,
                format!("qgate.{}.log", std::process::id()),
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    // stdout carries the report, so console logs go to stderr.
    let console_layer = plan.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
