use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Result;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct ProbeOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run one external probe in `cwd` and capture its output.
///
/// Errors only when the program cannot be spawned or exceeds `timeout`; a
/// non-zero exit is reported through `success`.
pub async fn run_probe(
    cwd: &Path,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<ProbeOutput> {
    let child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to spawn '{}': {}", program, e))?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "'{} {}' timed out after {}ms",
                program,
                args.join(" "),
                timeout.as_millis()
            )
        })??;

    tracing::debug!(
        program,
        args = %args.join(" "),
        status = ?output.status.code(),
        "probe finished"
    );

    Ok(ProbeOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_probe(
            dir.path(),
            "qgate-definitely-not-a-real-binary",
            &[],
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }
}
