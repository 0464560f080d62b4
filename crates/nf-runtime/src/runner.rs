//! Child-process execution of the pipeline runner.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use indexmap::IndexMap;
use serde::Serialize;
use tokio::process::Command;
use tracing::{info, warn};

use crate::command::NextflowCommand;
use crate::error::RuntimeError;
use crate::Result;

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitReport {
    /// Exit code (always 0 for a report).
    pub exit_code: i32,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Run `command` to completion in `cwd`.
///
/// `envs` are layered over the inherited environment. Output streams are
/// inherited, not captured. If `cancel` resolves first the child is killed
/// and [`RuntimeError::Cancelled`] is returned.
pub async fn run_pipeline<C>(
    command: &NextflowCommand,
    envs: &IndexMap<String, String>,
    cwd: &Path,
    cancel: C,
) -> Result<ExitReport>
where
    C: Future<Output = ()>,
{
    let start = Instant::now();

    info!(command = %command.display(), "Launching Nextflow runtime");

    let mut child = Command::new(command.program())
        .args(command.args())
        .envs(envs)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| RuntimeError::Spawn {
            program: command.program().to_string(),
            source,
        })?;

    let status = tokio::select! {
        status = child.wait() => status?,
        _ = cancel => {
            warn!("Cancellation requested, stopping pipeline");
            child.kill().await?;
            return Err(RuntimeError::Cancelled);
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;

    if !status.success() {
        warn!(exit_code = ?status.code(), duration_ms, "Pipeline failed");
        return Err(RuntimeError::PipelineExecutionFailed {
            code: status.code(),
        });
    }

    info!(duration_ms, "Pipeline finished");
    Ok(ExitReport {
        exit_code: 0,
        duration_ms,
    })
}

/// Resolves when the host asks the process to stop (Ctrl-C, or SIGTERM on
/// Unix). Never resolves if no signal handler can be installed.
pub async fn termination_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Stand-in launcher: a shell script that ignores its arguments.
    fn fake_launcher(dir: &Path, body: &str) -> NextflowCommand {
        use std::os::unix::fs::PermissionsExt;

        let bin = dir.join("fake-nextflow");
        std::fs::write(&bin, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = RuntimeConfig {
            nextflow_bin: bin,
            shared_dir: dir.to_path_buf(),
            ..RuntimeConfig::default()
        };
        NextflowCommand::build(&config, Vec::new())
    }

    #[tokio::test]
    async fn test_success_exit() {
        let dir = tempdir().unwrap();
        let report = run_pipeline(
            &fake_launcher(dir.path(), "exit 0"),
            &IndexMap::new(),
            dir.path(),
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(report.exit_code, 0);
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let dir = tempdir().unwrap();
        let err = run_pipeline(
            &fake_launcher(dir.path(), "exit 3"),
            &IndexMap::new(),
            dir.path(),
            std::future::pending(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::PipelineExecutionFailed { code: Some(3) }
        ));
    }

    #[tokio::test]
    async fn test_env_and_cwd_applied() {
        let dir = tempdir().unwrap();
        let mut envs = IndexMap::new();
        envs.insert("NXF_DISABLE_CHECK_LATEST".to_string(), "true".to_string());

        run_pipeline(
            &fake_launcher(
                dir.path(),
                "printf '%s' \"$NXF_DISABLE_CHECK_LATEST\" > env.txt",
            ),
            &envs,
            dir.path(),
            std::future::pending(),
        )
        .await
        .unwrap();

        let written = std::fs::read_to_string(dir.path().join("env.txt")).unwrap();
        assert_eq!(written, "true");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let dir = tempdir().unwrap();
        let config = RuntimeConfig {
            nextflow_bin: PathBuf::from("/nonexistent/nextflow"),
            ..RuntimeConfig::default()
        };
        let cmd = NextflowCommand::build(&config, Vec::new());
        let err = run_pipeline(&cmd, &IndexMap::new(), dir.path(), std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_cancellation_kills_child() {
        let dir = tempdir().unwrap();
        let start = Instant::now();
        let err = run_pipeline(
            &fake_launcher(dir.path(), "exec sleep 30"),
            &IndexMap::new(),
            dir.path(),
            tokio::time::sleep(std::time::Duration::from_millis(50)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RuntimeError::Cancelled));
        assert!(start.elapsed().as_secs() < 10);
    }
}
