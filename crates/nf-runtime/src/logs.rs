//! Best-effort upload of the Nextflow log after a run.
//!
//! Nothing here is fatal: a missing log or an unresolved run name skips the
//! upload, and a failed upload is reported without replacing the run's own
//! outcome.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RuntimeConfig;
use crate::context::RunContext;
use crate::error::RuntimeError;
use crate::Result;

/// File name the log is stored under remotely.
pub const REMOTE_LOG_NAME: &str = "nextflow.log";

/// Deterministic remote location of a run's log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteLogPath(String);

impl RemoteLogPath {
    /// `<root>/<pipeline_id>/<run_name>/nextflow.log`
    pub fn new(root: &str, pipeline_id: &str, run_name: &str) -> Self {
        let mut path = root.trim_end_matches('/').to_string();
        for segment in [pipeline_id, run_name, REMOTE_LOG_NAME] {
            path.push('/');
            path.push_str(segment.trim_matches('/'));
        }
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path below the URI scheme and authority, without a leading slash.
    ///
    /// `latch:///your_log_dir/x` becomes `your_log_dir/x`.
    pub fn key(&self) -> &str {
        let rest = match self.0.find("://") {
            Some(idx) => &self.0[idx + 3..],
            None => &self.0,
        };
        rest.trim_start_matches('/')
    }
}

impl std::fmt::Display for RemoteLogPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Destination for uploaded log artifacts.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn upload(&self, local: &Path, remote: &RemoteLogPath) -> Result<()>;
}

/// Log store mirroring remote paths under a local directory.
#[derive(Debug, Clone)]
pub struct FsLogStore {
    root: PathBuf,
}

impl FsLogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where `remote` lands on disk.
    pub fn resolve(&self, remote: &RemoteLogPath) -> PathBuf {
        self.root.join(remote.key())
    }
}

#[async_trait]
impl LogStore for FsLogStore {
    async fn upload(&self, local: &Path, remote: &RemoteLogPath) -> Result<()> {
        let target = self.resolve(remote);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(local, &target).await?;
        Ok(())
    }
}

/// Log store accepting `PUT <endpoint>/<key>` uploads.
pub struct HttpLogStore {
    endpoint: String,
    authorization: Option<String>,
    http_client: reqwest::Client,
}

impl HttpLogStore {
    pub fn new(endpoint: &str, authorization: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("nf-latch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            authorization,
            http_client,
        })
    }

    /// Authenticate uploads with the execution token of `ctx`.
    pub fn for_context(endpoint: &str, config: &RuntimeConfig, ctx: &RunContext) -> Result<Self> {
        let authorization = ctx
            .execution_token()
            .ok()
            .map(|token| format!("{} {}", config.auth_scheme, token));
        Self::new(endpoint, authorization)
    }

    fn url_for(&self, remote: &RemoteLogPath) -> String {
        format!("{}/{}", self.endpoint, remote.key())
    }
}

#[async_trait]
impl LogStore for HttpLogStore {
    async fn upload(&self, local: &Path, remote: &RemoteLogPath) -> Result<()> {
        let body = tokio::fs::read(local).await?;
        let mut request = self.http_client.put(self.url_for(remote)).body(body);
        if let Some(auth) = &self.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RuntimeError::Http(format!(
                "log upload returned {}",
                status
            )));
        }
        Ok(())
    }
}

/// Result of the upload step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogUploadOutcome {
    /// Log uploaded to the given remote path
    Uploaded { remote: RemoteLogPath },
    /// No log file on the shared volume
    SkippedNoLog,
    /// Run name could not be resolved
    SkippedNoRunName,
    /// Store rejected the upload
    Failed { reason: String },
}

impl LogUploadOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, LogUploadOutcome::Uploaded { .. })
    }
}

/// Upload `<shared_dir>/.nextflow.log` if it exists.
pub async fn upload_nextflow_log<S>(
    store: &S,
    ctx: &RunContext,
    config: &RuntimeConfig,
) -> LogUploadOutcome
where
    S: LogStore + ?Sized,
{
    let log_path = config.log_path();
    if !log_path.exists() {
        return LogUploadOutcome::SkippedNoLog;
    }

    let Some(run_name) = ctx.run_name() else {
        warn!("Skipping logs upload, failed to get execution name");
        return LogUploadOutcome::SkippedNoRunName;
    };

    let remote = RemoteLogPath::new(&config.remote_log_root, &config.pipeline_id, run_name);
    info!(remote = %remote, "Uploading {}", config.log_file_name);

    match store.upload(&log_path, &remote).await {
        Ok(()) => LogUploadOutcome::Uploaded { remote },
        Err(err) => {
            warn!(remote = %remote, error = %err, "Log upload failed");
            LogUploadOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}
