//! Runtime configuration and task resource requests.
//!
//! Every value has a production default; the environment can override the
//! deployment-specific ones.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default storage dispatcher inside the cluster.
pub const DEFAULT_DISPATCHER_URL: &str = "http://nf-dispatcher-service.flyte.svc.cluster.local";

/// Directory names never copied onto the shared volume.
pub const DEFAULT_IGNORE_LIST: &[&str] = &[
    "latch",
    ".latch",
    "nextflow",
    ".nextflow",
    "work",
    "results",
    "miniconda",
    "anaconda3",
    "mambaforge",
];

/// Resource request attached to a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TaskResources {
    /// CPU cores (fractional allowed)
    pub cpu: f32,
    /// Memory in GiB
    pub memory_gib: f32,
    /// Ephemeral storage in GiB
    pub storage_gib: u32,
}

impl TaskResources {
    /// Resources for the storage provisioning task.
    pub const fn initialize() -> Self {
        Self {
            cpu: 0.25,
            memory_gib: 0.5,
            storage_gib: 1,
        }
    }

    /// Resources for the task that hosts the Nextflow runner.
    pub const fn nextflow_runtime() -> Self {
        Self {
            cpu: 4.0,
            memory_gib: 8.0,
            storage_gib: 100,
        }
    }
}

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Storage dispatcher base URL
    pub dispatcher_url: String,
    /// Path of the provisioning endpoint
    pub provision_path: String,
    /// Authorization scheme sent with the execution token
    pub auth_scheme: String,
    /// Size of the shared volume to request
    pub storage_gib: u32,

    /// Tree copied onto the shared volume
    pub source_root: PathBuf,
    /// Shared volume mount point; also the pipeline's working directory
    pub shared_dir: PathBuf,
    /// Entry names skipped while copying
    pub ignore_list: Vec<String>,

    /// Nextflow launcher
    pub nextflow_bin: PathBuf,
    /// Pipeline definition, relative to `shared_dir`
    pub pipeline_file: String,
    /// Nextflow execution profile
    pub profile: String,
    /// Nextflow config file, resolved from `shared_dir`
    pub config_file: String,
    /// Environment set on top of the inherited one
    pub env_overrides: IndexMap<String, String>,

    /// Log file written by Nextflow inside `shared_dir`
    pub log_file_name: String,
    /// Remote root for uploaded logs
    pub remote_log_root: String,
    /// Pipeline identifier used in remote log paths
    pub pipeline_id: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let mut env_overrides = IndexMap::new();
        env_overrides.insert("NXF_HOME".to_string(), "/root/.nextflow".to_string());
        env_overrides.insert(
            "NXF_OPTS".to_string(),
            "-Xms2048M -Xmx8G -XX:ActiveProcessorCount=4".to_string(),
        );
        env_overrides.insert("NXF_DISABLE_CHECK_LATEST".to_string(), "true".to_string());

        RuntimeConfig {
            dispatcher_url: DEFAULT_DISPATCHER_URL.to_string(),
            provision_path: "/provision-storage".to_string(),
            auth_scheme: "Latch-Execution-Token".to_string(),
            storage_gib: TaskResources::nextflow_runtime().storage_gib,
            source_root: PathBuf::from("/root"),
            shared_dir: PathBuf::from("/nf-workdir"),
            ignore_list: DEFAULT_IGNORE_LIST.iter().map(|s| s.to_string()).collect(),
            nextflow_bin: PathBuf::from("/root/nextflow"),
            pipeline_file: "main.nf".to_string(),
            profile: "docker".to_string(),
            config_file: "latch.config".to_string(),
            env_overrides,
            log_file_name: ".nextflow.log".to_string(),
            remote_log_root: "latch:///your_log_dir".to_string(),
            pipeline_id: nf_params::metatdenovo::PIPELINE_ID.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults with environment overrides applied.
    ///
    /// Recognised variables: `NF_DISPATCHER_URL`, `NF_STORAGE_GIB`,
    /// `NF_SOURCE_ROOT`, `NF_SHARED_DIR`, `NF_BIN`, `NF_REMOTE_LOG_ROOT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("NF_DISPATCHER_URL") {
            config.dispatcher_url = url;
        }
        if let Some(gib) = lookup("NF_STORAGE_GIB").and_then(|v| v.parse().ok()) {
            config.storage_gib = gib;
        }
        if let Some(root) = lookup("NF_SOURCE_ROOT") {
            config.source_root = PathBuf::from(root);
        }
        if let Some(dir) = lookup("NF_SHARED_DIR") {
            config.shared_dir = PathBuf::from(dir);
        }
        if let Some(bin) = lookup("NF_BIN") {
            config.nextflow_bin = PathBuf::from(bin);
        }
        if let Some(root) = lookup("NF_REMOTE_LOG_ROOT") {
            config.remote_log_root = root;
        }

        config
    }

    /// Full provisioning endpoint URL.
    pub fn provision_url(&self) -> String {
        format!(
            "{}/{}",
            self.dispatcher_url.trim_end_matches('/'),
            self.provision_path.trim_start_matches('/')
        )
    }

    /// Location of the Nextflow log on the shared volume.
    pub fn log_path(&self) -> PathBuf {
        self.shared_dir.join(&self.log_file_name)
    }
}
