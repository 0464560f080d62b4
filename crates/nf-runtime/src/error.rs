//! Error types for nf-runtime

use thiserror::Error;

/// Fatal errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Execution identity token is not present in the environment
    #[error("failed to get execution token")]
    MissingExecutionToken,

    /// Storage dispatcher rejected or failed the provisioning request
    #[error("storage provisioning failed: {0}")]
    ProvisioningFailed(String),

    /// Working directory could not be materialized on the shared volume
    #[error("failed to stage working directory {path}: {reason}")]
    Staging { path: String, reason: String },

    /// Pipeline runner could not be started
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipeline runner exited unsuccessfully
    #[error("pipeline exited with {}", describe_exit(.code))]
    PipelineExecutionFailed { code: Option<i32> },

    /// Run interrupted by the host before the pipeline finished
    #[error("pipeline run cancelled")]
    Cancelled,

    /// Parameter payload could not be resolved
    #[error(transparent)]
    Params(#[from] nf_params::ParamsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error (log store)
    #[error("HTTP error: {0}")]
    Http(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl From<reqwest::Error> for RuntimeError {
    fn from(err: reqwest::Error) -> Self {
        RuntimeError::Http(err.to_string())
    }
}
