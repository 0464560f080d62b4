//! nf-runtime: execution side of a wrapped Nextflow pipeline
//!
//! Provisions a shared volume, stages the pipeline's working tree onto it,
//! runs `nextflow run` with flags translated from typed parameters, and
//! uploads `.nextflow.log` once the run ends, whichever way it ends.
//!
//! ## Key Components
//!
//! - `RuntimeProcedure`: the provision / run / upload sequence
//! - `Provisioner` / `HttpProvisioner`: storage dispatcher client
//! - `LogStore` / `FsLogStore` / `HttpLogStore`: log artifact destinations
//! - `RuntimeConfig`, `RunContext`: configuration and execution identity
//! - `WorkflowSpec`: task list and resource requests

pub mod command;
pub mod config;
pub mod context;
mod error;
pub mod fakes;
pub mod logs;
pub mod procedure;
pub mod provision;
pub mod runner;
pub mod staging;
pub mod telemetry;
#[cfg(test)]
mod test_http;
pub mod workflow;

pub use command::NextflowCommand;
pub use config::{RuntimeConfig, TaskResources};
pub use context::RunContext;
pub use error::RuntimeError;
pub use logs::{FsLogStore, HttpLogStore, LogStore, LogUploadOutcome, RemoteLogPath};
pub use procedure::{ProcedureReport, RuntimeProcedure, Stage};
pub use provision::{ExistingVolume, HttpProvisioner, Provisioner, VolumeHandle};
pub use runner::{termination_signal, ExitReport};
pub use staging::StageStats;
pub use telemetry::{init_tracing, LogFormat};
pub use workflow::{TaskSpec, WorkflowSpec};

/// Result type for nf-runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
