//! The runtime procedure: provision, run, upload.
//!
//! ```text
//! Provisioning -> Running -> Uploading -> Done
//!                    \            ^
//!                     `-----------'  (failure still uploads, then Failed)
//! ```
//!
//! Provisioning errors end the run before anything is staged. Once the
//! pipeline stage starts, the log upload runs on every exit path: success,
//! non-zero exit, staging or spawn errors, and cancellation.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nf_params::{build_flags, metatdenovo, ExecutionRequest, ParameterSchema};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::command::{child_env, NextflowCommand};
use crate::config::RuntimeConfig;
use crate::context::RunContext;
use crate::error::RuntimeError;
use crate::logs::{upload_nextflow_log, LogStore, LogUploadOutcome};
use crate::provision::{Provisioner, VolumeHandle};
use crate::runner::{run_pipeline, ExitReport};
use crate::staging::{stage_workdir, StageStats};
use crate::Result;

/// Procedure stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Provisioning,
    Running,
    Uploading,
    Done,
    Failed,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Provisioning => "provisioning",
            Stage::Running => "running",
            Stage::Uploading => "uploading",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcedureReport {
    pub volume: VolumeHandle,
    pub command: NextflowCommand,
    pub staged: StageStats,
    pub exit: ExitReport,
    pub log_upload: LogUploadOutcome,
    pub stages: Vec<Stage>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Runs one pipeline execution against a provisioner and a log store.
pub struct RuntimeProcedure {
    config: RuntimeConfig,
    schema: &'static ParameterSchema,
    provisioner: Arc<dyn Provisioner>,
    log_store: Arc<dyn LogStore>,
}

impl RuntimeProcedure {
    /// Procedure for the metatdenovo schema.
    pub fn new(
        config: RuntimeConfig,
        provisioner: Arc<dyn Provisioner>,
        log_store: Arc<dyn LogStore>,
    ) -> Self {
        Self {
            config,
            schema: metatdenovo::schema(),
            provisioner,
            log_store,
        }
    }

    /// Use a different parameter schema.
    pub fn with_schema(mut self, schema: &'static ParameterSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn schema(&self) -> &'static ParameterSchema {
        self.schema
    }

    /// Nextflow invocation for `request`.
    pub fn command_for(&self, request: &ExecutionRequest) -> NextflowCommand {
        NextflowCommand::build(&self.config, build_flags(self.schema, request))
    }

    /// Step 1: obtain a shared volume.
    ///
    /// Fails with `MissingExecutionToken` before any request is sent.
    pub async fn provision(&self, ctx: &RunContext) -> Result<VolumeHandle> {
        enter(Stage::Provisioning);
        let token = ctx.execution_token()?;
        let volume = self
            .provisioner
            .provision(token, self.config.storage_gib)
            .await?;
        info!(volume = %volume, "Shared storage volume ready");
        Ok(volume)
    }

    /// Steps 2 and 3 on an already provisioned volume.
    pub async fn execute<C>(
        &self,
        ctx: &RunContext,
        volume: VolumeHandle,
        request: &ExecutionRequest,
        cancel: C,
    ) -> Result<ProcedureReport>
    where
        C: Future<Output = ()>,
    {
        self.execute_from(ctx, volume, request, cancel, Vec::new())
            .await
    }

    /// The full procedure: provision, then execute.
    pub async fn run<C>(
        &self,
        ctx: &RunContext,
        request: &ExecutionRequest,
        cancel: C,
    ) -> Result<ProcedureReport>
    where
        C: Future<Output = ()>,
    {
        let volume = match self.provision(ctx).await {
            Ok(volume) => volume,
            Err(err) => {
                enter(Stage::Failed);
                error!(error = %err, "Provisioning failed");
                return Err(err);
            }
        };

        self.execute_from(ctx, volume, request, cancel, vec![Stage::Provisioning])
            .await
    }

    async fn execute_from<C>(
        &self,
        ctx: &RunContext,
        volume: VolumeHandle,
        request: &ExecutionRequest,
        cancel: C,
        mut stages: Vec<Stage>,
    ) -> Result<ProcedureReport>
    where
        C: Future<Output = ()>,
    {
        let started_at = Utc::now();

        enter(Stage::Running);
        stages.push(Stage::Running);
        let outcome = self.run_pipeline_stage(&volume, request, cancel).await;

        // Runs regardless of how the pipeline stage ended.
        enter(Stage::Uploading);
        stages.push(Stage::Uploading);
        let log_upload = upload_nextflow_log(self.log_store.as_ref(), ctx, &self.config).await;

        let (staged, command, exit) = match outcome {
            Ok(parts) => parts,
            Err(err) => {
                enter(Stage::Failed);
                error!(error = %err, log_upload = ?log_upload, "Pipeline run failed");
                return Err(err);
            }
        };

        enter(Stage::Done);
        stages.push(Stage::Done);

        Ok(ProcedureReport {
            volume,
            command,
            staged,
            exit,
            log_upload,
            stages,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn run_pipeline_stage<C>(
        &self,
        volume: &VolumeHandle,
        request: &ExecutionRequest,
        cancel: C,
    ) -> Result<(StageStats, NextflowCommand, ExitReport)>
    where
        C: Future<Output = ()>,
    {
        let source = self.config.source_root.clone();
        let dest = self.config.shared_dir.clone();
        let ignore_list = self.config.ignore_list.clone();
        let staging =
            tokio::task::spawn_blocking(move || stage_workdir(&source, &dest, &ignore_list));

        tokio::pin!(cancel);
        let staged = tokio::select! {
            biased;
            _ = &mut cancel => {
                warn!("Cancelled while staging working directory");
                return Err(RuntimeError::Cancelled);
            }
            joined = staging => joined.map_err(|e| RuntimeError::Staging {
                path: self.config.shared_dir.display().to_string(),
                reason: e.to_string(),
            })??,
        };

        let command = self.command_for(request);
        let envs = child_env(&self.config, volume);
        let exit = run_pipeline(&command, &envs, &self.config.shared_dir, &mut cancel).await?;

        Ok((staged, command, exit))
    }
}

fn enter(stage: Stage) {
    info!(event = "stage.enter", stage = stage.name());
}
