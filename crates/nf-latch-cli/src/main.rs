//! nf-latch - run nf-core/metatdenovo on a Latch-style workflow platform
//!
//! ## Commands
//!
//! - `schema`: list the pipeline parameters grouped by section
//! - `flags`: print the Nextflow command line for a parameter payload
//! - `provision`: request the shared volume (the `initialize` task)
//! - `runtime`: stage, run Nextflow and upload its log (the `nextflow_runtime` task)
//! - `run`: both tasks in order

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nf_params::{metatdenovo, ExecutionRequest, ParameterSchema};
use nf_runtime::{
    init_tracing, termination_signal, ExistingVolume, FsLogStore, HttpLogStore, HttpProvisioner,
    LogFormat, LogStore, NextflowCommand, ProcedureReport, Provisioner, RunContext, RuntimeConfig,
    RuntimeProcedure, VolumeHandle, WorkflowSpec,
};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "nf-latch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run nf-core/metatdenovo on a Latch-style workflow platform", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pipeline parameters grouped by section
    Schema {
        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the Nextflow command line for a parameter payload
    Flags {
        /// JSON object mapping parameter names to values
        #[arg(short, long)]
        params: PathBuf,

        #[command(flatten)]
        runtime: RuntimeArgs,
    },

    /// Provision the shared storage volume and print its name
    Provision {
        #[command(flatten)]
        runtime: RuntimeArgs,
    },

    /// Stage the working directory, run Nextflow and upload its log
    Runtime {
        /// Shared volume returned by `provision`
        #[arg(long, env = "NF_PVC_NAME")]
        pvc_name: String,

        /// JSON object mapping parameter names to values
        #[arg(short, long)]
        params: PathBuf,

        #[command(flatten)]
        runtime: RuntimeArgs,

        #[command(flatten)]
        logs: LogArgs,
    },

    /// Provision storage, then run the pipeline
    Run {
        /// JSON object mapping parameter names to values
        #[arg(short, long)]
        params: PathBuf,

        #[command(flatten)]
        runtime: RuntimeArgs,

        #[command(flatten)]
        logs: LogArgs,
    },
}

#[derive(Args, Debug, Default)]
struct RuntimeArgs {
    /// Storage dispatcher base URL
    #[arg(long)]
    dispatcher_url: Option<String>,

    /// Directory copied onto the shared volume
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// Shared volume mount point
    #[arg(long)]
    shared_dir: Option<PathBuf>,

    /// Nextflow launcher
    #[arg(long)]
    nextflow_bin: Option<PathBuf>,
}

impl RuntimeArgs {
    fn into_config(self) -> RuntimeConfig {
        let mut config = RuntimeConfig::from_env();
        if let Some(url) = self.dispatcher_url {
            config.dispatcher_url = url;
        }
        if let Some(root) = self.source_root {
            config.source_root = root;
        }
        if let Some(dir) = self.shared_dir {
            config.shared_dir = dir;
        }
        if let Some(bin) = self.nextflow_bin {
            config.nextflow_bin = bin;
        }
        config
    }
}

#[derive(Args, Debug)]
struct LogArgs {
    /// Run name used in the remote log path (defaults to the orchestrator's)
    #[arg(long)]
    run_name: Option<String>,

    /// Upload logs with HTTP PUT below this endpoint
    #[arg(long, env = "NF_LOG_ENDPOINT")]
    log_endpoint: Option<String>,

    /// Mirror remote log paths below this directory
    #[arg(long, env = "NF_LOG_STORE_DIR", default_value = "/nf-logs")]
    log_store_dir: PathBuf,
}

impl LogArgs {
    fn log_store(&self, config: &RuntimeConfig, ctx: &RunContext) -> Result<Arc<dyn LogStore>> {
        match &self.log_endpoint {
            Some(endpoint) => Ok(Arc::new(
                HttpLogStore::for_context(endpoint, config, ctx)
                    .context("Failed to create log store client")?,
            )),
            None => Ok(Arc::new(FsLogStore::new(&self.log_store_dir))),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(LogFormat::from_json_flag(cli.log_json), level);

    let schema = metatdenovo::schema();

    match cli.command {
        Commands::Schema { json } => cmd_schema(schema, json),
        Commands::Flags { params, runtime } => cmd_flags(schema, &params, runtime),
        Commands::Provision { runtime } => cmd_provision(runtime).await,
        Commands::Runtime {
            pvc_name,
            params,
            runtime,
            logs,
        } => cmd_runtime(schema, VolumeHandle(pvc_name), &params, runtime, logs).await,
        Commands::Run {
            params,
            runtime,
            logs,
        } => cmd_run(schema, &params, runtime, logs).await,
    }
}

fn cmd_schema(schema: &ParameterSchema, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&schema.sections())?);
        return Ok(());
    }

    for section in schema.sections() {
        println!("{}", section.title.unwrap_or("Parameters"));
        for param in section.params {
            let marker = if param.is_required() {
                " (required)"
            } else {
                ""
            };
            let default = param
                .default
                .as_ref()
                .map(|d| format!(" [default: {}]", d))
                .unwrap_or_default();
            println!(
                "  --{:<30} {:<10}{}{}",
                param.name,
                param.param_type.name(),
                marker,
                default
            );
            println!("      {}", param.description);
        }
        println!();
    }
    Ok(())
}

fn load_request(schema: &ParameterSchema, params: &Path) -> Result<ExecutionRequest> {
    ExecutionRequest::from_json_file(schema, params)
        .with_context(|| format!("Invalid parameters in {}", params.display()))
}

fn cmd_flags(schema: &ParameterSchema, params: &Path, runtime: RuntimeArgs) -> Result<()> {
    let request = load_request(schema, params)?;
    let command = NextflowCommand::build(
        &runtime.into_config(),
        nf_params::build_flags(schema, &request),
    );
    println!("{}", command.display());
    Ok(())
}

async fn cmd_provision(runtime: RuntimeArgs) -> Result<()> {
    let workflow = WorkflowSpec::metatdenovo();
    workflow.log_submission("initialize");

    let config = runtime.into_config();
    let ctx = RunContext::from_env();
    let token = ctx.execution_token()?;

    let provisioner = HttpProvisioner::new(&config)?;
    let volume = provisioner
        .provision(token, config.storage_gib)
        .await
        .context("Failed to provision shared storage")?;

    println!("{}", volume);
    Ok(())
}

async fn cmd_runtime(
    schema: &'static ParameterSchema,
    volume: VolumeHandle,
    params: &Path,
    runtime: RuntimeArgs,
    logs: LogArgs,
) -> Result<()> {
    let request = load_request(schema, params)?;
    let config = runtime.into_config();
    let ctx = RunContext::from_env().with_run_name(logs.run_name.clone());

    let procedure = build_procedure(
        schema,
        config,
        Arc::new(ExistingVolume::new(volume.clone())),
        &logs,
        &ctx,
    )?;

    WorkflowSpec::metatdenovo().log_submission("nextflow_runtime");
    let report = procedure
        .execute(&ctx, volume, &request, termination_signal())
        .await
        .context("Nextflow runtime task failed")?;

    print_report(&report)
}

async fn cmd_run(
    schema: &'static ParameterSchema,
    params: &Path,
    runtime: RuntimeArgs,
    logs: LogArgs,
) -> Result<()> {
    // Resolve parameters before touching the dispatcher.
    let request = load_request(schema, params)?;
    let config = runtime.into_config();
    let ctx = RunContext::from_env().with_run_name(logs.run_name.clone());

    let provisioner = Arc::new(HttpProvisioner::new(&config)?);
    let procedure = build_procedure(schema, config, provisioner, &logs, &ctx)?;

    let workflow = WorkflowSpec::metatdenovo();
    info!(workflow = workflow.display_name, "Starting workflow");

    for task in &workflow.tasks {
        workflow.log_submission(task.name);
    }
    let report = procedure
        .run(&ctx, &request, termination_signal())
        .await
        .context("metatdenovo run failed")?;

    print_report(&report)
}

fn build_procedure(
    schema: &'static ParameterSchema,
    config: RuntimeConfig,
    provisioner: Arc<dyn Provisioner>,
    logs: &LogArgs,
    ctx: &RunContext,
) -> Result<RuntimeProcedure> {
    let log_store = logs.log_store(&config, ctx)?;
    Ok(RuntimeProcedure::new(config, provisioner, log_store).with_schema(schema))
}

fn print_report(report: &ProcedureReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
