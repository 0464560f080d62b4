//! Orchestration context for the current execution.

use crate::error::RuntimeError;
use crate::Result;

/// Variable holding the execution identity token.
pub const EXECUTION_TOKEN_VAR: &str = "FLYTE_INTERNAL_EXECUTION_ID";

/// Variables consulted, in order, for the run name.
pub const RUN_NAME_VARS: &[&str] = &["NF_RUN_NAME", "FLYTE_INTERNAL_EXECUTION_NAME"];

/// Identity of the execution as seen by the orchestration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    execution_token: Option<String>,
    run_name: Option<String>,
}

impl RunContext {
    pub fn new(execution_token: Option<String>, run_name: Option<String>) -> Self {
        Self {
            execution_token: execution_token.filter(|t| !t.is_empty()),
            run_name: run_name.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Read the context from the process environment.
    pub fn from_env() -> Self {
        let token = std::env::var(EXECUTION_TOKEN_VAR).ok();
        let run_name = RUN_NAME_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
        Self::new(token, run_name)
    }

    /// Replace the run name (e.g. from a command-line override).
    pub fn with_run_name(mut self, run_name: Option<String>) -> Self {
        if let Some(name) = run_name.filter(|n| !n.trim().is_empty()) {
            self.run_name = Some(name);
        }
        self
    }

    /// The execution token, required before any call to the dispatcher.
    pub fn execution_token(&self) -> Result<&str> {
        self.execution_token
            .as_deref()
            .ok_or(RuntimeError::MissingExecutionToken)
    }

    /// Human-readable name of this run, if the orchestrator exposes one.
    pub fn run_name(&self) -> Option<&str> {
        self.run_name.as_deref()
    }
}
