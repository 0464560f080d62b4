//! Workflow and task descriptions.
//!
//! Resource requests are plain data handed to whoever submits the tasks.

use serde::Serialize;
use tracing::info;

use crate::config::TaskResources;

/// One schedulable unit of the workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSpec {
    pub name: &'static str,
    pub resources: TaskResources,
}

/// Ordered list of tasks plus presentation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub tasks: Vec<TaskSpec>,
}

impl WorkflowSpec {
    /// Provisioning task followed by the Nextflow runtime task.
    pub fn metatdenovo() -> Self {
        Self {
            name: nf_params::metatdenovo::PIPELINE_ID,
            display_name: nf_params::metatdenovo::DISPLAY_NAME,
            description: nf_params::metatdenovo::DESCRIPTION,
            tasks: vec![
                TaskSpec {
                    name: "initialize",
                    resources: TaskResources::initialize(),
                },
                TaskSpec {
                    name: "nextflow_runtime",
                    resources: TaskResources::nextflow_runtime(),
                },
            ],
        }
    }

    pub fn task(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Log the resource request of `task` as it is submitted.
    pub fn log_submission(&self, task: &str) {
        if let Some(spec) = self.task(task) {
            info!(
                workflow = self.name,
                task = spec.name,
                cpu = spec.resources.cpu,
                memory_gib = spec.resources.memory_gib,
                storage_gib = spec.resources.storage_gib,
                "Submitting task"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_order() {
        let wf = WorkflowSpec::metatdenovo();
        let names: Vec<&str> = wf.tasks.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["initialize", "nextflow_runtime"]);
        assert_eq!(wf.name, "nf_nf_core_metatdenovo");
    }

    #[test]
    fn test_runtime_task_storage_matches_provisioning_size() {
        let wf = WorkflowSpec::metatdenovo();
        let runtime = wf.task("nextflow_runtime").unwrap();
        assert_eq!(
            runtime.resources.storage_gib,
            crate::config::RuntimeConfig::default().storage_gib
        );
        assert!(wf.task("missing").is_none());
    }
}
