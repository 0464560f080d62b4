//! Nextflow command-line construction.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::RuntimeConfig;
use crate::provision::VolumeHandle;

/// Variable carrying the shared volume claim to Nextflow's k8s executor.
pub const STORAGE_CLAIM_VAR: &str = "K8S_STORAGE_CLAIM_NAME";

/// Fully-built Nextflow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextflowCommand {
    argv: Vec<String>,
}

impl NextflowCommand {
    /// Fixed launcher arguments followed by the translated parameter flags.
    pub fn build(config: &RuntimeConfig, flags: Vec<String>) -> Self {
        let shared_dir = config.shared_dir.to_string_lossy().to_string();
        let pipeline = config
            .shared_dir
            .join(&config.pipeline_file)
            .to_string_lossy()
            .to_string();

        let mut argv = vec![
            config.nextflow_bin.to_string_lossy().to_string(),
            "run".to_string(),
            pipeline,
            "-work-dir".to_string(),
            shared_dir,
            "-profile".to_string(),
            config.profile.clone(),
            "-c".to_string(),
            config.config_file.clone(),
        ];
        argv.extend(flags);

        Self { argv }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Space-joined form for logging.
    pub fn display(&self) -> String {
        self.argv.join(" ")
    }
}

/// Environment overrides for the child, including the volume claim.
pub fn child_env(config: &RuntimeConfig, volume: &VolumeHandle) -> IndexMap<String, String> {
    let mut envs = config.env_overrides.clone();
    envs.insert(STORAGE_CLAIM_VAR.to_string(), volume.to_string());
    envs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fixed_prefix() {
        let config = RuntimeConfig::default();
        let cmd = NextflowCommand::build(
            &config,
            vec!["--input".to_string(), "s3://x/samples.csv".to_string()],
        );

        assert_eq!(
            cmd.argv(),
            &[
                "/root/nextflow",
                "run",
                "/nf-workdir/main.nf",
                "-work-dir",
                "/nf-workdir",
                "-profile",
                "docker",
                "-c",
                "latch.config",
                "--input",
                "s3://x/samples.csv",
            ]
        );
        assert_eq!(cmd.program(), "/root/nextflow");
        assert_eq!(cmd.args()[0], "run");
    }

    #[test]
    fn test_display_joins_tokens() {
        let config = RuntimeConfig {
            nextflow_bin: PathBuf::from("nextflow"),
            shared_dir: PathBuf::from("/w"),
            ..RuntimeConfig::default()
        };
        let cmd = NextflowCommand::build(&config, vec!["--se_reads".to_string()]);
        assert_eq!(
            cmd.display(),
            "nextflow run /w/main.nf -work-dir /w -profile docker -c latch.config --se_reads"
        );
    }

    #[test]
    fn test_child_env_adds_claim() {
        let envs = child_env(&RuntimeConfig::default(), &VolumeHandle("pvc-9".to_string()));
        assert_eq!(envs.get(STORAGE_CLAIM_VAR).map(String::as_str), Some("pvc-9"));
        assert_eq!(envs.get("NXF_DISABLE_CHECK_LATEST").map(String::as_str), Some("true"));
        assert_eq!(envs.len(), 4);
    }
}
