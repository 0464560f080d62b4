//! Shared-volume provisioning through the storage dispatcher.
//!
//! One authenticated `POST` per run; there is no retry here. Whole-task
//! retries belong to the orchestration platform.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::RuntimeError;
use crate::Result;

/// Name of a provisioned shared volume (a persistent volume claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeHandle(pub String);

impl VolumeHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VolumeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requests a shared volume for the current execution.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Provision `storage_gib` of shared storage, authenticated by `token`.
    async fn provision(&self, token: &str, storage_gib: u32) -> Result<VolumeHandle>;
}

#[derive(Serialize)]
struct ProvisionRequest {
    storage_gib: u32,
}

#[derive(Deserialize)]
struct ProvisionResponse {
    name: String,
}

/// Dispatcher client over HTTP
pub struct HttpProvisioner {
    url: String,
    auth_scheme: String,
    http_client: reqwest::Client,
}

impl HttpProvisioner {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("nf-latch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RuntimeError::ProvisioningFailed(e.to_string()))?;

        Ok(HttpProvisioner {
            url: config.provision_url(),
            auth_scheme: config.auth_scheme.clone(),
            http_client,
        })
    }
}

#[async_trait]
impl Provisioner for HttpProvisioner {
    async fn provision(&self, token: &str, storage_gib: u32) -> Result<VolumeHandle> {
        info!(url = %self.url, storage_gib, "Provisioning shared storage volume");

        let response = self
            .http_client
            .post(&self.url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("{} {}", self.auth_scheme, token),
            )
            .json(&ProvisionRequest { storage_gib })
            .send()
            .await
            .map_err(|e| RuntimeError::ProvisioningFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RuntimeError::ProvisioningFailed(format!(
                "dispatcher returned {}: {}",
                status,
                body.trim()
            )));
        }

        let body: ProvisionResponse = response.json().await.map_err(|e| {
            RuntimeError::ProvisioningFailed(format!("invalid dispatcher response: {}", e))
        })?;

        debug!(volume = %body.name, "Shared storage volume provisioned");
        Ok(VolumeHandle(body.name))
    }
}

/// A volume handed over by an earlier task; nothing is requested.
#[derive(Debug, Clone)]
pub struct ExistingVolume(VolumeHandle);

impl ExistingVolume {
    pub fn new(volume: VolumeHandle) -> Self {
        Self(volume)
    }
}

#[async_trait]
impl Provisioner for ExistingVolume {
    async fn provision(&self, _token: &str, _storage_gib: u32) -> Result<VolumeHandle> {
        debug!(volume = %self.0, "Reusing provisioned volume");
        Ok(self.0.clone())
    }
}
