//! In-memory fakes for the provisioner and log store (testing only)
//!
//! Provides `StaticProvisioner` and `MemoryLogStore`, which satisfy the trait
//! contracts without a dispatcher or remote storage.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::RuntimeError;
use crate::logs::{LogStore, RemoteLogPath};
use crate::provision::{Provisioner, VolumeHandle};
use crate::Result;

// ---------------------------------------------------------------------------
// StaticProvisioner
// ---------------------------------------------------------------------------

/// Provisioner returning a fixed volume (or a fixed failure).
#[derive(Debug)]
pub struct StaticProvisioner {
    outcome: std::result::Result<String, String>,
    requests: Mutex<Vec<(String, u32)>>,
}

impl StaticProvisioner {
    pub fn new(volume: &str) -> Self {
        Self {
            outcome: Ok(volume.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request fails with `ProvisioningFailed(reason)`.
    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `(token, storage_gib)` for each request received.
    pub fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provisioner for StaticProvisioner {
    async fn provision(&self, token: &str, storage_gib: u32) -> Result<VolumeHandle> {
        self.requests
            .lock()
            .unwrap()
            .push((token.to_string(), storage_gib));

        match &self.outcome {
            Ok(volume) => Ok(VolumeHandle(volume.clone())),
            Err(reason) => Err(RuntimeError::ProvisioningFailed(reason.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryLogStore
// ---------------------------------------------------------------------------

/// Log store keeping uploaded bytes in memory, keyed by remote path.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    uploads: Mutex<Vec<(RemoteLogPath, Vec<u8>)>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<(RemoteLogPath, Vec<u8>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn upload(&self, local: &Path, remote: &RemoteLogPath) -> Result<()> {
        let data = tokio::fs::read(local).await?;
        self.uploads.lock().unwrap().push((remote.clone(), data));
        Ok(())
    }
}
