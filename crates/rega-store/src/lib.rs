//! Storage abstraction over the per-user hierarchical device tree.
//!
//! Telemetry writes are full-record replacements and the alert log is
//! append-only. The trait deliberately exposes no field-merge
//! primitive: a partial merge could leave a snapshot mixing fields
//! from two different reports.

pub mod firebase;
pub mod memory;
pub mod paths;

use async_trait::async_trait;
use thiserror::Error;

use rega_types::models::{AlertRecord, TelemetryState, UserProfile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected storage response: {0}")]
    InvalidData(String),
}

/// Read model for one device subtree: `dispositivos/{id}` with its
/// current snapshot and alert log in insertion order.
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub id: String,
    pub telemetry: Option<TelemetryState>,
    pub alerts: Vec<AlertRecord>,
}

#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Write the account profile at `usuarios/{owner}`. Only called at
    /// registration, on a fresh node.
    async fn put_user(&self, owner_id: &str, profile: &UserProfile) -> Result<(), StoreError>;

    /// Create the device subtree with its initial telemetry snapshot.
    async fn provision_device(
        &self,
        owner_id: &str,
        device_id: &str,
        initial: &TelemetryState,
    ) -> Result<(), StoreError>;

    /// Replace the device's entire telemetry snapshot. Creates the
    /// device subtree implicitly on first report.
    async fn put_telemetry(
        &self,
        owner_id: &str,
        device_id: &str,
        state: &TelemetryState,
    ) -> Result<(), StoreError>;

    /// Append an immutable entry to the device's alert log and return
    /// its generated id.
    async fn append_alert(
        &self,
        owner_id: &str,
        device_id: &str,
        record: &AlertRecord,
    ) -> Result<String, StoreError>;

    /// Read every device under `usuarios/{owner}/dispositivos`.
    async fn list_devices(&self, owner_id: &str) -> Result<Vec<DeviceRecord>, StoreError>;
}
