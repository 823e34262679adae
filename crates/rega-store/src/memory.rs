//! In-memory backend with the same semantics as the RTDB one.
//! Used by tests and as a standalone dev backend.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;
use uuid::Uuid;

use rega_types::models::{AlertRecord, TelemetryState, UserProfile};

use crate::{DeviceRecord, DeviceStore, StoreError};

#[derive(Default)]
struct UserNode {
    profile: Option<UserProfile>,
    devices: BTreeMap<String, DeviceNode>,
}

#[derive(Default)]
struct DeviceNode {
    telemetry: Option<TelemetryState>,
    // Insertion order is the log order.
    alerts: Vec<(String, AlertRecord)>,
}

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserNode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored profile, for assertions in tests.
    pub async fn user_profile(&self, owner_id: &str) -> Option<UserProfile> {
        self.users
            .read()
            .await
            .get(owner_id)
            .and_then(|u| u.profile.clone())
    }
}

#[async_trait::async_trait]
impl DeviceStore for MemoryStore {
    async fn put_user(&self, owner_id: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        users.entry(owner_id.to_string()).or_default().profile = Some(profile.clone());
        Ok(())
    }

    async fn provision_device(
        &self,
        owner_id: &str,
        device_id: &str,
        initial: &TelemetryState,
    ) -> Result<(), StoreError> {
        self.put_telemetry(owner_id, device_id, initial).await
    }

    async fn put_telemetry(
        &self,
        owner_id: &str,
        device_id: &str,
        state: &TelemetryState,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let device = users
            .entry(owner_id.to_string())
            .or_default()
            .devices
            .entry(device_id.to_string())
            .or_default();
        device.telemetry = Some(state.clone());
        Ok(())
    }

    async fn append_alert(
        &self,
        owner_id: &str,
        device_id: &str,
        record: &AlertRecord,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut users = self.users.write().await;
        users
            .entry(owner_id.to_string())
            .or_default()
            .devices
            .entry(device_id.to_string())
            .or_default()
            .alerts
            .push((id.clone(), record.clone()));
        Ok(id)
    }

    async fn list_devices(&self, owner_id: &str) -> Result<Vec<DeviceRecord>, StoreError> {
        let users = self.users.read().await;
        let Some(user) = users.get(owner_id) else {
            return Ok(vec![]);
        };
        Ok(user
            .devices
            .iter()
            .map(|(id, node)| DeviceRecord {
                id: id.clone(),
                telemetry: node.telemetry.clone(),
                alerts: node.alerts.iter().map(|(_, rec)| rec.clone()).collect(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn telemetry_write_is_full_replace() {
        let store = MemoryStore::new();
        let first = TelemetryState {
            ms: 10.0,
            ..TelemetryState::zeroed(1_000)
        };
        store.put_telemetry("u", "d", &first).await.unwrap();

        let second = TelemetryState::zeroed(2_000);
        store.put_telemetry("u", "d", &second).await.unwrap();

        let devices = store.list_devices("u").await.unwrap();
        assert_eq!(devices.len(), 1);
        // Nothing from the first snapshot survives.
        assert_eq!(devices[0].telemetry, Some(second));
    }

    #[tokio::test]
    async fn alert_log_keeps_insertion_order_and_prior_entries() {
        let store = MemoryStore::new();
        let a = store
            .append_alert("u", "d", &AlertRecord::irrigation(2_000))
            .await
            .unwrap();
        let b = store
            .append_alert("u", "d", &AlertRecord::irrigation(1_000))
            .await
            .unwrap();
        assert_ne!(a, b);

        let devices = store.list_devices("u").await.unwrap();
        let alerts = &devices[0].alerts;
        // Insertion order, not timestamp order.
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].timestamp, 2_000);
        assert_eq!(alerts[1].timestamp, 1_000);
    }

    #[tokio::test]
    async fn unknown_owner_lists_no_devices() {
        let store = MemoryStore::new();
        assert!(store.list_devices("nobody").await.unwrap().is_empty());
    }
}
