//! Firebase Realtime Database REST backend.
//!
//! Full-replace writes map to `PUT {base}/{path}.json`, appends to
//! `POST` (which allocates a push id), reads to `GET`. `PATCH` is the
//! RTDB merge primitive and is never issued here.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use rega_types::models::{AlertRecord, TelemetryState, UserProfile};

use crate::paths::{DevicePaths, devices_path, user_path};
use crate::{DeviceRecord, DeviceStore, StoreError};

pub struct FirebaseStore {
    http: reqwest::Client,
    base_url: String,
    /// Database secret or ID token, appended as the `auth` query
    /// parameter when set.
    auth: Option<String>,
}

impl FirebaseStore {
    pub fn new(base_url: String, auth: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        match &self.auth {
            Some(token) => format!("{}/{}.json?auth={}", self.base_url, path, token),
            None => format!("{}/{}.json", self.base_url, path),
        }
    }

    async fn put<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<(), StoreError> {
        self.http
            .put(self.url(path))
            .json(value)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let value: Value = self
            .http
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(match value {
            Value::Null => None,
            other => Some(other),
        })
    }

    async fn push<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<String, StoreError> {
        let body: Value = self
            .http
            .post(self.url(path))
            .json(value)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        body.get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::InvalidData(format!("push response without name: {body}")))
    }
}

#[async_trait::async_trait]
impl DeviceStore for FirebaseStore {
    async fn put_user(&self, owner_id: &str, profile: &UserProfile) -> Result<(), StoreError> {
        self.put(&user_path(owner_id), profile).await
    }

    async fn provision_device(
        &self,
        owner_id: &str,
        device_id: &str,
        initial: &TelemetryState,
    ) -> Result<(), StoreError> {
        let paths = DevicePaths::resolve(owner_id, device_id);
        self.put(&paths.telemetry, initial).await
    }

    async fn put_telemetry(
        &self,
        owner_id: &str,
        device_id: &str,
        state: &TelemetryState,
    ) -> Result<(), StoreError> {
        let paths = DevicePaths::resolve(owner_id, device_id);
        self.put(&paths.telemetry, state).await
    }

    async fn append_alert(
        &self,
        owner_id: &str,
        device_id: &str,
        record: &AlertRecord,
    ) -> Result<String, StoreError> {
        let paths = DevicePaths::resolve(owner_id, device_id);
        self.push(&paths.alerts, record).await
    }

    async fn list_devices(&self, owner_id: &str) -> Result<Vec<DeviceRecord>, StoreError> {
        let Some(tree) = self.get(&devices_path(owner_id)).await? else {
            return Ok(vec![]);
        };
        let Value::Object(devices) = tree else {
            return Err(StoreError::InvalidData(format!(
                "device collection for {owner_id} is not an object"
            )));
        };

        let mut records = Vec::with_capacity(devices.len());
        for (device_id, node) in devices {
            records.push(parse_device(device_id, node));
        }
        Ok(records)
    }
}

fn parse_device(device_id: String, node: Value) -> DeviceRecord {
    let dados = node.get("dados");

    let telemetry = dados
        .and_then(|d| d.get("tempoReal"))
        .cloned()
        .and_then(|v| match serde_json::from_value::<TelemetryState>(v) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!("unreadable telemetry snapshot on device {device_id}: {err}");
                None
            }
        });

    // RTDB returns the log as {pushId: record}. Push ids sort
    // chronologically, so key order is insertion order.
    let mut alerts = Vec::new();
    if let Some(Value::Object(entries)) = dados.and_then(|d| d.get("alertas")) {
        for (alert_id, entry) in entries {
            match serde_json::from_value::<AlertRecord>(entry.clone()) {
                Ok(record) => alerts.push(record),
                Err(err) => warn!("unreadable alert {alert_id} on device {device_id}: {err}"),
            }
        }
    }

    DeviceRecord {
        id: device_id,
        telemetry,
        alerts,
    }
}
