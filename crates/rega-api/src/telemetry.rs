//! Telemetry ingestion: boundary normalization of device reports, the
//! full-replace snapshot write, and the alert trigger decision.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Map, Value};
use tracing::info;

use rega_store::{DeviceStore, StoreError};
use rega_types::models::{AlertRecord, TelemetryState};
use rega_types::time::{format_date, format_time, now_epoch_ms};

use crate::error::ApiError;
use crate::state::AppState;

/// A device report after boundary normalization. Every field was
/// present in the payload; zero readings are legal.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryReport {
    pub ms: f64,
    pub ua: f64,
    pub tp: f64,
    pub rl: bool,
    pub s1: f64,
    pub s2: f64,
    pub rg: bool,
}

impl TelemetryReport {
    /// Presence-checked extraction: a field counts as supplied when
    /// its key exists in the payload, not when its value is truthy.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ApiError> {
        Ok(Self {
            ms: number_field(payload, "MS")?,
            ua: number_field(payload, "UA")?,
            tp: number_field(payload, "TP")?,
            rl: flag_field(payload, "RL")?,
            s1: number_field(payload, "S1")?,
            s2: number_field(payload, "S2")?,
            rg: flag_field(payload, "RG")?,
        })
    }
}

/// Sensor readings arrive as JSON numbers, though some firmware sends
/// them as decimal strings; both are accepted.
fn number_field(payload: &Map<String, Value>, key: &str) -> Result<f64, ApiError> {
    match payload.get(key) {
        Some(Value::Number(n)) => n.as_f64().ok_or(ApiError::Validation),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| ApiError::Validation),
        _ => Err(ApiError::Validation),
    }
}

/// Devices historically send boolean flags as the strings "true" /
/// "false". Accepted literal set: JSON booleans plus "true", "TRUE",
/// "false", "FALSE". Anything else is rejected rather than silently
/// read as false.
fn flag_field(payload: &Map<String, Value>, key: &str) -> Result<bool, ApiError> {
    match payload.get(key) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.as_str() {
            "true" | "TRUE" => Ok(true),
            "false" | "FALSE" => Ok(false),
            _ => Err(ApiError::Validation),
        },
        _ => Err(ApiError::Validation),
    }
}

fn string_field(payload: &Map<String, Value>, key: &str) -> Result<String, ApiError> {
    match payload.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ApiError::Validation),
    }
}

#[derive(Debug, PartialEq)]
pub enum AlertDecision {
    NotFired,
    Fired { alert_id: String },
}

/// Merge a report into the device's canonical snapshot.
///
/// The write replaces the entire record: alert derivation and display
/// always read the whole latest snapshot, so a partial merge that
/// retained stale fields would present an inconsistent device state.
/// An alert fires iff the normalized irrigation flag is set; the log
/// entry carries the ingestion timestamp. No deduplication: the same
/// report twice appends two alerts.
pub async fn ingest(
    store: &dyn DeviceStore,
    owner_id: &str,
    device_id: &str,
    report: &TelemetryReport,
    now_ms: i64,
) -> Result<AlertDecision, StoreError> {
    let snapshot = TelemetryState {
        ms: report.ms,
        ua: report.ua,
        tp: report.tp,
        rl: report.rl,
        s1: report.s1,
        s2: report.s2,
        rg: report.rg,
        time: now_ms,
        hr: format_time(now_ms),
        day: format_date(now_ms),
    };
    store.put_telemetry(owner_id, device_id, &snapshot).await?;

    if !report.rg {
        return Ok(AlertDecision::NotFired);
    }

    let alert_id = store
        .append_alert(owner_id, device_id, &AlertRecord::irrigation(now_ms))
        .await?;
    info!("irrigation alert {alert_id} recorded for device {device_id}");
    Ok(AlertDecision::Fired { alert_id })
}

/// POST /api/v1/realtime/data-receive. Devices authenticate with the
/// owner's account email (`userId`) and their device id
/// (`accessToken`); the email is resolved to an opaque owner id
/// before anything touches storage.
pub async fn data_receive(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<StatusCode, ApiError> {
    let Some(body) = payload.as_object() else {
        return Err(ApiError::Validation);
    };

    let user_email = string_field(body, "userId")?;
    let device_id = string_field(body, "accessToken")?;
    // Validate the full report before any storage mutation.
    let report = TelemetryReport::from_payload(body)?;

    let owner_id = state.identity.resolve_owner(&user_email).await?;

    ingest(state.store.as_ref(), &owner_id, &device_id, &report, now_epoch_ms()).await?;

    Ok(StatusCode::OK)
}
