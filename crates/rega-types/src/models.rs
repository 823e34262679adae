use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{format_date, format_time};

/// Message written to a device's alert log when an irrigation run is
/// detected. Fixed by the legacy device/app contract.
pub const IRRIGATION_ALERT_MESSAGE: &str = "Irrigação realizada";

/// Account profile stored at `usuarios/{ownerId}` in the data tree.
/// The owner id itself is issued by the identity provider and is the
/// node key, not a field of the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Account representation returned by the register endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// The single latest-known sensor/actuator snapshot for a device,
/// stored at `.../dados/tempoReal`. Field names are the device wire
/// protocol: MS soil moisture, UA air humidity, TP temperature,
/// S1/S2 auxiliary sensors, RL relay state, RG irrigation-performed
/// flag. Every ingestion replaces the whole record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub struct TelemetryState {
    pub ms: f64,
    pub ua: f64,
    pub tp: f64,
    pub rl: bool,
    pub s1: f64,
    pub s2: f64,
    pub rg: bool,
    /// Epoch milliseconds of the last update.
    pub time: i64,
    /// `time` rendered as "HH:MM:SS" São Paulo civil time.
    pub hr: String,
    /// `time` rendered as "DD/MM/YYYY" São Paulo civil time.
    pub day: String,
}

impl TelemetryState {
    /// Initial record written when a device is provisioned at
    /// registration, before any report has arrived.
    pub fn zeroed(now_ms: i64) -> Self {
        Self {
            ms: 0.0,
            ua: 0.0,
            tp: 0.0,
            rl: false,
            s1: 0.0,
            s2: 0.0,
            rg: false,
            time: now_ms,
            hr: format_time(now_ms),
            day: format_date(now_ms),
        }
    }
}

/// Immutable entry in a device's alert log at `.../dados/alertas`.
/// Never rewritten once appended; ordering is insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRecord {
    pub timestamp: i64,
    #[serde(rename = "mensagem")]
    pub message: String,
}

impl AlertRecord {
    pub fn irrigation(now_ms: i64) -> Self {
        Self {
            timestamp: now_ms,
            message: IRRIGATION_ALERT_MESSAGE.to_string(),
        }
    }
}
