use serde::{Deserialize, Serialize};

use crate::models::{TelemetryState, User};
use crate::time::{format_date, format_time};

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response: the legacy `userData` projection of every device
/// the owner has, each with its current telemetry snapshot.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(rename = "userData")]
    pub user_data: Vec<DeviceWithTelemetry>,
}

#[derive(Debug, Serialize)]
pub struct DeviceWithTelemetry {
    pub device: String,
    pub data: TelemetryState,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    /// Device id of the default device provisioned at registration.
    /// The field keeps its legacy wire name.
    #[serde(default, rename = "accessToken")]
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
}

// -- Alerts --

/// Alert listing response, one entry per device that has at least one
/// alert, each alert carrying pre-formatted day/time strings.
#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub message: String,
    #[serde(rename = "userData")]
    pub user_data: Vec<DeviceWithAlerts>,
}

#[derive(Debug, Serialize)]
pub struct DeviceWithAlerts {
    pub device: String,
    pub alertas: Vec<FormattedAlert>,
}

#[derive(Debug, Serialize)]
pub struct FormattedAlert {
    pub mensagem: String,
    pub timestamp: AlertTimestamp,
}

#[derive(Debug, Serialize)]
pub struct AlertTimestamp {
    pub day: String,
    pub time: String,
}

impl FormattedAlert {
    pub fn from_record(record: &crate::models::AlertRecord) -> Self {
        Self {
            mensagem: record.message.clone(),
            timestamp: AlertTimestamp {
                day: format_date(record.timestamp),
                time: format_time(record.timestamp),
            },
        }
    }
}

// -- Generic --

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
