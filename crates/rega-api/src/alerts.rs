//! Read side of the alert log: authenticate, then project every
//! device's alerts with pre-formatted day/time strings.

use axum::{Json, extract::State};

use rega_types::api::{AlertsResponse, DeviceWithAlerts, FormattedAlert, LoginRequest};

use crate::error::{ApiError, MSG_LOGIN_OK, MSG_NO_USER_DATA};
use crate::state::AppState;

pub async fn list_alerts(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AlertsResponse>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation);
    }

    let owner_id = state
        .identity
        .sign_in(&req.email, &req.password)
        .await
        .map_err(ApiError::from_sign_in)?;

    let devices = state.store.list_devices(&owner_id).await?;
    let user_data: Vec<DeviceWithAlerts> = devices
        .into_iter()
        .filter(|device| !device.alerts.is_empty())
        .map(|device| DeviceWithAlerts {
            alertas: device.alerts.iter().map(FormattedAlert::from_record).collect(),
            device: device.id,
        })
        .collect();

    if user_data.is_empty() {
        return Err(ApiError::NotFound(MSG_NO_USER_DATA));
    }

    Ok(Json(AlertsResponse {
        message: MSG_LOGIN_OK.to_string(),
        user_data,
    }))
}
