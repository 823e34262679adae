//! Auth gateway: login, registration with device provisioning, and
//! password reset. Emails are resolved to opaque owner ids here; no
//! other module ever sees them.

use axum::{Json, extract::State};
use chrono::Utc;
use tracing::{info, warn};

use rega_store::DeviceStore;
use rega_types::api::{
    DeviceWithTelemetry, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    RegisterResponse, ResetPasswordRequest,
};
use rega_types::models::{TelemetryState, User, UserProfile};
use rega_types::time::now_epoch_ms;

use crate::error::{ApiError, MSG_LOGIN_OK, MSG_NO_USER_DATA, MSG_REGISTER_OK, MSG_RESET_OK};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation);
    }

    let owner_id = state
        .identity
        .sign_in(&req.email, &req.password)
        .await
        .map_err(ApiError::from_sign_in)?;

    let user_data = list_devices_with_telemetry(state.store.as_ref(), &owner_id).await?;
    if user_data.is_empty() {
        // Zero devices and a transient empty read are deliberately
        // indistinguishable; legacy clients rely on the 404.
        return Err(ApiError::NotFound(MSG_NO_USER_DATA));
    }

    Ok(Json(LoginResponse {
        message: MSG_LOGIN_OK.to_string(),
        user_data,
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() || req.name.is_empty() || req.access_token.is_empty()
    {
        return Err(ApiError::Validation);
    }

    let owner_id = state
        .identity
        .sign_up(&req.email, &req.password, &req.name)
        .await?;

    // Known consistency gap: if provisioning fails past this point the
    // provider account already exists and is left orphaned. Surfaced
    // as a 500, not retried.
    let created_at = Utc::now();
    let profile = UserProfile {
        name: req.name.clone(),
        email: req.email.clone(),
        created_at,
    };
    state.store.put_user(&owner_id, &profile).await?;
    state
        .store
        .provision_device(&owner_id, &req.access_token, &TelemetryState::zeroed(now_epoch_ms()))
        .await?;

    info!("registered owner {owner_id} with default device {}", req.access_token);

    Ok(Json(RegisterResponse {
        message: MSG_REGISTER_OK.to_string(),
        user: User {
            id: owner_id,
            name: req.name,
            email: req.email,
            created_at,
        },
    }))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.email.is_empty() {
        return Err(ApiError::Validation);
    }

    // Whether an unknown email should still get a success-shaped reply
    // (enumeration resistance) is an open product decision; for now
    // any provider failure surfaces as a generic 500.
    state.identity.send_password_reset(&req.email).await.map_err(|err| {
        warn!("password reset for {} failed: {err}", req.email);
        ApiError::Upstream
    })?;

    Ok(Json(MessageResponse {
        message: MSG_RESET_OK.to_string(),
    }))
}

/// Login projection: every device that has a telemetry snapshot.
pub(crate) async fn list_devices_with_telemetry(
    store: &dyn DeviceStore,
    owner_id: &str,
) -> Result<Vec<DeviceWithTelemetry>, ApiError> {
    let devices = store.list_devices(owner_id).await?;
    Ok(devices
        .into_iter()
        .filter_map(|device| {
            device.telemetry.map(|data| DeviceWithTelemetry {
                device: device.id,
                data,
            })
        })
        .collect())
}
