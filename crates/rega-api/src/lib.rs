pub mod alerts;
pub mod auth;
pub mod error;
pub mod state;
pub mod telemetry;

use axum::{Router, routing::post};

use crate::state::AppState;

/// The fixed legacy route surface. CORS/trace layers are added by the
/// binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        .route("/api/v1/realtime/data-receive", post(telemetry::data_receive))
        .route("/api/v1/realtime/alerts", post(alerts::list_alerts))
        .with_state(state)
}
