//! Identity-provider seam. The HTTP layer only ever sees opaque owner
//! ids; emails stop at this boundary.

pub mod firebase;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password, unknown account, disabled account — all
    /// collapsed into one outward error to avoid account enumeration.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already in use")]
    EmailAlreadyInUse,
    #[error("weak password")]
    WeakPassword,
    #[error("invalid email")]
    InvalidEmail,
    #[error("no account for that identifier")]
    UserNotFound,
    #[error("provider rejected request: {0}")]
    Provider(String),
    #[error("provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and return the stable owner id.
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Create an account with the given display name and return the
    /// new owner id.
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<String, AuthError>;

    /// Ask the provider to send a password-reset email. Provider
    /// failures (including unknown email) surface to the caller.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Look up the owner id for an email without credentials. Used by
    /// the telemetry ingestion path, where devices identify their
    /// owner by the account email.
    async fn resolve_owner(&self, email: &str) -> Result<String, AuthError>;
}
