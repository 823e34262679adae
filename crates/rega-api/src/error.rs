//! Request-boundary error taxonomy. Every collaborator failure is
//! caught here and mapped to a status plus one of the fixed
//! user-facing messages; raw provider detail only ever reaches the
//! server log.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use rega_auth::AuthError;
use rega_store::StoreError;

// User-facing messages, conserved from the legacy API contract.
pub const MSG_MISSING_FIELDS: &str = "Todos os campos são obrigatórios";
pub const MSG_LOGIN_OK: &str = "Login bem-sucedido";
pub const MSG_INVALID_CREDENTIALS: &str = "Credenciais inválidas";
pub const MSG_NO_USER_DATA: &str = "Dados do usuário não encontrados";
pub const MSG_USER_NOT_FOUND: &str = "Usuário não encontrado";
pub const MSG_REGISTER_OK: &str = "Usuário registrado com sucesso";
pub const MSG_RESET_OK: &str = "E-mail de redefinição de senha enviado com sucesso";
pub const MSG_INTERNAL: &str = "Erro interno do servidor";
pub const MSG_EMAIL_IN_USE: &str = "Este e-mail já está em uso. Por favor, use outro.";
pub const MSG_WEAK_PASSWORD: &str = "A senha fornecida é fraca. Escolha uma senha mais forte.";
pub const MSG_INVALID_EMAIL: &str = "O e-mail fornecido não é válido.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required field")]
    Validation,
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("upstream failure")]
    Upstream,
}

impl ApiError {
    /// Login-context mapping: every provider rejection collapses to
    /// invalid credentials; only transport failures stay a 500.
    pub fn from_sign_in(err: AuthError) -> Self {
        match err {
            AuthError::Transport(_) => {
                error!("identity provider unreachable during sign-in: {err}");
                ApiError::Upstream
            }
            _ => ApiError::Auth(AuthError::InvalidCredentials),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // The legacy contract uses an `error` key for validation
            // failures and `message` everywhere else.
            ApiError::Validation => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": MSG_MISSING_FIELDS})),
                )
                    .into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, MSG_INVALID_CREDENTIALS)
            }
            ApiError::Auth(AuthError::UserNotFound) => (StatusCode::NOT_FOUND, MSG_USER_NOT_FOUND),
            ApiError::Auth(AuthError::EmailAlreadyInUse) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_EMAIL_IN_USE)
            }
            ApiError::Auth(AuthError::WeakPassword) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_WEAK_PASSWORD)
            }
            ApiError::Auth(AuthError::InvalidEmail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INVALID_EMAIL)
            }
            ApiError::Auth(err) => {
                error!("identity provider failure: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
            }
            ApiError::Store(err) => {
                error!("storage failure: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
            }
            ApiError::Upstream => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL),
        };
        (status, Json(json!({"message": body}))).into_response()
    }
}
