//! Firebase Identity Toolkit REST backend.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::{AuthError, IdentityProvider};

const IDENTITY_TOOLKIT: &str = "https://identitytoolkit.googleapis.com/v1";

pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    project_id: String,
    /// OAuth access token for the privileged accounts:lookup endpoint.
    /// Token acquisition (service-account flow) happens outside this
    /// crate; the token arrives via configuration.
    admin_token: Option<String>,
}

#[derive(Deserialize)]
struct SignInBody {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(rename = "idToken")]
    id_token: Option<String>,
}

#[derive(Deserialize)]
struct LookupBody {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
struct LookupUser {
    #[serde(rename = "localId")]
    local_id: String,
}

impl FirebaseAuth {
    pub fn new(api_key: String, project_id: String, admin_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            project_id,
            admin_token,
        }
    }

    async fn call(&self, endpoint: &str, body: Value) -> Result<Value, AuthError> {
        let url = format!("{IDENTITY_TOOLKIT}/accounts:{endpoint}?key={}", self.api_key);
        let resp = self.http.post(url).json(&body).send().await?;

        if resp.status().is_success() {
            return Ok(resp.json().await?);
        }

        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        let code = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        warn!("identity provider rejected accounts:{endpoint}: {status} {code}");
        Err(map_error_code(&code))
    }
}

/// Provider error codes, per the Identity Toolkit REST contract.
/// WEAK_PASSWORD arrives with a trailing explanation, so match on the
/// prefix.
fn map_error_code(code: &str) -> AuthError {
    match code {
        "EMAIL_EXISTS" => AuthError::EmailAlreadyInUse,
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            AuthError::InvalidCredentials
        }
        c if c.starts_with("WEAK_PASSWORD") => AuthError::WeakPassword,
        other => AuthError::Provider(other.to_string()),
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let body = self
            .call(
                "signInWithPassword",
                json!({"email": email, "password": password, "returnSecureToken": true}),
            )
            .await?;
        let parsed: SignInBody = serde_json::from_value(body)
            .map_err(|e| AuthError::Provider(format!("malformed sign-in response: {e}")))?;
        Ok(parsed.local_id)
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<String, AuthError> {
        let body = self
            .call(
                "signUp",
                json!({"email": email, "password": password, "returnSecureToken": true}),
            )
            .await?;
        let parsed: SignInBody = serde_json::from_value(body)
            .map_err(|e| AuthError::Provider(format!("malformed sign-up response: {e}")))?;

        // Set the display name on the fresh account. Failure here
        // leaves an account without a name but does not fail the
        // registration.
        if let Some(id_token) = parsed.id_token {
            if let Err(err) = self
                .call(
                    "update",
                    json!({"idToken": id_token, "displayName": name, "returnSecureToken": false}),
                )
                .await
            {
                warn!("display-name update failed for {}: {err}", parsed.local_id);
            }
        }

        Ok(parsed.local_id)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.call(
            "sendOobCode",
            json!({"requestType": "PASSWORD_RESET", "email": email}),
        )
        .await?;
        Ok(())
    }

    async fn resolve_owner(&self, email: &str) -> Result<String, AuthError> {
        let Some(token) = &self.admin_token else {
            return Err(AuthError::Provider(
                "accounts:lookup requires an admin token; none configured".into(),
            ));
        };

        let url = format!(
            "{IDENTITY_TOOLKIT}/projects/{}/accounts:lookup",
            self.project_id
        );
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({"email": [email]}))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!("accounts:lookup failed: {status}");
            return Err(AuthError::Provider(format!("lookup failed: {status}")));
        }

        let body: LookupBody = resp
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("malformed lookup response: {e}")))?;
        body.users
            .into_iter()
            .next()
            .map(|u| u.local_id)
            .ok_or(AuthError::UserNotFound)
    }
}
