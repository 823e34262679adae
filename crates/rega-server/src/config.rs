//! Process-wide configuration, read once at startup from the
//! environment (plus `.env` in development) and immutable afterwards.

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: Backend,
}

#[derive(Debug, Clone)]
pub enum Backend {
    /// Hosted identity provider + Realtime Database.
    Firebase(FirebaseConfig),
    /// Self-contained in-memory backend for local development; all
    /// state is lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    pub database_url: String,
    /// Optional database secret, sent as the `auth` query parameter.
    pub database_secret: Option<String>,
    /// OAuth access token for privileged account lookup (the
    /// email-to-owner resolution used by telemetry ingestion).
    /// Service-account token acquisition happens outside this process.
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("REGA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("REGA_PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .context("REGA_PORT must be a port number")?;

        let backend = match std::env::var("REGA_BACKEND").as_deref() {
            Ok("memory") => Backend::Memory,
            _ => Backend::Firebase(FirebaseConfig {
                api_key: require("FIREBASE_API_KEY")?,
                project_id: require("FIREBASE_PROJECT_ID")?,
                database_url: require("FIREBASE_DATABASE_URL")?,
                database_secret: optional("FIREBASE_DATABASE_SECRET"),
                admin_token: optional("FIREBASE_ADMIN_TOKEN"),
            }),
        };

        Ok(Self { host, port, backend })
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required environment variable {key}"))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
