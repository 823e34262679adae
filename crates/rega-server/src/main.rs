mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use rega_api::state::{AppState, AppStateInner};
use rega_auth::IdentityProvider;
use rega_auth::firebase::FirebaseAuth;
use rega_auth::memory::MemoryIdentity;
use rega_store::DeviceStore;
use rega_store::firebase::FirebaseStore;
use rega_store::memory::MemoryStore;

use crate::config::{Backend, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rega=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let (store, identity): (Arc<dyn DeviceStore>, Arc<dyn IdentityProvider>) =
        match &config.backend {
            Backend::Firebase(fb) => {
                info!("using Firebase backend (project {})", fb.project_id);
                (
                    Arc::new(FirebaseStore::new(
                        fb.database_url.clone(),
                        fb.database_secret.clone(),
                    )),
                    Arc::new(FirebaseAuth::new(
                        fb.api_key.clone(),
                        fb.project_id.clone(),
                        fb.admin_token.clone(),
                    )),
                )
            }
            Backend::Memory => {
                info!("using in-memory backend; state is not persisted");
                (Arc::new(MemoryStore::new()), Arc::new(MemoryIdentity::new()))
            }
        };

    let state: AppState = Arc::new(AppStateInner { store, identity });

    let app = rega_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("rega server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
