use std::sync::Arc;

use rega_auth::IdentityProvider;
use rega_store::DeviceStore;

pub type AppState = Arc<AppStateInner>;

/// Process-wide handles, constructed once at startup and immutable
/// afterwards. Both collaborators sit behind traits so tests can run
/// against in-memory doubles.
pub struct AppStateInner {
    pub store: Arc<dyn DeviceStore>,
    pub identity: Arc<dyn IdentityProvider>,
}
