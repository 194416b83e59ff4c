pub mod settings;
pub mod store;

use settings::Settings;
use std::sync::Arc;
use store::Store;
use tokio::sync::RwLock;

/// Shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::new())),
            settings: Arc::new(settings),
        }
    }
}
