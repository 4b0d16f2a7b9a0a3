use std::sync::Arc;

use crate::{
    client::ApiClient,
    config::AppConfig,
    error::AppResult,
    services::salon_service::SalonCache,
    session::AuthContext,
    storage::{FileStore, Preferences, SharedStore},
};

#[derive(Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub salons: Arc<SalonCache>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let store: SharedStore = Arc::new(FileStore::open(&config.storage_path)?);
        Self::with_store(config, store)
    }

    /// Wires the client against an explicit store and restores any session
    /// left behind by a previous run.
    pub fn with_store(config: &AppConfig, store: SharedStore) -> AppResult<Self> {
        let auth = AuthContext::new(store.clone());
        auth.restore()?;
        let preferences = Preferences::new(store, config.default_language);
        let client = ApiClient::new(config.api_base_url.clone(), auth, preferences)?;
        let salons = Arc::new(SalonCache::new(config.cache_capacity, config.cache_ttl));
        Ok(Self { client, salons })
    }
}
