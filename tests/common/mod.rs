#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use salon_booking_client::{
    config::AppConfig,
    models::Language,
    state::AppState,
    storage::{MemoryStore, SharedStore, StorageKey},
};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

pub struct TestApp {
    pub server: MockServer,
    pub state: AppState,
    pub store: SharedStore,
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let server = MockServer::start().await;
    let store: SharedStore = Arc::new(MemoryStore::new());
    let config = AppConfig {
        api_base_url: server.uri(),
        storage_path: String::new(),
        cache_capacity: 8,
        cache_ttl: Duration::from_secs(60),
        default_language: Language::En,
    };
    let state = AppState::with_store(&config, store.clone())?;
    Ok(TestApp {
        server,
        state,
        store,
    })
}

pub async fn setup_signed_in_app() -> anyhow::Result<TestApp> {
    let app = setup_test_app().await?;
    app.state.client.auth().sign_in(TOKEN)?;
    Ok(app)
}

pub fn stored_token(app: &TestApp) -> Option<String> {
    app.store.get(StorageKey::AuthToken).ok().flatten()
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}
