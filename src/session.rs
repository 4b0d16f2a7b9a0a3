use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    error::{AppError, AppResult},
    storage::{SharedStore, StorageKey},
};

/// Process-wide authentication state. The token itself always lives in
/// device storage and is re-read before each authenticated call.
#[derive(Clone)]
pub struct AuthContext {
    store: SharedStore,
    authenticated: Arc<AtomicBool>,
}

impl AuthContext {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            authenticated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Splash-time bootstrap: authenticated iff a token survived the last run.
    pub fn restore(&self) -> AppResult<bool> {
        let has_token = self.token()?.is_some();
        self.authenticated.store(has_token, Ordering::SeqCst);
        tracing::info!(authenticated = has_token, "session restored");
        Ok(has_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn sign_in(&self, token: &str) -> AppResult<()> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(AppError::InvalidInput("empty session token".into()));
        }
        self.store.set(StorageKey::AuthToken, token)?;
        self.authenticated.store(true, Ordering::SeqCst);
        tracing::info!("session started");
        Ok(())
    }

    pub fn sign_out(&self) -> AppResult<()> {
        self.store.remove(StorageKey::AuthToken)?;
        self.authenticated.store(false, Ordering::SeqCst);
        tracing::info!("session ended");
        Ok(())
    }

    pub fn token(&self) -> AppResult<Option<String>> {
        Ok(self
            .store
            .get(StorageKey::AuthToken)?
            .filter(|token| !token.is_empty()))
    }

    pub fn require_token(&self) -> AppResult<String> {
        self.token()?.ok_or(AppError::MissingToken)
    }
}
