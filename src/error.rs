use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use reqwest::StatusCode;
use thiserror::Error;

use crate::response::ApiErrorBody;

pub const UNEXPECTED_ERROR: &str = "Something went wrong, please try again";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing session token")]
    MissingToken,

    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        code: Option<String>,
        errors: BTreeMap<String, Vec<String>>,
    },

    #[error("Network error")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response payload")]
    Decode(#[from] serde_json::Error),

    #[error("Storage error")]
    Storage(#[from] std::io::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid input {0}")]
    InvalidInput(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
        let (message, code, errors) = match parsed {
            Some(body) => {
                let errors = body.field_errors();
                let message = body
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .or_else(|| errors.values().flatten().next().cloned())
                    .unwrap_or_else(|| UNEXPECTED_ERROR.to_string());
                (message, body.code, errors)
            }
            None => (UNEXPECTED_ERROR.to_string(), None, BTreeMap::new()),
        };

        AppError::Api {
            status,
            message,
            code,
            errors,
        }
    }

    /// Stable machine-readable code sent by the backend, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            AppError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::Network(err) => err.status(),
            _ => None,
        }
    }

    /// Text a screen renders inline or in its error modal.
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingToken => "Please sign in to continue".to_string(),
            AppError::Api { message, .. } => message.clone(),
            AppError::InvalidInput(reason) => reason.clone(),
            AppError::Cancelled => self.to_string(),
            AppError::Network(_)
            | AppError::Decode(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => UNEXPECTED_ERROR.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Locks a shared mutex, turning poisoning into [`AppError::Internal`].
pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>, name: &'static str) -> AppResult<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| {
        tracing::warn!(lock = name, "mutex poisoned");
        AppError::Internal(anyhow::anyhow!("{name} lock poisoned"))
    })
}
