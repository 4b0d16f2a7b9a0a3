use std::{env, time::Duration};

use crate::models::Language;

pub const DEFAULT_API_BASE_URL: &str = "https://api.salonbooking.app/api";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_path: String,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub default_language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_path: "salon-client.json".to_string(),
            cache_capacity: 32,
            cache_ttl: Duration::from_secs(300),
            default_language: Language::En,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let api_base_url = env::var("SALON_API_BASE_URL").unwrap_or(defaults.api_base_url);
        let storage_path = env::var("SALON_STORAGE_PATH").unwrap_or(defaults.storage_path);
        let cache_capacity = env::var("SALON_CACHE_CAPACITY")
            .ok()
            .and_then(|c| c.parse::<usize>().ok())
            .filter(|c| *c > 0)
            .unwrap_or(defaults.cache_capacity);
        let cache_ttl = env::var("SALON_CACHE_TTL_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);
        let default_language = match env::var("SALON_LANGUAGE") {
            Ok(raw) => raw.parse::<Language>().map_err(anyhow::Error::msg)?,
            Err(_) => defaults.default_language,
        };
        Ok(Self {
            api_base_url,
            storage_path,
            cache_capacity,
            cache_ttl,
            default_language,
        })
    }
}
