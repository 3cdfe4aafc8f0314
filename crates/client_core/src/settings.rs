//! Process-wide client settings: API base URL, debounce delay, request timeout.

use std::{collections::HashMap, path::Path, sync::OnceLock, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const SETTINGS_FILE: &str = "users_client.toml";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub api_url: String,
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    /// Settings resolved once for the whole process and never mutated afterwards.
    ///
    /// A broken settings file or environment falls back to the defaults with a
    /// warning; front-ends that want to fail loudly call [`ClientSettings::load`].
    pub fn global() -> &'static ClientSettings {
        static SETTINGS: OnceLock<ClientSettings> = OnceLock::new();
        SETTINGS.get_or_init(|| {
            Self::load().unwrap_or_else(|err| {
                warn!("falling back to default client settings: {err}");
                Self::default()
            })
        })
    }

    pub fn load() -> Result<Self, ClientError> {
        Self::load_from(Path::new(SETTINGS_FILE), std::env::vars().collect())
    }

    /// Layers defaults, the optional TOML file and `APP__*` variables, then the
    /// plain `API_URL` override.
    pub fn load_from(file: &Path, env: HashMap<String, String>) -> Result<Self, ClientError> {
        let defaults = Self::default();
        let mut settings: Self = Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("search_debounce_ms", defaults.search_debounce_ms)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .add_source(File::from(file).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            )
            .build()?
            .try_deserialize()?;

        if let Some(v) = env.get("API_URL").filter(|v| !v.trim().is_empty()) {
            settings.api_url = v.clone();
        }
        if settings.api_url.trim().is_empty() {
            settings.api_url = DEFAULT_API_URL.into();
        }
        settings.api_url = normalize_base_url(&settings.api_url)?;

        Ok(settings)
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ClientError> {
        self.api_url = normalize_base_url(api_url)?;
        Ok(self)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Validates an http(s) base URL and strips trailing slashes so paths can be
/// appended with a single `/`.
pub fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "unsupported scheme '{}', expected http or https",
            parsed.scheme()
        )));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".to_string()));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
