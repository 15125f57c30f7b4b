//! Client configuration model.
//!
//! The on-disk form lives in `config.toml`; every field has a default so a
//! missing or partial file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings shared by the transport, the history store and the front end.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the chatbot backend (no trailing slash required).
    pub base_url: String,
    /// Upper bound for a single HTTP request.
    pub request_timeout_secs: u64,
    /// Retry once on connect errors and timeouts.
    pub retry_transient: bool,
    /// Maximum number of history records kept on disk. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Canned questions offered as quick suggestions.
    pub suggestions: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_transient: true,
            history_limit: None,
            suggestions: default_suggestions(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Joins `path` onto the base URL with exactly one slash between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_suggestions() -> Vec<String> {
    [
        "carreras disponibles",
        "estadísticas de estudiantes",
        "estudiantes pendientes de inscripción",
        "generar reporte",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
