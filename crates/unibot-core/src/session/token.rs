use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;

const TOKEN_PREFIX: &str = "session-";
const RANDOM_SUFFIX_LEN: usize = 9;

/// Opaque identifier scoping local history to one client profile.
///
/// Generated as `session-<unix millis>-<random alphanumerics>`. Two clients
/// started in the same millisecond are still told apart by the suffix;
/// a collision is tolerated and only mixes their local history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh token from the current wall clock and a random suffix.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_SUFFIX_LEN)
            .map(char::from)
            .collect();
        Self(format!("{TOKEN_PREFIX}{millis}-{}", suffix.to_lowercase()))
    }

    /// Wraps an already persisted token value.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
