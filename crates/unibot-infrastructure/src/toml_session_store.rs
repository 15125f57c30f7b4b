//! TOML-based SessionTokenStore implementation

use crate::storage::AtomicTomlFile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use unibot_core::error::Result;
use unibot_core::session::{SessionToken, SessionTokenStore};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(default)]
    session_token: Option<SessionToken>,
}

/// Keeps the current session token in `session.toml`.
pub struct TomlSessionStore {
    file: AtomicTomlFile<SessionDocument>,
}

impl TomlSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

impl SessionTokenStore for TomlSessionStore {
    fn get_or_create(&self) -> Result<SessionToken> {
        // Fast path without the lock; the locked update re-checks.
        if let Some(token) = self.file.load()?.and_then(|doc| doc.session_token) {
            return Ok(token);
        }

        let token = self.file.update(|doc| {
            doc.session_token
                .get_or_insert_with(|| {
                    let token = SessionToken::generate();
                    tracing::info!(session = %token, "created session token");
                    token
                })
                .clone()
        })?;
        Ok(token)
    }

    fn regenerate(&self) -> Result<SessionToken> {
        let token = SessionToken::generate();
        self.file.store(&SessionDocument {
            session_token: Some(token.clone()),
        })?;
        tracing::info!(session = %token, "regenerated session token");
        Ok(token)
    }
}
