//! TOML-based HistoryRepository implementation

use crate::storage::AtomicTomlFile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use unibot_core::error::Result;
use unibot_core::history::{ChatMessageRecord, HistoryRepository};
use unibot_core::session::SessionToken;

/// On-disk shape of `history.toml`: one flat list for every session.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(default, rename = "message")]
    messages: Vec<ChatMessageRecord>,
}

/// Stores the chat history of all sessions in a single TOML file.
///
/// Appends are locked read-modify-write cycles. With `limit` set, the
/// oldest records are evicted once the list grows past it.
pub struct TomlHistoryRepository {
    file: AtomicTomlFile<HistoryDocument>,
    limit: Option<usize>,
}

impl TomlHistoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            limit: None,
        }
    }

    /// Caps the persisted list at `limit` records (oldest evicted first).
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

impl HistoryRepository for TomlHistoryRepository {
    fn append(&self, record: ChatMessageRecord) -> Result<()> {
        let limit = self.limit;
        let evicted = self.file.update(move |doc| {
            doc.messages.push(record);
            match limit {
                Some(limit) if doc.messages.len() > limit => {
                    let excess = doc.messages.len() - limit;
                    doc.messages.drain(..excess);
                    excess
                }
                _ => 0,
            }
        })?;

        if evicted > 0 {
            tracing::debug!(evicted, "history limit reached, dropped oldest records");
        }
        Ok(())
    }

    fn load_for_session(&self, token: &SessionToken) -> Result<Vec<ChatMessageRecord>> {
        let doc = self.file.load()?.unwrap_or_default();
        Ok(doc
            .messages
            .into_iter()
            .filter(|record| record.belongs_to(token))
            .collect())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        tracing::info!(path = %self.file.path().display(), "chat history cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo(temp_dir: &TempDir) -> TomlHistoryRepository {
        TomlHistoryRepository::new(temp_dir.path().join("history.toml"))
    }

    #[test]
    fn test_empty_history() {
        let temp_dir = TempDir::new().unwrap();
        let token = SessionToken::from_stored("session-1-a");
        assert!(repo(&temp_dir).load_for_session(&token).unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_keeps_order_and_scope() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir);
        let mine = SessionToken::from_stored("session-1-a");
        let other = SessionToken::from_stored("session-2-b");

        let texts = ["hola", "carreras disponibles", "gracias"];
        for (i, text) in texts.iter().enumerate() {
            repo.append(ChatMessageRecord::from_user(*text, &mine)).unwrap();
            if i == 1 {
                repo.append(ChatMessageRecord::from_bot("otra sesión", &other))
                    .unwrap();
            }
        }

        let loaded = repo.load_for_session(&mine).unwrap();
        let loaded_texts: Vec<&str> = loaded.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(loaded_texts, texts);

        let unrelated = SessionToken::from_stored("session-3-c");
        assert!(repo.load_for_session(&unrelated).unwrap().is_empty());
        assert_eq!(repo.load_for_session(&other).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_removes_every_session() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir);
        let a = SessionToken::from_stored("session-1-a");
        let b = SessionToken::from_stored("session-2-b");
        repo.append(ChatMessageRecord::from_user("uno", &a)).unwrap();
        repo.append(ChatMessageRecord::from_user("dos", &b)).unwrap();

        repo.clear().unwrap();

        assert!(repo.load_for_session(&a).unwrap().is_empty());
        assert!(repo.load_for_session(&b).unwrap().is_empty());
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let temp_dir = TempDir::new().unwrap();
        let repo = repo(&temp_dir).with_limit(Some(2));
        let token = SessionToken::from_stored("session-1-a");
        for text in ["uno", "dos", "tres"] {
            repo.append(ChatMessageRecord::from_user(text, &token)).unwrap();
        }

        let texts: Vec<String> = repo
            .load_for_session(&token)
            .unwrap()
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["dos".to_string(), "tres".to_string()]);
    }

    #[test]
    fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let token = SessionToken::from_stored("session-1-a");
        repo(&temp_dir)
            .append(ChatMessageRecord::from_user("¿Cuál es el costo?", &token))
            .unwrap();

        let reopened = repo(&temp_dir).load_for_session(&token).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened[0].text, "¿Cuál es el costo?");
        assert!(reopened[0].is_from_user);
    }
}
