//! History repository trait.

use super::message::ChatMessageRecord;
use crate::error::Result;
use crate::session::SessionToken;

/// An append-only, client-local log of chat messages.
///
/// Persisted order is temporal; loading filters by session token and keeps
/// insertion order.
pub trait HistoryRepository: Send + Sync {
    /// Appends one record to the persisted list.
    fn append(&self, record: ChatMessageRecord) -> Result<()>;

    /// Returns every record of `token` in insertion order.
    fn load_for_session(&self, token: &SessionToken) -> Result<Vec<ChatMessageRecord>>;

    /// Removes all persisted history, for every session.
    fn clear(&self) -> Result<()>;
}
