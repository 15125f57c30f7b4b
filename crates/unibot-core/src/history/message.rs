use crate::session::SessionToken;
use serde::{Deserialize, Serialize};

/// A single exchanged message as kept in local history.
///
/// Records are immutable once created; the store only appends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageRecord {
    /// The message text as displayed.
    pub text: String,
    /// `true` for user-authored messages, `false` for bot replies.
    pub is_from_user: bool,
    /// Creation time (RFC 3339).
    pub timestamp: String,
    /// Session the record belongs to.
    pub session_token: SessionToken,
}

impl ChatMessageRecord {
    pub fn from_user(text: impl Into<String>, session_token: &SessionToken) -> Self {
        Self::new(text, true, session_token)
    }

    pub fn from_bot(text: impl Into<String>, session_token: &SessionToken) -> Self {
        Self::new(text, false, session_token)
    }

    fn new(text: impl Into<String>, is_from_user: bool, session_token: &SessionToken) -> Self {
        Self {
            text: text.into(),
            is_from_user,
            timestamp: chrono::Utc::now().to_rfc3339(),
            session_token: session_token.clone(),
        }
    }

    pub fn belongs_to(&self, token: &SessionToken) -> bool {
        &self.session_token == token
    }
}
