//! Chat transport trait.

use super::response::{ChatResponse, StudentsResponse};
use crate::session::SessionToken;
use async_trait::async_trait;

/// Sends chat messages to the backend.
///
/// Implementations must not fail: any transport-level problem is reported
/// as a synthesized failure response (`success = false`).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Posts `message` for `session_token` and returns the backend's reply.
    async fn send(&self, message: &str, session_token: &SessionToken) -> ChatResponse;

    /// Fetches the complete student listing.
    async fn fetch_all_students(&self) -> StudentsResponse;
}
