//! Session token store trait.

use super::token::SessionToken;
use crate::error::Result;

/// Persists the per-client session token.
///
/// Implementations never validate uniqueness against a server; the token
/// is purely a local scoping key for history.
pub trait SessionTokenStore: Send + Sync {
    /// Returns the stored token, creating and persisting one on first use.
    ///
    /// Subsequent calls return the same value until [`regenerate`](Self::regenerate).
    fn get_or_create(&self) -> Result<SessionToken>;

    /// Forces a new token and overwrites the stored one.
    fn regenerate(&self) -> Result<SessionToken>;
}
