//! Session identity domain module.
//!
//! # Module Structure
//!
//! - `token`: the opaque per-client [`SessionToken`]
//! - `repository`: the [`SessionTokenStore`] persistence trait

mod repository;
mod token;

pub use repository::SessionTokenStore;
pub use token::SessionToken;
