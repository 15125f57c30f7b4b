pub mod config_service;
pub mod paths;
pub mod storage;
pub mod toml_history_repository;
pub mod toml_session_store;

pub use crate::config_service::ConfigService;
pub use crate::paths::UnibotPaths;
pub use crate::toml_history_repository::TomlHistoryRepository;
pub use crate::toml_session_store::TomlSessionStore;
