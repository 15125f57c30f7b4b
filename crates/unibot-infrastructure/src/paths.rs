//! Path management for unibot's local files.
//!
//! Everything the client persists ("local storage" of the chat widget) lives
//! in one per-user directory.
//!
//! ```text
//! ~/.config/unibot/            # Config directory (platform config dir + "unibot")
//! ├── config.toml              # Client configuration
//! ├── session.toml             # Current session token
//! ├── history.toml             # Flat chat history, all sessions
//! └── logs/                    # Application logs
//!     └── unibot.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "unibot";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for unibot_core::UnibotError {
    fn from(err: PathError) -> Self {
        unibot_core::UnibotError::config(err.to_string())
    }
}

/// Resolves the client's file layout.
///
/// `UnibotPaths::new(None)` uses the platform config directory; passing a
/// root (tests, `--data-dir`) relocates every file under it.
#[derive(Debug, Clone)]
pub struct UnibotPaths {
    root: PathBuf,
}

impl UnibotPaths {
    /// Creates the layout under `root_override`, or under the platform
    /// config directory when `None`.
    pub fn new(root_override: Option<&Path>) -> Result<Self, PathError> {
        let root = match root_override {
            Some(root) => root.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PathError::ConfigDirNotFound)?
                .join(APP_DIR_NAME),
        };
        Ok(Self { root })
    }

    /// The directory holding all client files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.toml")
    }

    pub fn history_file(&self) -> PathBuf {
        self.root.join("history.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_root() {
        let paths = UnibotPaths::new(None).unwrap();
        assert!(paths.root().ends_with(APP_DIR_NAME));
    }

    #[test]
    fn test_files_under_root() {
        let paths = UnibotPaths::new(Some(Path::new("/tmp/unibot-test"))).unwrap();
        for file in [
            paths.config_file(),
            paths.session_file(),
            paths.history_file(),
            paths.logs_dir(),
        ] {
            assert!(file.starts_with("/tmp/unibot-test"));
        }
        assert!(paths.history_file().ends_with("history.toml"));
        assert!(paths.session_file().ends_with("session.toml"));
    }
}
