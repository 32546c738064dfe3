use crate::error::{CadenceError, Result};
use crate::io;
use crate::paths;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Engine configuration. The reference timezone fixes what "today",
/// "tomorrow", and the week windows mean for every user, regardless of the
/// host machine's locale. Callers re-load this on every batch invocation
/// rather than caching it across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Offset of the reference timezone from UTC, in minutes (e.g. -480 for
    /// UTC-8). Applied uniformly; there is no per-user timezone.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
        }
    }
}

impl Config {
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    pub fn load(root: &Path) -> Result<Self> {
        io::load_doc(&paths::config_path(root))?.ok_or(CadenceError::NotInitialized)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        io::save_doc(&paths::config_path(root), self)
    }

    /// Write the default config and users directory if absent. Returns true
    /// if a new config was created.
    pub fn init(root: &Path) -> Result<bool> {
        io::ensure_dir(&paths::users_dir(root))?;
        io::save_doc_if_missing(&paths::config_path(root), &Config::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(CadenceError::NotInitialized)
        ));
    }

    #[test]
    fn init_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        assert!(Config::init(dir.path()).unwrap());
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.utc_offset_minutes, 0);
        // Second init leaves the existing config alone.
        assert!(!Config::init(dir.path()).unwrap());
    }

    #[test]
    fn timezone_from_offset() {
        let config = Config {
            utc_offset_minutes: -480,
        };
        assert_eq!(config.timezone().local_minus_utc(), -480 * 60);
    }
}
