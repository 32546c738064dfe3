use crate::error::{CadenceError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

pub const USERS_DIR: &str = "users";
pub const REPS_DIR: &str = "reps";
pub const WEEKS_DIR: &str = "weeks";
pub const ARCHIVE_DIR: &str = "archive";

pub const CONFIG_FILE: &str = "config.yaml";
pub const PRACTICE_FILE: &str = "practice.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn users_dir(root: &Path) -> PathBuf {
    root.join(USERS_DIR)
}

pub fn user_dir(root: &Path, user: &str) -> PathBuf {
    users_dir(root).join(user)
}

pub fn reps_dir(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(REPS_DIR)
}

pub fn rep_path(root: &Path, user: &str, id: &str) -> PathBuf {
    reps_dir(root, user).join(format!("{id}.yaml"))
}

pub fn weeks_dir(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(WEEKS_DIR)
}

pub fn week_stats_path(root: &Path, user: &str, week: &str) -> PathBuf {
    weeks_dir(root, user).join(format!("{week}.yaml"))
}

pub fn practice_path(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(PRACTICE_FILE)
}

pub fn archive_dir(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(ARCHIVE_DIR)
}

pub fn archive_path(root: &Path, user: &str, date: &str) -> PathBuf {
    archive_dir(root, user).join(format!("{date}.yaml"))
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Validate a user or cohort id: lowercase alphanumeric with interior hyphens.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(CadenceError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Enumerate user ids by listing the users directory. Missing directory means
/// no users yet, not an error.
pub fn list_users(root: &Path) -> Result<Vec<String>> {
    let dir = users_dir(root);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut users = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            users.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    users.sort();
    Ok(users)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
