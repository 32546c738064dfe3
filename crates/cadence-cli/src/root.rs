use std::path::{Path, PathBuf};

/// Resolve the data root directory.
///
/// Priority:
/// 1. `--root` flag / `CADENCE_ROOT` env var (passed in as `explicit`)
/// 2. `~/.cadence`
/// 3. Fall back to `.cadence` under the current directory
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    match home::home_dir() {
        Some(home) => home.join(".cadence"),
        None => PathBuf::from(".cadence"),
    }
}
