// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution.

use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "DOCSCAN_DATA_DIR";

/// Return the application data directory (not created here).
///
/// Precedence: explicit override, `$DOCSCAN_DATA_DIR`, `$XDG_DATA_HOME/docscan`,
/// `~/.local/share/docscan`.
pub fn data_dir(explicit: Option<PathBuf>) -> PathBuf {
    resolve(explicit, non_empty_var(DATA_DIR_ENV))
}

/// Set and non-empty; an empty value counts as unset.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn resolve(explicit: Option<PathBuf>, env_dir: Option<String>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Some(dir) = env_dir {
        return PathBuf::from(dir);
    }
    base_dir().join("docscan")
}

fn base_dir() -> PathBuf {
    if let Some(xdg) = non_empty_var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Some(home) = non_empty_var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let dir = data_dir(Some(PathBuf::from("/srv/scans")));
        assert_eq!(dir, PathBuf::from("/srv/scans"));
    }

    #[test]
    fn env_override_applies_when_set() {
        let dir = resolve(None, Some("/var/lib/docscan".into()));
        assert_eq!(dir, PathBuf::from("/var/lib/docscan"));
    }

    #[test]
    fn empty_env_value_is_ignored() {
        // Unique name; no other test reads it.
        unsafe { std::env::set_var("DOCSCAN_TEST_EMPTY_DIR", "") };
        assert_eq!(non_empty_var("DOCSCAN_TEST_EMPTY_DIR"), None);

        let dir = resolve(None, non_empty_var("DOCSCAN_TEST_EMPTY_DIR"));
        assert_ne!(dir, PathBuf::new());
        assert!(dir.ends_with("docscan"));
    }

    #[test]
    fn default_ends_in_app_folder() {
        if std::env::var(DATA_DIR_ENV).is_err() {
            assert!(data_dir(None).ends_with("docscan"));
        }
    }
}
