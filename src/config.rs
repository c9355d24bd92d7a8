use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// File name of the optional per-workspace configuration.
pub const CONFIG_FILE: &str = "xliff-workspace.toml";

/// Configuration loaded from `xliff-workspace.toml` at the workspace root.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Additional path patterns to exclude from scanning and watching
    /// (beyond hidden directories).
    pub exclude: Option<Vec<String>>,
}

impl WorkspaceConfig {
    /// Read `<root>/xliff-workspace.toml`.
    ///
    /// The file is optional. A broken one is reported with `warn!` and
    /// ignored, so a typo never stops a scan.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config unreadable, using defaults");
                return Self::default();
            }
        };

        toml::from_str(&contents).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "config invalid, using defaults");
            Self::default()
        })
    }

    /// Returns true if the root-relative `path`, or any single component of
    /// it, matches one of the `exclude` globs. Invalid globs never match.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(patterns) = &self.exclude else {
            return false;
        };

        let whole = path.to_string_lossy();
        patterns
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .any(|matcher| {
                matcher.matches(&whole)
                    || path
                        .components()
                        .any(|c| matcher.matches(&c.as_os_str().to_string_lossy()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkspaceConfig::load(dir.path());
        assert!(config.exclude.is_none());
        assert!(!config.is_excluded(Path::new("any/path.xlf")));
    }

    #[test]
    fn test_load_exclude_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "exclude = [\"node_modules\", \"*.bak.xlf\"]\n",
        )
        .unwrap();

        let config = WorkspaceConfig::load(dir.path());
        assert!(config.is_excluded(Path::new("node_modules/pkg/de.a.xlf")));
        assert!(config.is_excluded(Path::new("res/de.a.bak.xlf")));
        assert!(!config.is_excluded(Path::new("res/de.a.xlf")));
    }

    #[test]
    fn test_unparsable_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "exclude = 42").unwrap();

        let config = WorkspaceConfig::load(dir.path());
        assert!(config.exclude.is_none(), "bad config should yield defaults");
    }

    #[test]
    fn test_unknown_keys_and_invalid_globs() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "exclude = []\nignore = true\n";
        fs::write(dir.path().join(CONFIG_FILE), contents).unwrap();
        assert!(WorkspaceConfig::load(dir.path()).exclude.is_none());

        let config = WorkspaceConfig {
            exclude: Some(vec!["[".to_string(), "vendor".to_string()]),
        };
        assert!(config.is_excluded(Path::new("vendor/de.a.xlf")));
        assert!(!config.is_excluded(Path::new("res/de.a.xlf")));
    }
}
