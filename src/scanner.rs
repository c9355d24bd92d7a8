use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::WorkspaceConfig;
use crate::error::ScanError;
use crate::model::{FileIdentity, GroupKey, TranslationGroup, WorkspaceScan, sort_groups};
use crate::walker;

/// Scan `root` with the default configuration.
pub fn scan(root: &Path) -> Result<WorkspaceScan, ScanError> {
    scan_with_config(root, &WorkspaceConfig::default())
}

/// Walk `root` once and group every localization file by directory and base name.
///
/// Hidden directories are pruned (the root itself never is). Groups are
/// returned sorted by display name so repeated scans of an unchanged tree
/// compare equal. On any traversal error the whole scan fails and nothing
/// is returned.
pub fn scan_with_config(
    root: &Path,
    config: &WorkspaceConfig,
) -> Result<WorkspaceScan, ScanError> {
    let started = Instant::now();

    let meta = std::fs::metadata(root).map_err(|source| ScanError::RootUnavailable {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let files = walker::collect_localization_files(root, config).map_err(|source| {
        ScanError::Traversal {
            root: root.to_path_buf(),
            source,
        }
    })?;

    let mut group_map: HashMap<GroupKey, TranslationGroup> = HashMap::new();
    let mut total_files = 0;

    for path in &files {
        let Some(file) = FileIdentity::from_path(path) else {
            debug!("skipping path without a file name: {}", path.display());
            continue;
        };
        total_files += 1;

        let key = file.group_key();
        group_map
            .entry(key.clone())
            .or_insert_with(|| TranslationGroup::new(key, root))
            .insert(file);
    }

    let mut groups: Vec<TranslationGroup> = group_map.into_values().collect();
    sort_groups(&mut groups);

    info!(
        root = %root.display(),
        groups = groups.len(),
        files = total_files,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "workspace scanned"
    );

    Ok(WorkspaceScan {
        root: root.to_path_buf(),
        groups,
        total_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_groups_by_directory_and_base_name() {
        let dir = tmp();
        touch(dir.path(), "a/de.x.xlf");
        touch(dir.path(), "a/en.x.xlf");
        touch(dir.path(), "b/de.x.xlf");

        let scan = scan(dir.path()).unwrap();
        assert_eq!(scan.total_files, 3);
        assert_eq!(
            scan.groups.len(),
            2,
            "same base name in another directory is a new group"
        );

        let a = scan
            .find(&GroupKey::new(&dir.path().join("a"), "x"))
            .expect("group a/x");
        assert_eq!(a.languages(), vec!["de", "en"]);

        let b = scan
            .find(&GroupKey::new(&dir.path().join("b"), "x"))
            .expect("group b/x");
        assert_eq!(b.languages(), vec!["de"]);
    }

    #[test]
    fn test_source_file_and_display_names() {
        let dir = tmp();
        touch(dir.path(), "messages.xlf");
        touch(dir.path(), "de.messages.xlf");
        touch(dir.path(), "res/labels.xliff");

        let scan = scan(dir.path()).unwrap();
        let names: Vec<&str> = scan.groups.iter().map(|g| g.display_name()).collect();
        let nested = Path::new("res").join("labels").to_string_lossy().into_owned();
        assert_eq!(names, vec!["messages", nested.as_str()]);

        let messages = &scan.groups[0];
        assert_eq!(messages.source_file().unwrap().name, "messages.xlf");
        assert_eq!(messages.languages(), vec!["default", "de"]);

        let labels = &scan.groups[1];
        assert_eq!(labels.source_file().unwrap().name, "labels.xliff");
    }

    #[test]
    fn test_hidden_directory_content_is_ignored() {
        let dir = tmp();
        touch(dir.path(), ".git/de.x.xlf");

        let scan = scan(dir.path()).unwrap();
        assert_eq!(scan.total_files, 0);
        assert!(scan.groups.is_empty());
    }

    #[test]
    fn test_non_localization_files_are_not_counted() {
        let dir = tmp();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "de.a.xlf");

        let scan = scan(dir.path()).unwrap();
        assert_eq!(scan.total_files, 1);
    }

    #[test]
    fn test_rescan_is_identical() {
        let dir = tmp();
        for rel in ["z/en.a.xlf", "b.xlf", "m/n/fr.c.xlf", "a/de.b.xlf", "de.b.xlf"] {
            touch(dir.path(), rel);
        }

        let first = scan(dir.path()).unwrap();
        let second = scan(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tmp();
        let err = scan(&dir.path().join("missing")).unwrap_err();
        assert!(
            matches!(err, ScanError::RootUnavailable { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn test_file_root_fails() {
        let dir = tmp();
        touch(dir.path(), "de.a.xlf");
        let err = scan(&dir.path().join("de.a.xlf")).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)), "got {err:?}");
    }

    #[test]
    fn test_scan_with_config_excludes() {
        let dir = tmp();
        touch(dir.path(), "vendor/de.a.xlf");
        touch(dir.path(), "de.a.xlf");

        let config = WorkspaceConfig {
            exclude: Some(vec!["vendor".to_string()]),
        };
        let scan = scan_with_config(dir.path(), &config).unwrap();
        assert_eq!(scan.total_files, 1);
        assert_eq!(scan.groups.len(), 1);
    }

    // Some filesystems (APFS) refuse names that are not valid UTF-8.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_counted_and_grouped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tmp();
        let odd = dir.path().join(OsStr::from_bytes(b"de.caf\xe9.xlf"));
        fs::write(&odd, "").unwrap();
        touch(dir.path(), "de.ok.xlf");

        let scan = scan(dir.path()).unwrap();
        assert_eq!(scan.total_files, 2, "every .xlf entry counts");
        assert_eq!(scan.groups.len(), 2);

        let group = scan
            .groups
            .iter()
            .find(|g| g.files().any(|f| f.path == odd))
            .expect("group holding the non UTF-8 file");
        assert_eq!(group.languages(), vec!["de"]);
        assert_eq!(group.base_name(), "caf\u{fffd}");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_fails_whole_scan() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tmp();
        touch(dir.path(), "de.a.xlf");
        touch(dir.path(), "locked/de.b.xlf");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = scan(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.expect_err("traversal error must fail the scan");
        assert!(matches!(err, ScanError::Traversal { .. }), "got {err:?}");
    }
}
