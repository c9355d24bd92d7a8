use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::WorkspaceConfig;
use crate::naming;

/// Returns true for names starting with `.`.
pub fn is_hidden_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Returns true if `path` lies under `root` and is reachable by the workspace
/// walk: no directory between `root` and `path` is hidden, and the config does
/// not exclude it.
///
/// The final component is not checked for hiddenness; only directories are
/// pruned.
pub fn is_visible(root: &Path, path: &Path, config: &WorkspaceConfig) -> bool {
    let Ok(rel) = path.strip_prefix(root) else {
        return false;
    };

    let hidden_parent = rel
        .parent()
        .map(|p| p.components().any(|c| is_hidden_name(c.as_os_str())))
        .unwrap_or(false);

    !hidden_parent && !config.is_excluded(rel)
}

/// Collect every localization file under `root`.
///
/// Hidden directories (name starting with `.`) are pruned without being
/// descended into; the root itself is never pruned. Directories and files
/// matched by `config.exclude` are skipped as well. Any traversal error aborts
/// the walk.
pub fn collect_localization_files(
    root: &Path,
    config: &WorkspaceConfig,
) -> Result<Vec<PathBuf>, ignore::Error> {
    let mut files = Vec::new();

    for result in build_walker(root, config) {
        let entry = result?;

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        if naming::has_localization_suffix_os(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Collect `root` and every directory below it that the workspace walk visits.
pub fn collect_directories(
    root: &Path,
    config: &WorkspaceConfig,
) -> Result<Vec<PathBuf>, ignore::Error> {
    let mut dirs = Vec::new();

    for result in build_walker(root, config) {
        let entry = result?;
        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            dirs.push(entry.into_path());
        }
    }

    Ok(dirs)
}

fn build_walker(root: &Path, config: &WorkspaceConfig) -> ignore::Walk {
    let filter_root = root.to_path_buf();
    let filter_config = config.clone();

    ignore::WalkBuilder::new(root)
        // No .gitignore / .ignore handling: hidden-directory pruning and the
        // config's exclude list are the only filters.
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| keep_entry(entry, &filter_root, &filter_config))
        .build()
}

fn keep_entry(entry: &ignore::DirEntry, root: &Path, config: &WorkspaceConfig) -> bool {
    if entry.depth() == 0 {
        return true;
    }

    let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
    if is_dir && is_hidden_name(entry.file_name()) {
        return false;
    }

    match entry.path().strip_prefix(root) {
        Ok(rel) => !config.is_excluded(rel),
        Err(_) => true,
    }
}
