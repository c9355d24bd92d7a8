//! Updatable translation-group index.
//!
//! A [`WorkspaceScan`] is a snapshot. Callers that keep a view alive while a
//! watcher runs hold a [`WorkspaceIndex`] instead and fold each reported
//! event into it (see `watcher::incremental`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::WorkspaceConfig;
use crate::model::{FileIdentity, GroupKey, TranslationGroup, WorkspaceScan, sort_groups};
use crate::{naming, walker};

#[derive(Debug, Clone)]
pub struct WorkspaceIndex {
    root: PathBuf,
    config: WorkspaceConfig,
    groups: HashMap<GroupKey, TranslationGroup>,
}

impl WorkspaceIndex {
    /// Take ownership of a scan produced with the default configuration.
    pub fn from_scan(scan: WorkspaceScan) -> Self {
        Self::from_scan_with_config(scan, WorkspaceConfig::default())
    }

    /// Take ownership of a scan; `config` must be the one the scan used.
    pub fn from_scan_with_config(scan: WorkspaceScan, config: WorkspaceConfig) -> Self {
        let groups = scan
            .groups
            .into_iter()
            .map(|g| (g.key().clone(), g))
            .collect();
        Self {
            root: scan.root,
            config,
            groups,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert or replace the file at `path`.
    ///
    /// Returns the key of the affected group, or `None` if the path is not an
    /// indexable localization file (wrong suffix, outside the root, inside a
    /// hidden or excluded directory).
    pub fn upsert_file(&mut self, path: &Path) -> Option<GroupKey> {
        if !self.is_indexable(path) {
            return None;
        }
        let file = FileIdentity::from_path(path)?;
        let key = file.group_key();

        let root = &self.root;
        let group = self
            .groups
            .entry(key.clone())
            .or_insert_with(|| TranslationGroup::new(key.clone(), root));
        if let Some(previous) = group.insert(file)
            && previous.path != path
        {
            debug!(
                replaced = %previous.path.display(),
                by = %path.display(),
                "language entry replaced"
            );
        }

        Some(key)
    }

    /// Remove the file at `path`. Drops the group when it becomes empty.
    ///
    /// Returns the key of the group the file was removed from.
    pub fn remove_file(&mut self, path: &Path) -> Option<GroupKey> {
        let file = FileIdentity::from_path(path)?;
        let key = file.group_key();

        let group = self.groups.get_mut(&key)?;
        group.remove_path(path)?;
        if group.is_empty() {
            debug!(group = %key, "last member removed, dropping group");
            self.groups.remove(&key);
        }

        Some(key)
    }

    pub fn group(&self, key: &GroupKey) -> Option<&TranslationGroup> {
        self.groups.get(key)
    }

    /// The group a file at `path` belongs (or would belong) to, if it exists.
    pub fn group_for_path(&self, path: &Path) -> Option<&TranslationGroup> {
        let file = FileIdentity::from_path(path)?;
        self.groups.get(&file.group_key())
    }

    /// Returns true if a file at exactly `path` is indexed.
    pub fn contains_file(&self, path: &Path) -> bool {
        self.group_for_path(path)
            .map(|g| g.files().any(|f| f.path == path))
            .unwrap_or(false)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of indexed files across all groups.
    pub fn total_files(&self) -> usize {
        self.groups.values().map(TranslationGroup::len).sum()
    }

    /// Snapshot in the same order a fresh scan would produce.
    pub fn to_scan(&self) -> WorkspaceScan {
        let mut groups: Vec<TranslationGroup> = self.groups.values().cloned().collect();
        sort_groups(&mut groups);
        WorkspaceScan {
            root: self.root.clone(),
            groups,
            total_files: self.total_files(),
        }
    }

    fn is_indexable(&self, path: &Path) -> bool {
        naming::is_localization_file(path) && walker::is_visible(&self.root, path, &self.config)
    }
}
