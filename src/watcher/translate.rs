//! Translation of raw filesystem notifications into [`FileWatchEvent`]s.
//!
//! `notify` events can carry several paths; they are first flattened into
//! single-path [`RawEvent`]s, then each one is translated on its own.

use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};

use crate::config::WorkspaceConfig;
use crate::naming;
use crate::walker;

use super::event::FileWatchEvent;

/// Operation reported by the notification primitive for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Create,
    Write,
    Remove,
    Rename,
    /// Access, metadata-only and unclassified notifications.
    Other,
}

/// A single-path raw notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: RawKind,
    pub path: PathBuf,
}

impl RawEvent {
    pub fn new(kind: RawKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Map a `notify` event kind onto [`RawKind`].
///
/// Returns `None` for rename notifications of mode `Both`: the `From` and
/// `To` halves are reported separately as well, so handling `Both` would
/// report every path twice.
pub fn raw_kind(kind: &EventKind) -> Option<RawKind> {
    let raw = match kind {
        EventKind::Create(_) => RawKind::Create,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => return None,
        EventKind::Modify(ModifyKind::Name(_)) => RawKind::Rename,
        EventKind::Modify(ModifyKind::Metadata(_)) => RawKind::Other,
        EventKind::Modify(_) => RawKind::Write,
        EventKind::Remove(_) => RawKind::Remove,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => RawKind::Other,
    };
    Some(raw)
}

/// Split a `notify` event into one [`RawEvent`] per path.
pub fn flatten(event: notify::Event) -> Vec<RawEvent> {
    match raw_kind(&event.kind) {
        Some(kind) => event
            .paths
            .into_iter()
            .map(|path| RawEvent::new(kind, path))
            .collect(),
        None => Vec::new(),
    }
}

/// Translate one raw notification into a domain event.
///
/// Paths that are not localization files produce nothing, and neither do
/// access or metadata-only notifications.
pub fn translate(raw: &RawEvent) -> Option<FileWatchEvent> {
    if !naming::is_localization_file(&raw.path) {
        return None;
    }

    let path = raw.path.clone();
    match raw.kind {
        RawKind::Create => Some(FileWatchEvent::Created { path }),
        RawKind::Write => Some(FileWatchEvent::Modified { path }),
        RawKind::Remove => Some(FileWatchEvent::Deleted { path }),
        RawKind::Rename => Some(FileWatchEvent::Renamed {
            old_path: path.clone(),
            path,
        }),
        RawKind::Other => None,
    }
}

/// Directory-discovery step: returns the path of a directory that appeared
/// (created, or moved in by rename) and must be added to the watch set.
///
/// Hidden and excluded directories are never returned, matching what the
/// initial registration walk skips.
pub fn discovered_directory<'a>(
    raw: &'a RawEvent,
    root: &Path,
    config: &WorkspaceConfig,
) -> Option<&'a Path> {
    if !matches!(raw.kind, RawKind::Create | RawKind::Rename) || !raw.path.is_dir() {
        return None;
    }

    let hidden = raw
        .path
        .file_name()
        .map(walker::is_hidden_name)
        .unwrap_or(false);
    if hidden || !walker::is_visible(root, &raw.path, config) {
        return None;
    }

    Some(&raw.path)
}
