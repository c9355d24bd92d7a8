use tracing::debug;

use crate::index::WorkspaceIndex;

use super::event::FileWatchEvent;

/// Fold a single watch event into `index`.
///
/// For Created/Modified: re-parses the file name and upserts the entry (a
/// modify for a file the index has not seen yet inserts it).
///
/// For Deleted: removes the entry and drops the group if it became empty.
///
/// For Renamed: the event does not say which side of the rename `path` is on,
/// so the filesystem decides: an existing path is upserted, a missing one is
/// removed. A distinct `old_path` is always removed.
///
/// Returns `true` if the index changed.
pub fn apply_event(index: &mut WorkspaceIndex, event: &FileWatchEvent) -> bool {
    let changed = match event {
        FileWatchEvent::Created { path } | FileWatchEvent::Modified { path } => {
            index.upsert_file(path).is_some()
        }
        FileWatchEvent::Deleted { path } => index.remove_file(path).is_some(),
        FileWatchEvent::Renamed { path, old_path } => {
            let mut changed = false;
            if old_path != path {
                changed |= index.remove_file(old_path).is_some();
            }
            if path.exists() {
                changed |= index.upsert_file(path).is_some();
            } else {
                changed |= index.remove_file(path).is_some();
            }
            changed
        }
    };

    debug!(
        kind = event.kind_label(),
        path = %event.path().display(),
        changed,
        "applied watch event"
    );

    changed
}
