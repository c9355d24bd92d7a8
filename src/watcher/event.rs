use std::path::{Path, PathBuf};

use serde::Serialize;

/// Domain event reported by the workspace watcher.
///
/// Serializes as `{"type": "create" | "modify" | "delete" | "rename", "path", "oldPath"?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FileWatchEvent {
    /// A localization file appeared.
    #[serde(rename = "create")]
    Created { path: PathBuf },
    /// A localization file's content was written.
    #[serde(rename = "modify")]
    Modified { path: PathBuf },
    /// A localization file was removed.
    #[serde(rename = "delete")]
    Deleted { path: PathBuf },
    /// Something at `path` left or arrived by rename.
    ///
    /// The notification primitive reports renames one path at a time, so
    /// `old_path` is equal to `path`; reconcile with an existence check.
    #[serde(rename = "rename")]
    Renamed {
        path: PathBuf,
        #[serde(rename = "oldPath")]
        old_path: PathBuf,
    },
}

impl FileWatchEvent {
    /// The affected path.
    pub fn path(&self) -> &Path {
        match self {
            Self::Created { path }
            | Self::Modified { path }
            | Self::Deleted { path }
            | Self::Renamed { path, .. } => path,
        }
    }

    /// Short lowercase label used in text output.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "create",
            Self::Modified { .. } => "modify",
            Self::Deleted { .. } => "delete",
            Self::Renamed { .. } => "rename",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let created = FileWatchEvent::Created {
            path: PathBuf::from("/ws/en.msg.xlf"),
        };
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["type"], "create");
        assert_eq!(json["path"], "/ws/en.msg.xlf");
        assert!(json.get("oldPath").is_none());

        let renamed = FileWatchEvent::Renamed {
            path: PathBuf::from("/ws/en.msg.xlf"),
            old_path: PathBuf::from("/ws/en.msg.xlf"),
        };
        let json = serde_json::to_value(&renamed).unwrap();
        assert_eq!(json["type"], "rename");
        assert_eq!(json["oldPath"], "/ws/en.msg.xlf");
    }
}
