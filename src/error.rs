use std::path::PathBuf;

use thiserror::Error;

/// Failure of a full workspace scan. A failed scan never yields partial results.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("workspace root {path} is not accessible: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("workspace root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to traverse {root}: {source}")]
    Traversal {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },
}

/// Failure to start a workspace watcher.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watch root {path} is not accessible: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to enumerate directories under {root}: {source}")]
    Traversal {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },
    #[error("failed to register {path} with the notification subsystem: {source}")]
    Registration {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
    #[error("failed to create the notification subscription: {0}")]
    Subscribe(#[source] notify::Error),
    #[error("failed to spawn the watcher thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Failure of a file operation on a translation group.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{context} {path}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("translation group {0} has no source file to copy from")]
    NoSourceFile(String),
    #[error("invalid language code {0:?}: expected two lowercase letters")]
    InvalidLanguage(String),
}
