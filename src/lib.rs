//! Discovery, grouping and live watching of XLIFF localization files.
//!
//! A workspace is scanned once into [`WorkspaceScan`], which callers may keep
//! current by folding [`FileWatchEvent`]s from a [`WorkspaceWatcher`] into a
//! [`WorkspaceIndex`].

pub mod config;
pub mod error;
pub mod files;
pub mod index;
pub mod model;
pub mod naming;
pub mod scanner;
pub mod walker;
pub mod watcher;

pub use config::WorkspaceConfig;
pub use error::{FileError, ScanError, WatchError};
pub use index::WorkspaceIndex;
pub use model::{FileIdentity, GroupKey, TranslationGroup, WorkspaceScan};
pub use scanner::{scan, scan_with_config};
pub use watcher::WorkspaceWatcher;
pub use watcher::event::FileWatchEvent;
pub use watcher::incremental::apply_event;
