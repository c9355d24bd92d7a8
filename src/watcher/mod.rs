pub mod event;
pub mod incremental;
pub mod translate;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, info, warn};

use crate::config::WorkspaceConfig;
use crate::error::WatchError;
use crate::walker;

use event::FileWatchEvent;
use translate::{RawEvent, RawKind};

/// Messages consumed by the processing loop, in arrival order.
enum LoopMessage {
    Notification(notify::Result<notify::Event>),
    Stop,
}

/// State of a started watcher. Dropping the `notify` watcher releases the
/// OS subscription.
struct Running {
    watcher: Arc<Mutex<RecommendedWatcher>>,
    watched: Arc<Mutex<HashSet<PathBuf>>>,
    control: std_mpsc::Sender<LoopMessage>,
    thread: JoinHandle<()>,
}

/// Watches a workspace tree and reports localization-file changes as
/// [`FileWatchEvent`]s on a channel.
///
/// Lifecycle is `Idle -> Running -> Idle` and may repeat. `start` on a running
/// watcher and `stop` on an idle one are no-ops. Every directory under the
/// root (hidden and excluded ones aside) is registered individually;
/// directories created later are registered as their creation is observed.
///
/// The watcher keeps no group index. Fold its events into a
/// [`WorkspaceIndex`](crate::index::WorkspaceIndex) with
/// [`incremental::apply_event`].
pub struct WorkspaceWatcher {
    root: PathBuf,
    config: WorkspaceConfig,
    events: tokio_mpsc::UnboundedSender<FileWatchEvent>,
    /// Serializes `start` and `stop` end to end.
    lifecycle: Mutex<()>,
    /// Only held to read or swap the running state.
    state: Mutex<Option<Running>>,
}

impl WorkspaceWatcher {
    /// Create an idle watcher for `root`. Events are delivered on the returned
    /// receiver, which stays valid across stop/start cycles.
    pub fn new(
        root: impl Into<PathBuf>,
        config: WorkspaceConfig,
    ) -> (Self, tokio_mpsc::UnboundedReceiver<FileWatchEvent>) {
        let (tx, rx) = tokio_mpsc::unbounded_channel();
        let watcher = Self {
            root: root.into(),
            config,
            events: tx,
            lifecycle: Mutex::new(()),
            state: Mutex::new(None),
        };
        (watcher, rx)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).is_some()
    }

    /// Directories currently registered with the notification subsystem,
    /// sorted. Empty while idle.
    pub fn watched_directories(&self) -> Vec<PathBuf> {
        let state = lock(&self.state);
        let mut dirs: Vec<PathBuf> = match state.as_ref() {
            Some(running) => lock(&running.watched).iter().cloned().collect(),
            None => Vec::new(),
        };
        dirs.sort();
        dirs
    }

    /// Register the root and every visible directory below it, then start the
    /// processing loop.
    ///
    /// Fails only if the root cannot be read or a directory cannot be
    /// registered; in that case the watcher stays idle.
    pub fn start(&self) -> Result<(), WatchError> {
        let _lifecycle = lock(&self.lifecycle);
        if lock(&self.state).is_some() {
            return Ok(());
        }

        std::fs::metadata(&self.root).map_err(|source| WatchError::RootUnavailable {
            path: self.root.clone(),
            source,
        })?;
        let dirs = walker::collect_directories(&self.root, &self.config).map_err(|source| {
            WatchError::Traversal {
                root: self.root.clone(),
                source,
            }
        })?;

        let (control_tx, control_rx) = std_mpsc::channel::<LoopMessage>();
        let notify_tx = control_tx.clone();
        let mut watcher = notify::recommended_watcher(move |res| {
            // Fails only once the loop has exited; nothing left to deliver to.
            let _ = notify_tx.send(LoopMessage::Notification(res));
        })
        .map_err(WatchError::Subscribe)?;

        let mut watched = HashSet::with_capacity(dirs.len());
        for dir in dirs {
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .map_err(|source| WatchError::Registration {
                    path: dir.clone(),
                    source,
                })?;
            watched.insert(dir);
        }
        let directory_count = watched.len();

        let watcher = Arc::new(Mutex::new(watcher));
        let watched = Arc::new(Mutex::new(watched));
        let event_loop = EventLoop {
            root: self.root.clone(),
            config: self.config.clone(),
            watcher: Arc::clone(&watcher),
            watched: Arc::clone(&watched),
            events: self.events.clone(),
            control: control_rx,
        };
        let thread = std::thread::Builder::new()
            .name("xliff-ws-watcher".to_string())
            .spawn(move || event_loop.run())
            .map_err(WatchError::Spawn)?;

        *lock(&self.state) = Some(Running {
            watcher,
            watched,
            control: control_tx,
            thread,
        });

        info!(
            root = %self.root.display(),
            directories = directory_count,
            "watcher started"
        );
        Ok(())
    }

    /// Signal the processing loop to exit, wait for it, then release the
    /// subscription. No event is sent after this returns.
    ///
    /// The watcher reads as idle as soon as `stop` begins; queries do not wait
    /// for the loop to drain.
    pub fn stop(&self) {
        let _lifecycle = lock(&self.lifecycle);
        let Some(running) = lock(&self.state).take() else {
            return;
        };

        // The loop may already be gone if the receiver was dropped.
        let _ = running.control.send(LoopMessage::Stop);
        if running.thread.join().is_err() {
            warn!("watcher thread panicked");
        }
        drop(running.watcher);

        info!(root = %self.root.display(), "watcher stopped");
    }
}

impl Drop for WorkspaceWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for WorkspaceWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceWatcher")
            .field("root", &self.root)
            .field("running", &self.is_running())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Processing loop
// ---------------------------------------------------------------------------

struct EventLoop {
    root: PathBuf,
    config: WorkspaceConfig,
    watcher: Arc<Mutex<RecommendedWatcher>>,
    watched: Arc<Mutex<HashSet<PathBuf>>>,
    events: tokio_mpsc::UnboundedSender<FileWatchEvent>,
    control: std_mpsc::Receiver<LoopMessage>,
}

impl EventLoop {
    fn run(self) {
        debug!("watcher loop running");

        while let Ok(message) = self.control.recv() {
            match message {
                LoopMessage::Stop => break,
                LoopMessage::Notification(Err(err)) => {
                    warn!(error = %err, "notification error, still watching");
                }
                LoopMessage::Notification(Ok(event)) => {
                    for raw in translate::flatten(event) {
                        if !self.handle(raw) {
                            debug!("event receiver dropped, watcher loop exiting");
                            return;
                        }
                    }
                }
            }
        }

        debug!("watcher loop exited");
    }

    /// Process one raw notification. Returns `false` once the receiver is gone.
    fn handle(&self, raw: RawEvent) -> bool {
        if let Some(dir) = translate::discovered_directory(&raw, &self.root, &self.config) {
            self.register_tree(dir);
        } else if matches!(raw.kind, RawKind::Remove | RawKind::Rename) && !raw.path.exists() {
            self.forget_tree(&raw.path);
        }

        match translate::translate(&raw) {
            Some(event) => self.events.send(event).is_ok(),
            None => true,
        }
    }

    /// Register a newly discovered directory and any directories already
    /// created inside it.
    fn register_tree(&self, dir: &Path) {
        let dirs = match walker::collect_directories(dir, &self.config) {
            Ok(dirs) => dirs,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "failed to enumerate new directory");
                vec![dir.to_path_buf()]
            }
        };

        for dir in dirs {
            if !walker::is_visible(&self.root, &dir, &self.config) {
                continue;
            }
            if lock(&self.watched).contains(&dir) {
                continue;
            }
            let registered = lock(&self.watcher).watch(&dir, RecursiveMode::NonRecursive);
            match registered {
                Ok(()) => {
                    debug!(path = %dir.display(), "registered new directory");
                    lock(&self.watched).insert(dir);
                }
                Err(err) => {
                    warn!(path = %dir.display(), error = %err, "failed to register new directory");
                }
            }
        }
    }

    /// Drop a vanished directory (and everything below it) from the watch set.
    fn forget_tree(&self, path: &Path) {
        let gone: Vec<PathBuf> = {
            let mut watched = lock(&self.watched);
            let gone: Vec<PathBuf> = watched
                .iter()
                .filter(|d| d.starts_with(path))
                .cloned()
                .collect();
            for dir in &gone {
                watched.remove(dir);
            }
            gone
        };

        for dir in gone {
            // The OS usually drops the watch together with the directory.
            if let Err(err) = lock(&self.watcher).unwatch(&dir) {
                debug!(path = %dir.display(), error = %err, "unwatch of removed directory");
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
