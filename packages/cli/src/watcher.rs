use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to create watcher: {0}")]
    CreateError(#[from] notify::Error),

    #[error("Cannot watch {path}: {source}")]
    PathError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type WatcherResult<T> = Result<T, WatcherError>;

/// Watches a single file. The parent directory is watched so editors that
/// save by replacing the file are still seen.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: UnboundedReceiver<notify::Result<Event>>,
    file_name: OsString,
}

impl FileWatcher {
    pub fn new(path: &Path) -> WatcherResult<Self> {
        let path = path.canonicalize().map_err(|source| WatcherError::PathError {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path.file_name().map(OsString::from).unwrap_or_default();
        let directory = path.parent().unwrap_or(path.as_path()).to_path_buf();

        let (tx, rx) = unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            file_name,
        })
    }

    /// Wait for the next create or modify event on the watched file.
    /// `None` once the watcher shuts down.
    pub async fn next_change(&mut self) -> Option<Event> {
        while let Some(res) = self.receiver.recv().await {
            match res {
                Ok(event) if self.is_relevant(&event) => return Some(event),
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "file watch error"),
            }
        }
        None
    }

    fn is_relevant(&self, event: &Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event
                .paths
                .iter()
                .any(|path| path.file_name() == Some(self.file_name.as_os_str()))
    }
}
