/// Durable status log
///
/// Two persistence strategies share the [`StatusStore`] interface:
/// - [`SnapshotStore`] rewrites the whole table after every tick
/// - [`AppendLog`] only ever appends rows (legacy log format)
///
/// A run picks one strategy up front; the format is never guessed from the file.
pub mod append;
pub mod snapshot;
pub mod table;

pub use append::AppendLog;
pub use snapshot::SnapshotStore;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Persistence;
use crate::monitoring::{EndpointSpec, Stamp, StatusMap};
use crate::reconcile::Transition;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read status log {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write status log {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything a store may need to persist one tick
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub states: &'a StatusMap,
    /// Configured endpoints, in display order
    pub order: &'a [EndpointSpec],
    pub transitions: &'a [Transition],
    /// Write every endpoint, not just the transitions
    pub full: bool,
    pub written_at: Stamp,
}

pub trait StatusStore: Send + Sync {
    /// Reconstruct endpoint states; a missing file is an empty map.
    fn load(&self) -> Result<StatusMap, StoreError>;

    fn persist(&self, snapshot: &Snapshot<'_>) -> Result<(), StoreError>;

    fn path(&self) -> &Path;
}

impl<S: StatusStore + ?Sized> StatusStore for Box<S> {
    fn load(&self) -> Result<StatusMap, StoreError> {
        (**self).load()
    }

    fn persist(&self, snapshot: &Snapshot<'_>) -> Result<(), StoreError> {
        (**self).persist(snapshot)
    }

    fn path(&self) -> &Path {
        (**self).path()
    }
}

/// Open the store for the configured strategy
pub fn open(persistence: Persistence, path: impl Into<PathBuf>) -> Box<dyn StatusStore> {
    match persistence {
        Persistence::Snapshot => Box::new(SnapshotStore::new(path)),
        Persistence::Append => Box::new(AppendLog::new(path)),
    }
}

fn read_table(path: &Path) -> Result<StatusMap, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(table::fold_rows(&contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StatusMap::new()),
        Err(source) => Err(StoreError::Read { path: path.to_path_buf(), source }),
    }
}
