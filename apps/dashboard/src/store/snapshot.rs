use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::table::{HEADER, SEPARATOR, format_row};
use super::{Snapshot, StatusStore, StoreError, read_table};
use crate::monitoring::StatusMap;

/// Keeps exactly one row per configured endpoint, rewritten on every persist.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn render(snapshot: &Snapshot<'_>) -> String {
        let mut table = format!("{HEADER}\n{SEPARATOR}\n");
        for endpoint in snapshot.order {
            let state = snapshot.states.get(&endpoint.name).copied().unwrap_or_default();
            table.push_str(&format_row(snapshot.written_at, &endpoint.name, &state));
            table.push('\n');
        }
        table
    }

    /// Sibling file the table is staged in before it replaces the real one
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_err(&self, source: io::Error) -> StoreError {
        StoreError::Write { path: self.path.clone(), source }
    }
}

impl StatusStore for SnapshotStore {
    fn load(&self) -> Result<StatusMap, StoreError> {
        read_table(&self.path)
    }

    fn persist(&self, snapshot: &Snapshot<'_>) -> Result<(), StoreError> {
        let staging = self.staging_path();
        fs::write(&staging, Self::render(snapshot)).map_err(|e| self.write_err(e))?;

        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(self.write_err(e));
        }
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
