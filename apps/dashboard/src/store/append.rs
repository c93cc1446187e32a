use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::table::{HEADER, SEPARATOR, format_row};
use super::{Snapshot, StatusStore, StoreError, read_table};
use crate::monitoring::StatusMap;

/// Legacy append-only log.
///
/// Full snapshots append one row per endpoint; otherwise only endpoints that
/// transitioned get a row. The header is written once, when the file is new.
pub struct AppendLog {
    path: PathBuf,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn rows(snapshot: &Snapshot<'_>) -> Vec<String> {
        let names: Vec<&str> = if snapshot.full {
            snapshot.order.iter().map(|e| e.name.as_str()).collect()
        } else {
            snapshot.transitions.iter().map(|t| t.name.as_str()).collect()
        };

        names
            .into_iter()
            .map(|name| {
                let state = snapshot.states.get(name).copied().unwrap_or_default();
                format_row(snapshot.written_at, name, &state)
            })
            .collect()
    }

    fn append(&self, rows: &[String]) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut out = String::new();
        if file.metadata()?.len() == 0 {
            out.push_str(HEADER);
            out.push('\n');
            out.push_str(SEPARATOR);
            out.push('\n');
        }
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        file.write_all(out.as_bytes())?;
        file.flush()
    }
}

impl StatusStore for AppendLog {
    fn load(&self) -> Result<StatusMap, StoreError> {
        read_table(&self.path)
    }

    fn persist(&self, snapshot: &Snapshot<'_>) -> Result<(), StoreError> {
        let rows = Self::rows(snapshot);
        if rows.is_empty() {
            return Ok(());
        }
        self.append(&rows)
            .map_err(|source| StoreError::Write { path: self.path.clone(), source })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::{EndpointSpec, EndpointState, LastSeen, Stamp, Status};
    use crate::reconcile::Transition;
    use std::fs;

    fn endpoints() -> Vec<EndpointSpec> {
        vec![EndpointSpec::tcp("Auth", "10.0.0.1", 3724), EndpointSpec::tcp("Kezan", "10.0.0.1", 8085)]
    }

    fn stamp(s: &str) -> Stamp {
        Stamp::parse(s).unwrap()
    }

    #[test]
    fn header_written_once_and_rows_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.md");
        let log = AppendLog::new(&path);
        let order = endpoints();
        let states = StatusMap::new();

        for written_at in ["2025-06-01 10:00:00", "2025-06-01 10:00:10"] {
            let snapshot = Snapshot {
                states: &states,
                order: &order,
                transitions: &[],
                full: true,
                written_at: stamp(written_at),
            };
            log.persist(&snapshot).unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches(HEADER).count(), 1);
        assert_eq!(contents.lines().count(), 2 + 2 * order.len());
    }

    #[test]
    fn partial_snapshot_appends_only_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.md");
        let log = AppendLog::new(&path);
        let order = endpoints();
        let seen = stamp("2025-06-01 10:00:00");
        let states = StatusMap::from([
            ("Auth".to_string(), EndpointState { status: Status::Offline, last_seen: LastSeen::At(seen) }),
            ("Kezan".to_string(), EndpointState { status: Status::Online, last_seen: LastSeen::At(seen) }),
        ]);
        let transitions = [Transition { name: "Auth".into(), status: Status::Offline }];

        let quiet = Snapshot { states: &states, order: &order, transitions: &[], full: false, written_at: seen };
        log.persist(&quiet).unwrap();
        assert!(!path.exists());

        let flipped = Snapshot { transitions: &transitions, ..quiet };
        log.persist(&flipped).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let data: Vec<&str> = contents.lines().skip(2).collect();
        assert_eq!(data, ["| 2025-06-01 10:00:00 | Auth | Offline | 2025-06-01 10:00:00 |"]);
    }

    #[test]
    fn load_takes_latest_row_per_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.md");
        fs::write(
            &path,
            [
                HEADER,
                SEPARATOR,
                "| 2025-06-01 10:00:00 | Auth | Online | 2025-06-01 10:00:00 |",
                "| 2025-06-01 10:00:00 | Kezan | Offline | N/A |",
                "| 2025-06-01 10:20:00 | Auth | Offline | 2025-06-01 10:10:00 |",
            ]
            .join("\n"),
        )
        .unwrap();

        let states = AppendLog::new(&path).load().unwrap();

        assert_eq!(
            states["Auth"],
            EndpointState { status: Status::Offline, last_seen: LastSeen::At(stamp("2025-06-01 10:10:00")) }
        );
        assert_eq!(states["Kezan"], EndpointState::default());
    }
}
