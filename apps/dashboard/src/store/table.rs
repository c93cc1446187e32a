//! Markdown-style status table rows.
//!
//! `| <observed at> | <name> | Online|Offline | <last seen or N/A> |`

use tracing::debug;

use crate::monitoring::{EndpointState, LastSeen, Stamp, StatusMap};

pub const HEADER: &str = "| Time | Service | Status | Last Seen |";
pub const SEPARATOR: &str = "| ---- | ------- | ------ | --------- |";

/// One data row of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub state: EndpointState,
}

pub fn format_row(observed_at: Stamp, name: &str, state: &EndpointState) -> String {
    format!("| {} | {} | {} | {} |", observed_at, name, state.status, state.last_seen)
}

/// Parse a data row. Header, separator and anything malformed yield `None`.
pub fn parse_row(line: &str) -> Option<Row> {
    let inner = line.trim().strip_prefix('|')?.strip_suffix('|')?;
    let fields: Vec<&str> = inner.split('|').map(str::trim).collect();
    // The observed-at column is informational and never read back
    let [_, name, status, last_seen] = fields.as_slice() else {
        return None;
    };
    if name.is_empty() {
        return None;
    }

    Some(Row {
        name: name.to_string(),
        state: EndpointState { status: status.parse().ok()?, last_seen: LastSeen::parse(last_seen)? },
    })
}

/// Rebuild endpoint states from a whole table.
///
/// Later rows win, except that an `N/A` last-seen never erases a real
/// timestamp recorded by an earlier row.
pub fn fold_rows(contents: &str) -> StatusMap {
    let mut states = StatusMap::new();

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(row) = parse_row(line) else {
            debug!(line = index + 1, "skipping non-data row in status table");
            continue;
        };

        let last_seen = match (row.state.last_seen, states.get(&row.name)) {
            (LastSeen::Never, Some(previous)) => previous.last_seen,
            (seen, _) => seen,
        };
        states.insert(row.name, EndpointState { status: row.state.status, last_seen });
    }

    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::Status;

    #[test]
    fn parses_data_row_with_padding() {
        let row = parse_row("|  2025-06-01 10:00:00 | Kezan (PvE) |  Online | 2025-06-01 10:00:00  |").unwrap();

        assert_eq!(row.name, "Kezan (PvE)");
        assert_eq!(row.state.status, Status::Online);
        assert_eq!(row.state.last_seen.to_string(), "2025-06-01 10:00:00");
    }

    #[test]
    fn rejects_header_separator_and_short_rows() {
        assert!(parse_row(HEADER).is_none());
        assert!(parse_row(SEPARATOR).is_none());
        assert!(parse_row("| 2025-06-01 10:00:00 | Auth | Online |").is_none());
        assert!(parse_row("| 2025-06-01 10:00:00 | Auth | Online | N/A | extra |").is_none());
        assert!(parse_row("| 2025-06-01 10:00:00 | Auth | Sleeping | N/A |").is_none());
        assert!(parse_row("| 2025-06-01 10:00:00 | Auth | Online | soon |").is_none());
        assert!(parse_row("2025-06-01 10:00:00 | Auth | Online | N/A").is_none());
    }

    #[test]
    fn malformed_row_does_not_stop_the_fold() {
        let table = [
            HEADER,
            SEPARATOR,
            "| 2025-06-01 10:00:00 | Website | Online | 2025-06-01 10:00:00 |",
            "| 2025-06-01 10:00:00 | Auth Server | Online |",
            "| 2025-06-01 10:00:00 | Cloudflare | Offline | N/A |",
        ]
        .join("\n");

        let states = fold_rows(&table);

        assert_eq!(states.len(), 2);
        assert!(states.contains_key("Website"));
        assert!(states.contains_key("Cloudflare"));
        assert!(!states.contains_key("Auth Server"));
    }

    #[test]
    fn later_rows_win_but_keep_real_last_seen() {
        let table = [
            "| 2025-06-01 10:00:00 | Auth | Online | 2025-06-01 10:00:00 |",
            "| 2025-06-01 10:05:00 | Auth | Offline | N/A |",
        ]
        .join("\n");

        let states = fold_rows(&table);

        assert_eq!(states["Auth"].status, Status::Offline);
        assert_eq!(states["Auth"].last_seen.to_string(), "2025-06-01 10:00:00");
    }

    #[test]
    fn format_and_parse_agree() {
        let state = EndpointState { status: Status::Offline, last_seen: LastSeen::Never };
        let stamp = Stamp::parse("2025-06-01 10:00:00").unwrap();

        let line = format_row(stamp, "Gurubashi (PvP)", &state);

        assert_eq!(line, "| 2025-06-01 10:00:00 | Gurubashi (PvP) | Offline | N/A |");
        assert_eq!(parse_row(&line).map(|r| r.state), Some(state));
    }
}
