use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Local wall-clock format used in the status table and on screen.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How an endpoint is probed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProbeKind {
    /// Connect to `target:port` and close again
    Tcp { port: u16 },
    /// Fetch `target` and require `unavailable_marker` to be absent from the body
    Content { unavailable_marker: String },
}

/// A monitored endpoint. `name` is the key everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub name: String,
    pub target: String,
    pub probe: ProbeKind,
}

impl EndpointSpec {
    pub fn tcp(name: impl Into<String>, target: impl Into<String>, port: u16) -> Self {
        Self { name: name.into(), target: target.into(), probe: ProbeKind::Tcp { port } }
    }

    #[cfg(test)]
    pub fn content(
        name: impl Into<String>,
        url: impl Into<String>,
        unavailable_marker: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: url.into(),
            probe: ProbeKind::Content { unavailable_marker: unavailable_marker.into() },
        }
    }

    /// Human readable address, `host:port` for TCP and the URL for content checks
    pub fn address(&self) -> String {
        match &self.probe {
            ProbeKind::Tcp { port } => format!("{}:{}", self.target, port),
            ProbeKind::Content { .. } => self.target.clone(),
        }
    }
}

/// Durable reachability status of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    Online,
    #[default]
    Offline,
}

impl Status {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable { Status::Online } else { Status::Offline }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Online => "Online",
            Status::Offline => "Offline",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status {0:?}")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Online" => Ok(Status::Online),
            "Offline" => Ok(Status::Offline),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Local time truncated to whole seconds, so it survives a trip through the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(NaiveDateTime);

impl Stamp {
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub fn from_naive(time: NaiveDateTime) -> Self {
        Self(time.with_nanosecond(0).unwrap_or(time))
    }

    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok().map(Self)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// When an endpoint was last observed reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastSeen {
    #[default]
    Never,
    At(Stamp),
}

impl LastSeen {
    const NEVER: &'static str = "N/A";

    /// Record a sighting at `now` without ever moving backwards.
    pub fn advance_to(self, now: Stamp) -> Self {
        match self {
            LastSeen::At(prev) if prev > now => LastSeen::At(prev),
            _ => LastSeen::At(now),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == Self::NEVER {
            return Some(LastSeen::Never);
        }
        Stamp::parse(s).map(LastSeen::At)
    }
}

impl fmt::Display for LastSeen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastSeen::Never => f.write_str(Self::NEVER),
            LastSeen::At(stamp) => write!(f, "{stamp}"),
        }
    }
}

/// Last known status of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndpointState {
    pub status: Status,
    pub last_seen: LastSeen,
}

/// Endpoint states keyed by endpoint name
pub type StatusMap = HashMap<String, EndpointState>;

/// Outcome of probing one endpoint during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub endpoint_name: String,
    pub reachable: bool,
    pub observed_at: Stamp,
}
