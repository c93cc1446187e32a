/// Probing module - turns endpoints into reachability verdicts
///
/// This module is responsible for:
/// - TCP connect checks and HTTP content checks, each under a hard deadline
/// - Running one probe per endpoint concurrently each tick
/// - The endpoint and status types shared by the rest of the dashboard
pub mod checker;
pub mod executor;
pub mod types;

pub use executor::{ProbeExecutor, Prober, probe_all};
pub use types::{EndpointSpec, EndpointState, LastSeen, ProbeKind, ProbeResult, Stamp, Status, StatusMap};
