//! Endpoint health state machine.
//!
//! A missing prior record is the "unknown" state: the first observation of an
//! endpoint sets its baseline without counting as a transition, so a restart
//! against an empty log stays quiet. Any later flip between Online and Offline
//! is reported once, on the tick where it happens.

use std::fmt;

use crate::monitoring::{EndpointState, LastSeen, ProbeResult, Stamp, Status, StatusMap};

/// New state of one endpoint after a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub state: EndpointState,
    pub transitioned: bool,
}

/// A status flip worth telling someone about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub name: String,
    pub status: Status,
}

impl Transition {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is now {}", self.name, self.status)
    }
}

/// Result of reconciling a whole tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub states: StatusMap,
    pub transitions: Vec<Transition>,
}

/// Fold one probe verdict into the prior record.
///
/// `last_seen` is re-stamped on every reachable probe and never moves backwards.
pub fn reconcile(prior: Option<&EndpointState>, reachable: bool, now: Stamp) -> Reconciled {
    let status = Status::from_reachable(reachable);
    let prior_seen = prior.map_or(LastSeen::Never, |p| p.last_seen);
    let last_seen = if reachable { prior_seen.advance_to(now) } else { prior_seen };
    let transitioned = prior.is_some_and(|p| p.status != status);

    Reconciled { state: EndpointState { status, last_seen }, transitioned }
}

/// Reconcile every result of a tick against `prior`, leaving `prior` untouched.
///
/// Endpoints without a result keep their previous record.
pub fn apply_tick(prior: &StatusMap, results: &[ProbeResult]) -> TickOutcome {
    let mut states = prior.clone();
    let mut transitions = Vec::new();

    for result in results {
        let reconciled = reconcile(prior.get(&result.endpoint_name), result.reachable, result.observed_at);
        if reconciled.transitioned {
            transitions.push(Transition {
                name: result.endpoint_name.clone(),
                status: reconciled.state.status,
            });
        }
        states.insert(result.endpoint_name.clone(), reconciled.state);
    }

    TickOutcome { states, transitions }
}
