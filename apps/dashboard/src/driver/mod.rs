/// Driver module - runs the probe / reconcile / persist cycle
///
/// One tick probes every endpoint, reconciles all results against a single
/// timestamp, notifies on transitions and persists before anything is shown.
/// The in-memory state map is owned here and only ever replaced wholesale by
/// the reconciler's output.


use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use crate::monitoring::{EndpointSpec, Prober, Stamp, Status, StatusMap, probe_all};
use crate::notify::Notifier;
use crate::reconcile::{Transition, apply_tick};
use crate::store::{Snapshot, StatusStore};
use crate::tui::{Action, DashboardFrame, EndpointRow, Presenter};

pub const STARTUP_MESSAGE: &str = "Dashboard has started";

/// What one tick observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub observed_at: Stamp,
    pub rows: Vec<EndpointRow>,
    pub transitions: Vec<Transition>,
}

pub struct Driver<P, S, N> {
    endpoints: Vec<EndpointSpec>,
    prober: P,
    store: S,
    notifier: N,
    interval: Duration,
    states: StatusMap,
}

impl<P, S, N> Driver<P, S, N>
where
    P: Prober,
    S: StatusStore,
    N: Notifier,
{
    pub fn new(endpoints: Vec<EndpointSpec>, prober: P, store: S, notifier: N, interval: Duration) -> Self {
        Self { endpoints, prober, store, notifier, interval, states: StatusMap::new() }
    }

    #[cfg(test)]
    pub fn states(&self) -> &StatusMap {
        &self.states
    }

    /// Replace in-memory state with whatever the status log holds
    pub fn load(&mut self) -> Result<()> {
        self.states = self
            .store
            .load()
            .with_context(|| format!("Failed to load status log {}", self.store.path().display()))?;
        info!(
            path = %self.store.path().display(),
            known = self.states.len(),
            "loaded status log"
        );
        Ok(())
    }

    /// Probe, reconcile, notify and persist once.
    ///
    /// `full` asks the store to record every endpoint rather than only transitions.
    pub async fn tick(&mut self, full: bool) -> Result<TickReport> {
        let results = probe_all(&self.prober, &self.endpoints).await;
        let observed_at = results.first().map_or_else(Stamp::now, |r| r.observed_at);

        let outcome = apply_tick(&self.states, &results);
        self.states = outcome.states;

        for transition in &outcome.transitions {
            match transition.status {
                Status::Offline => warn!(endpoint = %transition.name, "endpoint went offline"),
                Status::Online => info!(endpoint = %transition.name, "endpoint came back online"),
            }
            self.notifier.notify(&transition.message());
        }

        self.persist(&outcome.transitions, full, observed_at)?;

        debug!(
            endpoints = results.len(),
            online = results.iter().filter(|r| r.reachable).count(),
            "tick complete"
        );

        Ok(TickReport { observed_at, rows: self.rows(), transitions: outcome.transitions })
    }

    /// Single pass: load, tick with a full record, done
    pub async fn run_once(mut self) -> Result<TickReport> {
        self.load()?;
        self.tick(true).await
    }

    /// Tick on the configured interval until the presenter asks to quit.
    ///
    /// The countdown between ticks advances once per second and checks for
    /// input on every step. Quitting persists the current state first.
    pub async fn run_continuous<R: Presenter>(mut self, presenter: &mut R) -> Result<()> {
        self.load()?;
        self.notifier.notify(STARTUP_MESSAGE);
        info!(
            endpoints = self.endpoints.len(),
            interval_secs = self.interval.as_secs(),
            "dashboard started"
        );

        let countdown_from = self.interval.as_secs().max(1);
        let mut first = true;

        loop {
            let report = self.tick(first).await?;
            first = false;

            let mut frame = DashboardFrame {
                updated_at: report.observed_at,
                rows: report.rows,
                countdown: countdown_from,
            };

            let second = Duration::from_secs(1);
            let mut ticker = interval_at(Instant::now() + second, second);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for remaining in (1..=countdown_from).rev() {
                frame.countdown = remaining;
                presenter.render(&frame)?;

                ticker.tick().await;
                match presenter.poll_action()? {
                    Some(Action::Quit) => return self.shutdown(),
                    Some(Action::RefreshNow) => break,
                    None => {}
                }
            }
        }
    }

    /// Record every endpoint so an append-only log also keeps re-stamped `last_seen`
    fn shutdown(&self) -> Result<()> {
        self.persist(&[], true, Stamp::now())?;
        info!("dashboard stopped");
        Ok(())
    }

    fn persist(&self, transitions: &[Transition], full: bool, written_at: Stamp) -> Result<()> {
        let snapshot = Snapshot {
            states: &self.states,
            order: &self.endpoints,
            transitions,
            full,
            written_at,
        };
        self.store
            .persist(&snapshot)
            .inspect_err(|e| error!(path = %self.store.path().display(), "status log write failed: {e}"))
            .with_context(|| format!("Failed to persist status log {}", self.store.path().display()))
    }

    /// Current state of every configured endpoint, in configuration order
    fn rows(&self) -> Vec<EndpointRow> {
        self.endpoints
            .iter()
            .map(|endpoint| {
                let state = self.states.get(&endpoint.name).copied().unwrap_or_default();
                EndpointRow {
                    name: endpoint.name.clone(),
                    address: endpoint.address(),
                    status: state.status,
                    reachable: state.status == Status::Online,
                    last_seen: state.last_seen,
                }
            })
            .collect()
    }
}
