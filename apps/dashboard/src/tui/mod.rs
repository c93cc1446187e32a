mod events;
mod terminal;
mod ui;

pub use terminal::TerminalPresenter;

use anyhow::Result;

use crate::monitoring::{LastSeen, Stamp, Status};

/// What the user asked for between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    RefreshNow,
}

/// One endpoint line on the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRow {
    pub name: String,
    pub address: String,
    pub status: Status,
    pub reachable: bool,
    pub last_seen: LastSeen,
}

/// Everything needed to draw one screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardFrame {
    pub updated_at: Stamp,
    pub rows: Vec<EndpointRow>,
    /// Seconds until the next tick
    pub countdown: u64,
}

/// Rendering surface driven by the tick loop
pub trait Presenter {
    fn render(&mut self, frame: &DashboardFrame) -> Result<()>;

    /// Non-blocking check for user input
    fn poll_action(&mut self) -> Result<Option<Action>>;
}
