pub mod endpoints;
pub mod footer;
pub mod header;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Color;

use crate::tui::DashboardFrame;

pub const COLOR_BRAND: Color = Color::Cyan;
pub const COLOR_SUCCESS: Color = Color::Green;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_LABEL: Color = Color::Gray;
pub const COLOR_MUTED: Color = Color::DarkGray;

/// Render the entire UI
pub fn render(f: &mut Frame, frame: &DashboardFrame) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    header::render(f, chunks[0], frame);
    endpoints::render(f, chunks[1], frame);
    footer::render(f, chunks[2], frame.countdown);
}
