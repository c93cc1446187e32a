use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use super::{COLOR_ERROR, COLOR_LABEL, COLOR_MUTED, COLOR_SUCCESS};
use crate::tui::{DashboardFrame, EndpointRow};

const LAST_SEEN_LABEL: &str = "Last seen:";

pub fn render(f: &mut Frame, area: Rect, frame: &DashboardFrame) {
    let width = area.width as usize;

    let lines: Vec<Line> = if frame.rows.is_empty() {
        vec![Line::from(Span::styled("No endpoints configured", Style::default().fg(COLOR_MUTED)))]
    } else {
        frame.rows.iter().map(|row| endpoint_line(row, width)).collect()
    };

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines), area);
}

/// Build `✔ Name (address) ...... Last seen: <when>` with the last-seen text
/// pushed to the right edge when it fits.
pub fn endpoint_line(row: &EndpointRow, width: usize) -> Line<'static> {
    let (glyph, color) = if row.reachable { ("✔ ", COLOR_SUCCESS) } else { ("✖ ", COLOR_ERROR) };
    let label = format!("{} ({})", row.name, row.address);
    let last_seen = format!("{} {}", LAST_SEEN_LABEL, row.last_seen);

    let used = glyph.chars().count() + label.chars().count() + last_seen.chars().count();
    let padding = width.saturating_sub(used).max(1);

    Line::from(vec![
        Span::styled(glyph, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(label),
        Span::raw(" ".repeat(padding)),
        Span::styled(last_seen, Style::default().fg(COLOR_LABEL)),
    ])
}
