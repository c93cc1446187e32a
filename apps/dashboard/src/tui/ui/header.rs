use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use super::{COLOR_BRAND, COLOR_LABEL};
use crate::tui::DashboardFrame;

pub fn render(f: &mut Frame, area: Rect, frame: &DashboardFrame) {
    let title = Paragraph::new(Line::from(Span::styled(
        "📡 EPOCH DASHBOARD",
        Style::default().fg(COLOR_BRAND).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);

    let updated = Paragraph::new(Line::from(Span::styled(
        format!("Updated: {}", frame.updated_at),
        Style::default().fg(COLOR_LABEL),
    )));

    f.render_widget(Clear, area);
    f.render_widget(title, Rect { height: 1, ..area });
    if area.height > 1 {
        f.render_widget(updated, Rect { y: area.y + 1, height: 1, ..area });
    }
}
