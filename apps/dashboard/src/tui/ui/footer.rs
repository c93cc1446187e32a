use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use super::COLOR_MUTED;

pub fn countdown_text(remaining: u64) -> String {
    format!("Next refresh in {remaining:2}s... Press 'q' to quit, 'r' to refresh now.")
}

pub fn render(f: &mut Frame, area: Rect, remaining: u64) {
    let footer = Paragraph::new(Line::from(Span::styled(
        countdown_text(remaining),
        Style::default().fg(COLOR_MUTED),
    )));

    f.render_widget(Clear, area);
    f.render_widget(footer, area);
}
