use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::time::Duration;

use super::{Action, DashboardFrame, Presenter, events, ui};

/// Full-screen crossterm presenter. The terminal is restored on drop.
pub struct TerminalPresenter {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl TerminalPresenter {
    /// Init terminal in alternate screen
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        let backend = CrosstermBackend::new(stdout);
        let mut presenter = Self { terminal: Terminal::new(backend)?, restored: false };
        presenter.terminal.clear()?;
        Ok(presenter)
    }

    /// Leave the alternate screen and give the cursor back
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        let exec_result = execute!(self.terminal.backend_mut(), Show, LeaveAlternateScreen);
        let raw_mode_result = disable_raw_mode();
        exec_result.and(raw_mode_result)?;
        Ok(())
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, frame: &DashboardFrame) -> Result<()> {
        self.terminal.draw(|f| ui::render(f, frame))?;
        Ok(())
    }

    fn poll_action(&mut self) -> Result<Option<Action>> {
        while event::poll(Duration::ZERO)? {
            if let Some(action) = events::action_for(&event::read()?) {
                return Ok(Some(action));
            }
        }
        Ok(None)
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
