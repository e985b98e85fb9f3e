use std::io::{self, Write};

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use loctally_core::{WalkProgress, format_count};

use super::theme::Theme;
use crate::app::AppState;

/// Braille spinner characters
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Status text for the scans still running
pub fn progress_indicator(running: usize, progress: &WalkProgress, spinner_frame: usize) -> String {
    let spinner = SPINNER[spinner_frame % SPINNER.len()];
    let noun = if running == 1 { "path" } else { "paths" };
    format!(
        "{} Scanning {} {}: {}/{} dirs, {} files",
        spinner,
        running,
        noun,
        format_count(progress.completed_dirs),
        format_count(progress.discovered_dirs),
        format_count(progress.files_counted),
    )
}

/// Single self-overwriting status line on stderr
pub struct ProgressLine<'a> {
    theme: &'a Theme,
    visible: bool,
    drawn: bool,
}

impl<'a> ProgressLine<'a> {
    pub fn new(theme: &'a Theme, visible: bool) -> Self {
        Self {
            theme,
            visible,
            drawn: false,
        }
    }

    pub fn draw(&mut self, state: &AppState) -> io::Result<()> {
        if !self.visible {
            return Ok(());
        }

        let (running, progress) = state.running_progress();
        if running == 0 {
            return self.clear();
        }

        let mut line = progress_indicator(running, &progress, state.spinner_frame);
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        if line.chars().count() > width {
            line = line.chars().take(width.saturating_sub(1)).collect();
        }

        let mut stderr = io::stderr();
        queue!(
            stderr,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(self.theme.dim(line))
        )?;
        stderr.flush()?;
        self.drawn = true;
        Ok(())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        if !self.drawn {
            return Ok(());
        }

        let mut stderr = io::stderr();
        queue!(stderr, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        stderr.flush()?;
        self.drawn = false;
        Ok(())
    }
}
