//! Label rendering for the controller screen.
//!
//! The controller writes three fixed rows: a header, an info line and the
//! battery level. Each write clears its row before drawing, so a shorter
//! label never leaves the tail of a longer one behind.

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};

/// Row of the header label.
pub const HEADER_ROW: u16 = 0;
/// Row of the info label.
pub const INFO_ROW: u16 = 2;
/// Row of the battery label.
pub const BATTERY_ROW: u16 = 4;

/// Text drawn on the battery row.
pub fn battery_label(percent: u8) -> String {
    format!("Battery: {percent}")
}

/// Where the controller draws its labels.
pub trait RenderSurface: Send {
    /// Prepare the surface. Called once before any label is drawn.
    fn init(&mut self) -> io::Result<()>;
    /// Clear `row` and write `text` from its first column.
    fn print_line(&mut self, row: u16, text: &str) -> io::Result<()>;
    /// Restore whatever `init` changed. Called once at teardown.
    fn release(&mut self) -> io::Result<()>;
}

/// Crossterm-backed surface.
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    raw_mode: bool,
}

impl TerminalSurface<Stdout> {
    /// Draw on stdout in raw mode using the alternate screen.
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            raw_mode: true,
        }
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    /// Draw into `out` without changing terminal modes.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            raw_mode: false,
        }
    }
}

impl<W: Write + Send> RenderSurface for TerminalSurface<W> {
    fn init(&mut self) -> io::Result<()> {
        if self.raw_mode {
            terminal::enable_raw_mode()?;
        }
        execute!(
            self.out,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )
    }

    fn print_line(&mut self, row: u16, text: &str) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(0, row),
            Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        self.out.flush()
    }

    fn release(&mut self) -> io::Result<()> {
        let restored = execute!(self.out, Show, LeaveAlternateScreen);
        if self.raw_mode {
            terminal::disable_raw_mode()?;
        }
        restored
    }
}
