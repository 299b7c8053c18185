//! Terminal Session: Raw mode and alternate screen setup for a real TTY.

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};

/// RAII guard over the controlling terminal.
///
/// Enters raw mode, switches to the alternate screen and hides the cursor
/// on creation; restores all three on drop. Implements [`Write`] so it can
/// be handed to a [`Presenter`](crate::Presenter) as its sink.
pub struct TerminalSession {
    stdout: Stdout,
    alternate_screen: bool,
}

impl TerminalSession {
    /// Take over stdout using the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the screen switch fails.
    pub fn enter() -> io::Result<Self> {
        Self::with_alternate_screen(true)
    }

    /// Take over stdout, optionally staying on the main screen.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the screen switch fails.
    pub fn with_alternate_screen(alternate_screen: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        if alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;
        tracing::debug!(alternate_screen, "terminal session entered");

        Ok(Self {
            stdout,
            alternate_screen,
        })
    }

    /// Current terminal size as `(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Write for TerminalSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stdout.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, crossterm::style::ResetColor, cursor::Show);
        if self.alternate_screen {
            let _ = execute!(self.stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
        tracing::debug!("terminal session restored");
    }
}

impl std::fmt::Debug for TerminalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSession")
            .field("alternate_screen", &self.alternate_screen)
            .finish()
    }
}
