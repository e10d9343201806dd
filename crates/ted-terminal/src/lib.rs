//! Terminal driver: raw mode, screen reservation, and output choreography.
//!
//! The editor does not own the whole screen. It reserves a window of
//! `nlines` rows plus one echo line wherever the cursor happens to be,
//! remembers the window's origin via a cursor position report, and paints
//! only inside it. Raw mode is entered on startup and restored on every
//! exit path: [`Terminal`] restores the TTY on drop, so a panic or early
//! return cannot leave the shell in raw mode.
//!
//! Suspend and the external-search handoff both need the TTY back in its
//! original state temporarily; [`Terminal::suspend`] and
//! [`Terminal::with_cooked`] bracket those excursions and re-reserve the
//! screen afterwards.

use std::io::{Read, Write, stdin, stdout};

use anyhow::{Context, Result, bail};
use crossterm::{
    cursor::{self, Hide, MoveDown, MoveTo, MoveUp, SetCursorStyle, Show},
    execute, queue,
    style::Print,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
    tty::IsTty,
};
use ted_input::ByteBurst;
use tracing::{debug, trace};

pub struct Terminal {
    /// Top-left of the reserved viewport, 0-based (col, row).
    screen_begin: (u16, u16),
    /// Start of the echo line just below the viewport.
    echo_begin: (u16, u16),
    raw: bool,
}

impl Terminal {
    /// Verify both ends of the terminal before touching any mode bits.
    pub fn new() -> Result<Self> {
        if !stdin().is_tty() || !stdout().is_tty() {
            bail!("stdin and stdout should be tty.");
        }
        Ok(Self {
            screen_begin: (0, 0),
            echo_begin: (0, 0),
            raw: false,
        })
    }

    /// Enter raw mode and switch to a bar cursor.
    pub fn enter(&mut self) -> Result<()> {
        if !self.raw {
            enable_raw_mode().context("enable raw mode")?;
            execute!(stdout(), SetCursorStyle::BlinkingBar)?;
            self.raw = true;
            debug!(target: "terminal", "raw_mode_entered");
        }
        Ok(())
    }

    /// Restore the TTY and the default cursor shape.
    pub fn leave(&mut self) -> Result<()> {
        if self.raw {
            execute!(stdout(), SetCursorStyle::DefaultUserShape)?;
            disable_raw_mode().context("disable raw mode")?;
            self.raw = false;
            debug!(target: "terminal", "raw_mode_left");
        }
        Ok(())
    }

    /// Reserve `nlines` viewport rows plus the echo line at the current
    /// cursor position and record both origins.
    pub fn reserve_screen(&mut self, nlines: u16) -> Result<()> {
        let mut out = stdout();
        for _ in 0..nlines {
            queue!(out, Print("\r"), Clear(ClearType::UntilNewLine), Print("\n"))?;
        }
        queue!(out, Clear(ClearType::UntilNewLine), MoveUp(nlines))?;
        out.flush()?;

        self.screen_begin = cursor::position().context("cursor position report")?;
        execute!(out, MoveDown(nlines))?;
        self.echo_begin = cursor::position().context("cursor position report")?;
        execute!(
            out,
            MoveTo(self.screen_begin.0, self.screen_begin.1)
        )?;
        debug!(
            target: "terminal",
            screen = ?self.screen_begin,
            echo = ?self.echo_begin,
            "screen_reserved"
        );
        Ok(())
    }

    /// Write one composed frame and park the cursor at the given viewport
    /// coordinates.
    pub fn paint(&mut self, scratch: &str, cursor_row: u16, cursor_col: u16) -> Result<()> {
        let (x, y) = self.screen_begin;
        let mut out = stdout();
        queue!(
            out,
            Hide,
            MoveTo(x, y),
            Print(scratch),
            MoveTo(x + cursor_col, y + cursor_row),
            Show
        )?;
        out.flush()?;
        Ok(())
    }

    /// Write a formatted echo line without disturbing the cursor.
    pub fn draw_echo(&mut self, line: &str) -> Result<()> {
        let (x, y) = self.echo_begin;
        let mut out = stdout();
        queue!(
            out,
            cursor::SavePosition,
            MoveTo(x, y),
            Print(line),
            cursor::RestorePosition
        )?;
        out.flush()?;
        Ok(())
    }

    pub fn clear_echo(&mut self) -> Result<()> {
        let (x, y) = self.echo_begin;
        let mut out = stdout();
        queue!(
            out,
            cursor::SavePosition,
            MoveTo(x, y),
            Clear(ClearType::UntilNewLine),
            cursor::RestorePosition
        )?;
        out.flush()?;
        Ok(())
    }

    /// Erase the reserved window (viewport and everything below it).
    pub fn clear_screen(&mut self) -> Result<()> {
        let (x, y) = self.screen_begin;
        execute!(stdout(), MoveTo(x, y), Clear(ClearType::FromCursorDown))?;
        Ok(())
    }

    /// Stop the process the way the shell expects: screen cleared, TTY
    /// restored, `SIGTSTP` raised. On resume, re-enter raw mode and
    /// reserve a fresh window.
    pub fn suspend(&mut self, nlines: u16) -> Result<()> {
        self.clear_screen()?;
        self.leave()?;
        // SAFETY: raise(2) with a constant signal number has no
        // preconditions; the process simply stops here until SIGCONT.
        unsafe {
            libc::raise(libc::SIGTSTP);
        }
        self.enter()?;
        self.reserve_screen(nlines)
    }

    /// Run `f` with the terminal back in its original (cooked) state,
    /// as when handing the TTY to the external search helper, then
    /// restore raw mode and re-reserve the screen.
    pub fn with_cooked<R>(&mut self, nlines: u16, f: impl FnOnce() -> R) -> Result<R> {
        self.clear_screen()?;
        self.leave()?;
        let result = f();
        self.enter()?;
        self.reserve_screen(nlines)?;
        Ok(result)
    }

    /// Block for the next burst of input bytes. One burst is one
    /// keypress: a byte, an escape sequence, or a UTF-8 run.
    pub fn read_burst(&mut self) -> Result<ByteBurst> {
        let mut buf = [0u8; 16];
        let n = stdin().read(&mut buf).context("read terminal input")?;
        if n == 0 {
            bail!("terminal input closed");
        }
        trace!(target: "terminal", bytes = n, "input_burst");
        Ok(ByteBurst::from_slice(&buf[..n]))
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
