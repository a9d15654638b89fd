// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: stdin bytes in, frames out.
//
// Bytes from the background reader are parsed into events and handed to
// the application. After every batch the application paints a `Screen`,
// the renderer rewrites the rows that changed, and the hardware cursor is
// placed where the application asks.
//
// The loop blocks on the reader channel with a short timeout. Keystrokes
// wake it immediately; when the timeout fires with bytes still pending in
// the parser (a lone ESC), they are flushed as keys. Idle costs nothing
// because nothing is drawn unless something changed.
//
// Resize arrives as SIGWINCH. The handler only sets an atomic flag; the
// loop notices it on the next iteration, resizes the screen and forces a
// full redraw.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::{debug, trace};

use crate::ansi::{self, CursorShape};
use crate::input::{Event, Parser};
use crate::reader::InputReader;
use crate::screen::{Screen, ScreenRenderer};
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application wants after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the loop.
    Quit,
}

/// An application driven by [`EventLoop`].
///
/// Per iteration the loop calls [`on_event`](App::on_event) for each
/// parsed event, [`on_resize`](App::on_resize) if the size changed, then
/// [`paint`](App::paint) and [`cursor`](App::cursor) when a redraw is due.
pub trait App {
    /// Handle one input event. Return [`Action::Quit`] to stop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal was resized. The screen already has the new size.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the whole frame. The screen is blank on entry.
    fn paint(&mut self, screen: &mut Screen);

    /// Where to show the hardware cursor after painting, as
    /// `(column, row, shape)`. `None` hides it.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// How long to wait for input before treating pending bytes as
    /// complete keys, in microseconds. Also bounds resize latency.
    pub tick_interval_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: 8333,
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, parser and renderer for the life of the editor.
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: ScreenRenderer,
    config: LoopConfig,
}

impl EventLoop {
    /// An event loop with default timing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    /// An event loop with custom timing.
    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: ScreenRenderer::new(),
            config,
        }
    }

    /// Current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run `app` until it returns [`Action::Quit`] or stdin closes.
    ///
    /// The terminal is restored before returning, whether the loop ended
    /// normally or with an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up, the reader
    /// thread cannot start, or a frame cannot be written.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();
        debug!(size = ?self.terminal.size(), "terminal entered");

        let result = InputReader::spawn_stdin().and_then(|(mut reader, rx)| {
            let result = self.run_inner(app, &rx);
            reader.stop();
            result
        });

        self.terminal.leave()?;
        debug!(ok = result.is_ok(), "terminal restored");
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let size = self.terminal.size();
        let mut screen = Screen::new(size.cols, size.rows);
        let mut dirty = true;
        let timeout = Duration::from_micros(self.config.tick_interval_us);

        loop {
            let events = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => {
                    self.parser.flush()
                }
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("input closed");
                    return Ok(());
                }
            };

            for event in &events {
                trace!(?event, "input event");
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
            }
            dirty |= !events.is_empty();

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                debug!(cols = new_size.cols, rows = new_size.rows, "resize");
                screen.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }

            if dirty {
                self.draw(app, &mut screen)?;
                dirty = false;
            }
        }
    }

    fn draw(&mut self, app: &mut impl App, screen: &mut Screen) -> io::Result<()> {
        screen.clear();
        app.paint(screen);
        let stats = self.renderer.render(screen);
        trace!(
            rendered = stats.rows_rendered,
            skipped = stats.rows_skipped,
            "frame"
        );

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.renderer.flush_to(&mut lock)?;
        if let Some((x, y, shape)) = app.cursor() {
            ansi::cursor_to(&mut lock, x, y)?;
            ansi::set_cursor_shape(&mut lock, shape)?;
            ansi::cursor_show(&mut lock)?;
        } else {
            ansi::cursor_hide(&mut lock)?;
        }
        lock.flush()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
