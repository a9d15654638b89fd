// SPDX-License-Identifier: MIT
//
// The editor: one gap buffer, a mode, and the view that draws them.
//
// `Editor` implements the event loop's `App` trait. Keys go through
// `keymap::map_key` and the resulting command is applied to the buffer.
// Pastes insert their ASCII bytes. A failed insertion leaves the buffer as
// it was and shows the error on the status row until the next key.
//
//   stdin → parser → on_event → map_key → apply → GapBuffer
//   paint → extract_text → View::render → Screen → renderer

use std::fs;
use std::io;
use std::path::Path;

use gapvi_buffer::{BufferError, GapBuffer};
use gapvi_term::ansi::CursorShape;
use gapvi_term::event_loop::{Action, App};
use gapvi_term::input::Event;
use gapvi_term::screen::Screen;
use gapvi_term::terminal::Size;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::keymap::{Command, map_key, paste_bytes};
use crate::mode::Mode;
use crate::view::{Status, View};

/// Name shown for a buffer not loaded from a file.
const SCRATCH_NAME: &str = "[scratch]";

pub struct Editor {
    buffer: GapBuffer,
    mode: Mode,
    name: String,
    view: View,
    /// Shown on the status row. Cleared by the next key.
    message: Option<String>,
    cursor_screen: (u16, u16),
}

impl Editor {
    /// An empty scratch buffer of at least `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Buffer`] if the storage cannot be allocated.
    pub fn new(capacity: usize) -> Result<Self, AppError> {
        let buffer = GapBuffer::with_capacity(capacity)?;
        info!(capacity = buffer.capacity(), "scratch buffer");
        Ok(Self::with_buffer(buffer, SCRATCH_NAME.to_owned()))
    }

    /// Load `path` as the initial text, cursor at the start.
    ///
    /// A file that does not exist starts an empty buffer of `capacity`
    /// bytes under that name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Read`] if the file exists but cannot be read,
    /// or [`AppError::Buffer`] if the storage cannot be allocated.
    pub fn open(path: &Path, capacity: usize) -> Result<Self, AppError> {
        let name = path.display().to_string();
        match fs::read(path) {
            Ok(body) => {
                let buffer = GapBuffer::from_bytes(&body)?;
                info!(path = %name, bytes = body.len(), capacity = buffer.capacity(), "loaded");
                Ok(Self::with_buffer(buffer, name))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let buffer = GapBuffer::with_capacity(capacity)?;
                info!(path = %name, "new file");
                let mut editor = Self::with_buffer(buffer, name);
                editor.message = Some("[new file]".to_owned());
                Ok(editor)
            }
            Err(source) => Err(AppError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn with_buffer(buffer: GapBuffer, name: String) -> Self {
        Self {
            buffer,
            mode: Mode::Normal,
            name,
            view: View::new(),
            message: None,
            cursor_screen: (0, 0),
        }
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Carry out one command.
    pub fn apply(&mut self, command: Command) -> Action {
        match command {
            Command::Quit => {
                info!(used = self.buffer.used(), "quit");
                return Action::Quit;
            }
            Command::EnterInsert => self.mode = Mode::Insert,
            Command::ExitInsert => self.mode = Mode::Normal,
            Command::Insert(byte) => self.insert(&[byte]),
            Command::Backspace => {
                self.buffer.backspace();
            }
            Command::Delete => {
                self.buffer.delete();
            }
        }
        Action::Continue
    }

    fn insert(&mut self, bytes: &[u8]) {
        if let Err(e) = self.buffer.insert_bytes(bytes) {
            self.report(&e);
        }
    }

    fn report(&mut self, error: &BufferError) {
        warn!(%error, buffer = ?self.buffer, "edit failed");
        self.message = Some(error.to_string());
    }
}

impl App for Editor {
    fn on_event(&mut self, event: &Event) -> Action {
        match event {
            Event::Key(key) => {
                self.message = None;
                map_key(self.mode, key).map_or(Action::Continue, |cmd| self.apply(cmd))
            }
            Event::Paste(data) => {
                let bytes = paste_bytes(data);
                debug!(pasted = data.len(), inserted = bytes.len(), "paste");
                self.insert(&bytes);
                Action::Continue
            }
        }
    }

    fn on_resize(&mut self, size: Size) {
        debug!(cols = size.cols, rows = size.rows, "editor resized");
    }

    fn paint(&mut self, screen: &mut Screen) {
        let text = match self.buffer.extract_text() {
            Ok(text) => text,
            Err(e) => {
                self.report(&e);
                Vec::new()
            }
        };
        let (left, _) = self.buffer.as_slices();
        let status = Status {
            mode: self.mode,
            name: &self.name,
            message: self.message.as_deref(),
            used: self.buffer.used(),
            capacity: self.buffer.capacity(),
        };
        self.cursor_screen = self.view.render(&text, left, &status, screen);
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        let (x, y) = self.cursor_screen;
        Some((x, y, self.mode.cursor_shape()))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
