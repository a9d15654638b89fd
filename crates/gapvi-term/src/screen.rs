// SPDX-License-Identifier: MIT
//
// Line screen and row-diff renderer.
//
// The editor paints into a `Screen`: one `Line` per terminal row, each a
// string already cut to the terminal width plus a flag for inverse video.
// `ScreenRenderer` keeps the previous frame and, on each render, emits
// escape sequences only for rows whose content changed. Typing a character
// usually touches the edited row and the status row, so a keystroke costs
// two row rewrites instead of a full repaint.
//
// A frame is built in a `Vec<u8>` and wrapped in synchronized output, then
// written with one call in `flush`.

use std::borrow::Cow;
use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::ansi;

// ─── Line ───────────────────────────────────────────────────────────────────

/// One painted row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// Visible text, at most the screen width in display columns.
    pub text: String,
    /// Draw the row in inverse video, padded to the full width.
    pub inverse: bool,
}

// ─── Screen ─────────────────────────────────────────────────────────────────

/// A frame of text rows sized to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    cols: u16,
    lines: Vec<Line>,
}

impl Screen {
    /// A blank screen of `cols` × `rows`.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            lines: vec![Line::default(); usize::from(rows)],
        }
    }

    /// Width in columns.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Height in rows.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Built from a u16 row count.
    pub fn rows(&self) -> u16 {
        self.lines.len() as u16
    }

    /// All rows, top to bottom.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Blank every row.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.text.clear();
            line.inverse = false;
        }
    }

    /// Change dimensions and blank the frame.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.lines = vec![Line::default(); usize::from(rows)];
    }

    /// Paint `text` on `row`, cut to the screen width. Control characters
    /// are shown as [`CONTROL_PLACEHOLDER`]. Rows past the bottom are
    /// ignored.
    pub fn set_line(&mut self, row: u16, text: &str, inverse: bool) {
        let cols = self.cols;
        if let Some(line) = self.lines.get_mut(usize::from(row)) {
            let visible = printable(text);
            line.text.clear();
            line.text.push_str(fit_to_width(&visible, usize::from(cols)));
            line.inverse = inverse;
        }
    }
}

/// Stands in for a control character so it is never sent to the terminal.
pub const CONTROL_PLACEHOLDER: char = '?';

/// `text` with every control character (C0, DEL, C1) replaced by
/// [`CONTROL_PLACEHOLDER`].
#[must_use]
pub fn printable(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_control) {
        Cow::Owned(
            text.chars()
                .map(|ch| if ch.is_control() { CONTROL_PLACEHOLDER } else { ch })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// Longest prefix of `text` that fits in `width` display columns.
///
/// A wide character that would straddle the edge is dropped whole.
/// Control characters count as zero width.
#[must_use]
pub fn fit_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            return &text[..idx];
        }
        used += w;
    }
    text
}

/// Display width of `text` in terminal columns.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

// ─── RenderStats ────────────────────────────────────────────────────────────

/// What a render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Rows rewritten.
    pub rows_rendered: usize,
    /// Rows identical to the previous frame.
    pub rows_skipped: usize,
}

// ─── ScreenRenderer ─────────────────────────────────────────────────────────

/// Row-diff renderer for [`Screen`].
#[derive(Debug, Default)]
pub struct ScreenRenderer {
    output: Vec<u8>,
    previous: Option<Screen>,
}

impl ScreenRenderer {
    /// A renderer with no previous frame; the first render draws every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame so the next render rewrites every row.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    /// Diff `current` against the previous frame and build the output.
    /// Writes go to an in-memory buffer; [`flush`](Self::flush) sends them.
    pub fn render(&mut self, current: &Screen) -> RenderStats {
        self.output.clear();
        let mut stats = RenderStats::default();

        // A size change invalidates every row.
        let previous = self
            .previous
            .take()
            .filter(|prev| prev.cols == current.cols && prev.lines.len() == current.lines.len());

        let out = &mut self.output;
        let _ = ansi::begin_sync(out);

        for (row, line) in current.lines.iter().enumerate() {
            let unchanged = previous
                .as_ref()
                .and_then(|prev| prev.lines.get(row))
                .is_some_and(|prev| prev == line);
            if unchanged {
                stats.rows_skipped += 1;
                continue;
            }

            #[allow(clippy::cast_possible_truncation)] // Row count is a u16.
            let _ = write_line(out, row as u16, line, current.cols);
            stats.rows_rendered += 1;
        }

        let _ = ansi::end_sync(out);

        self.previous = Some(current.clone());
        stats
    }

    /// Bytes produced by the last [`render`](Self::render).
    #[inline]
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Write the last frame to `w`.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub fn flush_to(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.output)?;
        w.flush()
    }

    /// Write the last frame to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn flush(&self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }
}

fn write_line(out: &mut Vec<u8>, row: u16, line: &Line, cols: u16) -> io::Result<()> {
    ansi::cursor_to(out, 0, row)?;
    if line.inverse {
        ansi::inverse(out)?;
        out.write_all(line.text.as_bytes())?;
        let pad = usize::from(cols).saturating_sub(display_width(&line.text));
        out.resize(out.len() + pad, b' ');
        ansi::reset(out)?;
    } else {
        ansi::clear_line(out)?;
        out.write_all(line.text.as_bytes())?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
