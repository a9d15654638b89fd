// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Stateless writers for the handful of terminal commands gapvi uses. Every
// function takes `impl Write` so the renderer can batch a whole frame into
// a `Vec<u8>` before a single write to stdout.
//
// Positions are 0-indexed here and converted to the 1-indexed coordinates
// the terminal expects.

use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Erasing ─────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Clear the whole row the cursor is on (EL 2).
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2K")
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Reset all SGR attributes (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Swap foreground and background (SGR 7). Used for the status row.
#[inline]
pub fn inverse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[7m")
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC 2026). Terminals that support it hold
/// the frame until [`end_sync`]; others ignore the sequence.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Alternate Screen ────────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Leave the alternate screen and restore the shell's content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Bracketed Paste ─────────────────────────────────────────────────────────

/// Enable bracketed paste (DEC 2004): pasted text arrives between
/// `ESC [ 200 ~` and `ESC [ 201 ~`.
#[inline]
pub fn enable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")
}

/// Disable bracketed paste.
#[inline]
pub fn disable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")
}

// ─── Cursor Shape ────────────────────────────────────────────────────────────

/// Cursor shape (DECSCUSR). Block for Normal mode, bar for Insert mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Whatever the terminal uses by default.
    #[default]
    Default,
    /// Steady block.
    SteadyBlock,
    /// Steady underline.
    SteadyUnderline,
    /// Steady bar (I-beam).
    SteadyBar,
}

/// Set the cursor shape.
#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    let n: u8 = match shape {
        CursorShape::Default => 0,
        CursorShape::SteadyBlock => 2,
        CursorShape::SteadyUnderline => 4,
        CursorShape::SteadyBar => 6,
    };
    write!(w, "\x1b[{n} q")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_to_is_one_indexed() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_does_not_overflow_at_u16_max() {
        assert_eq!(
            emit(|w| cursor_to(w, u16::MAX, u16::MAX)),
            "\x1b[65536;65536H"
        );
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    #[test]
    fn erase_sequences() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| clear_line(w)), "\x1b[2K");
    }

    #[test]
    fn attribute_sequences() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
        assert_eq!(emit(|w| inverse(w)), "\x1b[7m");
    }

    #[test]
    fn sync_pair() {
        assert_eq!(emit(|w| begin_sync(w)), "\x1b[?2026h");
        assert_eq!(emit(|w| end_sync(w)), "\x1b[?2026l");
    }

    #[test]
    fn alt_screen_pair() {
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    #[test]
    fn bracketed_paste_pair() {
        assert_eq!(emit(|w| enable_bracketed_paste(w)), "\x1b[?2004h");
        assert_eq!(emit(|w| disable_bracketed_paste(w)), "\x1b[?2004l");
    }

    #[test]
    fn cursor_shapes() {
        assert_eq!(
            emit(|w| set_cursor_shape(w, CursorShape::Default)),
            "\x1b[0 q"
        );
        assert_eq!(
            emit(|w| set_cursor_shape(w, CursorShape::SteadyBlock)),
            "\x1b[2 q"
        );
        assert_eq!(
            emit(|w| set_cursor_shape(w, CursorShape::SteadyUnderline)),
            "\x1b[4 q"
        );
        assert_eq!(
            emit(|w| set_cursor_shape(w, CursorShape::SteadyBar)),
            "\x1b[6 q"
        );
    }

    #[test]
    fn cursor_shape_default_is_default() {
        assert_eq!(CursorShape::default(), CursorShape::Default);
    }
}
