// SPDX-License-Identifier: MIT
//
// View: buffer text onto the screen.
//
// All rows but the last show text; the last is the inverse status row.
//
//   ┌──────────────────────────────┐
//   │ text rows                    │  ← rows - 1, scrolled to the cursor
//   ├──────────────────────────────┤
//   │ NORMAL  notes.txt  3 lines … │  ← status (inverse)
//   └──────────────────────────────┘
//
// Text is split on `\n` and decoded lossily, tabs expand to four spaces,
// other control characters show as one `?` cell, and each row is cut to the
// terminal width. The cursor's row and column come from the left region
// alone: the row is the number of newlines before the cursor, the column
// the display width of what follows the last one. Rows too long for the terminal are cut, not wrapped, and the
// cursor column is clamped to the last cell.

use std::borrow::Cow;

use gapvi_term::screen::{Screen, display_width, printable};

use crate::mode::Mode;

/// Columns a tab occupies.
pub const TAB_WIDTH: usize = 4;

// ─── Helpers ────────────────────────────────────────────────────────────────

/// `line` with each tab replaced by [`TAB_WIDTH`] spaces.
#[must_use]
pub fn expand_tabs(line: &str) -> Cow<'_, str> {
    if line.contains('\t') {
        Cow::Owned(line.replace('\t', &" ".repeat(TAB_WIDTH)))
    } else {
        Cow::Borrowed(line)
    }
}

/// Zero-based `(row, column)` of the cursor given the text before it.
#[must_use]
pub fn cursor_position(left: &[u8]) -> (usize, usize) {
    let row = left.iter().filter(|&&b| b == b'\n').count();
    let tail = left
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(left, |nl| &left[nl + 1..]);
    let col = display_width(&printable(&expand_tabs(&String::from_utf8_lossy(tail))));
    (row, col)
}

/// Number of lines in `text`. Empty text is one empty line.
#[must_use]
pub fn line_count(text: &[u8]) -> usize {
    text.iter().filter(|&&b| b == b'\n').count() + 1
}

// ─── Status ─────────────────────────────────────────────────────────────────

/// Everything the status row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status<'a> {
    pub mode: Mode,
    /// File name, or `[scratch]` for an unnamed buffer.
    pub name: &'a str,
    /// Shown instead of the name when set.
    pub message: Option<&'a str>,
    pub used: usize,
    pub capacity: usize,
}

impl Status<'_> {
    fn render(&self, lines: usize, row: usize, col: usize) -> String {
        format!(
            " {}  {}  {} lines  {}:{}  {}/{} ",
            self.mode,
            self.message.unwrap_or(self.name),
            lines,
            row + 1,
            col + 1,
            self.used,
            self.capacity,
        )
    }
}

// ─── View ───────────────────────────────────────────────────────────────────

/// Vertical scroll state for the text area.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct View {
    top: usize,
}

impl View {
    /// A view scrolled to the top.
    #[must_use]
    pub const fn new() -> Self {
        Self { top: 0 }
    }

    /// First text line shown.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> usize {
        self.top
    }

    /// Scroll the least amount that puts `row` inside a window of
    /// `height` rows.
    pub const fn scroll_to(&mut self, row: usize, height: usize) {
        if height == 0 {
            return;
        }
        if row < self.top {
            self.top = row;
        } else if row >= self.top + height {
            self.top = row + 1 - height;
        }
    }

    /// Paint `text` and the status row into `screen`.
    ///
    /// `left` is the text before the cursor (a prefix of `text`). Returns
    /// the cursor's screen position as `(column, row)`.
    #[allow(clippy::cast_possible_truncation)] // Clamped to u16 screen bounds.
    pub fn render(
        &mut self,
        text: &[u8],
        left: &[u8],
        status: &Status<'_>,
        screen: &mut Screen,
    ) -> (u16, u16) {
        let rows = usize::from(screen.rows());
        if rows == 0 {
            return (0, 0);
        }
        let text_rows = if rows >= 2 { rows - 1 } else { rows };

        let (cursor_row, cursor_col) = cursor_position(left);
        self.scroll_to(cursor_row, text_rows);

        for (i, line) in text
            .split(|&b| b == b'\n')
            .skip(self.top)
            .take(text_rows)
            .enumerate()
        {
            let decoded = String::from_utf8_lossy(line);
            screen.set_line(i as u16, &expand_tabs(&decoded), false);
        }

        if rows >= 2 {
            let lines = line_count(text);
            let status_text = status.render(lines, cursor_row, cursor_col);
            screen.set_line((rows - 1) as u16, &status_text, true);
        }

        let max_col = usize::from(screen.cols()).saturating_sub(1);
        let x = cursor_col.min(max_col) as u16;
        let y = (cursor_row - self.top()) as u16;
        (x, y)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn status(mode: Mode) -> Status<'static> {
        Status {
            mode,
            name: "[scratch]",
            message: None,
            used: 0,
            capacity: 1024,
        }
    }

    fn texts(screen: &Screen) -> Vec<&str> {
        screen.lines().iter().map(|l| l.text.as_str()).collect()
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    #[test]
    fn tabs_expand_to_four_spaces() {
        assert_eq!(expand_tabs("a\tb"), "a    b");
        assert!(matches!(expand_tabs("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn cursor_position_counts_rows_and_columns() {
        assert_eq!(cursor_position(b""), (0, 0));
        assert_eq!(cursor_position(b"abc"), (0, 3));
        assert_eq!(cursor_position(b"ab\ncd\ne"), (2, 1));
        assert_eq!(cursor_position(b"ab\n"), (1, 0));
    }

    #[test]
    fn cursor_column_expands_tabs() {
        assert_eq!(cursor_position(b"\tx"), (0, TAB_WIDTH + 1));
    }

    #[test]
    fn cursor_column_counts_control_placeholder() {
        assert_eq!(cursor_position(b"a\x1bb"), (0, 3));
        assert_eq!(cursor_position(b"x\ry"), (0, 3));
    }

    #[test]
    fn line_count_of_text() {
        assert_eq!(line_count(b""), 1);
        assert_eq!(line_count(b"one"), 1);
        assert_eq!(line_count(b"one\ntwo\n"), 3);
    }

    // ── Scrolling ───────────────────────────────────────────────────────

    #[test]
    fn scroll_follows_cursor_down_and_up() {
        let mut view = View::new();
        view.scroll_to(2, 5);
        assert_eq!(view.top(), 0);
        view.scroll_to(7, 5);
        assert_eq!(view.top(), 3);
        view.scroll_to(1, 5);
        assert_eq!(view.top(), 1);
    }

    #[test]
    fn scroll_with_zero_height_is_noop() {
        let mut view = View::new();
        view.scroll_to(10, 0);
        assert_eq!(view.top(), 0);
    }

    // ── Render ──────────────────────────────────────────────────────────

    #[test]
    fn renders_lines_and_status() {
        let mut screen = Screen::new(40, 4);
        let mut view = View::new();
        let text = b"one\ntwo";
        let pos = view.render(text, b"one\ntw", &status(Mode::Insert), &mut screen);

        assert_eq!(texts(&screen)[0], "one");
        assert_eq!(texts(&screen)[1], "two");
        assert_eq!(texts(&screen)[2], "");
        let status_line = &screen.lines()[3];
        assert!(status_line.inverse);
        assert_eq!(status_line.text, " INSERT  [scratch]  2 lines  2:3  0/1024 ");
        assert_eq!(pos, (2, 1));
    }

    #[test]
    fn message_replaces_name() {
        let mut screen = Screen::new(60, 2);
        let mut view = View::new();
        let st = Status {
            message: Some("cannot allocate 8 bytes"),
            ..status(Mode::Normal)
        };
        view.render(b"", b"", &st, &mut screen);
        assert!(screen.lines()[1].text.contains("cannot allocate 8 bytes"));
        assert!(!screen.lines()[1].text.contains("[scratch]"));
    }

    #[test]
    fn render_scrolls_to_cursor_row() {
        let mut screen = Screen::new(20, 3);
        let mut view = View::new();
        let text = b"l0\nl1\nl2\nl3\nl4";
        let pos = view.render(text, text, &status(Mode::Insert), &mut screen);

        assert_eq!(view.top(), 3);
        assert_eq!(texts(&screen)[0], "l3");
        assert_eq!(texts(&screen)[1], "l4");
        assert_eq!(pos, (2, 1));
    }

    #[test]
    fn long_lines_are_cut_and_cursor_clamped() {
        let mut screen = Screen::new(4, 2);
        let mut view = View::new();
        let pos = view.render(b"abcdefgh", b"abcdefg", &status(Mode::Insert), &mut screen);
        assert_eq!(texts(&screen)[0], "abcd");
        assert_eq!(pos, (3, 0));
    }

    #[test]
    fn tabs_render_expanded() {
        let mut screen = Screen::new(20, 2);
        let mut view = View::new();
        view.render(b"\tx", b"", &status(Mode::Normal), &mut screen);
        assert_eq!(texts(&screen)[0], "    x");
    }

    #[test]
    fn invalid_utf8_renders_lossily() {
        let mut screen = Screen::new(20, 2);
        let mut view = View::new();
        view.render(b"a\xffb", b"", &status(Mode::Normal), &mut screen);
        assert_eq!(texts(&screen)[0], "a\u{FFFD}b");
    }

    #[test]
    fn control_bytes_in_text_never_reach_the_terminal() {
        use gapvi_term::screen::ScreenRenderer;

        let mut screen = Screen::new(40, 3);
        let mut view = View::new();
        let text = b"ok\x1b[2J\x1b]0;title\x07\r";
        let pos = view.render(text, text, &status(Mode::Normal), &mut screen);
        assert_eq!(texts(&screen)[0], "ok?[2J?]0;title??");
        assert_eq!(pos, (17, 0));

        let mut renderer = ScreenRenderer::new();
        renderer.render(&screen);
        let out = String::from_utf8(renderer.output_bytes().to_vec()).unwrap();
        assert!(!out.contains("\x1b[2J"));
        assert!(!out.contains("\x1b]"));
        assert!(!out.contains('\x07'));
        assert!(!out.contains('\r'));
        assert!(out.contains("ok?[2J?]0;title??"));
    }

    #[test]
    fn single_row_screen_has_no_status() {
        let mut screen = Screen::new(10, 1);
        let mut view = View::new();
        view.render(b"hi", b"h", &status(Mode::Normal), &mut screen);
        assert_eq!(texts(&screen), vec!["hi"]);
        assert!(!screen.lines()[0].inverse);
    }
}
