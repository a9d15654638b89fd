// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key and paste events. Covers what a terminal
// sends for typing and editing keys:
//
// - ASCII printable bytes and control keys (Ctrl+letter, Enter, Tab,
//   Backspace)
// - CSI sequences for arrows, Home/End, and `~` keys (Insert, Delete,
//   PageUp, PageDown), with xterm modifier parameters
// - SS3 arrows and Home/End (application cursor mode)
// - Alt+key as ESC followed by a printable byte
// - Bracketed paste, delivered as the raw bytes between the delimiters
// - UTF-8 characters, surfaced as `Char` so the host can decide what to do
//
// A lone ESC is ambiguous until more bytes arrive, so the parser keeps it
// pending. The event loop calls `flush` after a quiet tick to turn it into
// an Escape key.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// Bytes pasted between bracketed-paste delimiters, unmodified.
    Paste(Vec<u8>),
}

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key.
    pub code: KeyCode,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key with the given modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key. Control keys arrive as their letter plus
    /// [`Modifiers::CTRL`].
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Modifier keys, using the xterm bit layout (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

/// Incremental parser. Feed bytes with [`advance`](Self::advance); bytes
/// that end mid-sequence are kept for the next call.
#[derive(Debug)]
pub struct Parser {
    buf: Vec<u8>,
    in_paste: bool,
}

impl Parser {
    /// Create an empty parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            in_paste: false,
        }
    }

    /// Append `data` and return every event that is now complete.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            let remaining = &self.buf[pos..];

            if self.in_paste {
                let Some(end) = find_subsequence(remaining, PASTE_END) else {
                    break;
                };
                events.push(Event::Paste(remaining[..end].to_vec()));
                pos += end + PASTE_END.len();
                self.in_paste = false;
                continue;
            }

            if remaining.starts_with(PASTE_START) {
                self.in_paste = true;
                pos += PASTE_START.len();
                continue;
            }
            // A prefix of the paste opener: wait rather than misparse it.
            if remaining.len() < PASTE_START.len()
                && remaining.starts_with(b"\x1b[")
                && PASTE_START.starts_with(remaining)
            {
                break;
            }

            match try_parse(remaining) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// True if bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes after a quiet period: every ESC becomes an
    /// Escape key and the bytes after it are read as plain keys.
    ///
    /// A paste still waiting for its end marker is kept whole; pauses in
    /// the middle of a paste produce nothing.
    pub fn flush(&mut self) -> Vec<Event> {
        if self.in_paste {
            return Vec::new();
        }
        let pending = std::mem::take(&mut self.buf);

        let mut events = Vec::new();
        let mut pos = 0;
        while pos < pending.len() {
            if pending[pos] == 0x1B {
                events.push(Event::Key(KeyEvent::plain(KeyCode::Escape)));
                pos += 1;
                continue;
            }
            match try_parse(&pending[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => pos += 1,
                Parsed::Skip(n) => pos += n,
            }
        }
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing ──────────────────────────────────────────────────────

enum Parsed {
    /// An event and how many bytes it used.
    Event(Event, usize),
    /// Need more bytes.
    Incomplete,
    /// Unrecognized input of this many bytes.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x08 | 0x7F => key(KeyCode::Backspace, 1),
        0x09 => key(KeyCode::Tab, 1),
        0x0A | 0x0D => key(KeyCode::Enter, 1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Parsed::Event(Event::Key(ctrl_letter(b)), 1)
        }
        b @ 0x20..=0x7E => key(KeyCode::Char(b as char), 1),
        0xC0..=0xFF => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };
    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        b @ 0x20..=0x7E => Parsed::Event(
            Event::Key(KeyEvent::with(KeyCode::Char(b as char), Modifiers::ALT)),
            2,
        ),
        // ESC followed by something else: the ESC stands alone.
        _ => key(KeyCode::Escape, 1),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7E.
    let mut end = 2;
    loop {
        let Some(&b) = buf.get(end) else {
            return Parsed::Incomplete;
        };
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    let consumed = end + 1;
    let params = parse_params(&buf[2..end]);
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match buf[end] {
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        },
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => {
            return Parsed::Event(
                Event::Key(KeyEvent::with(KeyCode::Tab, Modifiers::SHIFT)),
                consumed,
            );
        }
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Event(Event::Key(KeyEvent::with(code, modifiers)), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&b) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };
    key(code, 3)
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Parsed::Skip(1),
    };
    if buf.len() < len {
        return Parsed::Incomplete;
    }
    std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| key(KeyCode::Char(ch), len))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

const fn key(code: KeyCode, consumed: usize) -> Parsed {
    Parsed::Event(Event::Key(KeyEvent::plain(code)), consumed)
}

/// Control byte 0x01..=0x1A → Ctrl + letter.
const fn ctrl_letter(byte: u8) -> KeyEvent {
    KeyEvent::with(KeyCode::Char((byte + b'a' - 1) as char), Modifiers::CTRL)
}

/// Semicolon-separated decimal parameters. Sub-parameters after `:` and
/// missing values read as 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &d| {
                    acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
                })
        })
        .collect()
}

/// xterm modifier parameter (`1 + bits`) → [`Modifiers`].
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
