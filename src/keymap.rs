// SPDX-License-Identifier: MIT
//
// Key dispatch.
//
// `map_key` is the whole keymap: a pure function from the current mode and
// a key to the command it means. Keeping it free of editor state lets the
// tests cover every binding without a terminal or a buffer.
//
//   Normal   i       → EnterInsert
//            Esc     → Quit
//   Insert   Esc     → ExitInsert
//            ASCII   → Insert(byte)
//            Enter   → Insert('\n')
//            Tab     → Insert('\t')
//            BS      → Backspace
//            Del     → Delete
//   any      Ctrl+C  → Quit
//
// Everything else, including non-ASCII characters, maps to nothing: the
// buffer stores bytes and the editor only ever feeds it ASCII.

use gapvi_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::mode::Mode;

/// What a key asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch to Insert mode.
    EnterInsert,
    /// Switch back to Normal mode.
    ExitInsert,
    /// End the session.
    Quit,
    /// Insert one byte at the cursor.
    Insert(u8),
    /// Remove the byte before the cursor.
    Backspace,
    /// Remove the byte after the cursor.
    Delete,
}

/// The command `key` means in `mode`, if any.
#[must_use]
pub fn map_key(mode: Mode, key: &KeyEvent) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(Modifiers::CTRL) {
        return Some(Command::Quit);
    }

    match mode {
        Mode::Normal => match key.code {
            KeyCode::Char('i') if key.modifiers.is_empty() => Some(Command::EnterInsert),
            KeyCode::Escape => Some(Command::Quit),
            _ => None,
        },
        Mode::Insert => match key.code {
            KeyCode::Escape => Some(Command::ExitInsert),
            KeyCode::Enter => Some(Command::Insert(b'\n')),
            KeyCode::Tab => Some(Command::Insert(b'\t')),
            KeyCode::Backspace => Some(Command::Backspace),
            KeyCode::Delete => Some(Command::Delete),
            KeyCode::Char(ch) if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
                printable_ascii(ch).map(Command::Insert)
            }
            _ => None,
        },
    }
}

/// Bytes a bracketed paste inserts.
///
/// Terminals send line breaks in pastes as `\r` or `\r\n`; both become
/// `\n`. Tabs pass through. Other control bytes and all non-ASCII bytes
/// are dropped.
#[must_use]
pub fn paste_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut iter = data.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        match byte {
            b'\r' => {
                iter.next_if_eq(&b'\n');
                out.push(b'\n');
            }
            b'\n' | b'\t' | 0x20..=0x7E => out.push(byte),
            _ => {}
        }
    }
    out
}

fn printable_ascii(ch: char) -> Option<u8> {
    u8::try_from(ch)
        .ok()
        .filter(|b| (0x20..=0x7E).contains(b))
}
