// SPDX-License-Identifier: MIT
//
// Editing modes.
//
// gapvi starts in Normal. `i` enters Insert, where keys edit the buffer;
// Esc returns to Normal. The mode decides the cursor shape and the name on
// the status row.

use std::fmt;

use gapvi_term::ansi::CursorShape;

/// The current editing mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are commands.
    #[default]
    Normal,
    /// Keys insert text at the cursor.
    Insert,
}

impl Mode {
    /// Block in Normal, bar in Insert.
    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Normal => CursorShape::SteadyBlock,
            Self::Insert => CursorShape::SteadyBar,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("NORMAL"),
            Self::Insert => f.write_str("INSERT"),
        }
    }
}
