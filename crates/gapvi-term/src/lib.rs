// SPDX-License-Identifier: MIT
//
// gapvi-term: terminal plumbing for gapvi.
//
// Everything the editor needs to sit in a terminal and nothing more:
// raw mode and the alternate screen, a background stdin reader, a key
// parser that turns bytes into events, and a line-oriented screen whose
// renderer only rewrites rows that changed since the last frame.
//
// The editor draws plain text plus one inverse status row, so the screen
// model is rows of strings rather than a grid of styled cells. Escape
// sequences are written by hand through `ansi`; there is no TUI framework
// underneath.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod screen;
pub mod terminal;
