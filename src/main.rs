// SPDX-License-Identifier: MIT
//
// gapvi: a minimal modal terminal editor built on a gap buffer.
//
// The binary wires the two crates together:
//
//   gapvi-buffer → the text, stored as a gap buffer
//   gapvi-term   → terminal control, input parsing, screen, event loop
//
// `Editor` implements gapvi-term's `App` trait. Each keypress flows
// through:
//
//   stdin → parser → on_event → map_key → GapBuffer edit
//   paint → View::render → Screen → row-diff renderer → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 1
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   └──────────────────────────────┘

mod cli;
mod editor;
mod error;
mod keymap;
mod logging;
mod mode;
mod view;

use std::process;

use clap::Parser;
use gapvi_term::event_loop::EventLoop;
use tracing::info;

use crate::cli::Args;
use crate::editor::Editor;
use crate::error::AppError;

fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("gapvi: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    if let Some(path) = &args.log_file {
        logging::init(path, args.log_level.into())?;
    }
    info!(version = env!("CARGO_PKG_VERSION"), file = ?args.file, "starting");

    let mut editor = match &args.file {
        Some(path) => Editor::open(path, args.capacity)?,
        None => Editor::new(args.capacity)?,
    };

    EventLoop::new().run(&mut editor)?;
    info!(mode = %editor.mode(), used = editor.buffer().used(), "exited");
    Ok(())
}
