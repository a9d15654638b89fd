// SPDX-License-Identifier: MIT
//
// Errors that end the editor session.
//
// Failed edits are not here: they become a status-row message and the
// session goes on. These are the failures that stop gapvi before or while
// it owns the terminal.

use std::io;
use std::path::PathBuf;

use gapvi_buffer::BufferError;
use thiserror::Error;

/// Fatal editor error. `main` prints it as `gapvi: {error}`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The terminal or stdin failed.
    #[error("terminal: {0}")]
    Io(#[from] io::Error),

    /// The file named on the command line exists but cannot be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The initial buffer cannot be allocated.
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// The log file or subscriber cannot be set up.
    #[error("logging: {0}")]
    Log(String),
}
