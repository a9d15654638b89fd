// SPDX-License-Identifier: MIT
//
// File logging.
//
// The terminal belongs to the editor, so log lines go to a file and never
// to stdout or stderr. Without `--log-file` no subscriber is installed and
// every `tracing` macro in the workspace is a no-op.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;

use crate::error::AppError;

/// Install the global subscriber writing to `path` at `level`.
///
/// # Errors
///
/// Returns [`AppError::Log`] if `path` has no file name, the file cannot be
/// opened, or a global subscriber is already set.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), AppError> {
    let appender = file_appender(path)?;
    tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| AppError::Log(e.to_string()))
}

/// An appender that appends to `path` and never rotates.
fn file_appender(path: &Path) -> Result<RollingFileAppender, AppError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::Log(format!("{} is not a file path", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|e| AppError::Log(format!("{}: {e}", path.display())))
}
