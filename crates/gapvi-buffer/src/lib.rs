//! # gapvi-buffer: gap buffer text storage for gapvi
//!
//! The editor keeps its whole text in a single [`GapBuffer`]: one contiguous
//! byte region split into a left region (text before the cursor), a gap of
//! unused slack, and a right region (text after the cursor).
//!
//! ```text
//!  0            cursor              gap_end          capacity
//!  ├──── left ────┼────── gap ────────┼──── right ──────┤
//!  │ text before  │  free slack for   │  text after     │
//!  │ the cursor   │  future inserts   │  the cursor     │
//! ```
//!
//! - **[`gap_buffer`]**: the `GapBuffer` type, its queries, and the edit
//!   operations (insert, backspace, delete, extraction)
//! - **[`resize`]**: growth and shrink policy with its constants
//! - **[`error`]**: `BufferError`, returned when storage cannot be sized
//!
//! The buffer is byte-oriented. It never looks at encodings or line breaks;
//! that belongs to whoever renders the text.

pub mod error;
pub mod gap_buffer;
pub mod resize;

pub use error::BufferError;
pub use gap_buffer::GapBuffer;
pub use resize::{MAX_CAPACITY, MIN_BUFFER_SIZE};
