//! Errors reported by the gap buffer.
//!
//! Both variants are recoverable. An operation that returns an error leaves
//! the buffer exactly as it was before the call.

use thiserror::Error;

/// Failure to size the buffer's storage or an extracted copy of its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Storage could not be grown (or created) to `requested` bytes, either
    /// because the allocator refused or because the buffer already sits at
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY).
    #[error("cannot allocate {requested} bytes of buffer storage")]
    Allocation {
        /// The capacity that was asked for.
        requested: usize,
    },

    /// The text is too long to be materialized as a separate byte vector.
    #[error("cannot extract {used} bytes of text: length overflows")]
    Overflow {
        /// Logical text length at the time of the call.
        used: usize,
    },
}
