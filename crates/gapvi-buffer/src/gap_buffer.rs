//! Gap buffer: the text store behind every edit.
//!
//! A `GapBuffer` owns one zero-initialized `Vec<u8>` of length `capacity`
//! and two offsets into it. Everything left of `cursor` and everything from
//! `gap_end` onward is text; the bytes in between are slack.
//!
//! # Design choices
//!
//! - **Edits happen at the cursor only.** Inserting writes into the gap and
//!   advances `cursor`; backspace and delete just widen the gap. None of them
//!   move existing text, so a keystroke costs O(1) unless storage must grow.
//!
//! - **The gap never moves.** There is no operation that relocates the cursor
//!   inside existing text. A host that wants arbitrary cursor movement needs a
//!   different operation, not a workaround on top of this one.
//!
//! - **Storage is private.** The offsets are only changed by methods on this
//!   type, and every method keeps `cursor <= gap_end <= capacity`.
//!
//! - **Allocation is fallible.** Creation, growth, and extraction reserve
//!   memory with `try_reserve_exact` and report [`BufferError`] instead of
//!   aborting the process.

use std::fmt;

use crate::error::BufferError;
use crate::resize;

// ---------------------------------------------------------------------------
// GapBuffer
// ---------------------------------------------------------------------------

/// A byte buffer with a gap of free space at the cursor.
///
/// The host owns exactly one `GapBuffer` and passes `&mut` into each edit.
/// Dropping the buffer releases its storage.
///
/// # Offsets
///
/// | Quantity      | Value                    |
/// |---------------|--------------------------|
/// | `left_len()`  | `cursor`                 |
/// | `right_len()` | `capacity - gap_end`     |
/// | `used()`      | `left_len + right_len`   |
/// | `gap_len()`   | `gap_end - cursor`       |
pub struct GapBuffer {
    /// Backing bytes. `storage.len()` is the buffer's capacity.
    pub(crate) storage: Vec<u8>,
    /// End of the left region and the insertion point.
    pub(crate) cursor: usize,
    /// Start of the right region.
    pub(crate) gap_end: usize,
}

impl GapBuffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer.
    ///
    /// `requested` is raised to [`MIN_BUFFER_SIZE`](crate::MIN_BUFFER_SIZE)
    /// when smaller. The whole region starts as gap.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Allocation`] if the storage cannot be allocated.
    pub fn with_capacity(requested: usize) -> Result<Self, BufferError> {
        let capacity = resize::clamp_capacity(requested);
        let storage = resize::allocate_zeroed(capacity)?;
        Ok(Self {
            storage,
            cursor: 0,
            gap_end: capacity,
        })
    }

    /// Create a buffer holding `body`, with the cursor at its start.
    ///
    /// The body is placed in the right region so the first keystroke lands
    /// before it. Capacity is the body length, raised to the floor.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Allocation`] if the storage cannot be allocated.
    pub fn from_bytes(body: &[u8]) -> Result<Self, BufferError> {
        let capacity = resize::clamp_capacity(body.len());
        let mut storage = resize::allocate_zeroed(capacity)?;
        let gap_end = capacity - body.len();
        storage[gap_end..].copy_from_slice(body);
        Ok(Self {
            storage,
            cursor: 0,
            gap_end,
        })
    }

    // -- Queries ------------------------------------------------------------

    /// Total length of the storage region.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Offset of the insertion point (end of the left region).
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Offset where the right region starts.
    #[inline]
    #[must_use]
    pub const fn gap_end(&self) -> usize {
        self.gap_end
    }

    /// Number of text bytes before the cursor.
    #[inline]
    #[must_use]
    pub const fn left_len(&self) -> usize {
        self.cursor
    }

    /// Number of text bytes after the cursor.
    #[inline]
    #[must_use]
    pub fn right_len(&self) -> usize {
        self.capacity() - self.gap_end
    }

    /// Logical text length.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.left_len() + self.right_len()
    }

    /// Free slack available before the next insertion has to grow storage.
    #[inline]
    #[must_use]
    pub const fn gap_len(&self) -> usize {
        self.gap_end - self.cursor
    }

    /// True when the buffer holds no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    /// Borrow the text as `(left, right)` without copying it.
    ///
    /// The logical text is `left` followed by `right`. Hosts use `left` to
    /// work out where the cursor is on screen.
    #[must_use]
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        (&self.storage[..self.cursor], &self.storage[self.gap_end..])
    }

    // -- Editing ------------------------------------------------------------

    /// Insert one byte at the cursor and move the cursor past it.
    ///
    /// When the gap is exhausted, storage doubles first (saturating at
    /// [`MAX_CAPACITY`](crate::MAX_CAPACITY)).
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Allocation`] if growth was needed and failed.
    /// The buffer is left unchanged in that case.
    pub fn insert_byte(&mut self, byte: u8) -> Result<(), BufferError> {
        if self.cursor == self.gap_end {
            let target = resize::grow_target(self.capacity());
            if !self.grow(target)? {
                return Err(BufferError::Allocation { requested: target });
            }
        }
        self.storage[self.cursor] = byte;
        self.cursor += 1;
        Ok(())
    }

    /// Insert `bytes` at the cursor, in order, and move the cursor past them.
    ///
    /// Room for all of them is reserved up front, so storage grows at most
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Allocation`] if the room cannot be reserved.
    /// Nothing is inserted in that case.
    pub fn insert_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.reserve(bytes.len())?;
        let end = self.cursor + bytes.len();
        self.storage[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        Ok(())
    }

    /// Remove the byte before the cursor, if any, and return it.
    ///
    /// The byte stays physically in storage but is now part of the gap.
    /// Storage may shrink afterwards if the text became sparse.
    pub fn backspace(&mut self) -> Option<u8> {
        let removed = if self.cursor > 0 {
            self.cursor -= 1;
            Some(self.storage[self.cursor])
        } else {
            None
        };
        self.shrink_if_sparse();
        removed
    }

    /// Remove the byte after the cursor, if any, and return it.
    ///
    /// Storage may shrink afterwards if the text became sparse.
    pub fn delete(&mut self) -> Option<u8> {
        let removed = if self.gap_end < self.capacity() {
            let byte = self.storage[self.gap_end];
            self.gap_end += 1;
            Some(byte)
        } else {
            None
        };
        self.shrink_if_sparse();
        removed
    }

    /// Copy the logical text into a new, independently owned vector.
    ///
    /// The result has exactly `used()` bytes and no terminator.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Overflow`] if the text length cannot be
    /// represented as a vector, and [`BufferError::Allocation`] if the copy
    /// cannot be allocated.
    pub fn extract_text(&self) -> Result<Vec<u8>, BufferError> {
        let used = self.used();
        if used > resize::MAX_CAPACITY {
            return Err(BufferError::Overflow { used });
        }

        let mut text = Vec::new();
        text.try_reserve_exact(used)
            .map_err(|_| BufferError::Allocation { requested: used })?;

        let (left, right) = self.as_slices();
        text.extend_from_slice(left);
        text.extend_from_slice(right);
        Ok(text)
    }
}

impl fmt::Debug for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GapBuffer")
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .field("gap_end", &self.gap_end)
            .field("used", &self.used())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MIN_BUFFER_SIZE;
    use pretty_assertions::assert_eq;

    fn assert_invariants(buf: &GapBuffer) {
        assert!(buf.cursor() <= buf.gap_end(), "{buf:?}");
        assert!(buf.gap_end() <= buf.capacity(), "{buf:?}");
        assert!(buf.capacity() >= MIN_BUFFER_SIZE, "{buf:?}");
        assert!(buf.used() <= buf.capacity(), "{buf:?}");
    }

    fn typed(text: &[u8]) -> GapBuffer {
        let mut buf = GapBuffer::with_capacity(0).unwrap();
        buf.insert_bytes(text).unwrap();
        buf
    }

    fn text(buf: &GapBuffer) -> Vec<u8> {
        buf.extract_text().unwrap()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn small_request_is_raised_to_floor() {
        let buf = GapBuffer::with_capacity(10).unwrap();
        assert_eq!(buf.capacity(), 1024);
        assert_eq!(buf.used(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn large_request_is_kept() {
        let buf = GapBuffer::with_capacity(5000).unwrap();
        assert_eq!(buf.capacity(), 5000);
        assert_eq!(buf.gap_end(), 5000);
        assert_eq!(buf.gap_len(), 5000);
    }

    #[test]
    fn new_buffer_is_all_gap() {
        let buf = GapBuffer::with_capacity(MIN_BUFFER_SIZE).unwrap();
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.gap_end(), buf.capacity());
        assert_eq!(buf.left_len(), 0);
        assert_eq!(buf.right_len(), 0);
        assert_invariants(&buf);
    }

    #[test]
    fn impossible_capacity_is_an_allocation_error() {
        let err = GapBuffer::with_capacity(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            BufferError::Allocation {
                requested: usize::MAX
            }
        );
    }

    #[test]
    fn from_bytes_puts_body_after_cursor() {
        let buf = GapBuffer::from_bytes(b"fn main() {}\n").unwrap();
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.right_len(), 13);
        assert_eq!(text(&buf), b"fn main() {}\n");
        assert_invariants(&buf);
    }

    #[test]
    fn from_bytes_larger_than_floor_has_no_gap() {
        let body = vec![b'x'; 3000];
        let buf = GapBuffer::from_bytes(&body).unwrap();
        assert_eq!(buf.capacity(), 3000);
        assert_eq!(buf.gap_len(), 0);
        assert_eq!(text(&buf), body);
    }

    #[test]
    fn from_empty_bytes_is_empty() {
        let buf = GapBuffer::from_bytes(b"").unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), MIN_BUFFER_SIZE);
    }

    // -- Insertion ----------------------------------------------------------

    #[test]
    fn insert_hello() {
        let buf = typed(b"hello");
        assert_eq!(text(&buf), b"hello");
        assert_eq!(buf.cursor(), 5);
        assert_eq!(buf.used(), 5);
        assert_invariants(&buf);
    }

    #[test]
    fn insert_goes_before_loaded_body() {
        let mut buf = GapBuffer::from_bytes(b"world").unwrap();
        buf.insert_bytes(b"hello ").unwrap();
        assert_eq!(text(&buf), b"hello world");
        assert_eq!(buf.left_len(), 6);
        assert_eq!(buf.right_len(), 5);
    }

    #[test]
    fn insert_past_capacity_grows() {
        let mut buf = GapBuffer::with_capacity(1024).unwrap();
        let input: Vec<u8> = (0..1025).map(|i| b'a' + (i % 26) as u8).collect();
        buf.insert_bytes(&input).unwrap();
        assert!(buf.capacity() >= 2048);
        assert_eq!(text(&buf), input);
        assert_invariants(&buf);
    }

    #[test]
    fn large_insert_grows_once_to_fit() {
        let mut buf = typed(b"ab");
        let input = vec![b'x'; 5000];
        buf.insert_bytes(&input).unwrap();
        assert_eq!(buf.capacity(), 5002);
        assert_eq!(buf.cursor(), 5002);
        let mut expected = b"ab".to_vec();
        expected.extend_from_slice(&input);
        assert_eq!(text(&buf), expected);
        assert_invariants(&buf);
    }

    #[test]
    fn insert_into_full_loaded_body_keeps_body_intact() {
        let body = vec![b'z'; 1024];
        let mut buf = GapBuffer::from_bytes(&body).unwrap();
        assert_eq!(buf.gap_len(), 0);

        buf.insert_byte(b'a').unwrap();
        assert_eq!(buf.capacity(), 2048);

        let mut expected = vec![b'a'];
        expected.extend_from_slice(&body);
        assert_eq!(text(&buf), expected);
    }

    #[test]
    fn insert_accepts_any_byte() {
        let buf = typed(&[0, b'\n', b'\t', 0xFF]);
        assert_eq!(text(&buf), vec![0, b'\n', b'\t', 0xFF]);
    }

    // -- Backspace ----------------------------------------------------------

    #[test]
    fn backspace_removes_before_cursor() {
        let mut buf = typed(b"hello");
        assert_eq!(buf.backspace(), Some(b'o'));
        assert_eq!(text(&buf), b"hell");
        assert_eq!(buf.cursor(), 4);
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut buf = GapBuffer::with_capacity(0).unwrap();
        assert_eq!(buf.backspace(), None);
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.gap_end(), buf.capacity());
        assert_invariants(&buf);
    }

    #[test]
    fn backspace_at_start_leaves_right_region() {
        let mut buf = GapBuffer::from_bytes(b"abc").unwrap();
        assert_eq!(buf.backspace(), None);
        assert_eq!(text(&buf), b"abc");
    }

    #[test]
    fn backspace_most_of_the_text() {
        let mut buf = typed(&[b'q'; 100]);
        for _ in 0..97 {
            buf.backspace();
            assert_invariants(&buf);
        }
        assert_eq!(text(&buf), b"qqq");
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn backspace_most_of_a_large_buffer_shrinks() {
        let mut buf = GapBuffer::with_capacity(4096).unwrap();
        buf.insert_bytes(&[b'q'; 100]).unwrap();
        buf.backspace();
        // 99 < 4096 / 4, so the buffer halves right away.
        assert_eq!(buf.capacity(), 2048);
        for _ in 0..96 {
            buf.backspace();
        }
        assert_eq!(buf.capacity(), MIN_BUFFER_SIZE);
        assert_eq!(text(&buf), b"qqq");
        assert_invariants(&buf);
    }

    // -- Delete -------------------------------------------------------------

    #[test]
    fn delete_removes_after_cursor() {
        let mut buf = GapBuffer::from_bytes(b"bar").unwrap();
        assert_eq!(buf.delete(), Some(b'b'));
        assert_eq!(text(&buf), b"ar");
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn delete_at_end_of_text_is_noop() {
        let mut buf = typed(b"foo");
        let before = (buf.cursor(), buf.gap_end(), buf.capacity());
        assert_eq!(buf.delete(), None);
        assert_eq!((buf.cursor(), buf.gap_end(), buf.capacity()), before);
        assert_eq!(text(&buf), b"foo");
    }

    #[test]
    fn delete_then_backspace_around_cursor() {
        let mut buf = GapBuffer::from_bytes(b"foo bar").unwrap();
        buf.insert_bytes(b"xy").unwrap();
        buf.delete();
        buf.backspace();
        assert_eq!(text(&buf), b"xoo bar");
    }

    #[test]
    fn delete_everything_from_loaded_body_shrinks() {
        let body = vec![b'd'; 8192];
        let mut buf = GapBuffer::from_bytes(&body).unwrap();
        while buf.delete().is_some() {
            assert_invariants(&buf);
        }
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), MIN_BUFFER_SIZE);
    }

    // -- Extraction & slices ------------------------------------------------

    #[test]
    fn extract_is_independent_copy() {
        let mut buf = typed(b"abc");
        let snapshot = text(&buf);
        buf.insert_byte(b'd').unwrap();
        assert_eq!(snapshot, b"abc");
        assert_eq!(text(&buf), b"abcd");
    }

    #[test]
    fn extract_empty() {
        let buf = GapBuffer::with_capacity(0).unwrap();
        assert_eq!(text(&buf), Vec::<u8>::new());
    }

    #[test]
    fn as_slices_splits_at_cursor() {
        let mut buf = GapBuffer::from_bytes(b"tail").unwrap();
        buf.insert_bytes(b"head ").unwrap();
        let (left, right) = buf.as_slices();
        assert_eq!(left, b"head ");
        assert_eq!(right, b"tail");
    }

    #[test]
    fn debug_shows_offsets_not_storage() {
        let buf = typed(b"hi");
        let debug = format!("{buf:?}");
        assert!(debug.contains("cursor: 2"));
        assert!(debug.contains("used: 2"));
        assert!(!debug.contains("storage"));
    }

    // -- Properties ---------------------------------------------------------

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Op {
            Insert(u8),
            Backspace,
            Delete,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => any::<u8>().prop_map(Op::Insert),
                1 => Just(Op::Backspace),
                1 => Just(Op::Delete),
            ]
        }

        proptest! {
            #[test]
            fn inserted_bytes_round_trip(input in prop::collection::vec(any::<u8>(), 0..3000)) {
                let mut buf = GapBuffer::with_capacity(0).unwrap();
                buf.insert_bytes(&input).unwrap();
                prop_assert_eq!(buf.extract_text().unwrap(), input);
            }

            #[test]
            fn edits_match_split_model(
                body in prop::collection::vec(any::<u8>(), 0..1500),
                ops in prop::collection::vec(op(), 0..3000),
            ) {
                let mut buf = GapBuffer::from_bytes(&body).unwrap();
                let mut left: Vec<u8> = Vec::new();
                let mut right: std::collections::VecDeque<u8> = body.into_iter().collect();

                for op in ops {
                    match op {
                        Op::Insert(b) => {
                            buf.insert_byte(b).unwrap();
                            left.push(b);
                        }
                        Op::Backspace => {
                            prop_assert_eq!(buf.backspace(), left.pop());
                        }
                        Op::Delete => {
                            prop_assert_eq!(buf.delete(), right.pop_front());
                        }
                    }
                    prop_assert!(buf.cursor() <= buf.gap_end());
                    prop_assert!(buf.gap_end() <= buf.capacity());
                    prop_assert!(buf.capacity() >= MIN_BUFFER_SIZE);
                    prop_assert_eq!(buf.left_len(), left.len());
                    prop_assert_eq!(buf.right_len(), right.len());
                }

                let mut expected = left;
                expected.extend(right);
                prop_assert_eq!(buf.extract_text().unwrap(), expected);
            }
        }
    }
}
