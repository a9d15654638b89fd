//! Resize policy: when and how a [`GapBuffer`] reallocates.
//!
//! Growth doubles capacity whenever an insertion finds the gap too small,
//! or grows to exactly what a large insertion needs if doubling falls short.
//! Shrinking halves capacity whenever a removal leaves the text using less
//! than a quarter of it. The two thresholds are far enough apart that a
//! buffer cannot flip between growing and shrinking on alternate keystrokes,
//! and doubling keeps the cost of N insertions at O(N) total.
//!
//! | Event                           | Target                              |
//! |---------------------------------|-------------------------------------|
//! | insert with `gap_len == 0`      | `min(2 × capacity, MAX_CAPACITY)`   |
//! | insert of `n > gap_len` bytes   | `max(2 × capacity, used + n)`       |
//! | remove leaving `used < cap / 4` | `max(cap / 2, MIN_BUFFER_SIZE)`     |
//!
//! Growth is all-or-nothing: it either succeeds or leaves the buffer
//! untouched. Shrinking is an optimization and never reports failure.

use tracing::{debug, trace, warn};

use crate::error::BufferError;
use crate::gap_buffer::GapBuffer;

/// Smallest capacity a buffer may have.
pub const MIN_BUFFER_SIZE: usize = 1024;

/// Largest capacity a buffer may have: the longest `Vec<u8>` there can be.
pub const MAX_CAPACITY: usize = isize::MAX.unsigned_abs();

/// Capacity multiplier applied when the gap runs out.
pub const GROWTH_FACTOR: usize = 2;

/// A buffer shrinks once `used < capacity / SHRINK_DIVISOR`.
pub const SHRINK_DIVISOR: usize = 4;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Raise a requested capacity to the floor.
#[inline]
#[must_use]
pub const fn clamp_capacity(requested: usize) -> usize {
    if requested < MIN_BUFFER_SIZE {
        MIN_BUFFER_SIZE
    } else {
        requested
    }
}

/// Capacity to grow to from `capacity`, saturating at [`MAX_CAPACITY`].
#[inline]
#[must_use]
pub const fn grow_target(capacity: usize) -> usize {
    let doubled = capacity.saturating_mul(GROWTH_FACTOR);
    if doubled > MAX_CAPACITY {
        MAX_CAPACITY
    } else {
        doubled
    }
}

/// Capacity to shrink to, or `None` while the text is dense enough.
#[inline]
#[must_use]
pub const fn shrink_target(used: usize, capacity: usize) -> Option<usize> {
    if used < capacity / SHRINK_DIVISOR {
        Some(capacity / 2)
    } else {
        None
    }
}

/// Allocate `capacity` zero bytes without aborting on failure.
pub(crate) fn allocate_zeroed(capacity: usize) -> Result<Vec<u8>, BufferError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(capacity)
        .map_err(|_| BufferError::Allocation {
            requested: capacity,
        })?;
    storage.resize(capacity, 0);
    Ok(storage)
}

// ---------------------------------------------------------------------------
// GapBuffer resizing
// ---------------------------------------------------------------------------

impl GapBuffer {
    /// Grow storage to `new_capacity`, keeping the right region right-aligned.
    ///
    /// Returns `Ok(false)` without touching anything when `new_capacity` is
    /// not larger than the current capacity; growth never shrinks.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Allocation`] if the larger region cannot be
    /// allocated. The buffer is unchanged in that case.
    pub fn grow(&mut self, new_capacity: usize) -> Result<bool, BufferError> {
        let old_capacity = self.capacity();
        if new_capacity <= old_capacity {
            return Ok(false);
        }

        self.storage
            .try_reserve_exact(new_capacity - old_capacity)
            .map_err(|_| BufferError::Allocation {
                requested: new_capacity,
            })?;

        // Nothing below can fail: the reservation above covers the resize.
        let right_len = self.right_len();
        self.storage.resize(new_capacity, 0);
        let new_gap_end = new_capacity - right_len;
        self.storage
            .copy_within(self.gap_end..old_capacity, new_gap_end);
        self.gap_end = new_gap_end;

        debug!(
            old_capacity,
            new_capacity,
            used = self.used(),
            "gap buffer grew"
        );
        Ok(true)
    }

    /// Make room for `additional` more bytes in one reallocation.
    ///
    /// Does nothing while the gap is already wide enough. Otherwise grows to
    /// the doubled capacity, or to exactly what the text needs if doubling
    /// falls short.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Allocation`] if the text would outgrow
    /// [`MAX_CAPACITY`] or the larger region cannot be allocated. The buffer
    /// is unchanged in that case.
    pub fn reserve(&mut self, additional: usize) -> Result<(), BufferError> {
        if self.gap_len() >= additional {
            return Ok(());
        }

        let needed = self
            .used()
            .checked_add(additional)
            .filter(|&needed| needed <= MAX_CAPACITY)
            .ok_or_else(|| BufferError::Allocation {
                requested: self.used().saturating_add(additional),
            })?;
        let target = grow_target(self.capacity()).max(needed);
        self.grow(target)?;
        Ok(())
    }

    /// Shrink storage towards `requested`, never below the text it holds.
    ///
    /// `requested` is raised to [`MIN_BUFFER_SIZE`] first. The call is
    /// silently refused when the target could not hold the current text, and
    /// does nothing when the target is not smaller than the current capacity.
    /// If the smaller region cannot be allocated the buffer keeps its current
    /// storage, content, and offsets.
    pub fn shrink(&mut self, requested: usize) {
        let target = clamp_capacity(requested);
        let old_capacity = self.capacity();
        let used = self.used();

        if target < used {
            trace!(target, used, "shrink refused: text would not fit");
            return;
        }
        if target >= old_capacity {
            return;
        }

        let right_len = self.right_len();
        let new_gap_end = target - right_len;

        let mut storage = Vec::new();
        if storage.try_reserve_exact(target).is_err() {
            warn!(
                old_capacity,
                target, "shrink skipped: could not allocate smaller storage"
            );
            return;
        }
        storage.extend_from_slice(&self.storage[..self.cursor]);
        storage.resize(new_gap_end, 0);
        storage.extend_from_slice(&self.storage[self.gap_end..]);

        self.storage = storage;
        self.gap_end = new_gap_end;

        debug!(
            old_capacity,
            new_capacity = target,
            used,
            "gap buffer shrank"
        );
    }

    /// Apply the shrink policy after a removal.
    pub(crate) fn shrink_if_sparse(&mut self) {
        if let Some(target) = shrink_target(self.used(), self.capacity()) {
            self.shrink(target);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
