//! SlotStorage: contiguous, growable array of fixed-width slots.

use crate::error::PoolError;
use tracing::warn;

/// Owns `count * precision` words in one buffer. Slot `i` occupies
/// words `i * precision .. (i + 1) * precision`.
#[derive(Debug)]
pub struct SlotStorage {
    words: Vec<u32>,
    count: u32,
    precision: u32,
    valid: bool,
}

/// Allocate a zeroed buffer of `words` words without aborting on failure.
fn try_zeroed(words: usize) -> Result<Vec<u32>, PoolError> {
    let mut v = Vec::new();
    v.try_reserve_exact(words)
        .map_err(|_| PoolError::AllocationFailed { words })?;
    v.resize(words, 0);
    Ok(v)
}

fn word_count(count: u32, precision: u32) -> Result<usize, PoolError> {
    (count as usize)
        .checked_mul(precision as usize)
        .ok_or(PoolError::AllocationFailed { words: usize::MAX })
}

impl SlotStorage {
    pub fn new(count: u32, precision: u32) -> Result<Self, PoolError> {
        let words = try_zeroed(word_count(count, precision)?)?;
        Ok(Self {
            words,
            count,
            precision,
            valid: true,
        })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// False once a growth attempt has failed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Append `extra` zeroed slots. Existing slots keep their index and
    /// contents. On failure the storage is marked invalid and must not be
    /// used further.
    pub fn grow(&mut self, extra: u32) -> Result<(), PoolError> {
        let res = self.try_grow(extra);
        if let Err(e) = &res {
            warn!(count = self.count, extra, error = %e, "slot storage growth failed");
            self.valid = false;
        }
        res
    }

    fn try_grow(&mut self, extra: u32) -> Result<(), PoolError> {
        let new_count = self
            .count
            .checked_add(extra)
            .ok_or(PoolError::CapacityExceeded {
                requested: self.count as u64 + extra as u64,
                limit: u32::MAX as u64,
            })?;
        let total = word_count(new_count, self.precision)?;
        let additional = total - self.words.len();
        self.words
            .try_reserve_exact(additional)
            .map_err(|_| PoolError::AllocationFailed { words: total })?;
        self.words.resize(total, 0);
        self.count = new_count;
        Ok(())
    }

    /// All `precision` words of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count()`.
    #[inline]
    pub fn slot(&self, index: u32) -> &[u32] {
        assert!(index < self.count, "slot index {index} out of bounds");
        let start = index as usize * self.precision as usize;
        &self.words[start..start + self.precision as usize]
    }

    /// Mutable view of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= count()`.
    #[inline]
    pub fn slot_mut(&mut self, index: u32) -> &mut [u32] {
        assert!(index < self.count, "slot index {index} out of bounds");
        let start = index as usize * self.precision as usize;
        &mut self.words[start..start + self.precision as usize]
    }

    /// Copy the words of slot `src` over slot `dst`.
    pub fn copy_slot(&mut self, src: u32, dst: u32) {
        assert!(src < self.count && dst < self.count, "slot index out of bounds");
        let p = self.precision as usize;
        let from = src as usize * p;
        self.words.copy_within(from..from + p, dst as usize * p);
    }
}
