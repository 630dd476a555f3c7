//! FreeStack: LIFO registry of unused slot indices.

use crate::error::PoolError;
use tracing::warn;

/// Holds up to `size` indices. A fresh stack, and each growth, pushes the
/// new indices in descending order so that pops hand them out ascending.
#[derive(Debug)]
pub struct FreeStack {
    indices: Vec<u32>,
    size: u32,
    valid: bool,
}

impl FreeStack {
    /// Stack of capacity `size` holding every index in `0..size`.
    pub fn new(size: u32) -> Result<Self, PoolError> {
        let mut indices = Vec::new();
        indices
            .try_reserve_exact(size as usize)
            .map_err(|_| PoolError::IndexAllocationFailed {
                indices: size as usize,
            })?;
        indices.extend((0..size).rev());
        Ok(Self {
            indices,
            size,
            valid: true,
        })
    }

    /// Empty stack that already accounts for `size` indices, all in use.
    #[cfg(test)]
    pub(crate) fn exhausted(size: u32) -> Self {
        Self {
            indices: Vec::new(),
            size,
            valid: true,
        }
    }

    #[inline]
    pub fn push(&mut self, index: u32) {
        assert!(self.count() < self.size, "free stack overflow");
        debug_assert!(index < self.size, "index {index} was never part of the pool");
        self.indices.push(index);
    }

    #[inline]
    pub fn pop(&mut self) -> u32 {
        match self.indices.pop() {
            Some(i) => i,
            None => panic!("free stack underflow"),
        }
    }

    /// Raise capacity by `extra` and enqueue the indices `size..size + extra`.
    /// On failure the stack is marked invalid.
    pub fn grow(&mut self, extra: u32) -> Result<(), PoolError> {
        let res = self.try_grow(extra);
        if let Err(e) = &res {
            warn!(size = self.size, extra, error = %e, "free stack growth failed");
            self.valid = false;
        }
        res
    }

    fn try_grow(&mut self, extra: u32) -> Result<(), PoolError> {
        let new_size = self
            .size
            .checked_add(extra)
            .ok_or(PoolError::CapacityExceeded {
                requested: self.size as u64 + extra as u64,
                limit: u32::MAX as u64,
            })?;
        self.indices
            .try_reserve_exact(extra as usize)
            .map_err(|_| PoolError::IndexAllocationFailed {
                indices: new_size as usize,
            })?;
        self.indices.extend((self.size..new_size).rev());
        self.size = new_size;
        Ok(())
    }

    pub fn count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
