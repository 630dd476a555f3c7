//! Recoverable pool errors.

use crate::pool::Alloc;
use thiserror::Error;

/// Errors returned by fallible pool operations.
///
/// Caller bugs (out-of-bounds handles, double release, free-stack
/// over/underflow) are not represented here; they panic.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The backing buffer could not be obtained from the allocator.
    #[error("failed to allocate {words} words of slot storage")]
    AllocationFailed {
        /// Total number of words that were requested.
        words: usize,
    },
    /// The free stack could not obtain room for its slot indices.
    #[error("failed to allocate room for {indices} free slot indices")]
    IndexAllocationFailed {
        /// Total number of indices the stack needed to hold.
        indices: usize,
    },
    /// Growth would take the pool past its slot ceiling.
    #[error("pool capacity exceeded: requested {requested} slots, limit {limit}")]
    CapacityExceeded {
        /// Slot count the growth would have produced.
        requested: u64,
        /// Maximum slot count allowed.
        limit: u64,
    },
    /// Construction parameters were rejected.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(&'static str),
    /// A previous growth failure invalidated the pool.
    #[error("pool is invalid after a failed growth")]
    Invalid,
    /// In-place mutation was requested on a slot with more than one reference.
    #[error("slot {0:?} is shared and cannot be changed in place")]
    Shared(Alloc),
}
