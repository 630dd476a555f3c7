//! mantissa-pool: a single-threaded pool of fixed-width word blocks with
//! manual reference counting and copy-on-write, meant to hold the mantissas
//! of arbitrary-precision numbers.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) allocation and release of uniformly sized blocks from a
//!   growable backing store, with cheap sharing of immutable blocks.
//! - Layers:
//!   - SlotStorage: one contiguous `Vec<u32>` of `count * precision`
//!     words; grows by reallocation and keeps slot indices stable.
//!   - FreeStack: LIFO stack of unused slot indices, grown in lockstep
//!     with SlotStorage.
//!   - MantissaPool: composes the two. Word 0 of each slot is a reference
//!     count hidden from callers; `Alloc` handles are plain indices.
//!   - RcPool / Block: optional RAII layer where `Clone` shares a slot and
//!     `Drop` releases it.
//!
//! Constraints
//! - Single-threaded: mutation requires `&mut MantissaPool`; the RAII layer
//!   is `!Send`/`!Sync` through `Rc`.
//! - A slot with refcount 0 is in the free stack; refcount 1 means the one
//!   holder may write in place; more means readers only.
//! - Freed indices are reused most-recent first. A fresh pool, and every
//!   growth, hands out its new indices in ascending order.
//!
//! Failure semantics
//! - Allocation failures, configuration errors and writes to shared slots
//!   are reported as `PoolError`.
//! - Growth failure is terminal: the pool reports `is_valid() == false` and
//!   refuses new allocations. Existing handles can still be read and
//!   released.
//! - An optional slot ceiling is a soft limit: hitting it returns
//!   `CapacityExceeded` and the pool stays usable.
//! - Caller bugs (out-of-range handle, double release) panic.
//!
//! Overflow semantics
//! - Refcount overflow aborts the process, matching `Rc`.

mod config;
mod error;
mod free_stack;
mod pool;
mod pool_proptest;
mod rc_pool;
mod slot_storage;

// Public surface
pub use config::{PoolConfig, DEFAULT_GROWTH_STEP, DEFAULT_INITIAL_COUNT};
pub use error::PoolError;
pub use free_stack::FreeStack;
pub use pool::{Alloc, MantissaPool};
pub use rc_pool::{Block, RcPool};
pub use slot_storage::SlotStorage;
