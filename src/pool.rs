//! MantissaPool: reference-counted fixed-width blocks over SlotStorage and
//! FreeStack.
//!
//! Word 0 of every slot is the reference count; callers only ever see
//! words `1..precision`. A count of 0 means the index sits in the free
//! stack, a count of 1 means the holder may write in place.

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::free_stack::FreeStack;
use crate::slot_storage::SlotStorage;
use tracing::{debug, trace, warn};

const HEADER: usize = 0;

/// Opaque handle to one slot of a [`MantissaPool`].
///
/// Handles carry no lifetime: every `new_alloc`/`reference_alloc` must be
/// paired with exactly one `release_alloc`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Alloc(u32);

impl Alloc {
    /// Raw slot index, for diagnostics.
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
pub struct MantissaPool {
    buf: SlotStorage,
    free: FreeStack,
    grow: u32,
    max_slots: Option<u32>,
    valid: bool,
}

impl MantissaPool {
    /// Pool of `precision`-word slots with the default sizes.
    pub fn new(precision: u32) -> Result<Self, PoolError> {
        Self::with_config(PoolConfig::new(precision))
    }

    pub fn with_config(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let buf = SlotStorage::new(config.initial_count, config.precision).inspect_err(|e| {
            warn!(error = %e, "slot storage allocation failed");
        })?;
        let free = FreeStack::new(config.initial_count).inspect_err(|e| {
            warn!(error = %e, "free stack allocation failed");
        })?;
        debug!(
            precision = config.precision,
            slots = config.initial_count,
            growth_step = config.growth_step,
            "mantissa pool created"
        );
        Ok(Self {
            buf,
            free,
            grow: config.growth_step,
            max_slots: config.max_slots,
            valid: true,
        })
    }

    /// False once a growth attempt failed; the pool must not be used for
    /// new allocations afterwards.
    pub fn is_valid(&self) -> bool {
        self.valid && self.buf.is_valid() && self.free.is_valid()
    }

    pub fn free_count(&self) -> u32 {
        self.free.count()
    }

    pub fn size(&self) -> u32 {
        self.free.size()
    }

    /// Words per slot, header included.
    pub fn precision(&self) -> u32 {
        self.buf.precision()
    }

    /// Words visible through a handle.
    pub fn payload_len(&self) -> usize {
        self.buf.precision() as usize - 1
    }

    /// Slots currently held by at least one handle.
    pub fn live_count(&self) -> u32 {
        self.size() - self.free_count()
    }

    /// Growth step clamped to the slot ceiling. Hitting the ceiling is not a
    /// substrate failure and leaves the pool valid.
    fn next_step(&self) -> Result<u32, PoolError> {
        let size = self.size();
        match self.max_slots {
            Some(limit) if size >= limit => Err(PoolError::CapacityExceeded {
                requested: size as u64 + self.grow as u64,
                limit: limit as u64,
            }),
            Some(limit) => Ok(self.grow.min(limit - size)),
            None => Ok(self.grow),
        }
    }

    fn grow_slots(&mut self, step: u32) -> Result<(), PoolError> {
        let size = self.size();
        self.buf.grow(step)?;
        self.free.grow(step)?;
        debug!(from = size, to = self.size(), "mantissa pool grown");
        Ok(())
    }

    fn get(&mut self) -> Result<u32, PoolError> {
        if self.free.is_empty() {
            let step = self.next_step()?;
            if let Err(e) = self.grow_slots(step) {
                warn!(size = self.size(), error = %e, "mantissa pool invalidated");
                self.valid = false;
                return Err(e);
            }
        }
        let index = self.free.pop();
        trace!(index, "slot reused");
        Ok(index)
    }

    fn free(&mut self, index: u32) {
        debug_assert_eq!(self.buf.slot(index)[HEADER], 0);
        trace!(index, "slot freed");
        self.free.push(index);
    }

    /// Obtain a fresh handle with exclusive ownership (refcount 1), growing
    /// the pool by its growth step when no slot is free.
    pub fn new_alloc(&mut self) -> Result<Alloc, PoolError> {
        if !self.is_valid() {
            return Err(PoolError::Invalid);
        }
        let index = self.get()?;
        self.buf.slot_mut(index)[HEADER] = 1;
        Ok(Alloc(index))
    }

    /// Take another reference to the same slot. No payload is copied.
    pub fn reference_alloc(&mut self, alloc: Alloc) -> Alloc {
        let header = &mut self.buf.slot_mut(alloc.0)[HEADER];
        assert!(*header > 0, "reference to released slot {}", alloc.0);
        let n = header.wrapping_add(1);
        if n == 0 {
            // Same policy as Rc: abort rather than continue with a wrapped count.
            std::process::abort();
        }
        *header = n;
        alloc
    }

    /// Drop one reference; the slot returns to the free stack at zero.
    ///
    /// # Panics
    ///
    /// Panics on a double release (refcount already zero).
    pub fn release_alloc(&mut self, alloc: Alloc) {
        let header = &mut self.buf.slot_mut(alloc.0)[HEADER];
        assert!(*header > 0, "double release of slot {}", alloc.0);
        *header -= 1;
        if *header == 0 {
            self.free(alloc.0);
        }
    }

    /// True iff `alloc` is the only reference to its slot.
    pub fn alloc_can_be_changed(&self, alloc: Alloc) -> bool {
        self.ref_count(alloc) == 1
    }

    pub(crate) fn ref_count(&self, alloc: Alloc) -> u32 {
        self.buf.slot(alloc.0)[HEADER]
    }

    /// Payload words of `alloc`; the header is not included.
    pub fn payload(&self, alloc: Alloc) -> &[u32] {
        debug_assert!(self.ref_count(alloc) > 0, "read of released slot");
        &self.buf.slot(alloc.0)[HEADER + 1..]
    }

    /// Mutable payload words, available only while `alloc` is unshared.
    pub fn payload_mut(&mut self, alloc: Alloc) -> Result<&mut [u32], PoolError> {
        match self.ref_count(alloc) {
            0 => panic!("write to released slot {}", alloc.0),
            1 => Ok(&mut self.buf.slot_mut(alloc.0)[HEADER + 1..]),
            _ => Err(PoolError::Shared(alloc)),
        }
    }

    /// Fresh exclusive handle holding a copy of `alloc`'s payload.
    pub fn duplicate(&mut self, alloc: Alloc) -> Result<Alloc, PoolError> {
        assert!(self.ref_count(alloc) > 0, "copy of released slot {}", alloc.0);
        let copy = self.new_alloc()?;
        self.buf.copy_slot(alloc.0, copy.0);
        self.buf.slot_mut(copy.0)[HEADER] = 1;
        Ok(copy)
    }

    /// Copy-on-write: return a handle that may be written in place.
    ///
    /// An unshared `alloc` is returned as is. Otherwise the payload is copied
    /// into a new slot, `alloc` is released and the new handle returned. On
    /// error `alloc` is left untouched.
    pub fn make_mut(&mut self, alloc: Alloc) -> Result<Alloc, PoolError> {
        assert!(self.ref_count(alloc) > 0, "copy of released slot {}", alloc.0);
        if self.alloc_can_be_changed(alloc) {
            return Ok(alloc);
        }
        let copy = self.duplicate(alloc)?;
        self.release_alloc(alloc);
        Ok(copy)
    }
}
