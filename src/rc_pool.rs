use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::pool::{Alloc, MantissaPool};
use core::cell::{Ref, RefCell, RefMut};
use core::hash::{Hash, Hasher};
use std::rc::Rc;

/// Shared owner of a [`MantissaPool`] that hands out self-releasing
/// [`Block`]s.
pub struct RcPool {
    inner: Rc<RefCell<MantissaPool>>, // single-threaded interior mutability
}

impl RcPool {
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        Ok(Self {
            inner: Rc::new(RefCell::new(MantissaPool::with_config(config)?)),
        })
    }

    /// Allocate a block with exclusive ownership.
    pub fn alloc(&self) -> Result<Block, PoolError> {
        let alloc = self.inner.borrow_mut().new_alloc()?;
        Ok(Block::new(self.inner.clone(), alloc))
    }

    pub fn is_valid(&self) -> bool {
        self.inner.borrow().is_valid()
    }
    pub fn free_count(&self) -> u32 {
        self.inner.borrow().free_count()
    }
    pub fn size(&self) -> u32 {
        self.inner.borrow().size()
    }
    pub fn precision(&self) -> u32 {
        self.inner.borrow().precision()
    }
}

/// A reference to one pool slot. Clone shares the slot (refcount +1);
/// dropping releases it and frees the slot when the count reaches zero.
///
/// The accessors borrow the owning pool. Dropping or cloning another block
/// of the same pool while a guard from `read`/`write`/`make_mut` is alive
/// panics.
pub struct Block {
    owner: Rc<RefCell<MantissaPool>>, // keep owner alive
    alloc: Alloc,
}

impl Block {
    fn new(owner: Rc<RefCell<MantissaPool>>, alloc: Alloc) -> Self {
        Self { owner, alloc }
    }

    pub fn alloc(&self) -> Alloc {
        self.alloc
    }

    /// True when no other block shares this slot.
    pub fn is_unique(&self) -> bool {
        self.owner.borrow().alloc_can_be_changed(self.alloc)
    }

    pub fn read(&self) -> Ref<'_, [u32]> {
        Ref::map(self.owner.borrow(), |p| p.payload(self.alloc))
    }

    /// Write access when unshared; `PoolError::Shared` otherwise.
    pub fn write(&mut self) -> Result<RefMut<'_, [u32]>, PoolError> {
        let alloc = self.alloc;
        RefMut::filter_map(self.owner.borrow_mut(), |p| p.payload_mut(alloc).ok())
            .map_err(|_| PoolError::Shared(alloc))
    }

    /// Write access, first moving this block onto a private copy if the slot
    /// is shared.
    pub fn make_mut(&mut self) -> Result<RefMut<'_, [u32]>, PoolError> {
        self.alloc = self.owner.borrow_mut().make_mut(self.alloc)?;
        self.write()
    }
}

impl Clone for Block {
    fn clone(&self) -> Self {
        let alloc = self.owner.borrow_mut().reference_alloc(self.alloc);
        Self {
            owner: self.owner.clone(),
            alloc,
        }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        self.owner.borrow_mut().release_alloc(self.alloc);
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.owner, &other.owner) && self.alloc == other.alloc
    }
}

impl Eq for Block {}

impl Hash for Block {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.owner) as usize).hash(state);
        self.alloc.hash(state);
    }
}

impl core::fmt::Debug for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Block").field("alloc", &self.alloc).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_and_drop_releases() {
        let pool = RcPool::new(PoolConfig::new(3).with_initial_count(4)).unwrap();
        let a = pool.alloc().unwrap();
        assert!(a.is_unique());
        let b = a.clone();
        assert!(!a.is_unique());
        assert_eq!(a, b);
        assert_eq!(pool.free_count(), 3);
        drop(b);
        assert!(a.is_unique());
        drop(a);
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    fn block_outlives_pool_handle() {
        let pool = RcPool::new(PoolConfig::new(2).with_initial_count(1)).unwrap();
        let mut a = pool.alloc().unwrap();
        drop(pool);
        a.write().unwrap()[0] = 5;
        assert_eq!(&*a.read(), &[5]);
    }
}
