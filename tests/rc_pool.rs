use mantissa_pool::{PoolConfig, PoolError, RcPool};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn pool(initial: u32) -> RcPool {
    RcPool::new(PoolConfig::new(4).with_initial_count(initial).with_growth_step(2)).unwrap()
}

// Test: block liveness under alloc/clone/drop.
// Verifies: the slot is freed when the last Block is dropped.
#[test]
fn alloc_clone_drop_frees() {
    let p = pool(4);
    let a = p.alloc().expect("alloc ok");
    assert_eq!(p.free_count(), 3);

    let b = a.clone();
    let c = b.clone();
    drop(a);
    assert_eq!(p.free_count(), 3);
    drop(b);
    assert!(c.is_unique());
    drop(c);
    assert_eq!(p.free_count(), 4);
}

// Test: write is refused while shared, make_mut detaches instead.
#[test]
fn copy_on_write() {
    let p = pool(4);
    let mut a = p.alloc().unwrap();
    a.write().unwrap().copy_from_slice(&[1, 2, 3]);

    let mut b = a.clone();
    assert!(matches!(b.write(), Err(PoolError::Shared(_))));

    b.make_mut().unwrap()[0] = 9;
    assert_ne!(a, b);
    assert_eq!(&*a.read(), &[1, 2, 3]);
    assert_eq!(&*b.read(), &[9, 2, 3]);
    assert!(a.is_unique());
    assert!(b.is_unique());
    assert_eq!(p.free_count(), 2);
}

// Test: make_mut on a unique block keeps the slot.
#[test]
fn make_mut_unique_in_place() {
    let p = pool(2);
    let mut a = p.alloc().unwrap();
    let before = a.alloc();
    a.make_mut().unwrap()[2] = 5;
    assert_eq!(a.alloc(), before);
    assert_eq!(a.read()[2], 5);
}

// Test: Block equality and hashing follow (pool, slot) identity.
#[test]
fn block_equality_and_hash() {
    let p = pool(4);
    let a = p.alloc().unwrap();
    let a2 = a.clone();
    assert!(a == a2);

    let mut h1 = DefaultHasher::new();
    a.hash(&mut h1);
    let mut h2 = DefaultHasher::new();
    a2.hash(&mut h2);
    assert_eq!(h1.finish(), h2.finish());

    let b = p.alloc().unwrap();
    assert!(a != b);

    // Same slot index in a different pool is a different block.
    let q = pool(4);
    let other = q.alloc().unwrap();
    assert_eq!(other.alloc(), a.alloc());
    assert!(a != other);
}

// Test: the RAII layer grows the pool like the raw API.
#[test]
fn blocks_grow_pool() {
    let p = pool(2);
    let held: Vec<_> = (0..5).map(|_| p.alloc().unwrap()).collect();
    assert_eq!(p.size(), 6);
    assert_eq!(p.free_count(), 1);
    drop(held);
    assert_eq!(p.free_count(), 6);
    assert!(p.is_valid());
    assert_eq!(p.precision(), 4);
}
