use mantissa_pool::{Block, PoolConfig, RcPool};
use proptest::prelude::*;

// Model operations on RcPool and assert slot occupancy matches outstanding blocks.
proptest! {
    #[test]
    fn prop_rc_pool_liveness(groups in 1usize..=5, ops in proptest::collection::vec((0u8..=4u8, 0usize..100usize), 1..100)) {
        let p = RcPool::new(PoolConfig::new(2).with_initial_count(2).with_growth_step(3)).unwrap();
        // Each group holds clones of a single slot.
        let mut live: Vec<Vec<Block>> = std::iter::repeat_with(Vec::new).take(groups).collect();

        for (op, raw_g) in ops {
            let g = raw_g % groups;
            match op {
                // Allocate a slot for an empty group
                0 => {
                    if live[g].is_empty() {
                        let mut b = p.alloc().unwrap();
                        b.write().unwrap()[0] = g as u32;
                        live[g].push(b);
                    }
                }
                // Clone one existing Block for this group
                1 => {
                    if let Some(existing) = live[g].last() {
                        let cloned = existing.clone();
                        live[g].push(cloned);
                    }
                }
                // Drop one existing Block for this group
                2 => {
                    if let Some(b) = live[g].pop() { drop(b); }
                }
                // Drop all Blocks for the group
                3 => {
                    live[g].clear();
                }
                // Check sharing state and contents
                4 => {
                    if let Some(b) = live[g].first() {
                        prop_assert_eq!(b.is_unique(), live[g].len() == 1);
                        prop_assert_eq!(b.read()[0], g as u32);
                    }
                }
                _ => unreachable!(),
            }

            // Invariant after each step: occupied slots == non-empty groups
            let occupied = live.iter().filter(|v| !v.is_empty()).count() as u32;
            prop_assert_eq!(p.size() - p.free_count(), occupied);
        }

        live.clear();
        prop_assert_eq!(p.free_count(), p.size());
    }
}
