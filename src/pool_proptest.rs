#![cfg(test)]

// Property tests for MantissaPool kept inside the crate so they can read
// slot reference counts directly.

use crate::config::PoolConfig;
use crate::pool::{Alloc, MantissaPool};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
enum Op {
    New,
    Share(usize),
    Release(usize),
    Write(usize, u32),
    MakeMut(usize, u32),
}

prop_compose! {
    fn arb_ops()(ops in proptest::collection::vec(
        prop_oneof![
            3 => Just(Op::New),
            2 => any::<usize>().prop_map(Op::Share),
            3 => any::<usize>().prop_map(Op::Release),
            2 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::Write(i, v)),
            1 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::MakeMut(i, v)),
        ], 1..200)) -> Vec<Op> { ops }
}

// State machine over MantissaPool. The model tracks every outstanding
// handle (with repeats for shared references) and the expected payload of
// each live slot.
proptest! {
    #[test]
    fn prop_state_machine(
        initial in 1u32..8,
        step in 1u32..8,
        ops in arb_ops(),
    ) {
        let cfg = PoolConfig::new(3).with_initial_count(initial).with_growth_step(step);
        let mut sut = MantissaPool::with_config(cfg).expect("pool");
        let mut held: Vec<Alloc> = Vec::new();
        let mut model: HashMap<Alloc, [u32; 2]> = HashMap::new();

        for op in ops {
            match op {
                Op::New => {
                    let h = sut.new_alloc().expect("unbounded pool grows");
                    prop_assert!(!model.contains_key(&h), "fresh handle aliases a live slot");
                    prop_assert!(sut.alloc_can_be_changed(h));
                    model.insert(h, [0, 0]);
                    sut.payload_mut(h).expect("fresh handle is exclusive").fill(0);
                    held.push(h);
                }
                Op::Share(i) => {
                    if held.is_empty() { continue; }
                    let h = held[i % held.len()];
                    let h2 = sut.reference_alloc(h);
                    prop_assert_eq!(h, h2);
                    prop_assert!(!sut.alloc_can_be_changed(h));
                    held.push(h2);
                }
                Op::Release(i) => {
                    if held.is_empty() { continue; }
                    let h = held.swap_remove(i % held.len());
                    let before = sut.free_count();
                    sut.release_alloc(h);
                    if held.contains(&h) {
                        prop_assert_eq!(sut.free_count(), before);
                    } else {
                        prop_assert_eq!(sut.free_count(), before + 1);
                        model.remove(&h);
                        // LIFO: the slot just freed is the next one handed out.
                        let again = sut.new_alloc().expect("free slot available");
                        prop_assert_eq!(again, h);
                        sut.release_alloc(again);
                    }
                }
                Op::Write(i, v) => {
                    if held.is_empty() { continue; }
                    let h = held[i % held.len()];
                    let exclusive = sut.alloc_can_be_changed(h);
                    match sut.payload_mut(h) {
                        Ok(words) => {
                            prop_assert!(exclusive);
                            words[0] = v;
                            model.get_mut(&h).expect("live")[0] = v;
                        }
                        Err(_) => prop_assert!(!exclusive),
                    }
                }
                Op::MakeMut(i, v) => {
                    if held.is_empty() { continue; }
                    let idx = i % held.len();
                    let h = held[idx];
                    let old = model[&h];
                    let m = sut.make_mut(h).expect("unbounded pool grows");
                    prop_assert!(sut.alloc_can_be_changed(m));
                    sut.payload_mut(m).expect("exclusive after make_mut")[1] = v;
                    held[idx] = m;
                    let mut new = old;
                    new[1] = v;
                    if m != h {
                        prop_assert_eq!(sut.payload(h), &old[..], "source slot untouched by copy");
                    }
                    model.insert(m, new);
                }
            }

            // Post-conditions after each op
            let live: HashSet<Alloc> = held.iter().copied().collect();
            prop_assert_eq!(sut.free_count() + live.len() as u32, sut.size());
            prop_assert_eq!(sut.live_count() as usize, live.len());
            for h in &live {
                let refs = held.iter().filter(|x| *x == h).count() as u32;
                prop_assert_eq!(sut.ref_count(*h), refs);
                prop_assert_eq!(sut.payload(*h), &model[h][..]);
            }
        }
    }
}
