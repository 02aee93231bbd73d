//! Priority-queue suites.

use alder::testing::*;
use alder::{BinHeap, Keyed, PairingHeap, PriorityQueue};

#[test]
fn binheap_drains_sorted() {
    let mut h: BinHeap<u64> = shuffled(99, 1_000).into_iter().collect();
    let mut out = Vec::with_capacity(1_000);
    while let Some(v) = h.pop() {
        out.push(v);
    }
    assert_sorted(&out);
    assert_eq!(out.len(), 1_000);
}

#[test]
fn binheap_peek_tracks_the_minimum() {
    let keys = shuffled(3, 200);
    let mut h = BinHeap::new();
    let mut live: Vec<u64> = Vec::new();
    for (i, &k) in keys.iter().enumerate() {
        h.push(k);
        live.push(k);
        if i % 3 == 2 {
            let min = *live.iter().min().unwrap();
            assert_eq!(h.peek(), Some(&min));
            assert_eq!(h.pop(), Some(min));
            live.retain(|&x| x != min);
        }
    }
}

#[test]
fn pairing_heap_matches_binheap_order() {
    let keys = shuffled(17, 500);
    let mut bin = BinHeap::new();
    let mut pairing = PairingHeap::new();
    for &k in &keys {
        bin.push(k);
        pairing.push(k);
    }
    loop {
        match (bin.pop(), pairing.pop()) {
            (None, None) => break,
            (a, b) => assert_eq!(a, b),
        }
    }
}

#[test]
fn decrease_key_drives_frontier_updates() {
    // the Prim-style usage: payloads ride in Keyed, priorities shrink
    let mut h = PairingHeap::new();
    let ha = h.push(Keyed::new(40u32, "a"));
    let hb = h.push(Keyed::new(30u32, "b"));
    let _hc = h.push(Keyed::new(20u32, "c"));
    h.decrease_key(ha, Keyed::new(10, "a")).unwrap();
    assert_eq!(h.pop().map(|k| k.item), Some("a"));
    h.decrease_key(hb, Keyed::new(5, "b")).unwrap();
    assert_eq!(h.pop().map(|k| k.item), Some("b"));
    assert_eq!(h.pop().map(|k| k.item), Some("c"));
    assert!(h.is_empty());
}

#[test]
fn meld_empties_the_donor() {
    let mut a: PairingHeap<u64> = (0..50u64).step_by(2).collect();
    let b: PairingHeap<u64> = (1..50u64).step_by(2).collect();
    let _remap = a.meld(b);
    assert_eq!(a.len(), 50);
    let mut out = Vec::new();
    while let Some(v) = a.pop() {
        out.push(v);
    }
    assert_eq!(out, (0..50u64).collect::<Vec<_>>());
}

#[test]
fn binheap_reserve_and_shrink() {
    let mut h: BinHeap<u32> = BinHeap::with_capacity(1_000);
    for i in 0..10 {
        h.push(i);
    }
    h.shrink_to_fit();
    assert_eq!(h.pop(), Some(0));
    assert_eq!(h.len(), 9);
}
