//! Hashed-container suites: chaining and both open-addressing probes.

use alder::hash::{ChainedHash, DoubleHash, HashedSet, LinearProbe, OpenHash};
use alder::testing::*;

#[test]
fn chained_bulk_insert_lookup_remove() {
    // large-volume round trip: full hit rate, then full miss rate
    let keys = distinct_keys(&mut rng(42), 10_000, u64::MAX);
    let mut h = ChainedHash::new();
    for &k in &keys {
        h.insert(k).unwrap();
    }
    assert_eq!(h.len(), 10_000);
    assert!(keys.iter().all(|k| h.contains(k)));
    for &k in &keys {
        assert_eq!(h.remove(&k), Some(k));
    }
    assert_eq!(h.len(), 0);
    assert!(keys.iter().all(|k| !h.contains(k)));
}

#[test]
fn chained_rehash_preserves_the_live_set() {
    let keys = distinct_keys(&mut rng(7), 500, 1 << 32);
    let mut h = ChainedHash::new();
    for &k in &keys {
        h.insert(k).unwrap();
    }
    let before = h.capacity();
    h.rehash(4 * before).unwrap();
    assert!(h.capacity() >= 4 * before);
    assert!(keys.iter().all(|k| h.contains(k)));
    assert_eq!(h.len(), 500);
}

#[test]
fn chained_supports_duplicates() {
    let mut h = ChainedHash::new();
    for _ in 0..4 {
        h.insert_dup(9u32).unwrap();
    }
    assert_eq!(h.len(), 4);
    let mut removed = 0;
    while h.remove(&9).is_some() {
        removed += 1;
    }
    assert_eq!(removed, 4);
}

fn open_addressing_round_trip<P: alder::hash::ProbeSeq>() {
    let keys = distinct_keys(&mut rng(13), 2_000, u64::MAX);
    let mut h: OpenHash<u64, P> = OpenHash::new();
    for &k in &keys {
        h.insert(k).unwrap();
    }
    assert_eq!(h.len(), 2_000);
    assert!(h.load_factor() <= 0.7 + f64::EPSILON);
    assert!(keys.iter().all(|k| h.contains(k)));
    // interleave removals and fresh inserts to exercise Deleted markers
    for &k in keys.iter().take(1_000) {
        assert_eq!(h.remove(&k), Some(k));
    }
    assert!(keys.iter().skip(1_000).all(|k| h.contains(k)));
    let fresh = distinct_keys(&mut rng(14), 500, 1 << 20);
    for &k in &fresh {
        if !h.contains(&k) {
            h.insert(k).unwrap();
        }
    }
    h.rehash(h.len()).unwrap();
    assert!(keys.iter().skip(1_000).all(|k| h.contains(k)));
}

#[test]
fn linear_probe_round_trip() {
    open_addressing_round_trip::<LinearProbe>();
}

#[test]
fn double_hash_round_trip() {
    open_addressing_round_trip::<DoubleHash>();
}

#[test]
fn open_addressing_rejects_duplicates_and_dup_inserts() {
    let mut h: OpenHash<u32> = OpenHash::new();
    h.insert(5).unwrap();
    assert!(matches!(h.insert(5), Err(alder::Error::Duplicate)));
    assert!(matches!(h.insert_dup(5), Err(alder::Error::Domain(_))));
}

#[test]
fn shrink_band_is_opt_in() {
    let mut h: OpenHash<u64> = OpenHash::with_capacity(64);
    h.set_shrink(true);
    for k in 0..200u64 {
        h.insert(k).unwrap();
    }
    let grown = h.capacity();
    for k in 0..195u64 {
        h.remove(&k);
    }
    assert!(h.capacity() < grown, "shrink should have kicked in");
    for k in 195..200u64 {
        assert!(h.contains(&k));
    }
}
