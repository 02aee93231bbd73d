//! Open-addressing hash table with pluggable probe sequences.
//!
//! A slot is `Empty`, `Busy` or `Deleted`. Removal leaves a `Deleted`
//! marker so longer probe chains stay intact; rehashing purges the
//! markers. Two probe strategies:
//! - [`LinearProbe`]: `h(k), h(k)+1, h(k)+2, ...`
//! - [`DoubleHash`]: stride `1 + h2(k) mod (m-1)` from an independently
//!   seeded second hash family; the table size is prime, so the stride is
//!   always coprime with it and the probe sequence visits every slot.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::hash::{DEFAULT_LOWER, DEFAULT_UPPER_OPEN, HashedSet, primes};

/// Probe-stride policy for [`OpenHash`].
pub trait ProbeSeq {
    /// Distance between consecutive probes for a table of prime size `m`.
    fn stride(h2: u64, m: usize) -> usize;
}

/// Linear probing: consecutive slots.
#[derive(Default, Clone, Copy, Debug)]
pub struct LinearProbe;

impl ProbeSeq for LinearProbe {
    fn stride(_h2: u64, _m: usize) -> usize {
        1
    }
}

/// Double hashing: the second hash picks the stride.
#[derive(Default, Clone, Copy, Debug)]
pub struct DoubleHash;

impl ProbeSeq for DoubleHash {
    fn stride(h2: u64, m: usize) -> usize {
        // in [1, m-1]; coprime with the prime m
        1 + (h2 % (m as u64 - 1)) as usize
    }
}

enum Slot<K> {
    Empty,
    Busy(K),
    Deleted,
}

/// Open-addressed hash set.
pub struct OpenHash<K, P = LinearProbe, S = RandomState> {
    slots: Vec<Slot<K>>,
    len: usize,
    deleted: usize,
    build1: S,
    build2: RandomState,
    lower: f64,
    upper: f64,
    shrink: bool,
    min_slots: usize,
    _probe: PhantomData<P>,
}

impl<K: Hash + Eq, P: ProbeSeq> OpenHash<K, P> {
    /// An empty table with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// An empty table with at least `cap` slots (rounded up the prime
    /// ladder).
    pub fn with_capacity(cap: usize) -> Self {
        Self::with_capacity_and_hasher(cap, RandomState::new())
    }
}

impl<K: Hash + Eq, P: ProbeSeq, S: BuildHasher> OpenHash<K, P, S> {
    /// An empty table using `build` as its first hash family; the second
    /// family (for [`DoubleHash`]) is seeded independently.
    pub fn with_capacity_and_hasher(cap: usize, build: S) -> Self {
        let m = primes::next_prime(cap.max(1)).unwrap_or(primes::LADDER[0]);
        let mut slots = Vec::with_capacity(m);
        slots.resize_with(m, || Slot::Empty);
        Self {
            slots,
            len: 0,
            deleted: 0,
            build1: build,
            build2: RandomState::new(),
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER_OPEN,
            shrink: false,
            min_slots: m,
            _probe: PhantomData,
        }
    }

    /// Enable or disable shrinking below the lower load bound.
    pub fn set_shrink(&mut self, on: bool) {
        self.shrink = on;
    }

    fn start_and_stride(&self, key: &K) -> (usize, usize) {
        let m = self.slots.len();
        let h1 = self.build1.hash_one(key);
        let h2 = self.build2.hash_one(key);
        ((h1 % m as u64) as usize, P::stride(h2, m))
    }

    /// Index of the `Busy` slot holding `key`, if present.
    fn find_slot(&self, key: &K) -> Option<usize> {
        let m = self.slots.len();
        let (mut pos, stride) = self.start_and_stride(key);
        for _ in 0..m {
            match &self.slots[pos] {
                Slot::Empty => return None,
                Slot::Busy(k) if k == key => return Some(pos),
                _ => pos = (pos + stride) % m,
            }
        }
        None
    }

    /// Move every live key into a fresh slot array of size `m`, purging
    /// `Deleted` markers.
    fn move_all_into(&mut self, m: usize) {
        let old = std::mem::replace(&mut self.slots, Vec::new());
        self.slots = Vec::with_capacity(m);
        self.slots.resize_with(m, || Slot::Empty);
        self.deleted = 0;
        for slot in old {
            if let Slot::Busy(k) = slot {
                let (mut pos, stride) = self.start_and_stride(&k);
                loop {
                    if matches!(self.slots[pos], Slot::Empty) {
                        self.slots[pos] = Slot::Busy(k);
                        break;
                    }
                    pos = (pos + stride) % m;
                }
            }
        }
    }

    fn grow(&mut self) -> Result<()> {
        let m = primes::next_prime(self.slots.len() * 2).ok_or(Error::CapacityExhausted)?;
        self.move_all_into(m);
        Ok(())
    }

    fn shrink_if_needed(&mut self) {
        if self.shrink
            && self.slots.len() > self.min_slots
            && self.load_factor() < self.lower
            && let Some(m) = primes::prev_prime(self.slots.len() / 2)
        {
            self.move_all_into(m.max(self.min_slots));
        }
    }

    /// Iterate the stored keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.slots.iter().filter_map(|s| match s {
            Slot::Busy(k) => Some(k),
            _ => None,
        })
    }
}

impl<K: Hash + Eq, P: ProbeSeq, S: BuildHasher> HashedSet<K> for OpenHash<K, P, S> {
    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn search(&self, key: &K) -> Option<&K> {
        let pos = self.find_slot(key)?;
        match &self.slots[pos] {
            Slot::Busy(k) => Some(k),
            _ => unreachable!("find_slot returns busy slots"),
        }
    }

    fn insert(&mut self, key: K) -> Result<()> {
        // Keep occupancy (live + markers) inside the band before probing.
        if (self.len + self.deleted + 1) as f64 / self.slots.len() as f64 > self.upper {
            self.grow()?;
        }
        let m = self.slots.len();
        let (mut pos, stride) = self.start_and_stride(&key);
        let mut reuse: Option<usize> = None;
        enum Probe {
            Dup,
            Occupied,
            Tombstone,
            Free,
        }
        for _ in 0..m {
            let probe = match &self.slots[pos] {
                Slot::Busy(k) if *k == key => Probe::Dup,
                Slot::Busy(_) => Probe::Occupied,
                Slot::Deleted => Probe::Tombstone,
                Slot::Empty => Probe::Free,
            };
            match probe {
                Probe::Dup => return Err(Error::Duplicate),
                Probe::Free => {
                    let target = reuse.unwrap_or(pos);
                    if matches!(self.slots[target], Slot::Deleted) {
                        self.deleted -= 1;
                    }
                    self.slots[target] = Slot::Busy(key);
                    self.len += 1;
                    return Ok(());
                }
                Probe::Tombstone => {
                    if reuse.is_none() {
                        reuse = Some(pos);
                    }
                    pos = (pos + stride) % m;
                }
                Probe::Occupied => pos = (pos + stride) % m,
            }
        }
        // The whole probe cycle is busy or deleted.
        if let Some(target) = reuse {
            self.slots[target] = Slot::Busy(key);
            self.deleted -= 1;
            self.len += 1;
            return Ok(());
        }
        Err(Error::CapacityExhausted)
    }

    fn insert_dup(&mut self, _key: K) -> Result<()> {
        Err(Error::Domain("open addressing cannot store duplicate keys"))
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        let pos = self.find_slot(key)?;
        let slot = std::mem::replace(&mut self.slots[pos], Slot::Deleted);
        let Slot::Busy(k) = slot else {
            unreachable!("find_slot returns busy slots");
        };
        self.len -= 1;
        self.deleted += 1;
        self.shrink_if_needed();
        Some(k)
    }

    fn rehash(&mut self, new_capacity: usize) -> Result<()> {
        let m = primes::next_prime(new_capacity.max(self.len)).ok_or(Error::CapacityExhausted)?;
        self.move_all_into(m);
        Ok(())
    }
}

impl<K: Hash + Eq, P: ProbeSeq> Default for OpenHash<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P, S> std::fmt::Debug for OpenHash<K, P, S>
where
    K: Hash + Eq + std::fmt::Debug,
    P: ProbeSeq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
