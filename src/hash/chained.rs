//! Separate-chaining hash table.
//!
//! Each bucket heads an [`SList`] of keys sharing a hash class. Duplicates
//! are allowed (they share a bucket). Iteration order is unspecified.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use crate::error::{Error, Result};
use crate::hash::{DEFAULT_LOWER, DEFAULT_UPPER_CHAINED, HashedSet, primes};
use crate::slist::SList;

/// Closed-addressing (separate chaining) hash set.
pub struct ChainedHash<K, S = RandomState> {
    buckets: Vec<SList<K>>,
    len: usize,
    build: S,
    lower: f64,
    upper: f64,
    shrink: bool,
    min_buckets: usize,
}

impl<K: Hash + Eq> ChainedHash<K> {
    /// An empty table with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// An empty table with at least `cap` buckets (rounded up the prime
    /// ladder).
    pub fn with_capacity(cap: usize) -> Self {
        Self::with_capacity_and_hasher(cap, RandomState::new())
    }
}

impl<K: Hash + Eq, S: BuildHasher> ChainedHash<K, S> {
    /// An empty table using `build` as its hash family.
    pub fn with_capacity_and_hasher(cap: usize, build: S) -> Self {
        let m = primes::next_prime(cap.max(1)).unwrap_or(primes::LADDER[0]);
        let mut buckets = Vec::with_capacity(m);
        buckets.resize_with(m, SList::new);
        Self {
            buckets,
            len: 0,
            build,
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER_CHAINED,
            shrink: false,
            min_buckets: m,
        }
    }

    /// Enable or disable shrinking when the load factor falls below the
    /// lower bound.
    pub fn set_shrink(&mut self, on: bool) {
        self.shrink = on;
    }

    /// Replace the load-factor band. `lower` must be below `upper`.
    pub fn set_load_band(&mut self, lower: f64, upper: f64) -> Result<()> {
        if !(0.0 < lower && lower < upper) {
            return Err(Error::Domain("invalid load-factor band"));
        }
        self.lower = lower;
        self.upper = upper;
        Ok(())
    }

    fn bucket_of(&self, key: &K) -> usize {
        (self.build.hash_one(key) % self.buckets.len() as u64) as usize
    }

    fn move_all_into(&mut self, m: usize) {
        let old = std::mem::take(&mut self.buckets);
        self.buckets = Vec::with_capacity(m);
        self.buckets.resize_with(m, SList::new);
        for mut chain in old {
            while let Some(k) = chain.pop_front() {
                let b = self.bucket_of(&k);
                self.buckets[b].push_front(k);
            }
        }
    }

    fn grow_if_needed(&mut self) {
        if self.load_factor() > self.upper
            && let Some(m) = primes::next_prime(self.buckets.len() * 2)
        {
            self.move_all_into(m);
        }
    }

    fn shrink_if_needed(&mut self) {
        if self.shrink
            && self.buckets.len() > self.min_buckets
            && self.load_factor() < self.lower
            && let Some(m) = primes::prev_prime(self.buckets.len() / 2)
        {
            self.move_all_into(m.max(self.min_buckets));
        }
    }

    /// Iterate the stored keys in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.buckets.iter().flat_map(|chain| chain.iter())
    }
}

impl<K: Hash + Eq, S: BuildHasher> HashedSet<K> for ChainedHash<K, S> {
    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn search(&self, key: &K) -> Option<&K> {
        self.buckets[self.bucket_of(key)].iter().find(|k| *k == key)
    }

    fn insert(&mut self, key: K) -> Result<()> {
        if self.contains(&key) {
            return Err(Error::Duplicate);
        }
        let b = self.bucket_of(&key);
        self.buckets[b].push_front(key);
        self.len += 1;
        self.grow_if_needed();
        Ok(())
    }

    fn insert_dup(&mut self, key: K) -> Result<()> {
        let b = self.bucket_of(&key);
        self.buckets[b].push_front(key);
        self.len += 1;
        self.grow_if_needed();
        Ok(())
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        let b = self.bucket_of(key);
        let removed = self.buckets[b].remove_first(|k| k == key)?;
        self.len -= 1;
        self.shrink_if_needed();
        Some(removed)
    }

    fn rehash(&mut self, new_capacity: usize) -> Result<()> {
        let m = primes::next_prime(new_capacity.max(1)).ok_or(Error::CapacityExhausted)?;
        self.move_all_into(m);
        Ok(())
    }
}

impl<K: Hash + Eq> Default for ChainedHash<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + std::fmt::Debug, S: BuildHasher> std::fmt::Debug for ChainedHash<K, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_search_remove() {
        let mut h = ChainedHash::new();
        for i in 0..100 {
            h.insert(i).unwrap();
        }
        assert_eq!(h.len(), 100);
        assert!(matches!(h.insert(42), Err(Error::Duplicate)));
        for i in 0..100 {
            assert_eq!(h.search(&i), Some(&i));
        }
        for i in 0..100 {
            assert_eq!(h.remove(&i), Some(i));
        }
        assert!(h.is_empty());
        assert_eq!(h.search(&5), None);
    }

    #[test]
    fn grows_past_the_upper_bound() {
        let mut h = ChainedHash::with_capacity(5);
        let m0 = h.capacity();
        for i in 0..200 {
            h.insert(i).unwrap();
        }
        assert!(h.capacity() > m0);
        assert!(h.load_factor() <= DEFAULT_UPPER_CHAINED + f64::EPSILON);
        for i in 0..200 {
            assert!(h.contains(&i));
        }
    }

    #[test]
    fn duplicates_share_a_bucket() {
        let mut h = ChainedHash::new();
        h.insert_dup(7).unwrap();
        h.insert_dup(7).unwrap();
        h.insert_dup(7).unwrap();
        assert_eq!(h.len(), 3);
        assert_eq!(h.remove(&7), Some(7));
        assert_eq!(h.len(), 2);
        assert!(h.contains(&7));
    }

    #[test]
    fn explicit_rehash_keeps_keys() {
        let mut h = ChainedHash::new();
        for i in 0..50 {
            h.insert(i * 3).unwrap();
        }
        h.rehash(400).unwrap();
        assert!(h.capacity() >= 400);
        for i in 0..50 {
            assert!(h.contains(&(i * 3)));
        }
    }
}
