//! Hashed keyed containers.
//!
//! Two families behind one [`HashedSet`] contract:
//! - [`ChainedHash`](chained::ChainedHash): separate chaining over
//!   [`SList`](crate::slist::SList) buckets; admits duplicates.
//! - [`OpenHash`](open::OpenHash): open addressing with a pluggable probe
//!   sequence ([`LinearProbe`](open::LinearProbe) or
//!   [`DoubleHash`](open::DoubleHash)); one key per slot, `Deleted`
//!   markers keep probe chains intact until a rehash purges them.
//!
//! Both resize by a load-factor band: crossing the upper bound grows to the
//! next prime at least twice the current size; crossing the lower bound
//! shrinks (only when enabled) to the previous prime at most half of it.
//! Table sizes always come from the prime ladder in [`primes`], which is
//! what makes the double-hash stride coprime with the size.

use std::hash::Hash;

use crate::error::Result;

pub mod chained;
pub mod open;
pub mod primes;

pub use chained::ChainedHash;
pub use open::{DoubleHash, LinearProbe, OpenHash, ProbeSeq};

/// Default load-factor band.
pub const DEFAULT_LOWER: f64 = 0.2;
/// Default upper load factor for chained tables.
pub const DEFAULT_UPPER_CHAINED: f64 = 0.8;
/// Default upper load factor for open-addressed tables.
pub const DEFAULT_UPPER_OPEN: f64 = 0.7;

/// The keyed-container contract minus the ordered operations.
pub trait HashedSet<K: Hash + Eq> {
    /// Number of stored keys.
    fn len(&self) -> usize;

    /// `true` when nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current number of slots / buckets.
    fn capacity(&self) -> usize;

    /// Current load factor `len / capacity`.
    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Reference to the stored key equal to `key`, if present.
    fn search(&self, key: &K) -> Option<&K>;

    /// `true` when an equal key is stored.
    fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Strict insertion; fails with [`Error::Duplicate`](crate::Error) on
    /// an equal key, and with
    /// [`Error::CapacityExhausted`](crate::Error) when a full
    /// open-addressed table cannot grow.
    fn insert(&mut self, key: K) -> Result<()>;

    /// Insertion admitting duplicates. Chained tables append to the
    /// bucket; open addressing fails with a domain error.
    fn insert_dup(&mut self, key: K) -> Result<()>;

    /// Remove and return one occurrence of `key`.
    fn remove(&mut self, key: &K) -> Option<K>;

    /// Re-bucket every live key into at least `new_capacity` slots
    /// (rounded up the prime ladder).
    fn rehash(&mut self, new_capacity: usize) -> Result<()>;
}
