//! Priority queues.
//!
//! - [`BinHeap`](binheap::BinHeap): dynamic binary min-heap over
//!   [`DynArray`](crate::dynarray::DynArray); the workhorse queue for the
//!   path algorithms and the timeout scheduler.
//! - [`PairingHeap`](pairing::PairingHeap): arena-backed meldable heap with
//!   stable handles and `decrease_key`; drives Prim's spanning tree.
//!
//! Max-heap behaviour comes from wrapping elements in
//! [`std::cmp::Reverse`]; payloads that should not participate in the order
//! ride in [`Keyed`](crate::order::Keyed).

pub mod binheap;
pub mod pairing;

pub use binheap::BinHeap;
pub use pairing::{Handle, PairingHeap};

/// Minimal contract shared by both queue flavours.
pub trait PriorityQueue<T: Ord> {
    /// Number of queued elements.
    fn len(&self) -> usize;

    /// `true` when nothing is queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The minimum element, if any.
    fn peek(&self) -> Option<&T>;

    /// Remove and return the minimum element.
    fn pop(&mut self) -> Option<T>;
}
