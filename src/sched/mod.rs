//! Concurrent runtime: the monotonic timeout queue and the queue-driven
//! worker pool.
//!
//! Both components follow the same locking discipline: one mutex guards
//! the shared queue and status flags, condition variables carry the
//! wakeups, and the mutex is **released across user-code execution**, so
//! closures and consumers may safely call back into the component
//! (rescheduling themselves, cancelling, putting follow-up work).

pub mod pool;
pub mod timer;

pub use pool::{Consumer, PutError, WorkQueuePool};
pub use timer::{Event, EventStatus, TimeoutQueue};
