//! Monotonic timeout queue.
//!
//! A min-priority queue of events keyed by trigger [`Instant`], served by
//! exactly one dispatcher thread. The dispatcher sleeps on a condition
//! variable until the earliest trigger time (or a schedule change), pops
//! due events, and runs their closures **outside** the lock, so a closure
//! may reschedule or cancel events - including itself.
//!
//! Cancellation is lazy: an entry is invalidated by bumping the event's
//! epoch, and the dispatcher skips dead entries when they surface. Events
//! sharing a trigger instant dispatch in schedule order; each scheduled
//! occurrence dispatches exactly once.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::heap::{BinHeap, PriorityQueue};
use crate::order::Keyed;

/// Lifecycle of a scheduled event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventStatus {
    /// Not currently scheduled.
    Ready,
    /// Waiting in the queue for its trigger time.
    InQueue,
    /// Its closure is running right now.
    Executing,
    /// Removed before execution (or voided while executing).
    Canceled,
    /// Will be finalized by the dispatcher when its closure returns.
    ToDelete,
    /// Finalized; the scheduler holds no reference anymore.
    Deleted,
}

type Action = Box<dyn FnMut() + Send>;

struct EventState {
    status: EventStatus,
    /// Bumped on cancel/reschedule; queue entries carry the epoch they
    /// were created under, which is how stale entries are recognized.
    epoch: u64,
}

struct EventCore {
    action: Mutex<Action>,
    state: Mutex<EventState>,
}

/// Handle to a schedulable closure. Cheap to clone; all clones refer to
/// the same event.
pub struct Event {
    core: Arc<EventCore>,
}

impl Event {
    /// Wrap a closure as a schedulable event.
    pub fn new(action: impl FnMut() + Send + 'static) -> Self {
        Self {
            core: Arc::new(EventCore {
                action: Mutex::new(Box::new(action)),
                state: Mutex::new(EventState { status: EventStatus::Ready, epoch: 0 }),
            }),
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> EventStatus {
        self.core.state.lock().unwrap().status
    }
}

impl Clone for Event {
    fn clone(&self) -> Self {
        Self { core: Arc::clone(&self.core) }
    }
}

/// Queue entry payload: the event plus the epoch it was scheduled under.
type Entry = Keyed<(Instant, u64), (Arc<EventCore>, u64)>;

struct SchedState {
    queue: BinHeap<Entry>,
    seq: u64,
    shutdown: bool,
}

struct Inner {
    state: Mutex<SchedState>,
    cond: Condvar,
}

/// Monotonic-time event scheduler with one dispatcher thread.
pub struct TimeoutQueue {
    inner: Arc<Inner>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl TimeoutQueue {
    /// Create the queue and start its dispatcher thread.
    pub fn new() -> Self {
        let inner = Arc::new(Inner {
            state: Mutex::new(SchedState { queue: BinHeap::new(), seq: 0, shutdown: false }),
            cond: Condvar::new(),
        });
        let worker = Arc::clone(&inner);
        let handle = thread::Builder::new()
            .name("timeout-queue-dispatcher".into())
            .spawn(move || dispatch(worker))
            .expect("spawn dispatcher thread");
        Self { inner, dispatcher: Mutex::new(Some(handle)) }
    }

    /// Schedule `event` to fire at `at`. Fails with [`Error::Closed`]
    /// after shutdown and with a domain error when the event is already
    /// queued.
    pub fn schedule_at(&self, event: &Event, at: Instant) -> Result<()> {
        let mut st = self.inner.state.lock().unwrap();
        if st.shutdown {
            return Err(Error::Closed);
        }
        let epoch = {
            let mut es = event.core.state.lock().unwrap();
            if es.status == EventStatus::InQueue {
                return Err(Error::Domain("event is already scheduled"));
            }
            es.status = EventStatus::InQueue;
            es.epoch += 1;
            es.epoch
        };
        st.seq += 1;
        let seq = st.seq;
        st.queue.push(Keyed::new((at, seq), (Arc::clone(&event.core), epoch)));
        self.inner.cond.notify_all();
        Ok(())
    }

    /// Schedule `event` to fire after `delay` from now.
    pub fn schedule_in(&self, event: &Event, delay: Duration) -> Result<()> {
        self.schedule_at(event, Instant::now() + delay)
    }

    /// Cancel a scheduled occurrence. Returns `true` when the event was
    /// dequeued before executing; a currently-executing event is marked
    /// [`EventStatus::Canceled`] but its closure finishes.
    pub fn cancel(&self, event: &Event) -> bool {
        let _st = self.inner.state.lock().unwrap();
        let mut es = event.core.state.lock().unwrap();
        match es.status {
            EventStatus::InQueue => {
                es.status = EventStatus::Canceled;
                es.epoch += 1;
                drop(es);
                self.inner.cond.notify_all();
                true
            }
            EventStatus::Executing => {
                es.status = EventStatus::Canceled;
                false
            }
            _ => false,
        }
    }

    /// Cancel and relinquish the handle. A currently-executing event is
    /// finalized by the dispatcher when its closure returns; otherwise it
    /// is finalized immediately.
    pub fn cancel_delete(&self, event: Event) {
        let _st = self.inner.state.lock().unwrap();
        let mut es = event.core.state.lock().unwrap();
        match es.status {
            EventStatus::Executing => es.status = EventStatus::ToDelete,
            _ => {
                es.status = EventStatus::Deleted;
                es.epoch += 1;
            }
        }
        drop(es);
        self.inner.cond.notify_all();
    }

    /// Atomically cancel any pending occurrence and schedule at `new_at`.
    pub fn reschedule(&self, event: &Event, new_at: Instant) -> Result<()> {
        let mut st = self.inner.state.lock().unwrap();
        if st.shutdown {
            return Err(Error::Closed);
        }
        let epoch = {
            let mut es = event.core.state.lock().unwrap();
            es.status = EventStatus::InQueue;
            es.epoch += 1; // invalidates any queued entry
            es.epoch
        };
        st.seq += 1;
        let seq = st.seq;
        st.queue.push(Keyed::new((new_at, seq), (Arc::clone(&event.core), epoch)));
        self.inner.cond.notify_all();
        Ok(())
    }

    /// Stop accepting events, cancel everything pending, and join the
    /// dispatcher. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut st = self.inner.state.lock().unwrap();
            st.shutdown = true;
            self.inner.cond.notify_all();
        }
        if let Some(handle) = self.dispatcher.lock().unwrap().take() {
            handle.join().expect("dispatcher thread panicked");
        }
    }
}

impl Default for TimeoutQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimeoutQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn dispatch(inner: Arc<Inner>) {
    let mut st = inner.state.lock().unwrap();
    loop {
        // discard entries invalidated by cancel/reschedule
        loop {
            let stale = match st.queue.peek() {
                None => false,
                Some(top) => {
                    let es = top.item.0.state.lock().unwrap();
                    !(es.status == EventStatus::InQueue && es.epoch == top.item.1)
                }
            };
            if stale {
                st.queue.pop();
            } else {
                break;
            }
        }
        if st.shutdown {
            break;
        }
        let next_at = st.queue.peek().map(|top| top.prio.0);
        let Some(at) = next_at else {
            st = inner.cond.wait(st).unwrap();
            continue;
        };
        let now = Instant::now();
        if now < at {
            // sleep until the earliest trigger or a schedule change, then
            // re-evaluate from scratch
            let (guard, _) = inner.cond.wait_timeout(st, at - now).unwrap();
            st = guard;
            continue;
        }
        let entry = st.queue.pop().expect("peeked entry is still there");
        let (core, epoch) = entry.item;
        {
            let mut es = core.state.lock().unwrap();
            if !(es.status == EventStatus::InQueue && es.epoch == epoch) {
                continue;
            }
            es.status = EventStatus::Executing;
        }
        drop(st);
        {
            let mut action = core.action.lock().unwrap();
            (*action)();
        }
        st = inner.state.lock().unwrap();
        let mut es = core.state.lock().unwrap();
        match es.status {
            EventStatus::ToDelete => es.status = EventStatus::Deleted,
            EventStatus::Executing => es.status = EventStatus::Ready,
            // the closure rescheduled or canceled itself: leave it alone
            _ => {}
        }
    }
    // shutdown: everything still queued is canceled, never run
    while let Some(entry) = st.queue.pop() {
        let (core, epoch) = entry.item;
        let mut es = core.state.lock().unwrap();
        if es.status == EventStatus::InQueue && es.epoch == epoch {
            es.status = EventStatus::Canceled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn canceled_events_never_run() {
        let fired = Arc::new(AtomicUsize::new(0));
        let q = TimeoutQueue::new();
        let f = Arc::clone(&fired);
        let e = Event::new(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        q.schedule_in(&e, Duration::from_millis(200)).unwrap();
        assert_eq!(e.status(), EventStatus::InQueue);
        assert!(q.cancel(&e));
        thread::sleep(Duration::from_millis(300));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(e.status(), EventStatus::Canceled);
        q.shutdown();
    }

    #[test]
    fn double_schedule_is_a_domain_error() {
        let q = TimeoutQueue::new();
        let e = Event::new(|| {});
        q.schedule_in(&e, Duration::from_secs(5)).unwrap();
        assert!(matches!(q.schedule_in(&e, Duration::from_secs(5)), Err(Error::Domain(_))));
        q.cancel(&e);
        q.shutdown();
    }

    #[test]
    fn schedule_after_shutdown_is_closed() {
        let q = TimeoutQueue::new();
        q.shutdown();
        let e = Event::new(|| {});
        assert!(matches!(q.schedule_in(&e, Duration::from_millis(1)), Err(Error::Closed)));
    }
}
