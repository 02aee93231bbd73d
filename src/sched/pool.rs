//! Queue-driven worker pool.
//!
//! A bounded multi-producer FIFO with consumer threads, each owning a
//! [`Consumer`] whose `run` is invoked once per item. The pool starts
//! **suspended**: create threads, `put` work, then [`resume`] to open the
//! tap. `shutdown` refuses further work, drains the queue, and joins every
//! worker.
//!
//! [`resume`]: WorkQueuePool::resume

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::{Error, Result};
use crate::slist::ListQueue;

/// Per-thread handler owned by one worker.
pub trait Consumer<T>: Send {
    /// Process one item taken from the queue.
    fn run(&mut self, item: T);
}

impl<T, F: FnMut(T) + Send> Consumer<T> for F {
    fn run(&mut self, item: T) {
        self(item)
    }
}

/// Why a [`try_put`](WorkQueuePool::try_put) was refused; the item comes
/// back in the error.
#[derive(Debug)]
pub enum PutError<T> {
    /// The queue is at capacity.
    Full(T),
    /// The pool is shutting down or has no consumer threads.
    Closed(T),
}

struct PoolState<T> {
    queue: ListQueue<T>,
    capacity: usize,
    suspended: bool,
    shutting_down: bool,
    num_threads: usize,
    num_active: usize,
}

struct PoolInner<T> {
    state: Mutex<PoolState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    drained: Condvar,
}

/// Bounded FIFO plus the consumer threads that drain it.
pub struct WorkQueuePool<T: Send + 'static> {
    inner: Arc<PoolInner<T>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<T: Send + 'static> WorkQueuePool<T> {
    /// A pool whose queue holds at most `capacity` items. Starts
    /// suspended and with no threads.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                state: Mutex::new(PoolState {
                    queue: ListQueue::new(),
                    capacity: capacity.max(1),
                    suspended: true,
                    shutting_down: false,
                    num_threads: 0,
                    num_active: 0,
                }),
                not_empty: Condvar::new(),
                not_full: Condvar::new(),
                drained: Condvar::new(),
            }),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn a worker owning `consumer`. Fails with [`Error::Closed`]
    /// after shutdown.
    pub fn create_thread(&self, consumer: impl Consumer<T> + 'static) -> Result<()> {
        {
            let mut st = self.inner.state.lock().unwrap();
            if st.shutting_down {
                return Err(Error::Closed);
            }
            st.num_threads += 1;
        }
        let inner = Arc::clone(&self.inner);
        let handle = thread::Builder::new()
            .name("work-queue-consumer".into())
            .spawn(move || worker(inner, consumer))
            .expect("spawn consumer thread");
        self.handles.lock().unwrap().push(handle);
        Ok(())
    }

    /// Spawn one worker per available CPU, each built by `factory`.
    pub fn create_default_threads<C, F>(&self, mut factory: F) -> Result<usize>
    where
        C: Consumer<T> + 'static,
        F: FnMut() -> C,
    {
        let n = num_cpus::get().max(1);
        for _ in 0..n {
            self.create_thread(factory())?;
        }
        Ok(n)
    }

    /// Enqueue `item`, blocking while the queue is full. Fails with
    /// [`Error::Closed`] after shutdown and with a domain error when no
    /// consumer thread exists (the item would wait forever).
    pub fn put(&self, item: T) -> Result<()> {
        let mut st = self.inner.state.lock().unwrap();
        if st.shutting_down {
            return Err(Error::Closed);
        }
        if st.num_threads == 0 {
            return Err(Error::Domain("no consumer threads created"));
        }
        while st.queue.len() >= st.capacity {
            if st.shutting_down {
                return Err(Error::Closed);
            }
            st = self.inner.not_full.wait(st).unwrap();
        }
        if st.shutting_down {
            return Err(Error::Closed);
        }
        st.queue.put(item);
        if !st.suspended {
            self.inner.not_empty.notify_one();
        }
        Ok(())
    }

    /// Enqueue without blocking; the item rides back in the error when
    /// refused.
    pub fn try_put(&self, item: T) -> std::result::Result<(), PutError<T>> {
        let mut st = self.inner.state.lock().unwrap();
        if st.shutting_down || st.num_threads == 0 {
            return Err(PutError::Closed(item));
        }
        if st.queue.len() >= st.capacity {
            return Err(PutError::Full(item));
        }
        st.queue.put(item);
        if !st.suspended {
            self.inner.not_empty.notify_one();
        }
        Ok(())
    }

    /// Pause consumption; queued items stay queued.
    pub fn suspend(&self) {
        let mut st = self.inner.state.lock().unwrap();
        if st.shutting_down {
            return;
        }
        st.suspended = true;
        self.inner.not_empty.notify_all();
    }

    /// Resume consumption.
    pub fn resume(&self) {
        let mut st = self.inner.state.lock().unwrap();
        if st.shutting_down {
            return;
        }
        st.suspended = false;
        self.inner.not_empty.notify_all();
    }

    /// `true` while consumption is paused.
    pub fn is_suspended(&self) -> bool {
        self.inner.state.lock().unwrap().suspended
    }

    /// Items currently queued (not yet handed to a consumer).
    pub fn len(&self) -> usize {
        self.inner.state.lock().unwrap().queue.len()
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refuse further work, let the workers drain the queue, and join
    /// them. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut st = self.inner.state.lock().unwrap();
            st.shutting_down = true;
            self.inner.not_empty.notify_all();
            self.inner.not_full.notify_all();
            while st.num_threads > 0 {
                st = self.inner.drained.wait(st).unwrap();
            }
        }
        let handles = std::mem::take(&mut *self.handles.lock().unwrap());
        for h in handles {
            h.join().expect("consumer thread panicked");
        }
    }
}

impl<T: Send + 'static> Drop for WorkQueuePool<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker<T: Send + 'static>(inner: Arc<PoolInner<T>>, mut consumer: impl Consumer<T>) {
    let mut st = inner.state.lock().unwrap();
    loop {
        while !st.shutting_down && (st.suspended || st.queue.is_empty()) {
            st = inner.not_empty.wait(st).unwrap();
        }
        // shutdown overrides suspension so the queue drains
        if st.shutting_down && st.queue.is_empty() {
            break;
        }
        let Some(item) = st.queue.get() else {
            continue;
        };
        st.num_active += 1;
        inner.not_full.notify_one();
        drop(st);
        // a panicking consumer must not wedge the pool
        let _ = catch_unwind(AssertUnwindSafe(|| consumer.run(item)));
        st = inner.state.lock().unwrap();
        st.num_active -= 1;
    }
    st.num_threads -= 1;
    inner.drained.notify_all();
}
