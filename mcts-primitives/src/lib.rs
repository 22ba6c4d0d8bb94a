//! Concurrency building blocks shared by the tree-search worker pool.
//!
//! These types are a direct translation of a small C++ primitives header used by an
//! earlier self-play search engine: a counting semaphore with a "wait until at least N"
//! semantics (`SemaCollector`), a broadcast stop-flag built on top of it (`Notif`), a
//! single-slot typed mailbox (`Semaphore<T>`), an optimistic reader/single-writer lock
//! (`RwLock`), and a blocking MPMC queue (`BlockingQueue<T>`). None of them are meant to
//! be general-purpose replacements for `crossbeam`/`parking_lot` — they exist because the
//! engine's coordination protocol (workers signal "I'm idle", the coordinator waits for
//! all N, then broadcasts "go") is most directly expressed with exactly these shapes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// A counting semaphore that lets waiters block until the internal counter reaches at
/// least some expected value, rather than decrementing one permit per `wait`.
///
/// This is the coordinator's tool for "wait until N workers have notified me": each
/// worker calls [`SemaCollector::notify`] once per round, and the coordinator calls
/// [`SemaCollector::wait`] with `expected_count` set to the worker count.
pub struct SemaCollector {
    state: Mutex<usize>,
    cv: Condvar,
}

impl SemaCollector {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(0),
            cv: Condvar::new(),
        }
    }

    /// Increments the counter and wakes one waiter.
    pub fn notify(&self) {
        let mut count = self.state.lock().unwrap();
        *count += 1;
        self.cv.notify_one();
    }

    /// Blocks until the counter is at least `expected_count`, or `timeout` elapses
    /// (`None` waits forever). Returns the counter value observed on return, so a caller
    /// can tell a timeout apart from a satisfied wait, or just log progress.
    ///
    /// `expected_count == 0` returns immediately without taking the lock.
    pub fn wait(&self, expected_count: usize, timeout: Option<Duration>) -> usize {
        if expected_count == 0 {
            return *self.state.lock().unwrap();
        }

        let guard = self.state.lock().unwrap();
        let result = match timeout {
            None => self
                .cv
                .wait_while(guard, |count| *count < expected_count)
                .unwrap(),
            Some(d) => {
                self.cv
                    .wait_timeout_while(guard, d, |count| *count < expected_count)
                    .unwrap()
                    .0
            }
        };
        *result
    }

    /// Resets the counter to zero and wakes every waiter (so they can re-check their
    /// predicate and, typically, go back to blocking on the next round).
    pub fn reset(&self) {
        let mut count = self.state.lock().unwrap();
        *count = 0;
        self.cv.notify_all();
    }
}

impl Default for SemaCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// A broadcast stop/ready flag paired with a [`SemaCollector`].
///
/// Workers observe [`Notif::get`] to decide whether to keep running; the coordinator
/// calls [`Notif::wait`] to block until `n` workers have called [`Notif::notify`] since
/// the last [`Notif::reset`].
pub struct Notif {
    flag: AtomicBool,
    counter: SemaCollector,
}

impl Notif {
    pub fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            counter: SemaCollector::new(),
        }
    }

    pub fn get(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn notify(&self) {
        self.counter.notify();
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Sets the flag and blocks until `n` notifications have arrived.
    ///
    /// When `poll` is `Some`, waits in short slices and calls it between them instead of
    /// blocking indefinitely — useful for a caller that wants to do periodic work (log a
    /// heartbeat, check for external cancellation) while waiting.
    pub fn wait(&self, n: usize, mut poll: Option<impl FnMut()>) {
        self.flag.store(true, Ordering::SeqCst);
        match poll.as_mut() {
            None => {
                self.counter.wait(n, None);
            }
            Some(f) => loop {
                let current = self.counter.wait(n, Some(Duration::from_micros(10)));
                if current >= n {
                    break;
                }
                f();
            },
        }
    }

    pub fn reset(&self) {
        self.counter.reset();
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for Notif {
    fn default() -> Self {
        Self::new()
    }
}

/// A single-slot typed mailbox: one value in flight at a time, delivered to whichever
/// thread is waiting (or the next thread to wait, if none currently is).
pub struct Semaphore<T> {
    inner: Mutex<SemaphoreState<T>>,
    cv: Condvar,
}

struct SemaphoreState<T> {
    flag: bool,
    val: Option<T>,
}

impl<T: Clone> Semaphore<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SemaphoreState {
                flag: false,
                val: None,
            }),
            cv: Condvar::new(),
        }
    }

    /// Delivers `val` and wakes one waiter.
    pub fn notify(&self, val: T) {
        let mut state = self.inner.lock().unwrap();
        state.flag = true;
        state.val = Some(val);
        self.cv.notify_one();
    }

    fn raw_wait<'a>(
        &self,
        mut guard: std::sync::MutexGuard<'a, SemaphoreState<T>>,
        timeout: Option<Duration>,
    ) -> std::sync::MutexGuard<'a, SemaphoreState<T>> {
        match timeout {
            None => {
                while !guard.flag {
                    guard = self.cv.wait(guard).unwrap();
                }
                guard
            }
            Some(d) => self.cv.wait_timeout_while(guard, d, |s| !s.flag).unwrap().0,
        }
    }

    /// Waits for a value without consuming the flag; a subsequent `wait` observes the
    /// same value again until [`Semaphore::reset`] or [`Semaphore::wait_and_reset`] runs.
    pub fn wait(&self, timeout: Option<Duration>) -> Option<T> {
        let guard = self.inner.lock().unwrap();
        let guard = self.raw_wait(guard, timeout);
        if guard.flag {
            guard.val.clone()
        } else {
            None
        }
    }

    /// Waits for a value and clears the flag (so the slot is free for the next notify).
    pub fn wait_and_reset(&self, timeout: Option<Duration>) -> Option<T> {
        let guard = self.inner.lock().unwrap();
        let mut guard = self.raw_wait(guard, timeout);
        let result = if guard.flag { guard.val.take() } else { None };
        guard.flag = false;
        result
    }

    pub fn reset(&self) {
        let mut state = self.inner.lock().unwrap();
        state.flag = false;
    }
}

impl<T: Clone> Default for Semaphore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An optimistic reader/single-writer lock.
///
/// Readers bump an atomic counter behind a brief hold of the writer mutex, then run
/// unlocked; a writer takes the mutex and busy-spins until the reader count drops to
/// zero. This is a literal translation of the primitive it was modeled on and inherits
/// its tradeoff: a steady stream of readers can starve a writer indefinitely. The one
/// caller in this workspace (the replay sampler) only ever holds the read side for the
/// duration of a single sample draw, so that tradeoff is acceptable here.
pub struct RwLock {
    readers: AtomicUsize,
    write_mutex: Mutex<()>,
}

impl RwLock {
    pub fn new() -> Self {
        Self {
            readers: AtomicUsize::new(0),
            write_mutex: Mutex::new(()),
        }
    }

    pub fn read_shared_lock(&self) {
        let _guard = self.write_mutex.lock().unwrap();
        self.readers.fetch_add(1, Ordering::SeqCst);
    }

    pub fn read_shared_unlock(&self) {
        self.readers.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn write_lock(&self) -> std::sync::MutexGuard<'_, ()> {
        let guard = self.write_mutex.lock().unwrap();
        while self.readers.load(Ordering::SeqCst) > 0 {
            std::hint::spin_loop();
        }
        guard
    }

    /// Runs `f` under the read lock, bracketing it with the matching lock/unlock calls.
    pub fn with_read<R>(&self, f: impl FnOnce() -> R) -> R {
        self.read_shared_lock();
        let result = f();
        self.read_shared_unlock();
        result
    }

    /// Runs `f` under the write lock.
    pub fn with_write<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.write_lock();
        f()
    }
}

impl Default for RwLock {
    fn default() -> Self {
        Self::new()
    }
}

/// A blocking, unbounded multi-producer multi-consumer FIFO queue.
pub struct BlockingQueue<T> {
    inner: Mutex<VecDeque<T>>,
    cv: Condvar,
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            cv: Condvar::new(),
        }
    }

    pub fn push(&self, val: T) {
        let mut queue = self.inner.lock().unwrap();
        queue.push_back(val);
        self.cv.notify_one();
    }

    /// Blocks until an item is available.
    pub fn pop_wait(&self) -> T {
        let guard = self.inner.lock().unwrap();
        let mut guard = self.cv.wait_while(guard, |q| q.is_empty()).unwrap();
        guard.pop_front().unwrap()
    }

    /// Waits up to `timeout` for an item; returns `None` on timeout.
    pub fn pop_wait_time(&self, timeout: Duration) -> Option<T> {
        let guard = self.inner.lock().unwrap();
        let (mut guard, timed_out) = self
            .cv
            .wait_timeout_while(guard, timeout, |q| q.is_empty())
            .unwrap();
        if timed_out.timed_out() {
            None
        } else {
            guard.pop_front()
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
