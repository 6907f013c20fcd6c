//! Debounced function calls.
//!
//! # Design
//! A [`Debouncer`] owns one pending call shared by every function it
//! debounces: a new call to any of them replaces whatever is pending. A
//! single worker thread, started on the first call, sleeps until the pending
//! deadline and runs the call. Dropping the `Debouncer` is the teardown: the
//! pending call is discarded, a call that is already running is waited for,
//! and later calls are ignored.
//!
//! The worker re-checks the generation under the run lock right before
//! invoking the function, and teardown takes the same lock, so nothing runs
//! once teardown has returned.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use tracing::{trace, warn};

use crate::signal::lock;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

type Job = Box<dyn FnOnce() + Send>;

struct Pending {
    generation: u64,
    deadline: Instant,
    job: Job,
}

#[derive(Default)]
struct TimerState {
    generation: u64,
    pending: Option<Pending>,
    closed: bool,
    worker: Option<ThreadId>,
}

#[derive(Default)]
struct Timer {
    state: Mutex<TimerState>,
    wake: Condvar,
    run: Mutex<()>,
}

impl Timer {
    /// Replace the pending call with `job`. Returns `false` once torn down.
    fn schedule(self: &Arc<Self>, delay: Duration, job: Job) -> bool {
        let mut state = lock(&self.state);
        if state.closed {
            return false;
        }
        state.generation += 1;
        state.pending = Some(Pending {
            generation: state.generation,
            deadline: Instant::now() + delay,
            job,
        });

        if state.worker.is_none() {
            let timer = Arc::clone(self);
            let spawned = thread::Builder::new()
                .name("debouncer".to_string())
                .spawn(move || timer.work());
            match spawned {
                Ok(handle) => state.worker = Some(handle.thread().id()),
                Err(error) => {
                    warn!(%error, "failed to start debounce worker");
                    state.pending = None;
                    return false;
                }
            }
        }
        drop(state);
        self.wake.notify_all();
        true
    }

    fn cancel(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        state.pending = None;
        drop(state);
        self.wake.notify_all();
    }

    fn close(&self) {
        // A function that tears down its own debouncer already holds `run`.
        let on_worker = lock(&self.state).worker == Some(thread::current().id());
        let _run = (!on_worker).then(|| lock(&self.run));

        let mut state = lock(&self.state);
        state.generation += 1;
        state.pending = None;
        state.closed = true;
        drop(state);
        self.wake.notify_all();
    }

    fn is_current(&self, generation: u64) -> bool {
        let state = lock(&self.state);
        !state.closed && state.generation == generation
    }

    fn work(&self) {
        let mut state = lock(&self.state);
        loop {
            if state.closed {
                return;
            }
            let Some(deadline) = state.pending.as_ref().map(|pending| pending.deadline) else {
                state = self.wake.wait(state).unwrap_or_else(PoisonError::into_inner);
                continue;
            };
            let now = Instant::now();
            if now < deadline {
                state = self
                    .wake
                    .wait_timeout(state, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
                continue;
            }
            let Some(Pending { generation, job, .. }) = state.pending.take() else {
                continue;
            };
            drop(state);

            {
                let _run = lock(&self.run);
                if self.is_current(generation) && catch_unwind(AssertUnwindSafe(job)).is_err() {
                    warn!("debounced function panicked");
                }
            }
            state = lock(&self.state);
        }
    }
}

#[derive(Default)]
pub struct Debouncer {
    timer: Arc<Timer>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `f` so that it runs `delay` after the last call.
    pub fn debounce<A, F>(&self, f: F, delay: Duration) -> Debounced<A>
    where
        A: Send + 'static,
        F: Fn(A) + Send + Sync + 'static,
    {
        Debounced {
            timer: Arc::clone(&self.timer),
            f: Arc::new(f),
            delay,
        }
    }

    /// Drop the pending call, if any, without tearing down.
    pub fn cancel(&self) {
        self.timer.cancel();
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.timer.close();
    }
}

pub struct Debounced<A> {
    timer: Arc<Timer>,
    f: Arc<dyn Fn(A) + Send + Sync>,
    delay: Duration,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            timer: Arc::clone(&self.timer),
            f: Arc::clone(&self.f),
            delay: self.delay,
        }
    }
}

impl<A: Send + 'static> Debounced<A> {
    pub fn call(&self, arg: A) {
        let f = Arc::clone(&self.f);
        if !self.timer.schedule(self.delay, Box::new(move || f(arg))) {
            trace!("debounced call after teardown ignored");
        }
    }
}
