//! Reentrant loading flag.
//!
//! The flag is a counter: it reads `true` while at least one operation is in
//! flight, so overlapping operations keep it raised until the last one
//! finishes.
//!
//! The count is updated under its own lock and the flag is published after
//! that lock is released, so subscribers may read [`Loading::in_flight`].
//! Publications are serialized so the flag always ends in the state of the
//! last count change.

use std::sync::{Arc, Mutex};

use crate::signal::{lock, Signal};

#[derive(Clone)]
pub struct Loading {
    count: Arc<Mutex<usize>>,
    publish: Arc<Mutex<()>>,
    state: Signal<bool>,
}

impl Default for Loading {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Loading {
    /// `initial` is the flag before any operation starts or stops.
    pub fn new(initial: bool) -> Self {
        Self {
            count: Arc::new(Mutex::new(0)),
            publish: Arc::new(Mutex::new(())),
            state: Signal::new(initial),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.get()
    }

    /// The flag as a signal, for subscribers.
    pub fn signal(&self) -> &Signal<bool> {
        &self.state
    }

    /// Number of operations currently in flight.
    pub fn in_flight(&self) -> usize {
        *lock(&self.count)
    }

    pub fn start(&self) {
        self.change(|count| *count += 1);
    }

    /// Saturates at zero; the flag drops when the count reaches zero.
    pub fn stop(&self) {
        self.change(|count| *count = count.saturating_sub(1));
    }

    pub fn reset(&self) {
        self.change(|count| *count = 0);
    }

    fn change(&self, f: impl FnOnce(&mut usize)) {
        let _publish = lock(&self.publish);
        let raised = {
            let mut count = lock(&self.count);
            f(&mut count);
            *count > 0
        };
        if self.state.get() != raised {
            self.state.set(raised);
        }
    }

    /// Start an operation; it stops when the guard is dropped.
    pub fn guard(&self) -> LoadingGuard {
        self.start();
        LoadingGuard {
            loading: self.clone(),
        }
    }

    /// Run `op` with the flag raised. The count is released on return, on
    /// error and on panic.
    pub fn with_loading<R>(&self, op: impl FnOnce() -> R) -> R {
        let _guard = self.guard();
        op()
    }
}

#[must_use = "the operation stops as soon as the guard is dropped"]
pub struct LoadingGuard {
    loading: Loading,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.loading.stop();
    }
}
