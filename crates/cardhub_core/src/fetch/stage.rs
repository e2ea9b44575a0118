//! Compute-once cell for task stages.
//!
//! # Responsibility
//! - Run one stage computation at most once per cell.
//! - Hand the identical result to every caller, including ones that arrived
//!   while the computation was in flight.
//!
//! # Invariants
//! - State moves `Unstarted -> InFlight -> Done` and never leaves `Done`.
//! - A failed result is cached like a successful one.
//! - If the computing caller panics, the cell returns to `Unstarted` and
//!   waiters are woken so one of them can take over.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
enum StageState<T> {
    Unstarted,
    InFlight,
    Done(T),
}

/// Mutex/condvar state machine memoizing one stage result.
#[derive(Debug)]
pub struct StageCell<T> {
    state: Mutex<StageState<T>>,
    ready: Condvar,
}

impl<T> Default for StageCell<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(StageState::Unstarted),
            ready: Condvar::new(),
        }
    }
}

impl<T: Clone> StageCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result, running `compute` if no caller has yet.
    ///
    /// Blocks while another caller is computing.
    pub fn get_or_run<F>(&self, compute: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut state = self.lock();
        loop {
            if let StageState::Done(value) = &*state {
                return value.clone();
            }
            if matches!(*state, StageState::Unstarted) {
                break;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *state = StageState::InFlight;
        drop(state);

        let mut guard = InFlightGuard {
            cell: self,
            finished: false,
        };
        let value = compute();
        guard.finish(value.clone());
        value
    }

    /// Returns the result if the stage has completed.
    pub fn peek(&self) -> Option<T> {
        match &*self.lock() {
            StageState::Done(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(&*self.lock(), StageState::Done(_))
    }

    fn lock(&self) -> MutexGuard<'_, StageState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct InFlightGuard<'a, T> {
    cell: &'a StageCell<T>,
    finished: bool,
}

impl<T> InFlightGuard<'_, T> {
    fn finish(&mut self, value: T) {
        let mut state = self
            .cell
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *state = StageState::Done(value);
        self.finished = true;
        drop(state);
        self.cell.ready.notify_all();
    }
}

impl<T> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self
            .cell
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *state = StageState::Unstarted;
        drop(state);
        self.cell.ready.notify_all();
    }
}
