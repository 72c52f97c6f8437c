//! Frame-driven timer scheduler with owner scopes.
//!
//! Timers belong to a [`ScopeId`], opened per mounted section. Closing a
//! scope cancels its pending timers synchronously, and nothing can be
//! scheduled into it afterward, so work tied to a torn-down owner never
//! runs.
//!
//! Time only advances when the host calls [`Scheduler::advance`] from its
//! frame callback. Due timers fire in `(time, insertion)` order, which keeps
//! sibling start events in declaration order even when they share a frame.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use spark_motion::motion::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! let scope = scheduler.open_scope();
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//!
//! scheduler.schedule(scope, Duration::from_millis(100), move |_| flag.set(true));
//! scheduler.close_scope(scope);
//! scheduler.advance(Duration::from_secs(1));
//! assert!(!fired.get());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::{debug, trace};

/// Owner scope for a group of timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

/// Handle to one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Task run when a timer fires. Receives the frame time that fired it.
pub type TimerTask = Box<dyn FnOnce(Duration)>;

struct Timer {
    scope: ScopeId,
    task: TimerTask,
}

/// Cooperative timer queue.
pub struct Scheduler {
    /// Keyed by (due time, sequence) for stable ordering.
    timers: BTreeMap<(Duration, TimerId), Timer>,
    /// Due time of each pending timer, for cancellation by id.
    due: HashMap<TimerId, Duration>,
    open_scopes: HashMap<ScopeId, usize>,
    next_timer: u64,
    next_scope: u64,
    now: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
            due: HashMap::new(),
            open_scopes: HashMap::new(),
            next_timer: 0,
            next_scope: 0,
            now: Duration::ZERO,
        }
    }

    /// Time of the last `advance`.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Open a new owner scope.
    pub fn open_scope(&mut self) -> ScopeId {
        let scope = ScopeId(self.next_scope);
        self.next_scope += 1;
        self.open_scopes.insert(scope, 0);
        scope
    }

    pub fn is_open(&self, scope: ScopeId) -> bool {
        self.open_scopes.contains_key(&scope)
    }

    /// Schedule a task at an absolute time.
    ///
    /// Returns None if the scope is closed. A time in the past fires on the
    /// next `advance`.
    pub fn schedule<F>(&mut self, scope: ScopeId, at: Duration, task: F) -> Option<TimerId>
    where
        F: FnOnce(Duration) + 'static,
    {
        let pending = self.open_scopes.get_mut(&scope)?;
        *pending += 1;

        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.insert(
            (at, id),
            Timer {
                scope,
                task: Box::new(task),
            },
        );
        self.due.insert(id, at);
        Some(id)
    }

    /// Cancel one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(at) = self.due.remove(&id) else {
            return false;
        };
        match self.timers.remove(&(at, id)) {
            Some(timer) => {
                self.release(timer.scope);
                true
            }
            None => false,
        }
    }

    /// Close a scope, cancelling all of its pending timers.
    ///
    /// Returns the number of timers cancelled.
    pub fn close_scope(&mut self, scope: ScopeId) -> usize {
        if self.open_scopes.remove(&scope).is_none() {
            return 0;
        }
        let doomed: Vec<(Duration, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.scope == scope)
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            self.timers.remove(key);
            self.due.remove(&key.1);
        }
        debug!(cancelled = doomed.len(), "scope closed");
        doomed.len()
    }

    /// Pending timers in a scope.
    pub fn pending(&self, scope: ScopeId) -> usize {
        self.open_scopes.get(&scope).copied().unwrap_or(0)
    }

    /// Total pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance the clock and run every timer due at or before `now`.
    ///
    /// Returns the number of timers fired. Time never moves backward.
    pub fn advance(&mut self, now: Duration) -> usize {
        self.now = self.now.max(now);
        let mut fired = 0;

        while let Some(entry) = self.timers.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            let ((at, id), timer) = entry.remove_entry();
            self.due.remove(&id);
            self.release(timer.scope);
            trace!(at_ms = at.as_millis() as u64, "timer fired");
            (timer.task)(self.now);
            fired += 1;
        }
        fired
    }

    fn release(&mut self, scope: ScopeId) {
        if let Some(pending) = self.open_scopes.get_mut(&scope) {
            *pending = pending.saturating_sub(1);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
