//! Live telemetry state: one [`Slot`] per message, all slots gathered into a
//! revision-specific state struct stored inside a [`LiveState`].
//!
//! The store follows a single-writer/multi-reader discipline: the ingestion
//! loop is the only writer, display or diagnostic contexts read value
//! snapshots. Every write replaces a whole slot under the lock, so a reader
//! never observes signal values from one frame paired with a timestamp (or
//! sibling signals) from another.
use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};
use embassy_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Most recently decoded values of one message, plus their arrival time.
///
/// A slot starts out empty and stays empty until the first frame of its
/// message decodes. Empty means "no data yet" — readers must never render a
/// default value in its place.
pub struct Slot<T> {
    inner: Option<(T, Instant)>,
}

impl<T: Copy> Slot<T> {
    /// Slot in the never-updated state.
    pub const fn empty() -> Self {
        Self { inner: None }
    }

    /// Replace the slot content as one unit.
    pub fn update(&mut self, value: T, at: Instant) {
        self.inner = Some((value, at));
    }

    /// Last decoded values, `None` while no frame has ever decoded.
    pub fn value(&self) -> Option<T> {
        self.inner.map(|(value, _)| value)
    }

    /// Arrival time of the frame behind the current values.
    pub fn updated_at(&self) -> Option<Instant> {
        self.inner.map(|(_, at)| at)
    }

    /// Caller-side staleness check: true when the slot was updated at most
    /// `max_age` before `now`. A never-updated slot is never fresh. The
    /// threshold is the caller's policy; the store holds no opinion on it.
    pub fn is_fresh(&self, now: Instant, max_age: Duration) -> bool {
        match self.updated_at() {
            Some(at) => now.as_ticks().saturating_sub(at.as_ticks()) <= max_age.as_ticks(),
            None => false,
        }
    }
}

// Not derived: a slot is empty by default whether or not T has a default.
impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { inner: None }
    }
}

/// Shared live-state container.
///
/// `S` is the revision-specific struct of slots, `M` the raw mutex flavor
/// matching the deployment (`CriticalSectionRawMutex` on single-core
/// firmware). Readers get a value copy via [`snapshot`](Self::snapshot);
/// the writer mutates through [`with_mut`](Self::with_mut). Both run under
/// the same short critical section, so no reader can observe a torn update
/// and no writer is ever blocked by a slow consumer holding state.
pub struct LiveState<M: RawMutex, S: Copy> {
    inner: Mutex<M, Cell<S>>,
}

impl<M: RawMutex, S: Copy> LiveState<M, S> {
    /// Create the store with every slot in the never-updated state.
    pub const fn new(initial: S) -> Self {
        Self {
            inner: Mutex::new(Cell::new(initial)),
        }
    }

    /// Immutable value copy of the current state.
    pub fn snapshot(&self) -> S {
        self.inner.lock(|cell| cell.get())
    }

    /// Run `f` against the state under the lock. Writer-side only.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        self.inner.lock(|cell| {
            let mut state = cell.get();
            let result = f(&mut state);
            cell.set(state);
            result
        })
    }
}

impl<M: RawMutex, S: Copy + Default> Default for LiveState<M, S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
