// Timer queue - Cancellable one-shot continuations for the poll loop
// Deadlines live on the host clock (milliseconds), not the audio clock

use std::collections::BTreeMap;
use std::fmt;

/// Identity of one scheduled continuation; never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// One-shot timers keyed by handle
///
/// The queue never fires anything by itself: a host loop calls
/// `advance_to` with its current time and dispatches the returned handles.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: f64,
    next_id: u64,
    pending: BTreeMap<TimerHandle, f64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host time as of the last `advance_to`
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Schedule a continuation `delay_ms` after the queue's current time
    pub fn schedule(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.insert(handle, self.now_ms + delay_ms.max(0.0));
        handle
    }

    /// Cancel a continuation. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<f64> {
        self.pending.values().copied().reduce(f64::min)
    }

    /// Move host time forward and take every timer that is due, earliest first
    pub fn advance_to(&mut self, now_ms: f64) -> Vec<TimerHandle> {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }

        let mut due: Vec<(f64, TimerHandle)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now_ms)
            .map(|(handle, deadline)| (*deadline, *handle))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, handle) in &due {
            self.pending.remove(handle);
        }
        due.into_iter().map(|(_, handle)| handle).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
