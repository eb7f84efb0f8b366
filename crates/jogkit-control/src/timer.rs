//! Deadline queue with cancellable handles.
//!
//! The controller never sleeps. It schedules deadlines here and whoever
//! drives it (a test, or [`crate::runtime::JogRuntime`]) calls
//! `advance(now)` to fire the ones that are due.

use std::time::Instant;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Press reached the hold threshold
    HoldThreshold,
    /// Next continuous jog step
    ContinuousTick,
}

/// A timer that has come due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    /// Handle it was scheduled under
    pub id: TimerId,
    /// Kind of timer
    pub kind: TimerKind,
    /// Deadline it was scheduled for
    pub deadline: Instant,
}

/// Pending timers ordered by deadline, then by scheduling order
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<FiredTimer>,
}

impl TimerQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer at `deadline`
    pub fn schedule(&mut self, deadline: Instant, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(FiredTimer { id, kind, deadline });
        tracing::trace!("Timer {:?} {:?} scheduled", id, kind);
        id
    }

    /// Cancel a timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        before != self.pending.len()
    }

    /// Remove and return the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<FiredTimer> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(index))
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    /// Whether `id` is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let late = queue.schedule(t0 + ms(200), TimerKind::ContinuousTick);
        let early = queue.schedule(t0 + ms(100), TimerKind::HoldThreshold);

        assert_eq!(queue.next_deadline(), Some(t0 + ms(100)));
        assert!(queue.pop_due(t0 + ms(50)).is_none());

        let fired = queue.pop_due(t0 + ms(250)).unwrap();
        assert_eq!(fired.id, early);
        assert_eq!(fired.kind, TimerKind::HoldThreshold);
        assert_eq!(queue.pop_due(t0 + ms(250)).unwrap().id, late);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_deadlines_fire_in_scheduling_order() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let first = queue.schedule(t0, TimerKind::HoldThreshold);
        let second = queue.schedule(t0, TimerKind::ContinuousTick);

        assert_eq!(queue.pop_due(t0).unwrap().id, first);
        assert_eq!(queue.pop_due(t0).unwrap().id, second);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let id = queue.schedule(t0 + ms(10), TimerKind::HoldThreshold);

        assert!(queue.is_pending(id));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(!queue.is_pending(id));
        assert!(queue.pop_due(t0 + ms(100)).is_none());
        assert_eq!(queue.len(), 0);
    }
}
