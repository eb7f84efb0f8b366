//! Per-press state.

use crate::timer::{TimerId, TimerQueue};
use jogkit_core::JogIntent;
use std::time::{Duration, Instant};

/// State of the one live press
///
/// Created on press start, dropped on release, re-press or dispose. The
/// timer handles it owns are the only timers the controller ever has
/// scheduled, so clearing them here clears everything.
#[derive(Debug, Clone)]
pub struct HoldState {
    /// Axis and direction being jogged
    pub intent: JogIntent,
    /// Step size captured when the press started
    pub step: f64,
    /// When the press started
    pub started_at: Instant,
    /// Whether continuous motion took over from the tap path
    pub is_holding: bool,
    /// Moves issued for this press
    pub moves: usize,
    pub(crate) hold_timer: Option<TimerId>,
    pub(crate) tick_timer: Option<TimerId>,
}

impl HoldState {
    /// Fresh press state with no timers armed
    pub fn new(intent: JogIntent, step: f64, started_at: Instant) -> Self {
        Self {
            intent,
            step,
            started_at,
            is_holding: false,
            moves: 0,
            hold_timer: None,
            tick_timer: None,
        }
    }

    /// Time since the press started
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Whether the hold-threshold timer is still armed
    pub fn hold_pending(&self) -> bool {
        self.hold_timer.is_some()
    }

    /// Whether the continuous driver has a tick scheduled
    pub fn is_driving(&self) -> bool {
        self.tick_timer.is_some()
    }

    /// Cancel the hold-threshold timer if armed
    pub(crate) fn disarm_hold(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.hold_timer.take() {
            timers.cancel(id);
        }
    }
}
