//! Continuous motion while a press is held.
//!
//! The driver keeps no position of its own. Each step re-reads position
//! and working area from the machine, so external corrections and the
//! driver's own earlier moves are both seen by the next legality check.

use crate::gate::can_move;
use crate::hold::HoldState;
use crate::machine::MachineInterface;
use crate::timer::{TimerKind, TimerQueue};
use jogkit_core::JogError;
use std::time::{Duration, Instant};

/// Result of a start or tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// A move was issued and the next tick scheduled
    Moved,
    /// The next step would leave the working area; nothing is scheduled
    Stopped,
}

/// Issues a jog every `interval` for the live press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuousDriver {
    interval: Duration,
}

impl ContinuousDriver {
    /// Create a driver with the given cadence; the interval must be non-zero
    pub fn new(interval: Duration) -> Result<Self, JogError> {
        if interval.is_zero() {
            return Err(JogError::InvalidSettings {
                reason: "continuous interval must be greater than zero".to_string(),
            });
        }
        Ok(Self { interval })
    }

    /// Tick cadence
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Begin continuous motion at `at`
    ///
    /// The first move is issued immediately. If it is not legal, nothing
    /// is issued and no tick is scheduled.
    pub fn start<M: MachineInterface + ?Sized>(
        &self,
        hold: &mut HoldState,
        machine: &mut M,
        timers: &mut TimerQueue,
        at: Instant,
    ) -> DriveOutcome {
        self.stop(hold, timers);
        self.step_and_reschedule(hold, machine, timers, at)
    }

    /// Handle a fired tick that was scheduled for `deadline`
    ///
    /// The next tick is scheduled relative to `deadline`, not to when the
    /// tick was processed, so a late `advance` does not drift the cadence.
    pub fn tick<M: MachineInterface + ?Sized>(
        &self,
        hold: &mut HoldState,
        machine: &mut M,
        timers: &mut TimerQueue,
        deadline: Instant,
    ) -> DriveOutcome {
        hold.tick_timer = None;
        self.step_and_reschedule(hold, machine, timers, deadline)
    }

    /// Cancel the pending tick; returns false if none was scheduled
    pub fn stop(&self, hold: &mut HoldState, timers: &mut TimerQueue) -> bool {
        match hold.tick_timer.take() {
            Some(id) => timers.cancel(id),
            None => false,
        }
    }

    fn step_and_reschedule<M: MachineInterface + ?Sized>(
        &self,
        hold: &mut HoldState,
        machine: &mut M,
        timers: &mut TimerQueue,
        at: Instant,
    ) -> DriveOutcome {
        if !step_once(hold, machine) {
            return DriveOutcome::Stopped;
        }
        hold.tick_timer = Some(timers.schedule(at + self.interval, TimerKind::ContinuousTick));
        DriveOutcome::Moved
    }
}

/// Issue one step for `hold` if the gate allows it
pub(crate) fn step_once<M: MachineInterface + ?Sized>(
    hold: &mut HoldState,
    machine: &mut M,
) -> bool {
    let position = machine.position();
    let area = machine.working_area();
    let intent = hold.intent;
    if !can_move(
        &position,
        intent.axis,
        intent.direction,
        hold.step,
        area.as_ref(),
    ) {
        tracing::debug!("Jog {} blocked at {}", intent, position);
        return false;
    }
    machine.jog(intent.axis, intent.direction, hold.step);
    hold.moves += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::SimulatedMachine;
    use jogkit_core::{Axis, Direction, JogIntent, Position, Units, WorkingArea};

    fn setup(x: f64) -> (HoldState, SimulatedMachine, TimerQueue, Instant) {
        let t0 = Instant::now();
        let hold = HoldState::new(JogIntent::new(Axis::X, Direction::Positive), 1.0, t0);
        let machine = SimulatedMachine::new()
            .with_position(Position::new(x, 0.0, 0.0))
            .with_working_area(Some(WorkingArea::new(10.0, 10.0, 10.0, Units::Mm)));
        (hold, machine, TimerQueue::new(), t0)
    }

    #[test]
    fn test_start_moves_immediately_and_schedules() {
        let (mut hold, mut machine, mut timers, t0) = setup(0.0);
        let driver = ContinuousDriver::new(Duration::from_millis(100)).unwrap();

        assert_eq!(
            driver.start(&mut hold, &mut machine, &mut timers, t0),
            DriveOutcome::Moved
        );
        assert_eq!(machine.jogs().len(), 1);
        assert!(hold.is_driving());
        assert_eq!(timers.next_deadline(), Some(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_start_at_boundary_does_nothing() {
        let (mut hold, mut machine, mut timers, t0) = setup(10.0);
        let driver = ContinuousDriver::new(Duration::from_millis(100)).unwrap();

        assert_eq!(
            driver.start(&mut hold, &mut machine, &mut timers, t0),
            DriveOutcome::Stopped
        );
        assert!(machine.jogs().is_empty());
        assert!(!hold.is_driving());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_tick_sees_external_position_change() {
        let (mut hold, mut machine, mut timers, t0) = setup(0.0);
        let driver = ContinuousDriver::new(Duration::from_millis(100)).unwrap();
        driver.start(&mut hold, &mut machine, &mut timers, t0);

        // Position corrected from outside: now at the edge
        machine.set_position(Position::new(10.0, 0.0, 0.0));
        let fired = timers.pop_due(t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(
            driver.tick(&mut hold, &mut machine, &mut timers, fired.deadline),
            DriveOutcome::Stopped
        );
        assert_eq!(machine.jogs().len(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(matches!(
            ContinuousDriver::new(Duration::ZERO),
            Err(JogError::InvalidSettings { .. })
        ));
        assert_eq!(
            ContinuousDriver::new(Duration::from_millis(1))
                .unwrap()
                .interval(),
            Duration::from_millis(1)
        );
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut hold, mut machine, mut timers, t0) = setup(0.0);
        let driver = ContinuousDriver::new(Duration::from_millis(100)).unwrap();
        driver.start(&mut hold, &mut machine, &mut timers, t0);

        assert!(driver.stop(&mut hold, &mut timers));
        assert!(!driver.stop(&mut hold, &mut timers));
        assert!(timers.is_empty());
    }
}
