//! Tap/hold jog controller
//!
//! One controller backs one control surface. It owns the machine link,
//! the active step size, and at most one [`HoldState`]. Time is passed in
//! explicitly, so the controller is driven the same way by tests and by
//! [`crate::runtime::JogRuntime`].
//!
//! A press arms a hold-threshold timer. Releasing before it fires is a
//! tap and issues one step. If it fires first, the [`ContinuousDriver`]
//! takes over and steps every interval until release or until the next
//! step would leave the working area.

use crate::driver::{step_once, ContinuousDriver, DriveOutcome};
use crate::hold::HoldState;
use crate::machine::MachineInterface;
use crate::step_size::StepSizeSelector;
use crate::timer::{TimerKind, TimerQueue};
use jogkit_core::{
    AppEvent, Axis, Direction, EventBus, JogError, JogEvent, JogIntent, MachineEvent,
    SettingsEvent,
};
use jogkit_settings::{Config, JogSettings};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What a release did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Released before the hold threshold
    Tap {
        /// Whether the single step was legal and issued
        moved: bool,
    },
    /// Released after continuous motion took over
    HoldReleased {
        /// Moves issued while holding
        moves: usize,
    },
    /// Released faster than the tap debounce floor; nothing issued
    Debounced,
    /// No press was active
    Idle,
}

/// Jog controller for a single control surface
pub struct TouchJogController<M> {
    machine: M,
    continuous_enabled: bool,
    hold_threshold: Duration,
    tap_debounce: Duration,
    driver: ContinuousDriver,
    steps: StepSizeSelector,
    home_axes: Vec<Axis>,
    timers: TimerQueue,
    hold: Option<HoldState>,
    bus: Option<Arc<EventBus>>,
}

impl<M: MachineInterface> TouchJogController<M> {
    /// Create a controller from jog settings
    ///
    /// Settings are validated first; a zero hold threshold or interval is
    /// rejected.
    pub fn new(machine: M, settings: &JogSettings) -> Result<Self, JogError> {
        settings
            .validate()
            .map_err(|e| JogError::InvalidSettings {
                reason: e.to_string(),
            })?;
        Ok(Self {
            machine,
            continuous_enabled: settings.continuous_jog_enabled,
            hold_threshold: settings.hold_threshold(),
            tap_debounce: settings.tap_debounce(),
            driver: ContinuousDriver::new(settings.continuous_interval())?,
            steps: StepSizeSelector::from_settings(settings)?,
            home_axes: Axis::ALL.to_vec(),
            timers: TimerQueue::new(),
            hold: None,
            bus: None,
        })
    }

    /// Create a controller from a full config (adds the home-all axes)
    pub fn from_config(machine: M, config: &Config) -> Result<Self, JogError> {
        let mut controller = Self::new(machine, &config.jog)?;
        controller.home_axes = config.machine.home_axes.clone();
        Ok(controller)
    }

    /// Publish controller events on `bus`
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Begin a press on `axis` in `direction`
    ///
    /// Any press still active is torn down first.
    pub fn press_start(&mut self, axis: Axis, direction: Direction, now: Instant) {
        self.advance(now);
        self.cancel_active();

        let intent = JogIntent::new(axis, direction);
        let step = self.steps.get();
        let mut hold = HoldState::new(intent, step, now);
        if self.continuous_enabled {
            hold.hold_timer = Some(
                self.timers
                    .schedule(now + self.hold_threshold, TimerKind::HoldThreshold),
            );
        }
        self.hold = Some(hold);

        tracing::debug!("Press started: {} step {}", intent, step);
        self.emit(AppEvent::Jog(JogEvent::PressStarted { intent, step }));
    }

    /// End the active press
    pub fn press_end(&mut self, now: Instant) -> PressOutcome {
        self.advance(now);
        let Some(mut hold) = self.hold.take() else {
            return PressOutcome::Idle;
        };
        self.teardown(&mut hold);

        let outcome = if hold.is_holding {
            PressOutcome::HoldReleased { moves: hold.moves }
        } else if hold.elapsed(now) < self.tap_debounce {
            tracing::debug!("Release of {} inside debounce window", hold.intent);
            PressOutcome::Debounced
        } else {
            let moved = step_once(&mut hold, &mut self.machine);
            if moved {
                self.emit(AppEvent::Jog(JogEvent::Moved {
                    intent: hold.intent,
                    distance: hold.step,
                }));
            } else {
                self.emit(AppEvent::Jog(JogEvent::Blocked {
                    intent: hold.intent,
                }));
            }
            PressOutcome::Tap { moved }
        };

        tracing::debug!("Press released: {} -> {:?}", hold.intent, outcome);
        self.emit(AppEvent::Jog(JogEvent::Released {
            intent: hold.intent,
            was_holding: hold.is_holding,
            moves: hold.moves,
        }));
        outcome
    }

    /// Fire every timer due at or before `now`; returns moves issued
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut moves = 0;
        while let Some(timer) = self.timers.pop_due(now) {
            let Some(hold) = self.hold.as_mut() else {
                tracing::warn!("Timer {:?} fired with no active press", timer.id);
                continue;
            };
            let intent = hold.intent;

            match timer.kind {
                TimerKind::HoldThreshold => {
                    if hold.hold_timer != Some(timer.id) {
                        continue;
                    }
                    hold.hold_timer = None;
                    let outcome =
                        self.driver
                            .start(hold, &mut self.machine, &mut self.timers, timer.deadline);
                    if outcome == DriveOutcome::Moved {
                        hold.is_holding = true;
                        let step = hold.step;
                        moves += 1;
                        tracing::debug!("Hold engaged: {}", intent);
                        self.emit(AppEvent::Jog(JogEvent::HoldEngaged { intent }));
                        self.emit(AppEvent::Jog(JogEvent::Moved {
                            intent,
                            distance: step,
                        }));
                    } else {
                        tracing::debug!("Hold on {} at boundary, no motion", intent);
                    }
                }
                TimerKind::ContinuousTick => {
                    if hold.tick_timer != Some(timer.id) {
                        continue;
                    }
                    let step = hold.step;
                    match self
                        .driver
                        .tick(hold, &mut self.machine, &mut self.timers, timer.deadline)
                    {
                        DriveOutcome::Moved => {
                            moves += 1;
                            self.emit(AppEvent::Jog(JogEvent::Moved {
                                intent,
                                distance: step,
                            }));
                        }
                        DriveOutcome::Stopped => {
                            tracing::debug!("Continuous jog {} reached boundary", intent);
                            self.emit(AppEvent::Jog(JogEvent::BoundaryReached { intent }));
                        }
                    }
                }
            }
        }
        moves
    }

    /// Tear down any active press without issuing a move
    ///
    /// Call when the control surface goes away. Leaves no timers pending.
    pub fn dispose(&mut self) {
        self.cancel_active();
        debug_assert!(self.timers.is_empty(), "timers left after dispose");
    }

    /// Select the active step size
    pub fn select_step_size(&mut self, value: f64) -> Result<(), JogError> {
        let previous = self.steps.select(value)?;
        if previous != value {
            self.emit(AppEvent::Settings(SettingsEvent::StepSizeChanged {
                previous,
                current: value,
            }));
        }
        Ok(())
    }

    /// Active step size
    pub fn step_size(&self) -> f64 {
        self.steps.get()
    }

    /// Step size selector (for listing choices)
    pub fn step_sizes(&self) -> &StepSizeSelector {
        &self.steps
    }

    /// Request homing of `axes`; independent of any active press
    pub fn home(&mut self, axes: &[Axis]) {
        tracing::info!("Homing requested: {:?}", axes);
        self.machine.home(axes);
        self.emit(AppEvent::Machine(MachineEvent::HomeRequested {
            axes: axes.to_vec(),
        }));
    }

    /// Home the configured home-all axes
    pub fn home_all(&mut self) {
        let axes = self.home_axes.clone();
        self.home(&axes);
    }

    /// Whether a press is active
    pub fn is_pressed(&self) -> bool {
        self.hold.is_some()
    }

    /// Whether the active press reached the hold state
    pub fn is_holding(&self) -> bool {
        self.hold.as_ref().is_some_and(|h| h.is_holding)
    }

    /// The active press, if any
    pub fn active_press(&self) -> Option<&HoldState> {
        self.hold.as_ref()
    }

    /// Number of scheduled timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Next time `advance` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Machine link
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Mutable machine link
    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Consume the controller, returning the machine link
    pub fn into_machine(mut self) -> M {
        self.dispose();
        self.machine
    }

    fn cancel_active(&mut self) {
        if let Some(mut hold) = self.hold.take() {
            self.teardown(&mut hold);
            tracing::debug!("Press cancelled: {}", hold.intent);
            self.emit(AppEvent::Jog(JogEvent::Cancelled {
                intent: hold.intent,
            }));
        }
    }

    /// Single cancellation path for release, re-press and dispose
    fn teardown(&mut self, hold: &mut HoldState) {
        hold.disarm_hold(&mut self.timers);
        self.driver.stop(hold, &mut self.timers);
    }

    fn emit(&self, event: AppEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event).ok();
        }
    }
}

impl<M> std::fmt::Debug for TouchJogController<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TouchJogController")
            .field("continuous_enabled", &self.continuous_enabled)
            .field("hold_threshold", &self.hold_threshold)
            .field("driver", &self.driver)
            .field("step", &self.steps.get())
            .field("hold", &self.hold)
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::SimulatedMachine;
    use jogkit_core::Position;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> TouchJogController<SimulatedMachine> {
        TouchJogController::new(SimulatedMachine::new(), &JogSettings::default()).unwrap()
    }

    #[test]
    fn test_release_without_press_is_idle() {
        let mut c = controller();
        assert_eq!(c.press_end(Instant::now()), PressOutcome::Idle);
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn test_press_arms_single_timer() {
        let mut c = controller();
        let t0 = Instant::now();
        c.press_start(Axis::X, Direction::Positive, t0);

        assert!(c.is_pressed());
        assert!(!c.is_holding());
        assert_eq!(c.pending_timers(), 1);
        assert_eq!(c.next_deadline(), Some(t0 + ms(500)));

        c.dispose();
        assert!(!c.is_pressed());
        assert_eq!(c.pending_timers(), 0);
        assert!(c.machine().jogs().is_empty());
    }

    #[test]
    fn test_step_captured_at_press_start() {
        let mut c = controller();
        let t0 = Instant::now();
        c.press_start(Axis::Z, Direction::Positive, t0);
        c.select_step_size(10.0).unwrap();

        assert_eq!(c.press_end(t0 + ms(20)), PressOutcome::Tap { moved: true });
        assert_eq!(c.machine().position(), Position::new(0.0, 0.0, 1.0));
        assert_eq!(c.step_size(), 10.0);
    }

    #[test]
    fn test_debounce_floor() {
        let settings = JogSettings {
            tap_debounce_ms: 30,
            ..Default::default()
        };
        let mut c = TouchJogController::new(SimulatedMachine::new(), &settings).unwrap();
        let t0 = Instant::now();

        c.press_start(Axis::X, Direction::Positive, t0);
        assert_eq!(c.press_end(t0 + ms(10)), PressOutcome::Debounced);
        assert!(c.machine().jogs().is_empty());

        c.press_start(Axis::X, Direction::Positive, t0 + ms(100));
        assert_eq!(c.press_end(t0 + ms(130)), PressOutcome::Tap { moved: true });
        assert_eq!(c.machine().jogs().len(), 1);
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn test_home_all_uses_configured_axes() {
        let mut config = Config::default();
        config.machine.home_axes = vec![Axis::Z];
        let machine = SimulatedMachine::new().with_position(Position::new(3.0, 3.0, 3.0));
        let mut c = TouchJogController::from_config(machine, &config).unwrap();

        c.home_all();
        assert_eq!(c.machine().homes(), &[vec![Axis::Z]]);
        assert_eq!(c.machine().position(), Position::new(3.0, 3.0, 0.0));
    }

    #[test]
    fn test_invalid_default_step_rejected() {
        let settings = JogSettings {
            default_step_size: Some(-1.0),
            ..Default::default()
        };
        assert!(TouchJogController::new(SimulatedMachine::new(), &settings).is_err());
    }
}
