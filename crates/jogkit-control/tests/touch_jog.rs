//! Tap/hold behaviour of the jog controller against a simulated machine

use jogkit_control::{
    JogRecord, MachineInterface, PressOutcome, SimulatedMachine, TouchJogController,
};
use jogkit_core::{
    AppEvent, Axis, Direction, EventBus, EventCategory, EventFilter, JogError, JogEvent, Position,
    Units, WorkingArea,
};
use jogkit_settings::JogSettings;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

const HOLD_MS: u64 = 500;
const INTERVAL_MS: u64 = 100;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn controller(machine: SimulatedMachine) -> TouchJogController<SimulatedMachine> {
    TouchJogController::new(machine, &JogSettings::default()).unwrap()
}

fn bounded_at(x: f64) -> SimulatedMachine {
    SimulatedMachine::new()
        .with_position(Position::new(x, 0.0, 0.0))
        .with_working_area(Some(WorkingArea::new(300.0, 200.0, 100.0, Units::Mm)))
}

#[test]
fn test_tap_issues_one_move() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    assert_eq!(c.press_end(t0 + ms(120)), PressOutcome::Tap { moved: true });

    assert_eq!(
        c.machine().jogs(),
        &[JogRecord {
            axis: Axis::X,
            direction: Direction::Positive,
            distance: 1.0
        }]
    );

    // Nothing more happens afterwards
    c.advance(t0 + ms(5_000));
    assert_eq!(c.machine().jogs().len(), 1);
    assert_eq!(c.pending_timers(), 0);
}

#[test]
fn test_tap_with_large_step_unbounded() {
    let machine = SimulatedMachine::new().with_position(Position::new(0.0, 50.0, 0.0));
    let mut c = controller(machine);
    c.select_step_size(10.0).unwrap();
    let t0 = Instant::now();

    c.press_start(Axis::Y, Direction::Negative, t0);
    assert_eq!(c.press_end(t0 + ms(50)), PressOutcome::Tap { moved: true });

    assert_eq!(
        c.machine().jogs(),
        &[JogRecord {
            axis: Axis::Y,
            direction: Direction::Negative,
            distance: 10.0
        }]
    );
    assert_eq!(c.machine().position(), Position::new(0.0, 40.0, 0.0));
    assert_eq!(c.pending_timers(), 0);
}

#[test]
fn test_hold_issues_periodic_moves() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();
    let extra_ticks = 5;

    c.press_start(Axis::Z, Direction::Positive, t0);
    let moves = c.advance(t0 + ms(HOLD_MS + extra_ticks * INTERVAL_MS));

    assert_eq!(moves, 1 + extra_ticks as usize);
    assert_eq!(c.machine().jogs().len(), 1 + extra_ticks as usize);
    assert!(c.is_holding());

    assert_eq!(
        c.press_end(t0 + ms(HOLD_MS + extra_ticks * INTERVAL_MS + 10)),
        PressOutcome::HoldReleased { moves: 6 }
    );
    // Release after a hold issues no extra discrete move
    assert_eq!(c.machine().jogs().len(), 6);
    assert_eq!(c.pending_timers(), 0);
}

#[test]
fn test_fine_grained_advance_matches_single_advance() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    let mut moves = 0;
    for i in 0..=100 {
        moves += c.advance(t0 + ms(i * 10));
    }

    // Hold at 500 plus ticks at 600..=1000
    assert_eq!(moves, 6);
    assert_eq!(c.machine().position().x, 6.0);
    c.dispose();
    assert_eq!(c.pending_timers(), 0);
}

#[test]
fn test_first_hold_move_at_threshold() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Negative, t0);
    assert_eq!(c.advance(t0 + ms(HOLD_MS - 1)), 0);
    assert!(!c.is_holding());
    assert_eq!(c.advance(t0 + ms(HOLD_MS)), 1);
    assert!(c.is_holding());
    assert_eq!(c.advance(t0 + ms(HOLD_MS + INTERVAL_MS - 1)), 0);
    c.dispose();
}

#[test]
fn test_release_exactly_at_threshold_is_hold() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();

    c.press_start(Axis::Y, Direction::Positive, t0);
    assert_eq!(
        c.press_end(t0 + ms(HOLD_MS)),
        PressOutcome::HoldReleased { moves: 1 }
    );
    assert_eq!(c.machine().jogs().len(), 1);
    assert_eq!(c.machine().position().y, 1.0);
    assert_eq!(c.pending_timers(), 0);
}

#[test]
fn test_zero_timing_settings_rejected() {
    let zero_interval = JogSettings {
        continuous_interval_ms: 0,
        ..Default::default()
    };
    assert!(matches!(
        TouchJogController::new(SimulatedMachine::new(), &zero_interval),
        Err(JogError::InvalidSettings { .. })
    ));

    let zero_threshold = JogSettings {
        hold_threshold_ms: 0,
        ..Default::default()
    };
    assert!(matches!(
        TouchJogController::new(SimulatedMachine::new(), &zero_threshold),
        Err(JogError::InvalidSettings { .. })
    ));

    let no_steps = JogSettings {
        step_sizes: Vec::new(),
        ..Default::default()
    };
    assert!(TouchJogController::new(SimulatedMachine::new(), &no_steps).is_err());
}

#[test]
fn test_release_stops_motion() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();

    c.press_start(Axis::Y, Direction::Positive, t0);
    c.advance(t0 + ms(720));
    assert_eq!(c.machine().jogs().len(), 3);

    assert_eq!(
        c.press_end(t0 + ms(730)),
        PressOutcome::HoldReleased { moves: 3 }
    );
    assert_eq!(c.pending_timers(), 0);

    assert_eq!(c.advance(t0 + ms(60_000)), 0);
    assert_eq!(c.machine().jogs().len(), 3);
}

#[test]
fn test_boundary_halts_continuous_motion() {
    let mut c = controller(bounded_at(299.0));
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    c.advance(t0 + ms(HOLD_MS + 2 * INTERVAL_MS));

    assert_eq!(
        c.machine().jogs(),
        &[JogRecord {
            axis: Axis::X,
            direction: Direction::Positive,
            distance: 1.0
        }]
    );
    assert_eq!(c.machine().position().x, 300.0);

    // Still pressed, but the driver has stopped on its own
    assert!(c.is_pressed());
    assert!(c.is_holding());
    assert_eq!(c.pending_timers(), 0);
    assert_eq!(c.advance(t0 + ms(10_000)), 0);

    assert_eq!(
        c.press_end(t0 + ms(10_001)),
        PressOutcome::HoldReleased { moves: 1 }
    );
    assert_eq!(c.machine().jogs().len(), 1);
}

#[test]
fn test_hold_starting_at_boundary_does_not_move() {
    let mut c = controller(bounded_at(300.0));
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    assert_eq!(c.advance(t0 + ms(2_000)), 0);
    assert!(!c.is_holding());
    assert_eq!(c.pending_timers(), 0);

    // Treated as never having held: release runs the tap path, still blocked
    assert_eq!(
        c.press_end(t0 + ms(2_100)),
        PressOutcome::Tap { moved: false }
    );
    assert!(c.machine().jogs().is_empty());
}

#[test]
fn test_tap_at_boundary_is_suppressed() {
    let mut c = controller(bounded_at(0.0));
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Negative, t0);
    assert_eq!(c.press_end(t0 + ms(40)), PressOutcome::Tap { moved: false });
    assert!(c.machine().jogs().is_empty());

    // The opposite direction is fine
    c.press_start(Axis::X, Direction::Positive, t0 + ms(100));
    assert_eq!(c.press_end(t0 + ms(140)), PressOutcome::Tap { moved: true });
}

#[test]
fn test_repress_cancels_pending_hold() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    c.press_start(Axis::Y, Direction::Positive, t0 + ms(300));
    assert_eq!(c.pending_timers(), 1);

    // The X hold threshold (t0 + 500) must never fire
    assert_eq!(c.advance(t0 + ms(600)), 0);
    assert_eq!(c.press_end(t0 + ms(600)), PressOutcome::Tap { moved: true });

    assert_eq!(
        c.machine().jogs(),
        &[JogRecord {
            axis: Axis::Y,
            direction: Direction::Positive,
            distance: 1.0
        }]
    );
    assert_eq!(c.advance(t0 + ms(10_000)), 0);
    assert_eq!(c.pending_timers(), 0);
}

#[test]
fn test_repress_during_hold_stops_previous_driver() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    c.advance(t0 + ms(650));
    assert_eq!(c.machine().position().x, 2.0);

    c.press_start(Axis::Z, Direction::Negative, t0 + ms(660));
    assert_eq!(c.pending_timers(), 1);
    c.advance(t0 + ms(1_200));

    // Only the new press moves; X stayed where the old driver left it
    let position = c.machine().position();
    assert_eq!(position.x, 2.0);
    assert_eq!(position.z, -1.0);
    c.dispose();
    assert_eq!(c.pending_timers(), 0);
}

#[test]
fn test_continuous_disabled_every_press_is_tap() {
    let settings = JogSettings {
        continuous_jog_enabled: false,
        ..Default::default()
    };
    let mut c = TouchJogController::new(SimulatedMachine::new(), &settings).unwrap();
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    assert_eq!(c.pending_timers(), 0);
    assert_eq!(c.advance(t0 + ms(3_000)), 0);
    assert_eq!(c.press_end(t0 + ms(3_000)), PressOutcome::Tap { moved: true });
    assert_eq!(c.machine().jogs().len(), 1);
}

#[test]
fn test_driver_reacts_to_external_position_correction() {
    let mut c = controller(bounded_at(0.0));
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    c.advance(t0 + ms(600));
    assert_eq!(c.machine().jogs().len(), 2);

    c.machine_mut().set_position(Position::new(299.5, 0.0, 0.0));
    assert_eq!(c.advance(t0 + ms(1_000)), 0);
    assert_eq!(c.pending_timers(), 0);
    assert_eq!(c.machine().jogs().len(), 2);
    c.dispose();
}

#[test]
fn test_driver_reacts_to_shrunk_working_area() {
    let mut c = controller(bounded_at(0.0));
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    c.advance(t0 + ms(600));
    assert_eq!(c.machine().position().x, 2.0);

    c.machine_mut()
        .set_working_area(Some(WorkingArea::new(2.5, 200.0, 100.0, Units::Mm)));
    assert_eq!(c.advance(t0 + ms(700)), 0);

    let press = c.active_press().unwrap();
    assert_eq!(press.intent.axis, Axis::X);
    assert_eq!(press.moves, 2);
    assert!(press.is_holding);
    assert!(!press.is_driving());
    assert_eq!(c.pending_timers(), 0);

    assert_eq!(
        c.press_end(t0 + ms(800)),
        PressOutcome::HoldReleased { moves: 2 }
    );
    assert!(c.active_press().is_none());
}

#[test]
fn test_dispose_mid_hold_leaves_no_timers() {
    let mut c = controller(SimulatedMachine::new());
    let t0 = Instant::now();

    c.press_start(Axis::Y, Direction::Negative, t0);
    c.advance(t0 + ms(550));
    assert!(c.is_holding());

    c.dispose();
    assert!(!c.is_pressed());
    assert_eq!(c.pending_timers(), 0);
    assert_eq!(c.advance(t0 + ms(5_000)), 0);
    assert_eq!(c.machine().jogs().len(), 1);

    let machine = c.into_machine();
    assert_eq!(machine.position().y, -1.0);
}

#[test]
fn test_home_is_independent_of_press() {
    let mut c = controller(SimulatedMachine::new().with_position(Position::new(4.0, 5.0, 6.0)));
    let t0 = Instant::now();

    c.press_start(Axis::X, Direction::Positive, t0);
    c.home(&[Axis::X, Axis::Y]);
    assert!(c.is_pressed());
    assert_eq!(c.machine().position(), Position::new(0.0, 0.0, 6.0));

    assert_eq!(c.press_end(t0 + ms(10)), PressOutcome::Tap { moved: true });
    assert_eq!(c.machine().position(), Position::new(1.0, 0.0, 6.0));
}

#[test]
fn test_events_for_hold_into_boundary() {
    let bus = Arc::new(EventBus::new());
    let seen: Arc<Mutex<Vec<JogEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Jog]),
        move |event| {
            if let AppEvent::Jog(e) = event {
                sink.lock().push(e.clone());
            }
        },
    );

    let mut c = controller(bounded_at(299.0)).with_event_bus(bus);
    let t0 = Instant::now();
    c.press_start(Axis::X, Direction::Positive, t0);
    c.advance(t0 + ms(700));
    c.press_end(t0 + ms(800));

    let events = seen.lock();
    let kinds: Vec<&str> = events
        .iter()
        .map(|e| match e {
            JogEvent::PressStarted { .. } => "press",
            JogEvent::HoldEngaged { .. } => "hold",
            JogEvent::Moved { .. } => "moved",
            JogEvent::Blocked { .. } => "blocked",
            JogEvent::BoundaryReached { .. } => "boundary",
            JogEvent::Released { .. } => "released",
            JogEvent::Cancelled { .. } => "cancelled",
        })
        .collect();
    assert_eq!(kinds, vec!["press", "hold", "moved", "boundary", "released"]);
    assert!(matches!(
        events.last(),
        Some(JogEvent::Released {
            was_holding: true,
            moves: 1,
            ..
        })
    ));
}

#[test]
fn test_cancel_event_on_repress() {
    let bus = Arc::new(EventBus::new());
    let mut receiver = bus.receiver();

    let mut c = controller(SimulatedMachine::new()).with_event_bus(bus);
    let t0 = Instant::now();
    c.press_start(Axis::X, Direction::Positive, t0);
    c.press_start(Axis::Y, Direction::Positive, t0 + ms(10));
    c.dispose();

    let mut cancelled = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        if let AppEvent::Jog(JogEvent::Cancelled { intent }) = event {
            cancelled.push(intent.axis);
        }
    }
    assert_eq!(cancelled, vec![Axis::X, Axis::Y]);
}
