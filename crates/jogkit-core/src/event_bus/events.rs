//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so they can be logged or replayed.

use serde::{Deserialize, Serialize};

use crate::data::{Axis, JogIntent};

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Press, hold and move events from a jog controller
    Jog(JogEvent),
    /// Machine commands outside the jog state machine
    Machine(MachineEvent),
    /// Settings changes
    Settings(SettingsEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Jog(_) => EventCategory::Jog,
            AppEvent::Machine(_) => EventCategory::Machine,
            AppEvent::Settings(_) => EventCategory::Settings,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Jog(e) => e.description(),
            AppEvent::Machine(e) => e.description(),
            AppEvent::Settings(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Jog interaction events.
    Jog,
    /// Machine command events.
    Machine,
    /// Settings events.
    Settings,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Jog => write!(f, "Jog"),
            EventCategory::Machine => write!(f, "Machine"),
            EventCategory::Settings => write!(f, "Settings"),
        }
    }
}

/// Jog interaction events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JogEvent {
    /// A press began and the hold timer (if any) was armed.
    PressStarted {
        /// Axis and direction of the press.
        intent: JogIntent,
        /// Step size captured for this press.
        step: f64,
    },
    /// The hold threshold elapsed and continuous motion took over.
    HoldEngaged {
        /// Axis and direction of the press.
        intent: JogIntent,
    },
    /// A move command was issued.
    Moved {
        /// Axis and direction of the move.
        intent: JogIntent,
        /// Distance commanded.
        distance: f64,
    },
    /// A tap was suppressed because the step would leave the working area.
    Blocked {
        /// Axis and direction of the suppressed move.
        intent: JogIntent,
    },
    /// Continuous motion stopped at the working-area boundary.
    BoundaryReached {
        /// Axis and direction of the stopped motion.
        intent: JogIntent,
    },
    /// The press was released.
    Released {
        /// Axis and direction of the press.
        intent: JogIntent,
        /// Whether the press had reached the hold state.
        was_holding: bool,
        /// Moves issued over the whole press.
        moves: usize,
    },
    /// The press was torn down without a release (re-press or dispose).
    Cancelled {
        /// Axis and direction of the cancelled press.
        intent: JogIntent,
    },
}

impl JogEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            JogEvent::PressStarted { intent, step } => {
                format!("Press started: {} step {}", intent, step)
            }
            JogEvent::HoldEngaged { intent } => format!("Hold engaged: {}", intent),
            JogEvent::Moved { intent, distance } => format!("Moved {} by {}", intent, distance),
            JogEvent::Blocked { intent } => format!("Blocked at boundary: {}", intent),
            JogEvent::BoundaryReached { intent } => format!("Boundary reached: {}", intent),
            JogEvent::Released {
                intent,
                was_holding,
                moves,
            } => format!(
                "Released {} ({}, {} moves)",
                intent,
                if *was_holding { "hold" } else { "tap" },
                moves
            ),
            JogEvent::Cancelled { intent } => format!("Press cancelled: {}", intent),
        }
    }
}

/// Machine command events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MachineEvent {
    /// A homing cycle was requested.
    HomeRequested {
        /// Axes to home.
        axes: Vec<Axis>,
    },
}

impl MachineEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            MachineEvent::HomeRequested { axes } => {
                let names: String = axes.iter().map(|a| a.letter()).collect();
                format!("Home requested: {}", names)
            }
        }
    }
}

/// Settings events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// The active jog step size changed.
    StepSizeChanged {
        /// Previous step size.
        previous: f64,
        /// New step size.
        current: f64,
    },
}

impl SettingsEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            SettingsEvent::StepSizeChanged { previous, current } => {
                format!("Step size changed: {} -> {}", previous, current)
            }
        }
    }
}
