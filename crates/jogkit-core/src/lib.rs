//! # JogKit Core
//!
//! Core types, errors, and events shared by the JogKit crates.
//! Provides the axis/direction vocabulary, machine position and
//! working-area models, and the application event bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod units;

pub use data::{Axis, Direction, JogIntent, Position, WorkingArea};

pub use error::{Error, JogError, Result};

// Re-export event bus for convenience
pub use event_bus::{
    AppEvent, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter, JogEvent,
    MachineEvent, SettingsEvent, SubscriptionId,
};

pub use units::Units;
