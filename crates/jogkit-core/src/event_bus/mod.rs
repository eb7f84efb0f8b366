//! # Event Bus Module
//!
//! Publish/subscribe distribution of jog, machine and settings events.
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by category and receive events of interest
//! - Async consumers can take a `tokio::sync::broadcast` receiver
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jogkit_core::event_bus::{EventBus, AppEvent, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Jog]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
