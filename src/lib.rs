//! # JogKit
//!
//! Touch and press-and-hold jog control for CNC machines:
//! - Tap-vs-hold classification of jog button presses
//! - Continuous jogging while a button is held, clamped to the working area
//! - Operator-selectable step sizes
//! - GRBL `$J=` jog and `$H` homing commands
//!
//! ## Architecture
//!
//! JogKit is organized as a workspace with multiple crates:
//!
//! 1. **jogkit-core** - Axis/position types, units, errors, event bus
//! 2. **jogkit-settings** - Jog and machine configuration files
//! 3. **jogkit-control** - Input gate, tap/hold controller, continuous driver,
//!    step-size selector, machine links and the tokio runtime
//! 4. **jogkit** - Demo binary that integrates all crates

pub use jogkit_control::{
    can_move, GrblJogLink, JogRuntime, MachineInterface, PressOutcome, SimulatedMachine,
    StepSizeSelector, TouchJogController,
};
pub use jogkit_core::{
    AppEvent, Axis, Direction, Error, EventBus, EventFilter, JogError, JogEvent, JogIntent,
    Position, Result, Units, WorkingArea,
};
pub use jogkit_settings::{Config, JogSettings, LogFormat, LoggingSettings, MachineSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Console output in the requested format, filtered by `RUST_LOG`
/// (INFO when unset). Fails if a global subscriber is already installed.
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stdout)
                    .with_target(true)
                    .with_level(true)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stdout)
                    .with_target(true)
                    .json()
                    .with_current_span(false),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
