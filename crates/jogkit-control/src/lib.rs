//! # JogKit Control
//!
//! Press-and-hold jog control for CNC machines.
//!
//! A press on a jog button is classified as a tap (one discrete step) or a
//! hold (continuous stepping at a fixed cadence). Every step passes the
//! input gate first, so continuous motion stops on its own at the edge of
//! the working area.
//!
//! - [`gate`]: working-area legality check for a single step
//! - [`step_size`]: the active jog increment
//! - [`timer`]: deadline queue with cancellable handles
//! - [`hold`]: per-press state
//! - [`driver`]: continuous motion while a hold is active
//! - [`controller`]: tap/hold classification and teardown
//! - [`machine`]: the machine seam and a simulated machine
//! - [`grbl`]: GRBL jog/home commands and status parsing
//! - [`runtime`]: tokio task driving a controller in real time

pub mod controller;
pub mod driver;
pub mod gate;
pub mod grbl;
pub mod hold;
pub mod machine;
pub mod runtime;
pub mod step_size;
pub mod timer;

pub use controller::{PressOutcome, TouchJogController};
pub use driver::{ContinuousDriver, DriveOutcome};
pub use gate::can_move;
pub use grbl::{GrblJogLink, SharedPosition};
pub use hold::HoldState;
pub use machine::{JogRecord, MachineInterface, SimulatedMachine};
pub use runtime::JogRuntime;
pub use step_size::StepSizeSelector;
pub use timer::{FiredTimer, TimerId, TimerKind, TimerQueue};
