//! Machine seam for the jog controller
//!
//! The controller reads position and working area through this trait
//! before every legality check and pushes jog/home requests back out.
//! Requests are fire-and-forget: nothing is awaited or retried.

use jogkit_core::{Axis, Direction, Position, WorkingArea};

/// The machine-control collaborator a jog controller talks to
pub trait MachineInterface {
    /// Latest known machine position
    fn position(&self) -> Position;

    /// Current travel envelope, if the machine has one
    fn working_area(&self) -> Option<WorkingArea>;

    /// Request a relative move of `distance` along `axis`
    fn jog(&mut self, axis: Axis, direction: Direction, distance: f64);

    /// Request a homing cycle on `axes`
    fn home(&mut self, axes: &[Axis]);
}

impl<T: MachineInterface + ?Sized> MachineInterface for Box<T> {
    fn position(&self) -> Position {
        (**self).position()
    }

    fn working_area(&self) -> Option<WorkingArea> {
        (**self).working_area()
    }

    fn jog(&mut self, axis: Axis, direction: Direction, distance: f64) {
        (**self).jog(axis, direction, distance)
    }

    fn home(&mut self, axes: &[Axis]) {
        (**self).home(axes)
    }
}

/// One jog request as received by a [`SimulatedMachine`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JogRecord {
    /// Axis moved
    pub axis: Axis,
    /// Direction moved
    pub direction: Direction,
    /// Distance requested
    pub distance: f64,
}

/// In-memory machine that applies jogs instantly
///
/// Keeps a log of every jog and home request, which makes it the
/// machine of choice for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMachine {
    position: Position,
    working_area: Option<WorkingArea>,
    jogs: Vec<JogRecord>,
    homes: Vec<Vec<Axis>>,
}

impl SimulatedMachine {
    /// Machine at the origin with no working area
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `position`
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Bound travel to `area`
    pub fn with_working_area(mut self, area: Option<WorkingArea>) -> Self {
        self.working_area = area;
        self
    }

    /// Overwrite the position, as an external status update would
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Replace the working area
    pub fn set_working_area(&mut self, area: Option<WorkingArea>) {
        self.working_area = area;
    }

    /// Jog requests received so far
    pub fn jogs(&self) -> &[JogRecord] {
        &self.jogs
    }

    /// Home requests received so far
    pub fn homes(&self) -> &[Vec<Axis>] {
        &self.homes
    }

    /// Forget recorded requests (position is kept)
    pub fn clear_log(&mut self) {
        self.jogs.clear();
        self.homes.clear();
    }
}

impl MachineInterface for SimulatedMachine {
    fn position(&self) -> Position {
        self.position
    }

    fn working_area(&self) -> Option<WorkingArea> {
        self.working_area
    }

    fn jog(&mut self, axis: Axis, direction: Direction, distance: f64) {
        *self.position.axis_mut(axis) += direction.sign() * distance;
        self.jogs.push(JogRecord {
            axis,
            direction,
            distance,
        });
    }

    fn home(&mut self, axes: &[Axis]) {
        for &axis in axes {
            *self.position.axis_mut(axis) = 0.0;
        }
        self.homes.push(axes.to_vec());
    }
}
