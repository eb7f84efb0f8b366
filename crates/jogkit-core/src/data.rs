//! Data models for axes, jog intents, positions and the working area
//!
//! This module provides:
//! - The three linear axes and the two jog directions
//! - `JogIntent`, the (axis, direction) pair behind a single press
//! - `Position`, the machine's latest reported XYZ offsets
//! - `WorkingArea`, the travel envelope anchored at the origin

use crate::error::JogError;
use crate::units::Units;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear machine axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis (working-area width)
    X,
    /// Y axis (working-area height)
    Y,
    /// Z axis (working-area depth)
    Z,
}

impl Axis {
    /// All linear axes in X, Y, Z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Axis letter as used in G-code words
    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Axis {
    type Err = JogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(JogError::UnknownAxis {
                name: other.to_string(),
            }),
        }
    }
}

/// Jog direction along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards larger coordinates (+1)
    Positive,
    /// Towards smaller coordinates (-1)
    Negative,
}

impl Direction {
    /// Signed unit factor (+1.0 or -1.0)
    pub fn sign(self) -> f64 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }

    /// Signed integer form (+1 or -1)
    pub fn as_i32(self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = JogError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Positive),
            -1 => Ok(Direction::Negative),
            value => Err(JogError::InvalidDirection { value }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => write!(f, "+"),
            Direction::Negative => write!(f, "-"),
        }
    }
}

/// The axis and direction a press is jogging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JogIntent {
    /// Axis to move
    pub axis: Axis,
    /// Direction of travel
    pub direction: Direction,
}

impl JogIntent {
    /// Create a new jog intent
    pub fn new(axis: Axis, direction: Direction) -> Self {
        Self { axis, direction }
    }
}

impl fmt::Display for JogIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.axis, self.direction)
    }
}

/// Machine position in XYZ
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "Position axes must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// Coordinate on a single axis
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Mutable coordinate on a single axis
    pub fn axis_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Copy of this position moved by `distance` along one axis
    pub fn offset(&self, axis: Axis, distance: f64) -> Self {
        let mut moved = *self;
        *moved.axis_mut(axis) += distance;
        moved
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.3} Y:{:.3} Z:{:.3}", self.x, self.y, self.z)
    }
}

/// Axis-aligned travel envelope from the origin to (width, height, depth)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkingArea {
    /// Upper X bound
    pub width: f64,
    /// Upper Y bound
    pub height: f64,
    /// Upper Z bound
    pub depth: f64,
    /// Unit of all three bounds
    #[serde(default)]
    pub units: Units,
}

impl WorkingArea {
    /// Create a working area in the given unit
    pub fn new(width: f64, height: f64, depth: f64, units: Units) -> Self {
        Self {
            width,
            height,
            depth,
            units,
        }
    }

    /// Upper bound on `axis` (the lower bound is always 0)
    pub fn bound(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Z => self.depth,
        }
    }

    /// The same envelope expressed in another unit
    pub fn in_units(&self, units: Units) -> Self {
        Self {
            width: Units::convert(self.width, self.units, units),
            height: Units::convert(self.height, self.units, units),
            depth: Units::convert(self.depth, self.units, units),
            units,
        }
    }

    /// Whether `position` lies inside the closed box
    pub fn contains(&self, position: &Position) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let value = position.axis(axis);
            (0.0..=self.bound(axis)).contains(&value)
        })
    }
}

impl fmt::Display for WorkingArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} {}",
            self.width, self.height, self.depth, self.units
        )
    }
}
