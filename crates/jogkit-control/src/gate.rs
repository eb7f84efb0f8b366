//! Working-area legality check for a single jog step.

use jogkit_core::{Axis, Direction, Position, WorkingArea};

/// Whether one step of `step` along `axis` in `direction` stays inside `area`
///
/// With no working area every move is legal. Otherwise the target
/// coordinate must lie in the closed interval `[0, bound]`, so landing
/// exactly on either edge is allowed and the step past it is not.
pub fn can_move(
    position: &Position,
    axis: Axis,
    direction: Direction,
    step: f64,
    area: Option<&WorkingArea>,
) -> bool {
    let Some(area) = area else {
        return true;
    };
    let next = position.axis(axis) + direction.sign() * step;
    (0.0..=area.bound(axis)).contains(&next)
}
