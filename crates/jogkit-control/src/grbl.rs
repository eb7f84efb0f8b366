//! GRBL machine link
//!
//! Turns jog and home requests into GRBL command lines and keeps the
//! position fed from GRBL status reports. Lines go out over an unbounded
//! tokio channel to whatever owns the serial connection; a closed channel
//! drops the command with a warning.

use crate::machine::MachineInterface;
use jogkit_core::{Axis, Direction, JogError, Position, Units, WorkingArea};
use jogkit_settings::Config;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Position shared between the status reader and the jog link
pub type SharedPosition = Arc<RwLock<Position>>;

/// Build a GRBL incremental jog line
///
/// Format: `$J=G91 G21 X1.000 F1000` (G20 when jogging in inches).
pub fn jog_command(
    axis: Axis,
    direction: Direction,
    distance: f64,
    units: Units,
    feed_rate: f64,
) -> String {
    format!(
        "$J=G91 {} {}{:.3} F{:.0}",
        units.gcode(),
        axis.letter(),
        direction.sign() * distance,
        feed_rate
    )
}

/// Build the GRBL homing lines for `axes`
///
/// All three axes home with a single `$H`; a subset uses the
/// single-axis `$HX` / `$HY` / `$HZ` form.
pub fn home_commands(axes: &[Axis]) -> Vec<String> {
    if Axis::ALL.iter().all(|a| axes.contains(a)) {
        return vec!["$H".to_string()];
    }
    axes.iter().map(|a| format!("$H{}", a.letter())).collect()
}

/// Extract the position from a GRBL status report
///
/// Accepts `<Idle|MPos:1.000,2.000,3.000|...>` and the `WPos:` form.
pub fn parse_status_position(report: &str) -> Result<Position, JogError> {
    let body = report
        .trim()
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| JogError::StatusParse {
            reason: format!("not a status report: {}", report.trim()),
        })?;

    let coords = body
        .split('|')
        .find_map(|field| {
            field
                .strip_prefix("MPos:")
                .or_else(|| field.strip_prefix("WPos:"))
        })
        .ok_or_else(|| JogError::StatusParse {
            reason: "no MPos or WPos field".to_string(),
        })?;

    let values: Vec<f64> = coords
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| JogError::StatusParse {
            reason: format!("bad coordinate in '{}': {}", coords, e),
        })?;

    if values.iter().any(|v| !v.is_finite()) {
        return Err(JogError::StatusParse {
            reason: format!("non-finite coordinate in '{}'", coords),
        });
    }

    match values.as_slice() {
        [x, y, z, ..] => Ok(Position::new(*x, *y, *z)),
        _ => Err(JogError::StatusParse {
            reason: format!("expected 3 coordinates, got {}", values.len()),
        }),
    }
}

/// Machine link that speaks GRBL jog and home commands
#[derive(Debug, Clone)]
pub struct GrblJogLink {
    position: SharedPosition,
    working_area: Option<WorkingArea>,
    units: Units,
    feed_rate: f64,
    commands: mpsc::UnboundedSender<String>,
}

impl GrblJogLink {
    /// Create a link sending lines on `commands`
    pub fn new(commands: mpsc::UnboundedSender<String>, units: Units, feed_rate: f64) -> Self {
        Self {
            position: Arc::new(RwLock::new(Position::default())),
            working_area: None,
            units,
            feed_rate,
            commands,
        }
    }

    /// Create a link using the machine units, envelope and jog feed rate from `config`
    pub fn from_config(config: &Config, commands: mpsc::UnboundedSender<String>) -> Self {
        Self::new(commands, config.machine.units, config.jog.feed_rate)
            .with_working_area(config.machine.working_area)
    }

    /// Bound jogging to `area`, converted to this link's units
    pub fn with_working_area(mut self, area: Option<WorkingArea>) -> Self {
        self.working_area = area.map(|a| a.in_units(self.units));
        self
    }

    /// Handle for readers that want to follow the position
    pub fn position_handle(&self) -> SharedPosition {
        self.position.clone()
    }

    /// Update the position from a status report line
    pub fn apply_status_report(&self, report: &str) -> Result<Position, JogError> {
        let position = parse_status_position(report)?;
        *self.position.write() = position;
        Ok(position)
    }

    fn send(&self, line: String) {
        tracing::debug!("> {}", line);
        if self.commands.send(line).is_err() {
            tracing::warn!("GRBL command channel closed, command dropped");
        }
    }
}

impl MachineInterface for GrblJogLink {
    fn position(&self) -> Position {
        *self.position.read()
    }

    fn working_area(&self) -> Option<WorkingArea> {
        self.working_area
    }

    fn jog(&mut self, axis: Axis, direction: Direction, distance: f64) {
        self.send(jog_command(
            axis,
            direction,
            distance,
            self.units,
            self.feed_rate,
        ));
    }

    fn home(&mut self, axes: &[Axis]) {
        for line in home_commands(axes) {
            self.send(line);
        }
    }
}
