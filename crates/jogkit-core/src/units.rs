//! Length units for positions, working areas and step sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Machine length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (metric)
    #[default]
    Mm,
    /// Inches (imperial)
    Inch,
}

impl Units {
    /// Millimeters per inch
    pub const MM_PER_INCH: f64 = 25.4;

    /// Convert a value from one unit to another
    pub fn convert(value: f64, from: Units, to: Units) -> f64 {
        match (from, to) {
            (Units::Mm, Units::Inch) => value / Self::MM_PER_INCH,
            (Units::Inch, Units::Mm) => value * Self::MM_PER_INCH,
            _ => value,
        }
    }

    /// Short unit label ("mm" or "in")
    pub fn label(self) -> &'static str {
        match self {
            Units::Mm => "mm",
            Units::Inch => "in",
        }
    }

    /// G-code word selecting this unit (G21 metric, G20 imperial)
    pub fn gcode(self) -> &'static str {
        match self {
            Units::Mm => "G21",
            Units::Inch => "G20",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "metric" | "millimeters" => Ok(Self::Mm),
            "in" | "inch" | "inches" | "imperial" => Ok(Self::Inch),
            _ => Err(format!("Unknown units: {}", s)),
        }
    }
}

/// Format a length for display with three decimals and a unit label
pub fn format_length(value: f64, units: Units) -> String {
    format!("{:.3} {}", value, units.label())
}
