//! Active jog increment selection.

use jogkit_core::JogError;
use jogkit_settings::JogSettings;

/// Tracks the active step size out of a configured set of choices
///
/// The choice list is configuration for the UI; `select` accepts any
/// positive finite distance, listed or not.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSizeSelector {
    choices: Vec<f64>,
    active: f64,
}

impl StepSizeSelector {
    /// Create a selector with an explicit initial step
    pub fn new(choices: Vec<f64>, initial: f64) -> Result<Self, JogError> {
        check(initial)?;
        Ok(Self {
            choices,
            active: initial,
        })
    }

    /// Create a selector from jog settings
    ///
    /// Starts on `default_step_size`, or the second configured step.
    pub fn from_settings(settings: &JogSettings) -> Result<Self, JogError> {
        Self::new(settings.step_sizes.clone(), settings.initial_step_size())
    }

    /// The active step size
    pub fn get(&self) -> f64 {
        self.active
    }

    /// Configured step choices
    pub fn choices(&self) -> &[f64] {
        &self.choices
    }

    /// Make `value` the active step size, returning the previous one
    pub fn select(&mut self, value: f64) -> Result<f64, JogError> {
        check(value)?;
        Ok(std::mem::replace(&mut self.active, value))
    }

    /// Step up to the next larger configured choice, if any
    pub fn coarser(&mut self) -> f64 {
        if let Some(next) = self
            .choices
            .iter()
            .copied()
            .filter(|c| *c > self.active)
            .min_by(f64::total_cmp)
        {
            self.active = next;
        }
        self.active
    }

    /// Step down to the next smaller configured choice, if any
    pub fn finer(&mut self) -> f64 {
        if let Some(next) = self
            .choices
            .iter()
            .copied()
            .filter(|c| *c < self.active)
            .max_by(f64::total_cmp)
        {
            self.active = next;
        }
        self.active
    }
}

impl Default for StepSizeSelector {
    fn default() -> Self {
        let settings = JogSettings::default();
        Self {
            active: settings.initial_step_size(),
            choices: settings.step_sizes,
        }
    }
}

fn check(value: f64) -> Result<(), JogError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(JogError::InvalidStepSize { value })
    }
}
