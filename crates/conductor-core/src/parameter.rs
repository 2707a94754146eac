//! Parameter ranges and declarations.
//!
//! A [`ParameterSpec`] is what a UI slider binds to: a name, a label, a bounded
//! range, an optional display format, and the [`RampSource`] that decides how long
//! the node takes to reach a newly set value.
//!
//! # Example
//!
//! ```
//! use conductor_core::{ParameterRange, ParameterSpec, RampSource};
//!
//! let frequency = ParameterSpec::new("frequency", ParameterRange::new(220.0, 880.0, 440.0))
//!     .label("Frequency")
//!     .ramp(RampSource::Fixed(0.5));
//!
//! assert_eq!(frequency.range.clamp(2000.0), 880.0);
//! ```

use serde::{Deserialize, Serialize};

/// Closed range `[min, max]` with a default value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParameterRange {
    /// The default is clamped into the range.
    pub fn new(min: f32, max: f32, default: f32) -> Self {
        Self {
            min,
            max,
            default: if min <= max {
                default.clamp(min, max)
            } else {
                default
            },
        }
    }

    /// `min < max`, both finite, default inside.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min < self.max
            && self.contains(self.default)
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Convert a real value to 0.0-1.0 (clamped).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.span();
        if span <= 0.0 {
            return 0.0;
        }
        (self.clamp(value) - self.min) / span
    }

    /// Convert 0.0-1.0 to a real value (clamped).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized.clamp(0.0, 1.0) * self.span()
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self::new(0.0, 1.0, 0.5)
    }
}

/// How long a node takes to reach a newly set value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RampSource {
    /// Jump to the new value.
    #[default]
    Immediate,
    /// Ramp over a fixed number of seconds.
    Fixed(f32),
    /// Ramp over the current value (in seconds) of another parameter.
    FromParameter(String),
}

/// Declaration of one named, bounded parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    pub range: ParameterRange,
    #[serde(default)]
    pub ramp: RampSource,
    /// printf-style display format, e.g. `"%0.2f"`.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, range: ParameterRange) -> Self {
        Self {
            name: name.into(),
            label: None,
            range,
            ramp: RampSource::Immediate,
            format: None,
            units: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn ramp(mut self, ramp: RampSource) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Label for display, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Render a value with the display format.
    ///
    /// Only the `%[flags][width].[precision]f` family is understood; anything else
    /// falls back to three decimals.
    pub fn display_value(&self, value: f32) -> String {
        let precision = self
            .format
            .as_deref()
            .and_then(float_precision)
            .unwrap_or(3);
        format!("{value:.precision$}")
    }
}

fn float_precision(format: &str) -> Option<usize> {
    let spec = format.strip_prefix('%')?.strip_suffix('f')?;
    match spec.split_once('.') {
        Some((_, precision)) => precision.parse().ok(),
        None => Some(6),
    }
}
