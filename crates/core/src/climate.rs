//! Climate anomaly hue adjuster
//!
//! A normalized climate anomaly (multi-year normal vs. today, sampled from a raster
//! by an external tool) swings the scene's colors warm or cool. It never reaches the
//! geometry: the shift lives outside [`FlowParameters`](crate::flow::FlowParameters)
//! and is handed to the scene builder separately.

use serde::{Deserialize, Serialize};

/// Default maximum hue swing at an anomaly of ±1
pub const DEFAULT_MAX_SWING_DEGREES: f32 = 25.0;

/// Signed hue rotation for a normalized anomaly.
///
/// The anomaly is clamped to `[-1, 1]` (NaN counts as 0) regardless of what the
/// caller promises. A non-finite swing yields no shift.
///
/// ```
/// use wind_clump_core::climate::hue_shift;
///
/// assert_eq!(hue_shift(0.5, 30.0), 15.0);
/// assert_eq!(hue_shift(-4.0, 25.0), -25.0);
/// ```
pub fn hue_shift(anomaly: f32, max_swing_degrees: f32) -> f32 {
    if !max_swing_degrees.is_finite() {
        return 0.0;
    }
    clamp_anomaly(anomaly) * max_swing_degrees
}

#[inline]
fn clamp_anomaly(anomaly: f32) -> f32 {
    if anomaly.is_nan() {
        0.0
    } else {
        anomaly.clamp(-1.0, 1.0)
    }
}

/// A normalized climate anomaly together with the label of the layer it came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClimateAnomaly {
    value: f32,
    /// Free-text provenance tag (e.g. `"CHIRPS_1981-2020"`), embedded as metadata only
    pub tag: Option<String>,
}

impl ClimateAnomaly {
    /// Create an anomaly, clamping `value` into `[-1, 1]`.
    pub fn new(value: f32, tag: Option<String>) -> Self {
        Self {
            value: clamp_anomaly(value),
            tag,
        }
    }

    /// Normalize a raw raster sample so `min` maps to -1 and `max` to +1.
    ///
    /// Values outside `[min, max]` clamp; a degenerate range yields 0.
    pub fn from_raster_sample(sample: f32, min: f32, max: f32, tag: Option<String>) -> Self {
        let span = max - min;
        let normalized = if span == 0.0 || !span.is_finite() {
            0.0
        } else {
            ((sample - min) / span) * 2.0 - 1.0
        };
        Self::new(normalized, tag)
    }

    /// The clamped anomaly in `[-1, 1]`
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Hue rotation for this anomaly
    pub fn hue_shift(&self, max_swing_degrees: f32) -> f32 {
        hue_shift(self.value, max_swing_degrees)
    }
}
