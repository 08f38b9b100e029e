//! Signal composers
//!
//! Pure transforms layering secondary atmospheric signals on top of the
//! wind-derived flow parameters. Each composer touches exactly one field:
//! - moisture (humidity + precipitation) scales `spike_radius`
//! - pressure + lightning scales `clump_count`
//!
//! Because the fields are disjoint the two commute. A future composer sharing a
//! field with one of these needs an explicit ordering rule.
//!
//! Unlike the mapper, composers reject physically impossible readings with
//! `InvalidInput` instead of clamping them: these are sensor-validity checks.

mod moisture;
mod pressure;

pub use moisture::{apply_moisture_puffiness, moisture_multiplier, MOISTURE_RANGE};
pub use pressure::{apply_pressure_clumping, pressure_multiplier, PRESSURE_RANGE};

use std::ops::RangeInclusive;

/// Clamp a value into `[0, 1]`.
#[inline]
fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Weighted mean of the present `(value, weight)` contributions.
///
/// Returns `None` when nothing contributed, so the composer can pass its input
/// through unchanged.
fn weighted_mean(contributions: &[Option<(f32, f32)>]) -> Option<f32> {
    let (sum, total_weight) = contributions
        .iter()
        .flatten()
        .fold((0.0_f32, 0.0_f32), |(sum, weight_sum), (value, weight)| {
            (sum + value * weight, weight_sum + weight)
        });
    (total_weight > 0.0).then(|| sum / total_weight)
}

/// Clamp `value` into an inclusive multiplier range.
#[inline]
fn clamp_to(range: &RangeInclusive<f32>, value: f32) -> f32 {
    value.clamp(*range.start(), *range.end())
}
