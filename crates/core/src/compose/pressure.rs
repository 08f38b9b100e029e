//! Pressure/lightning composer: storms pack the scene with more clumps
//!
//! Low pressure and lightning both read as "stormier":
//! - pressure contributes a signed score `(1013.25 - p) / 35`, clamped to
//!   `[-1, 1]` (a deep low scores +1, a strong high -1), weight 0.7
//! - lightning contributes `rate / 12`, saturating at 1, weight 0.3
//!
//! The blended score `g ∈ [-1, 1]` maps onto a density multiplier: `1 + 0.6·g`
//! above neutral and `1 + 0.4·g` below, i.e. 0.60× for a calm high and 1.60× for
//! a deep, electric low.

use super::{clamp01, clamp_to, weighted_mean};
use crate::core_types::observation::NoaaAtmosphere;
use crate::core_types::units::Hectopascals;
use crate::error::{Result, WindClumpError};
use crate::flow::FlowParameters;
use std::ops::RangeInclusive;
use tracing::trace;

/// Clump-count multiplier bounds
pub const PRESSURE_RANGE: RangeInclusive<f32> = 0.60..=1.60;

/// Plausible station pressures; anything outside is a sensor fault
pub const PRESSURE_SANE_BOUNDS_HPA: RangeInclusive<f32> = 850.0..=1100.0;

/// Deviation from standard pressure that saturates the pressure score
const PRESSURE_SPAN_HPA: f32 = 35.0;

/// Strike rate treated as a fully electric storm
const LIGHTNING_SATURATION_PER_HR: f32 = 12.0;

const PRESSURE_WEIGHT: f32 = 0.7;
const LIGHTNING_WEIGHT: f32 = 0.3;

/// Clump-count multiplier for the pressure and lightning readings present.
///
/// Returns `Ok(None)` when neither reading was reported.
///
/// # Errors
/// Returns `InvalidInput` for pressure outside 850-1100 hPa, a negative strike
/// rate, or non-finite readings.
pub fn pressure_multiplier(atmosphere: &NoaaAtmosphere) -> Result<Option<f32>> {
    let pressure = atmosphere
        .barometric_pressure
        .map(|pressure| {
            let value = WindClumpError::require_finite("barometric_pressure_hpa", *pressure)?;
            if !PRESSURE_SANE_BOUNDS_HPA.contains(&value) {
                return Err(WindClumpError::invalid_input(
                    "barometric_pressure_hpa",
                    format!(
                        "must be within {}-{} hPa, got {value}",
                        PRESSURE_SANE_BOUNDS_HPA.start(),
                        PRESSURE_SANE_BOUNDS_HPA.end()
                    ),
                ));
            }
            let deficit = *Hectopascals::STANDARD_SEA_LEVEL - value;
            Ok(((deficit / PRESSURE_SPAN_HPA).clamp(-1.0, 1.0), PRESSURE_WEIGHT))
        })
        .transpose()?;

    let lightning = atmosphere
        .lightning_rate
        .map(|rate| {
            let value = WindClumpError::require_finite("lightning_strikes_per_hr", *rate)?;
            if value < 0.0 {
                return Err(WindClumpError::invalid_input(
                    "lightning_strikes_per_hr",
                    format!("must be non-negative, got {value}"),
                ));
            }
            Ok((
                clamp01(value / LIGHTNING_SATURATION_PER_HR),
                LIGHTNING_WEIGHT,
            ))
        })
        .transpose()?;

    Ok(weighted_mean(&[pressure, lightning]).map(|gradient| {
        let swing = if gradient >= 0.0 {
            PRESSURE_RANGE.end() - 1.0
        } else {
            1.0 - PRESSURE_RANGE.start()
        };
        clamp_to(&PRESSURE_RANGE, 1.0 + swing * gradient)
    }))
}

/// Use barometric gradients and lightning to remap clump density.
///
/// Only `clump_count` changes (rounded to nearest, floor 1); every other field is
/// copied through untouched.
///
/// # Errors
/// See [`pressure_multiplier`].
pub fn apply_pressure_clumping(
    flow: &FlowParameters,
    atmosphere: &NoaaAtmosphere,
) -> Result<FlowParameters> {
    let Some(factor) = pressure_multiplier(atmosphere)? else {
        return Ok(*flow);
    };

    let clump_count = (flow.clump_count() as f32 * factor).round() as u32;
    trace!(factor, clump_count, "applied pressure clumping");
    Ok(flow.with_clump_count(clump_count))
}
