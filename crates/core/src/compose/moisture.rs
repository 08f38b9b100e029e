//! Moisture composer: humidity and precipitation swell the spikes
//!
//! Humidity (weight 0.6, normalized against 100%) and precipitation rate (weight
//! 0.4, normalized against a 20 mm/h downpour) are blended into a single wetness
//! score in `[0, 1]`, mapped linearly onto a radius multiplier between 0.75×
//! (bone dry) and 1.45× (saturated).

use super::{clamp01, clamp_to, weighted_mean};
use crate::core_types::observation::NoaaAtmosphere;
use crate::error::{Result, WindClumpError};
use crate::flow::FlowParameters;
use std::ops::RangeInclusive;
use tracing::trace;

/// Radius multiplier bounds
pub const MOISTURE_RANGE: RangeInclusive<f32> = 0.75..=1.45;

const HUMIDITY_WEIGHT: f32 = 0.6;
const PRECIPITATION_WEIGHT: f32 = 0.4;

/// Precipitation rate treated as fully saturated (heavy rain)
const PRECIPITATION_CEILING_MM_HR: f32 = 20.0;

/// Radius multiplier for the moisture readings present in `atmosphere`.
///
/// Returns `Ok(None)` when neither humidity nor precipitation was reported.
///
/// # Errors
/// Returns `InvalidInput` for humidity outside `[0, 100]`, negative precipitation,
/// or non-finite readings.
pub fn moisture_multiplier(atmosphere: &NoaaAtmosphere) -> Result<Option<f32>> {
    let humidity = atmosphere
        .humidity
        .map(|humidity| {
            let value = WindClumpError::require_finite("humidity_percent", *humidity)?;
            if !(0.0..=100.0).contains(&value) {
                return Err(WindClumpError::invalid_input(
                    "humidity_percent",
                    format!("must be within 0-100%, got {value}"),
                ));
            }
            Ok((clamp01(humidity.to_fraction()), HUMIDITY_WEIGHT))
        })
        .transpose()?;

    let precipitation = atmosphere
        .precipitation_rate
        .map(|rate| {
            let value = WindClumpError::require_finite("precipitation_rate_mm_hr", *rate)?;
            if value < 0.0 {
                return Err(WindClumpError::invalid_input(
                    "precipitation_rate_mm_hr",
                    format!("must be non-negative, got {value}"),
                ));
            }
            Ok((
                clamp01(value / PRECIPITATION_CEILING_MM_HR),
                PRECIPITATION_WEIGHT,
            ))
        })
        .transpose()?;

    Ok(weighted_mean(&[humidity, precipitation]).map(|wetness| {
        let (dry, saturated) = (*MOISTURE_RANGE.start(), *MOISTURE_RANGE.end());
        clamp_to(&MOISTURE_RANGE, dry + (saturated - dry) * wetness)
    }))
}

/// Blend precipitation and humidity into the spike radius.
///
/// Only `spike_radius` changes; every other field is copied through untouched.
///
/// # Errors
/// See [`moisture_multiplier`].
pub fn apply_moisture_puffiness(
    flow: &FlowParameters,
    atmosphere: &NoaaAtmosphere,
) -> Result<FlowParameters> {
    let Some(factor) = moisture_multiplier(atmosphere)? else {
        return Ok(*flow);
    };

    let radius = (flow.spike_radius() * factor).clamp(f32::MIN_POSITIVE, f32::MAX);
    trace!(factor, radius, "applied moisture puffiness");
    Ok(flow.with_spike_radius(radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{MillimetersPerHour, Percent};
    use crate::flow::{FlowShape, FlowSource};

    fn base_flow() -> FlowParameters {
        FlowParameters::new(
            FlowShape {
                clump_count: 8,
                spikes_per_clump: 60,
                spike_height: 1.5,
                spike_radius: 0.2,
                twist_degrees: 10.0,
                spread: 150.0,
                clump_radius: 2.5,
                clump_height: 1.2,
            },
            FlowSource::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_huge_radius_stays_finite() {
        let huge = FlowParameters::new(
            FlowShape {
                spike_radius: 3e38,
                ..*base_flow().shape()
            },
            FlowSource::default(),
        )
        .unwrap();
        let soaked = apply_moisture_puffiness(&huge, &NoaaAtmosphere::moisture(100.0, 50.0)).unwrap();
        assert!(soaked.spike_radius().is_finite());
        assert_eq!(soaked.spike_radius(), f32::MAX);
    }

    #[test]
    fn test_soggy_swells_and_dry_shrinks() {
        let base = base_flow();
        let soggy = apply_moisture_puffiness(&base, &NoaaAtmosphere::moisture(95.0, 12.0)).unwrap();
        let dry = apply_moisture_puffiness(&base, &NoaaAtmosphere::moisture(15.0, 0.0)).unwrap();

        assert!(soggy.spike_radius() > base.spike_radius());
        assert!(dry.spike_radius() < base.spike_radius());
    }

    #[test]
    fn test_extremes_hit_range_ends() {
        let dry = moisture_multiplier(&NoaaAtmosphere::moisture(0.0, 0.0)).unwrap();
        let soaked = moisture_multiplier(&NoaaAtmosphere::moisture(100.0, 80.0)).unwrap();
        assert_eq!(dry, Some(0.75));
        assert!((soaked.unwrap() - 1.45).abs() < 1e-6);
    }

    #[test]
    fn test_partial_readings_renormalize() {
        let humidity_only = NoaaAtmosphere {
            humidity: Some(Percent::new(50.0)),
            ..NoaaAtmosphere::default()
        };
        let factor = moisture_multiplier(&humidity_only).unwrap().unwrap();
        assert!((factor - 1.1).abs() < 1e-5);

        let precip_only = NoaaAtmosphere {
            precipitation_rate: Some(MillimetersPerHour::new(20.0)),
            ..NoaaAtmosphere::default()
        };
        let factor = moisture_multiplier(&precip_only).unwrap().unwrap();
        assert!((factor - 1.45).abs() < 1e-5);
    }

    #[test]
    fn test_no_moisture_readings_is_identity() {
        let base = base_flow();
        let storm_only = NoaaAtmosphere::storm(990.0, 3.0);
        assert_eq!(apply_moisture_puffiness(&base, &storm_only).unwrap(), base);
    }

    #[test]
    fn test_invalid_sensor_values_rejected() {
        let base = base_flow();
        for atmosphere in [
            NoaaAtmosphere::moisture(101.0, 1.0),
            NoaaAtmosphere::moisture(-1.0, 1.0),
            NoaaAtmosphere::moisture(50.0, -0.5),
            NoaaAtmosphere::moisture(f32::NAN, 1.0),
            NoaaAtmosphere::moisture(50.0, f32::INFINITY),
        ] {
            assert!(matches!(
                apply_moisture_puffiness(&base, &atmosphere),
                Err(WindClumpError::InvalidInput { .. })
            ));
        }
    }
}
