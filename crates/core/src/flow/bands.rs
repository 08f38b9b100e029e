//! Beaufort-like intensity bands and interpolation between them
//!
//! Each band anchors a target [`FlowShape`] at its minimum wind speed. Between two
//! anchors every field is linearly interpolated, so the mapping is continuous and
//! monotonic across band edges. Below the first anchor the Calm target applies and
//! at or above the last anchor the Gale target applies (no extrapolation).
//!
//! | Band   | Threshold | Beaufort reference                |
//! |--------|-----------|-----------------------------------|
//! | Calm   | 1.5 m/s   | top of force 1 (light air)        |
//! | Breeze | 3.4 m/s   | force 3 (gentle breeze)           |
//! | Fresh  | 8.0 m/s   | force 5 (fresh breeze)            |
//! | Gale   | 17.2 m/s  | force 8 (gale)                    |

use super::FlowShape;
use crate::core_types::units::MetersPerSecond;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named intensity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BandName {
    /// Few, chunky clumps
    Calm,
    /// More clumps, gentle twist
    Breeze,
    /// Taller, sharper spikes
    Fresh,
    /// Dense, thin spikes with strong twist
    Gale,
}

impl fmt::Display for BandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Calm => "calm",
            Self::Breeze => "breeze",
            Self::Fresh => "fresh",
            Self::Gale => "gale",
        };
        f.write_str(name)
    }
}

/// One row of the band table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Tier name
    pub name: BandName,
    /// Speed at which `target` is reached exactly
    pub min_speed: MetersPerSecond,
    /// Geometry at `min_speed`; `twist_degrees` is an unsigned magnitude
    pub target: FlowShape,
}

/// Band table, ordered by ascending threshold.
///
/// Every column is non-decreasing down the table except `spike_radius`, which
/// shrinks: stronger wind gives thinner spikes.
pub const BANDS: [Band; 4] = [
    Band {
        name: BandName::Calm,
        min_speed: MetersPerSecond::new(1.5),
        target: FlowShape {
            clump_count: 3,
            spikes_per_clump: 12,
            spike_height: 0.6,
            spike_radius: 0.32,
            twist_degrees: 0.0,
            spread: 90.0,
            clump_radius: 1.0,
            clump_height: 0.4,
        },
    },
    Band {
        name: BandName::Breeze,
        min_speed: MetersPerSecond::new(3.4),
        target: FlowShape {
            clump_count: 6,
            spikes_per_clump: 40,
            spike_height: 1.2,
            spike_radius: 0.24,
            twist_degrees: 8.0,
            spread: 150.0,
            clump_radius: 2.0,
            clump_height: 0.8,
        },
    },
    Band {
        name: BandName::Fresh,
        min_speed: MetersPerSecond::new(8.0),
        target: FlowShape {
            clump_count: 10,
            spikes_per_clump: 90,
            spike_height: 2.2,
            spike_radius: 0.16,
            twist_degrees: 20.0,
            spread: 220.0,
            clump_radius: 3.5,
            clump_height: 1.6,
        },
    },
    Band {
        name: BandName::Gale,
        min_speed: MetersPerSecond::new(17.2),
        target: FlowShape {
            clump_count: 16,
            spikes_per_clump: 160,
            spike_height: 3.6,
            spike_radius: 0.08,
            twist_degrees: 40.0,
            spread: 320.0,
            clump_radius: 6.0,
            clump_height: 2.8,
        },
    },
];

/// Linear interpolation that never overshoots its endpoints.
///
/// `a + (b - a) * t` is monotonic in `t`; the clamp keeps float rounding at
/// `t ≈ 1` from stepping past `b`, which would break monotonicity at band edges.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (a + (b - a) * t).clamp(lo, hi)
}

/// Interpolate an integer count, rounding to nearest with a floor of 1.
#[inline]
fn lerp_count(a: u32, b: u32, t: f32) -> u32 {
    (lerp(a as f32, b as f32, t).round() as u32).max(1)
}

impl FlowShape {
    /// Field-wise interpolation between two band targets
    fn interpolate(a: &FlowShape, b: &FlowShape, t: f32) -> FlowShape {
        FlowShape {
            clump_count: lerp_count(a.clump_count, b.clump_count, t),
            spikes_per_clump: lerp_count(a.spikes_per_clump, b.spikes_per_clump, t),
            spike_height: lerp(a.spike_height, b.spike_height, t),
            spike_radius: lerp(a.spike_radius, b.spike_radius, t),
            twist_degrees: lerp(a.twist_degrees, b.twist_degrees, t),
            spread: lerp(a.spread, b.spread, t),
            clump_radius: lerp(a.clump_radius, b.clump_radius, t),
            clump_height: lerp(a.clump_height, b.clump_height, t),
        }
    }
}

/// Band whose interval contains `speed` (the lower anchor of the bracketing pair).
pub fn classify(speed: MetersPerSecond) -> BandName {
    BANDS
        .iter()
        .rev()
        .find(|band| speed >= band.min_speed)
        .map_or(BANDS[0].name, |band| band.name)
}

/// Banded target shape for `speed` (m/s, assumed finite and non-negative).
///
/// The returned `twist_degrees` is the unsigned twist magnitude.
pub fn shape_for_speed(speed: MetersPerSecond) -> FlowShape {
    let first = &BANDS[0];
    let last = &BANDS[BANDS.len() - 1];

    if speed <= first.min_speed {
        return first.target;
    }
    if speed >= last.min_speed {
        return last.target;
    }

    for pair in BANDS.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if speed >= lower.min_speed && speed < upper.min_speed {
            let span = *upper.min_speed - *lower.min_speed;
            let t = ((*speed - *lower.min_speed) / span).clamp(0.0, 1.0);
            return FlowShape::interpolate(&lower.target, &upper.target, t);
        }
    }

    // Only reachable for NaN, which the mapper rejects before banding
    first.target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ordered_and_monotonic() {
        for pair in BANDS.windows(2) {
            let (a, b) = (&pair[0].target, &pair[1].target);
            assert!(pair[0].min_speed < pair[1].min_speed);
            assert!(pair[0].name < pair[1].name);
            assert!(a.clump_count <= b.clump_count);
            assert!(a.spikes_per_clump <= b.spikes_per_clump);
            assert!(a.spike_height <= b.spike_height);
            assert!(a.spike_radius >= b.spike_radius);
            assert!(a.twist_degrees <= b.twist_degrees);
            assert!(a.spread <= b.spread);
            assert!(a.clump_radius <= b.clump_radius);
            assert!(a.clump_height <= b.clump_height);
        }
        for band in &BANDS {
            assert!(band.target.validate().is_ok());
        }
    }

    #[test]
    fn test_anchors_hit_exactly() {
        for band in &BANDS {
            assert_eq!(shape_for_speed(band.min_speed), band.target);
        }
    }

    #[test]
    fn test_midpoint_interpolation() {
        // Halfway between Breeze (3.4) and Fresh (8.0)
        let shape = shape_for_speed(MetersPerSecond::new(5.7));
        assert_eq!(shape.clump_count, 8);
        assert_eq!(shape.spikes_per_clump, 65);
        assert!((shape.spike_height - 1.7).abs() < 1e-4);
        assert!((shape.spike_radius - 0.2).abs() < 1e-4);
        assert!((shape.twist_degrees - 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(MetersPerSecond::new(0.0)), BandName::Calm);
        assert_eq!(classify(MetersPerSecond::new(3.3)), BandName::Calm);
        assert_eq!(classify(MetersPerSecond::new(3.4)), BandName::Breeze);
        assert_eq!(classify(MetersPerSecond::new(12.0)), BandName::Fresh);
        assert_eq!(classify(MetersPerSecond::new(40.0)), BandName::Gale);
    }

    #[test]
    fn test_lerp_never_overshoots() {
        let mut t = 0.0_f32;
        while t <= 1.0 {
            let v = lerp(0.32, 0.24, t);
            assert!((0.24..=0.32).contains(&v));
            t += 0.001;
        }
        assert_eq!(lerp(2.0, 5.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 5.0, 1.0), 5.0);
    }
}
