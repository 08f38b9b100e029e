//! Raw atmospheric observations handed over by the weather collaborators
//!
//! These are transient input values: constructed per invocation, consumed once,
//! never persisted. Validation happens in the stage that consumes them (the mapper
//! for wind, the composers for the secondary signals), not here.

use crate::core_types::units::{
    Degrees, Hectopascals, MetersPerSecond, MilesPerHour, MillimetersPerHour, Percent,
    StrikesPerHour,
};
use crate::error::{Result, WindClumpError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system a wind speed was reported in.
///
/// Mirrors the `units` switch of common weather APIs:
/// - **Standard** and **Metric** report wind in m/s
/// - **Imperial** reports wind in statute miles per hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// SI base units (m/s)
    Standard = 0,
    /// Metric (m/s for wind)
    #[default]
    Metric = 1,
    /// Imperial (mph)
    Imperial = 2,
}

/// Conversion factor from each unit system's wind speed to m/s, indexed by discriminant.
const SPEED_TO_MPS: [f32; 3] = [1.0, 1.0, MilesPerHour::MPS_PER_MPH];

impl UnitSystem {
    /// All supported unit systems, in discriminant order
    pub const ALL: [UnitSystem; 3] = [Self::Standard, Self::Metric, Self::Imperial];

    /// Multiplicative factor converting a speed in this unit system to m/s
    #[inline]
    #[must_use]
    pub fn speed_factor(self) -> f32 {
        SPEED_TO_MPS[self as usize]
    }

    /// Lowercase name as used on the command line and in weather API queries
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl FromStr for UnitSystem {
    type Err = WindClumpError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|units| units.as_str() == wanted)
            .ok_or_else(|| {
                WindClumpError::invalid_input(
                    "units",
                    format!("unknown unit system '{s}', expected standard, metric or imperial"),
                )
            })
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single wind measurement as reported by the weather collaborator.
///
/// Direction follows the meteorological convention: the compass bearing the wind
/// blows *from*. It is optional because feeds omit it in dead calm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindObservation {
    /// Speed in `units`
    pub speed: f32,
    /// Bearing the wind blows from, if reported
    pub direction: Option<Degrees>,
    /// Unit system `speed` is expressed in
    pub units: UnitSystem,
}

impl WindObservation {
    /// Create an observation.
    #[must_use]
    pub const fn new(speed: f32, direction: Option<Degrees>, units: UnitSystem) -> Self {
        Self {
            speed,
            direction,
            units,
        }
    }

    /// Convenience constructor for a metric (m/s) observation with a known direction.
    #[must_use]
    pub const fn metric(speed_mps: f32, direction_deg: f32) -> Self {
        Self::new(speed_mps, Some(Degrees::new(direction_deg)), UnitSystem::Metric)
    }

    /// Speed converted to m/s through the unit table. No validation is applied.
    #[must_use]
    pub fn speed_mps(&self) -> MetersPerSecond {
        MetersPerSecond::new(self.speed * self.units.speed_factor())
    }
}

/// Subset of NOAA-style surface observations used to warp the geometry.
///
/// Every field is optional: composers only blend the readings that are present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NoaaAtmosphere {
    /// Precipitation rate (>= 0)
    pub precipitation_rate: Option<MillimetersPerHour>,
    /// Relative humidity (0-100%)
    pub humidity: Option<Percent>,
    /// Station barometric pressure
    pub barometric_pressure: Option<Hectopascals>,
    /// Lightning strikes per hour within the reporting radius (>= 0)
    pub lightning_rate: Option<StrikesPerHour>,
}

impl NoaaAtmosphere {
    /// Moisture-only reading
    #[must_use]
    pub fn moisture(humidity_percent: f32, precipitation_mm_hr: f32) -> Self {
        Self {
            precipitation_rate: Some(MillimetersPerHour::new(precipitation_mm_hr)),
            humidity: Some(Percent::new(humidity_percent)),
            ..Self::default()
        }
    }

    /// Pressure/lightning-only reading
    #[must_use]
    pub fn storm(pressure_hpa: f32, lightning_per_hr: f32) -> Self {
        Self {
            barometric_pressure: Some(Hectopascals::new(pressure_hpa)),
            lightning_rate: Some(StrikesPerHour::new(lightning_per_hr)),
            ..Self::default()
        }
    }
}
