//! Semantic unit types for atmospheric observations
//!
//! Newtype wrappers keep wind speeds in different unit systems, angles and the
//! secondary sensor readings from being mixed up on their way into the mapper
//! and composers.
//!
//! # Design Philosophy
//! - All quantities use f32; geometry does not need more precision
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - `Deref` to the raw value for arithmetic in formulas
//! - Explicit conversion methods between related types
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use wind_clump_core::core_types::units::{MetersPerSecond, MilesPerHour};
//!
//! let gust = MilesPerHour::new(10.0);
//! let mps: MetersPerSecond = gust.into();
//! assert!((*mps - 4.4704).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

// ============================================================================
// HELPER FUNCTIONS FOR TOTAL ORDERING
// ============================================================================

/// Compare f32 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f32_total_cmp(a: f32, b: f32) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// VELOCITY TYPES
// ============================================================================

/// Velocity in meters per second (the mapper's internal reference unit)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f32);

impl Eq for MetersPerSecond {}

impl PartialOrd for MetersPerSecond {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetersPerSecond {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for MetersPerSecond {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl MetersPerSecond {
    /// Create a new velocity
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        MetersPerSecond(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

}

impl From<f32> for MetersPerSecond {
    fn from(v: f32) -> Self {
        MetersPerSecond(v)
    }
}

impl From<MetersPerSecond> for f32 {
    fn from(v: MetersPerSecond) -> f32 {
        v.0
    }
}

impl fmt::Display for MetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m/s", self.0)
    }
}

/// Velocity in statute miles per hour (imperial weather feeds)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MilesPerHour(f32);

impl Eq for MilesPerHour {}

impl PartialOrd for MilesPerHour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MilesPerHour {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for MilesPerHour {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl MilesPerHour {
    /// Exact definition: 1 mph = 0.44704 m/s
    pub const MPS_PER_MPH: f32 = 0.44704;

    /// Create a new `MilesPerHour` value.
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        MilesPerHour(value)
    }

    /// Convert to m/s
    #[inline]
    #[must_use]
    pub fn to_mps(self) -> MetersPerSecond {
        MetersPerSecond::new(self.0 * Self::MPS_PER_MPH)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl From<MilesPerHour> for MetersPerSecond {
    fn from(m: MilesPerHour) -> MetersPerSecond {
        m.to_mps()
    }
}

impl From<f32> for MilesPerHour {
    fn from(v: f32) -> Self {
        MilesPerHour::new(v)
    }
}

impl fmt::Display for MilesPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} mph", self.0)
    }
}

// ============================================================================
// ANGLE TYPES
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f32);

impl Eq for Degrees {}

impl PartialOrd for Degrees {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Degrees {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Degrees {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Degrees(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Wrap into the compass range `[0, 360)`.
    ///
    /// Non-finite angles wrap to north (0°).
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Degrees {
        if !self.0.is_finite() {
            return Degrees(0.0);
        }
        let wrapped = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= 360.0 {
            Degrees(0.0)
        } else {
            Degrees(wrapped)
        }
    }
}

impl From<f32> for Degrees {
    fn from(v: f32) -> Self {
        Degrees(v)
    }
}

impl From<Degrees> for f32 {
    fn from(d: Degrees) -> f32 {
        d.0
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

// ============================================================================
// ATMOSPHERIC SENSOR TYPES
// ============================================================================

/// A percentage (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f32);

impl Eq for Percent {}

impl PartialOrd for Percent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Percent {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Percent {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl Percent {
    /// Create a new percentage
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Percent(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Convert to fraction (0-1), unclamped
    #[inline]
    #[must_use]
    pub fn to_fraction(self) -> f32 {
        self.0 / 100.0
    }
}

impl From<f32> for Percent {
    fn from(v: f32) -> Self {
        Percent(v)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Barometric pressure in hectopascals (millibars)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hectopascals(f32);

impl Eq for Hectopascals {}

impl PartialOrd for Hectopascals {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hectopascals {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Hectopascals {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl Hectopascals {
    /// ICAO standard mean sea-level pressure
    pub const STANDARD_SEA_LEVEL: Hectopascals = Hectopascals(1013.25);

    /// Create a new pressure
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Hectopascals(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl From<f32> for Hectopascals {
    fn from(v: f32) -> Self {
        Hectopascals(v)
    }
}

impl fmt::Display for Hectopascals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} hPa", self.0)
    }
}

/// Precipitation rate in millimeters per hour
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MillimetersPerHour(f32);

impl Eq for MillimetersPerHour {}

impl PartialOrd for MillimetersPerHour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MillimetersPerHour {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for MillimetersPerHour {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl MillimetersPerHour {
    /// Create a new precipitation rate
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        MillimetersPerHour(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl From<f32> for MillimetersPerHour {
    fn from(v: f32) -> Self {
        MillimetersPerHour(v)
    }
}

impl fmt::Display for MillimetersPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} mm/h", self.0)
    }
}

/// Lightning activity in strikes per hour
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct StrikesPerHour(f32);

impl Eq for StrikesPerHour {}

impl PartialOrd for StrikesPerHour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StrikesPerHour {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for StrikesPerHour {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl StrikesPerHour {
    /// Create a new strike rate
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        StrikesPerHour(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl From<f32> for StrikesPerHour {
    fn from(v: f32) -> Self {
        StrikesPerHour(v)
    }
}

impl fmt::Display for StrikesPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} strikes/h", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mph_round_trip() {
        let original = MilesPerHour::new(25.0);
        let mps = original.to_mps();
        assert!((mps.0 - 11.176).abs() < 1e-3);
    }

    #[test]
    fn test_degrees_normalized() {
        assert_eq!(Degrees::new(370.0).normalized(), Degrees::new(10.0));
        assert_eq!(Degrees::new(-90.0).normalized(), Degrees::new(270.0));
        assert_eq!(Degrees::new(360.0).normalized(), Degrees::new(0.0));
        assert_eq!(Degrees::new(f32::NAN).normalized(), Degrees::new(0.0));
        let tiny = Degrees::new(-1e-9).normalized();
        assert!(*tiny >= 0.0 && *tiny < 360.0);
    }

    #[test]
    fn test_total_ordering() {
        let calm = MetersPerSecond::new(0.5);
        let gale = MetersPerSecond::new(18.0);
        assert!(calm < gale);
        assert_eq!(calm.max(gale), gale);
        assert!(Hectopascals::new(970.0) < Hectopascals::STANDARD_SEA_LEVEL);
    }

    #[test]
    fn test_percent_fraction() {
        assert!((Percent::new(88.0).to_fraction() - 0.88).abs() < 1e-6);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(MetersPerSecond::new(4.2).to_string(), "4.20 m/s");
        assert_eq!(Hectopascals::new(1013.4).to_string(), "1013.4 hPa");
        assert_eq!(StrikesPerHour::new(8.0).to_string(), "8.0 strikes/h");
    }
}
