//! Flow parameters: the geometry bundle passed between every stage
//!
//! The mapper produces a `FlowParameters` from a wind observation, the composers
//! return adjusted copies, and the scene builder renders the final one. Values are
//! immutable; every transform returns a new instance so a composition chain can be
//! replayed step by step.
//!
//! # Invariants
//! - `clump_count` and `spikes_per_clump` are at least 1
//! - every real-valued geometry field except `twist_degrees` is finite and > 0
//! - `twist_degrees` is finite and wrapped into `[-3600, 3600]`

pub mod bands;
pub mod mapper;

pub use bands::{Band, BandName, BANDS};
pub use mapper::map_wind_to_flow;

use crate::core_types::units::{Degrees, MetersPerSecond};
use crate::error::{Result, WindClumpError};
use serde::{Deserialize, Serialize};

/// Limit for cumulative twist; larger magnitudes wrap back into range
pub const TWIST_LIMIT_DEGREES: f32 = 3600.0;

/// The geometric half of [`FlowParameters`]: everything the scene builder draws.
///
/// Band targets in [`BANDS`] reuse this type with `twist_degrees` holding the
/// unsigned twist magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowShape {
    /// Number of discrete clusters in the scene
    pub clump_count: u32,
    /// Spikes instanced by each clump
    pub spikes_per_clump: u32,
    /// Full length of a spike
    pub spike_height: f32,
    /// Base thickness of a spike
    pub spike_radius: f32,
    /// Rotation applied per recursion step; sign follows wind direction
    pub twist_degrees: f32,
    /// Angular fan (degrees) the spikes of one clump spread across
    pub spread: f32,
    /// Outward offset of each clump from the scene origin (ring radius)
    pub clump_radius: f32,
    /// Vertical pitch of a clump, used to stack the tower layout
    pub clump_height: f32,
}

impl FlowShape {
    /// Check the invariants listed at module level.
    ///
    /// # Errors
    /// Returns `InvalidInput` naming the first field that violates them.
    pub fn validate(&self) -> Result<()> {
        if self.clump_count == 0 {
            return Err(WindClumpError::invalid_input(
                "clump_count",
                "must be at least 1",
            ));
        }
        if self.spikes_per_clump == 0 {
            return Err(WindClumpError::invalid_input(
                "spikes_per_clump",
                "must be at least 1",
            ));
        }
        WindClumpError::require_positive("spike_height", self.spike_height)?;
        WindClumpError::require_positive("spike_radius", self.spike_radius)?;
        WindClumpError::require_finite("twist_degrees", self.twist_degrees)?;
        WindClumpError::require_positive("spread", self.spread)?;
        WindClumpError::require_positive("clump_radius", self.clump_radius)?;
        WindClumpError::require_positive("clump_height", self.clump_height)?;
        Ok(())
    }
}

/// Where a set of flow parameters came from, carried for output metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowSource {
    /// Observed wind speed after unit conversion (not clamped to the bands)
    pub wind_speed: MetersPerSecond,
    /// Observed wind direction, normalized into `[0, 360)`
    pub wind_direction: Option<Degrees>,
}

/// Geometry control parameters derived from wind and adjusted by secondary signals.
///
/// Deserializing goes through [`FlowParameters::new`], so a stored bundle is
/// validated and its twist wrapped exactly like a freshly mapped one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedFlowParameters")]
pub struct FlowParameters {
    shape: FlowShape,
    source: FlowSource,
}

/// Wire form of [`FlowParameters`] before validation
#[derive(Deserialize)]
struct UncheckedFlowParameters {
    shape: FlowShape,
    source: FlowSource,
}

impl TryFrom<UncheckedFlowParameters> for FlowParameters {
    type Error = WindClumpError;

    fn try_from(raw: UncheckedFlowParameters) -> Result<Self> {
        Self::new(raw.shape, raw.source)
    }
}

impl FlowParameters {
    /// Create validated flow parameters. `twist_degrees` is wrapped into range.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `shape` violates an invariant.
    pub fn new(shape: FlowShape, source: FlowSource) -> Result<Self> {
        let shape = FlowShape {
            twist_degrees: wrap_twist(shape.twist_degrees),
            ..shape
        };
        shape.validate()?;
        Ok(Self { shape, source })
    }

    /// Geometry fields
    #[inline]
    pub fn shape(&self) -> &FlowShape {
        &self.shape
    }

    /// Provenance metadata
    #[inline]
    pub fn source(&self) -> &FlowSource {
        &self.source
    }

    #[inline]
    pub fn clump_count(&self) -> u32 {
        self.shape.clump_count
    }

    #[inline]
    pub fn spikes_per_clump(&self) -> u32 {
        self.shape.spikes_per_clump
    }

    #[inline]
    pub fn spike_height(&self) -> f32 {
        self.shape.spike_height
    }

    #[inline]
    pub fn spike_radius(&self) -> f32 {
        self.shape.spike_radius
    }

    #[inline]
    pub fn twist_degrees(&self) -> f32 {
        self.shape.twist_degrees
    }

    #[inline]
    pub fn spread(&self) -> f32 {
        self.shape.spread
    }

    #[inline]
    pub fn clump_radius(&self) -> f32 {
        self.shape.clump_radius
    }

    #[inline]
    pub fn clump_height(&self) -> f32 {
        self.shape.clump_height
    }

    /// Source wind speed in m/s
    #[inline]
    pub fn wind_speed(&self) -> MetersPerSecond {
        self.source.wind_speed
    }

    /// Source wind direction, if one was reported
    #[inline]
    pub fn wind_direction(&self) -> Option<Degrees> {
        self.source.wind_direction
    }

    /// Copy with a new spike radius. Callers guarantee `radius > 0`.
    pub(crate) fn with_spike_radius(&self, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "spike radius must stay positive");
        Self {
            shape: FlowShape {
                spike_radius: radius,
                ..self.shape
            },
            source: self.source,
        }
    }

    /// Copy with a new clump count, floored at 1.
    pub(crate) fn with_clump_count(&self, clump_count: u32) -> Self {
        Self {
            shape: FlowShape {
                clump_count: clump_count.max(1),
                ..self.shape
            },
            source: self.source,
        }
    }
}

/// Wrap twist into `[-3600, 3600]`, keeping its sign.
fn wrap_twist(twist: f32) -> f32 {
    if twist.abs() > TWIST_LIMIT_DEGREES {
        twist % TWIST_LIMIT_DEGREES
    } else {
        twist
    }
}
