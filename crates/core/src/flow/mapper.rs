//! Atmosphere-to-flow mapper
//!
//! Turns a raw wind observation into base [`FlowParameters`]:
//! 1. convert the speed to m/s through the unit table
//! 2. look up the banded shape for that speed
//! 3. sign the twist from the wind direction
//!
//! The mapping is total over valid observations. Negative or non-finite speeds are
//! sensor errors and fail with `InvalidInput`; directions outside `[0, 360)` are
//! wrapped, never rejected.

use super::bands::{classify, shape_for_speed};
use super::{FlowParameters, FlowShape, FlowSource};
use crate::core_types::observation::WindObservation;
use crate::core_types::units::Degrees;
use crate::error::{Result, WindClumpError};
use tracing::debug;

/// Map a wind observation onto the clump/spike geometry family.
///
/// # Errors
/// Returns `InvalidInput` if the observed speed is negative or not finite.
///
/// # Example
/// ```
/// use wind_clump_core::core_types::WindObservation;
/// use wind_clump_core::flow::map_wind_to_flow;
///
/// let calm = map_wind_to_flow(&WindObservation::metric(0.8, 0.0)).unwrap();
/// let gale = map_wind_to_flow(&WindObservation::metric(18.0, 270.0)).unwrap();
/// assert!(gale.clump_count() > calm.clump_count());
/// assert!(gale.spike_radius() < calm.spike_radius());
/// ```
pub fn map_wind_to_flow(wind: &WindObservation) -> Result<FlowParameters> {
    if !wind.speed.is_finite() || wind.speed < 0.0 {
        return Err(WindClumpError::invalid_input(
            "speed",
            format!("wind speed must be finite and non-negative, got {}", wind.speed),
        ));
    }

    let speed = wind.speed_mps();
    let direction = wind.direction.map(Degrees::normalized);

    let banded = shape_for_speed(speed);
    let shape = FlowShape {
        twist_degrees: signed_twist(banded.twist_degrees, direction),
        ..banded
    };

    debug!(
        band = %classify(speed),
        speed = %speed,
        units = %wind.units,
        clump_count = shape.clump_count,
        spikes_per_clump = shape.spikes_per_clump,
        twist = shape.twist_degrees,
        "mapped wind observation to flow parameters"
    );

    FlowParameters::new(
        shape,
        FlowSource {
            wind_speed: speed,
            wind_direction: direction,
        },
    )
}

/// Apply the direction-derived sign to a twist magnitude.
///
/// Wind from the eastern half of the compass `[0, 180)` twists positively, wind
/// from the western half `[180, 360)` negatively. No direction means no rotation
/// of the sign.
fn signed_twist(magnitude: f32, direction: Option<Degrees>) -> f32 {
    if magnitude == 0.0 {
        return 0.0;
    }
    match direction {
        Some(bearing) if *bearing >= 180.0 => -magnitude,
        _ => magnitude,
    }
}
