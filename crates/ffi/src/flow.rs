use wind_clump_core::compose::{apply_moisture_puffiness, apply_pressure_clumping};
use wind_clump_core::core_types::units::{
    Degrees, Hectopascals, MetersPerSecond, MillimetersPerHour, Percent, StrikesPerHour,
};
use wind_clump_core::flow::{map_wind_to_flow, FlowParameters, FlowShape, FlowSource};
use wind_clump_core::{climate, NoaaAtmosphere, UnitSystem, WindClumpError, WindObservation};

use crate::error::{DefaultFfiError, WindClumpErrorCode};
use crate::helpers::{handle_ffi_result, optional, ref_from_ptr, write_out};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
/// FFI-friendly flow parameters.
/// Keep this layout stable for C/C++/C# consumers.
pub struct WindClumpFlow {
    /// Number of clumps in the scene (>= 1).
    pub clump_count: u32,

    /// Spikes per clump (>= 1).
    pub spikes_per_clump: u32,

    /// Spike length.
    pub spike_height: f32,

    /// Spike base thickness.
    pub spike_radius: f32,

    /// Twist per recursion step (degrees, signed).
    pub twist_degrees: f32,

    /// Fan angle of a clump's spikes (degrees).
    pub spread: f32,

    /// Ring radius of the clump layout.
    pub clump_radius: f32,

    /// Vertical pitch of a clump in the tower layout.
    pub clump_height: f32,

    /// Source wind speed (m/s), metadata only.
    pub wind_speed_mps: f32,

    /// Source wind direction (degrees), NaN when unknown.
    pub wind_direction_degrees: f32,
}

impl From<&FlowParameters> for WindClumpFlow {
    fn from(flow: &FlowParameters) -> Self {
        Self {
            clump_count: flow.clump_count(),
            spikes_per_clump: flow.spikes_per_clump(),
            spike_height: flow.spike_height(),
            spike_radius: flow.spike_radius(),
            twist_degrees: flow.twist_degrees(),
            spread: flow.spread(),
            clump_radius: flow.clump_radius(),
            clump_height: flow.clump_height(),
            wind_speed_mps: *flow.wind_speed(),
            wind_direction_degrees: flow.wind_direction().map_or(f32::NAN, Degrees::value),
        }
    }
}

impl WindClumpFlow {
    /// Validate and convert into core flow parameters.
    pub(crate) fn to_flow(self) -> Result<FlowParameters, WindClumpError> {
        FlowParameters::new(
            FlowShape {
                clump_count: self.clump_count,
                spikes_per_clump: self.spikes_per_clump,
                spike_height: self.spike_height,
                spike_radius: self.spike_radius,
                twist_degrees: self.twist_degrees,
                spread: self.spread,
                clump_radius: self.clump_radius,
                clump_height: self.clump_height,
            },
            FlowSource {
                wind_speed: MetersPerSecond::new(self.wind_speed_mps),
                wind_direction: optional(self.wind_direction_degrees)
                    .map(|degrees| Degrees::new(degrees).normalized()),
            },
        )
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
/// FFI-friendly secondary observations. Any field set to NaN is treated as absent.
pub struct WindClumpAtmosphere {
    /// Relative humidity (0-100%).
    pub humidity_percent: f32,

    /// Precipitation rate (mm/h, >= 0).
    pub precipitation_mm_hr: f32,

    /// Barometric pressure (hPa, 850-1100).
    pub pressure_hpa: f32,

    /// Lightning strikes per hour (>= 0).
    pub lightning_per_hr: f32,
}

impl From<&WindClumpAtmosphere> for NoaaAtmosphere {
    fn from(atmosphere: &WindClumpAtmosphere) -> Self {
        Self {
            humidity: optional(atmosphere.humidity_percent).map(Percent::new),
            precipitation_rate: optional(atmosphere.precipitation_mm_hr)
                .map(MillimetersPerHour::new),
            barometric_pressure: optional(atmosphere.pressure_hpa).map(Hectopascals::new),
            lightning_rate: optional(atmosphere.lightning_per_hr).map(StrikesPerHour::new),
        }
    }
}

fn unit_system(units: u8) -> Result<UnitSystem, DefaultFfiError> {
    match units {
        0 => Ok(UnitSystem::Standard),
        1 => Ok(UnitSystem::Metric),
        2 => Ok(UnitSystem::Imperial),
        other => Err(DefaultFfiError::invalid_input(format!(
            "units must be 0 (standard), 1 (metric) or 2 (imperial), got {other}"
        ))),
    }
}

/// Map a wind observation to flow parameters.
///
/// # Parameters
/// - `speed`: wind speed in `units`
/// - `direction_degrees`: bearing the wind blows from, NaN if unknown
/// - `units`: 0 = standard (m/s), 1 = metric (m/s), 2 = imperial (mph)
/// - `out_flow`: receives the mapped parameters
///
/// Returns
/// - `Ok` on success with `out_flow` written
/// - `NullPointer` if `out_flow` is null
/// - `InvalidInput` for a negative or non-finite speed, or unknown units
///
/// # Safety
/// `out_flow` must be null or valid for writes of `WindClumpFlow`.
#[no_mangle]
pub unsafe extern "C" fn wind_clump_map_wind(
    speed: f32,
    direction_degrees: f32,
    units: u8,
    out_flow: *mut WindClumpFlow,
) -> WindClumpErrorCode {
    handle_ffi_result(|| {
        let observation = WindObservation::new(
            speed,
            optional(direction_degrees).map(Degrees::new),
            unit_system(units)?,
        );
        let flow = map_wind_to_flow(&observation)?;
        // SAFETY: forwarded caller contract
        unsafe { write_out(out_flow, WindClumpFlow::from(&flow), "out_flow") }
    })
}

/// Shared body of the two composer entry points.
///
/// # Safety
/// Pointer arguments follow the contract of the public composer functions.
unsafe fn compose_with(
    flow: *const WindClumpFlow,
    atmosphere: *const WindClumpAtmosphere,
    out_flow: *mut WindClumpFlow,
    composer: fn(&FlowParameters, &NoaaAtmosphere) -> Result<FlowParameters, WindClumpError>,
) -> WindClumpErrorCode {
    handle_ffi_result(|| {
        // SAFETY: forwarded caller contract
        let flow = unsafe { ref_from_ptr(flow, "flow") }?.to_flow()?;
        // SAFETY: forwarded caller contract
        let atmosphere = NoaaAtmosphere::from(unsafe { ref_from_ptr(atmosphere, "atmosphere") }?);
        let composed = composer(&flow, &atmosphere)?;
        // SAFETY: forwarded caller contract
        unsafe { write_out(out_flow, WindClumpFlow::from(&composed), "out_flow") }
    })
}

/// Thicken or thin the spikes from humidity and precipitation.
///
/// Only `spike_radius` changes. `out_flow` may alias `flow`.
///
/// Returns
/// - `Ok` on success with `out_flow` written
/// - `NullPointer` if any pointer is null
/// - `InvalidInput` for out-of-range readings or an invalid `flow`
///
/// # Safety
/// `flow` and `atmosphere` must be null or point to valid values; `out_flow` must be
/// null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wind_clump_apply_moisture(
    flow: *const WindClumpFlow,
    atmosphere: *const WindClumpAtmosphere,
    out_flow: *mut WindClumpFlow,
) -> WindClumpErrorCode {
    // SAFETY: forwarded caller contract
    unsafe { compose_with(flow, atmosphere, out_flow, apply_moisture_puffiness) }
}

/// Raise or lower the clump count from pressure and lightning.
///
/// Only `clump_count` changes. `out_flow` may alias `flow`.
///
/// Returns
/// - `Ok` on success with `out_flow` written
/// - `NullPointer` if any pointer is null
/// - `InvalidInput` for out-of-range readings or an invalid `flow`
///
/// # Safety
/// `flow` and `atmosphere` must be null or point to valid values; `out_flow` must be
/// null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wind_clump_apply_pressure(
    flow: *const WindClumpFlow,
    atmosphere: *const WindClumpAtmosphere,
    out_flow: *mut WindClumpFlow,
) -> WindClumpErrorCode {
    // SAFETY: forwarded caller contract
    unsafe { compose_with(flow, atmosphere, out_flow, apply_pressure_clumping) }
}

/// Hue rotation in degrees for a normalized climate anomaly.
///
/// Total: the anomaly is clamped to [-1, 1] (NaN counts as 0) and a non-finite
/// swing yields 0.
#[no_mangle]
pub extern "C" fn wind_clump_hue_shift(anomaly: f32, max_swing_degrees: f32) -> f32 {
    climate::hue_shift(anomaly, max_swing_degrees)
}
