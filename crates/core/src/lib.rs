//! Wind-Clump Core Library
//!
//! Turns live weather observations into Structure Synth `EisenScript` scenes of
//! recursive, pointy "clumps". Wind speed and direction select the geometry
//! through a banded lookup; secondary NOAA-style signals warp it; a climate anomaly
//! tints it.
//!
//! ## Pipeline
//!
//! 1. [`flow::map_wind_to_flow`]: wind observation to [`FlowParameters`]
//! 2. [`compose::apply_moisture_puffiness`]: humidity and rain thicken spikes
//! 3. [`compose::apply_pressure_clumping`]: low pressure and lightning add clumps
//! 4. [`climate::hue_shift`]: anomaly to hue rotation (colors only)
//! 5. [`scene::build`]: final parameters to script text
//!
//! [`pipeline::generate_script`] runs all of them in order.

// Core types and utilities
pub mod core_types;
pub mod error;

// Stages
pub mod climate;
pub mod compose;
pub mod flow;
pub mod scene;

// End-to-end orchestration
pub mod pipeline;

// Re-export core types
pub use core_types::{
    Degrees, Hectopascals, MetersPerSecond, MilesPerHour, MillimetersPerHour, NoaaAtmosphere,
    Percent, StrikesPerHour, UnitSystem, WindObservation,
};
pub use error::{Result, WindClumpError};

// Re-export stage entry points
pub use climate::{hue_shift, ClimateAnomaly};
pub use compose::{apply_moisture_puffiness, apply_pressure_clumping};
pub use flow::{map_wind_to_flow, FlowParameters, FlowShape, FlowSource};
pub use pipeline::{generate_script, DemoScenario, GeneratedScene, SceneRequest, DEMO_SCENARIOS};
pub use scene::{build, Layout, SceneOptions};
