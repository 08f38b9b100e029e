//! C ABI for the wind-clump generator
//!
//! Every fallible function returns a [`WindClumpErrorCode`] and records a message
//! retrievable with `wind_clump_get_last_error()` on the same thread. Optional
//! float inputs use NaN for "absent". Strings handed out by the library are owned
//! by the caller and released with `wind_clump_free_string()`.
//!
//! Typical call sequence:
//! ```c
//! WindClumpFlow flow;
//! wind_clump_map_wind(12.0f, 250.0f, 1, &flow);
//!
//! WindClumpAtmosphere air = { 85.0f, 4.0f, NAN, NAN };
//! wind_clump_apply_moisture(&flow, &air, &flow);
//!
//! WindClumpSceneOptions options = wind_clump_default_scene_options();
//! options.layout = "tower";
//! options.seed = 42;
//! char* script = NULL;
//! if (wind_clump_build_script(&flow, &options, &script) == Ok) {
//!     fputs(script, out);
//!     wind_clump_free_string(script);
//! }
//! ```

mod error;
mod flow;
mod helpers;
mod script;

pub use error::{wind_clump_get_last_error, wind_clump_get_last_error_code, WindClumpErrorCode};
pub use flow::{
    wind_clump_apply_moisture, wind_clump_apply_pressure, wind_clump_hue_shift,
    wind_clump_map_wind, WindClumpAtmosphere, WindClumpFlow,
};
pub use script::{
    wind_clump_build_script, wind_clump_default_scene_options, wind_clump_free_string,
    WindClumpSceneOptions,
};
