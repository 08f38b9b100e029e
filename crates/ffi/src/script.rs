use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use wind_clump_core::scene::{self, Layout, SceneOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_OBJECTS};

use crate::error::{DefaultFfiError, WindClumpErrorCode};
use crate::flow::WindClumpFlow;
use crate::helpers::{handle_ffi_result, optional, optional_str, ref_from_ptr, write_out};

#[repr(C)]
#[derive(Debug, Clone, Copy)]
/// Scene options for `wind_clump_build_script`.
///
/// Start from `wind_clump_default_scene_options()` and override what you need.
pub struct WindClumpSceneOptions {
    /// Layout name, `"ring"` or `"tower"` (case-insensitive). Null selects ring.
    pub layout: *const c_char,

    /// Global recursion limit (>= 1).
    pub max_depth: u32,

    /// Object budget (>= 1).
    pub max_objects: u32,

    /// Seed in `0..=2147483647`; any negative value draws a random seed.
    pub seed: i64,

    /// Climate hue shift in degrees; NaN for none.
    pub hue_shift: f32,

    /// Optional provenance tag written as a comment. May be null.
    pub provenance_tag: *const c_char,
}

impl WindClumpSceneOptions {
    /// Convert into core options.
    ///
    /// # Safety
    /// The string pointers must be null or valid null-terminated C strings.
    unsafe fn to_options(&self) -> Result<SceneOptions, DefaultFfiError> {
        // SAFETY: forwarded caller contract
        let layout = match unsafe { optional_str(self.layout, "layout") }? {
            Some(name) => name.parse::<Layout>()?,
            None => Layout::Ring,
        };
        let seed = if self.seed < 0 {
            None
        } else {
            // Range against MAX_SEED is checked by the core options
            let seed = u32::try_from(self.seed).map_err(|_| {
                DefaultFfiError::invalid_input(format!("seed out of range, got {}", self.seed))
            })?;
            Some(seed)
        };
        Ok(SceneOptions {
            layout,
            max_depth: self.max_depth,
            max_objects: self.max_objects,
            seed,
            hue_shift: optional(self.hue_shift),
            // SAFETY: forwarded caller contract
            provenance_tag: unsafe { optional_str(self.provenance_tag, "provenance_tag") }?,
            ..SceneOptions::default()
        })
    }
}

/// Default scene options: ring layout, maxdepth 60, 300000 objects, random seed,
/// no hue shift, no provenance tag.
#[no_mangle]
pub extern "C" fn wind_clump_default_scene_options() -> WindClumpSceneOptions {
    WindClumpSceneOptions {
        layout: ptr::null(),
        max_depth: DEFAULT_MAX_DEPTH,
        max_objects: DEFAULT_MAX_OBJECTS,
        seed: -1,
        hue_shift: f32::NAN,
        provenance_tag: ptr::null(),
    }
}

/// Render flow parameters into an `EisenScript`.
///
/// On success `*out_script` receives an owned, null-terminated string that must be
/// released with `wind_clump_free_string`. On failure it is set to null.
///
/// Returns
/// - `Ok` on success
/// - `NullPointer` if `flow` or `out_script` is null
/// - `InvalidLayout` for a layout other than ring or tower
/// - `InvalidString` if a string option is not UTF-8
/// - `InvalidInput` for an invalid flow, `max_depth` of 0, or an out-of-range seed
///
/// # Safety
/// `flow` must be null or point to a valid `WindClumpFlow`; `options` may be null
/// (defaults) or point to valid options whose strings are null or null-terminated;
/// `out_script` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn wind_clump_build_script(
    flow: *const WindClumpFlow,
    options: *const WindClumpSceneOptions,
    out_script: *mut *mut c_char,
) -> WindClumpErrorCode {
    if !out_script.is_null() {
        // SAFETY: non-null and valid for writes per the caller's contract
        unsafe { out_script.write(ptr::null_mut()) };
    }

    handle_ffi_result(|| {
        // SAFETY: forwarded caller contract
        let flow = unsafe { ref_from_ptr(flow, "flow") }?.to_flow()?;
        // SAFETY: forwarded caller contract
        let options = match unsafe { options.as_ref() } {
            // SAFETY: forwarded caller contract
            Some(options) => unsafe { options.to_options() }?,
            None => SceneOptions::default(),
        };
        if out_script.is_null() {
            return Err(DefaultFfiError::null_pointer("out_script"));
        }

        let text = scene::build(&flow, &options)?;
        let text = CString::new(text).map_err(|_| DefaultFfiError::invalid_string("script"))?;
        // SAFETY: forwarded caller contract
        unsafe { write_out(out_script, text.into_raw(), "out_script") }
    })
}

/// Release a string returned by `wind_clump_build_script`.
///
/// Null is a no-op.
///
/// # Safety
/// `script` must be null or a pointer returned by `wind_clump_build_script` that has
/// not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn wind_clump_free_string(script: *mut c_char) {
    if script.is_null() {
        return;
    }
    // SAFETY: pointer came from CString::into_raw per the caller's contract
    drop(unsafe { CString::from_raw(script) });
}
