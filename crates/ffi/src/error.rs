use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use wind_clump_core::WindClumpError;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> WindClumpErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FfiError` for the boundary's own failures and for
/// errors surfaced by the core library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFfiError {
    code: WindClumpErrorCode,
    msg: String,
}

impl DefaultFfiError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_flow"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: WindClumpErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a C string that is not valid UTF-8.
    ///
    /// # Arguments
    /// * `param_name` - The name of the string parameter (e.g., `"layout"`)
    pub fn invalid_string(param_name: &str) -> Self {
        Self {
            code: WindClumpErrorCode::InvalidString,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }

    /// Create error for a value the core would reject.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_input(message: String) -> Self {
        Self {
            code: WindClumpErrorCode::InvalidInput,
            msg: message,
        }
    }
}

impl From<WindClumpError> for DefaultFfiError {
    fn from(error: WindClumpError) -> Self {
        let code = match error {
            WindClumpError::InvalidInput { .. } => WindClumpErrorCode::InvalidInput,
            WindClumpError::InvalidLayout(_) => WindClumpErrorCode::InvalidLayout,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl FfiError for DefaultFfiError {
    fn code(&self) -> WindClumpErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by wind-clump functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindClumpErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// A sensor value or parameter is outside its meaningful range.
    InvalidInput = 2,

    /// Layout name other than `ring` or `tower`.
    InvalidLayout = 3,

    /// A C string argument is not valid UTF-8.
    InvalidString = 4,
}

impl From<DefaultFfiError> for WindClumpErrorCode {
    fn from(error: DefaultFfiError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, WindClumpErrorCode)> = const { RefCell::new((None, WindClumpErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, WindClumpErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, WindClumpErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or no call has been made.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage). Each thread has
/// its own independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// WindClumpFlow flow;
/// if (wind_clump_map_wind(-3.0f, NAN, 1, &flow) != Ok) {
///     const char* error = wind_clump_get_last_error();
///     if (error) {
///         fprintf(stderr, "mapping failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn wind_clump_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `Ok` (0) if the last call on this thread succeeded, otherwise the code
/// that call returned.
#[no_mangle]
pub extern "C" fn wind_clump_get_last_error_code() -> WindClumpErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
