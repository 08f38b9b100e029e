use crate::error::{with_last_error_mut, DefaultFfiError, FfiError, WindClumpErrorCode};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Set the thread-local error message and code.
/// Accepts any type implementing `FfiError` trait.
pub(crate) fn set_last_error(error: &impl FfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FfiError) -> WindClumpErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = WindClumpErrorCode::Ok;
    });
}

/// Run an FFI body and translate its outcome into an error code, keeping the
/// thread-local error state in sync.
pub(crate) fn handle_ffi_result<F>(body: F) -> WindClumpErrorCode
where
    F: FnOnce() -> Result<(), DefaultFfiError>,
{
    match body() {
        Ok(()) => {
            clear_last_error();
            WindClumpErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// NaN marks an absent optional value on the C side.
#[inline]
pub(crate) fn optional(value: f32) -> Option<f32> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// Borrow a required struct argument.
///
/// # Safety
/// `ptr` must be null or point to a valid, initialized `T`.
pub(crate) unsafe fn ref_from_ptr<'a, T>(ptr: *const T, name: &str) -> Result<&'a T, DefaultFfiError> {
    // SAFETY: caller guarantees `ptr` is null or valid
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFfiError::null_pointer(name))
}

/// Write `value` through a required out-parameter.
///
/// # Safety
/// `ptr` must be null or valid for writes of `T`.
pub(crate) unsafe fn write_out<T>(ptr: *mut T, value: T, name: &str) -> Result<(), DefaultFfiError> {
    if ptr.is_null() {
        return Err(DefaultFfiError::null_pointer(name));
    }
    // SAFETY: non-null and valid for writes per the caller's contract
    unsafe { ptr.write(value) };
    Ok(())
}

/// Read an optional, null-terminated UTF-8 string.
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated C string.
pub(crate) unsafe fn optional_str(ptr: *const c_char, name: &str) -> Result<Option<String>, DefaultFfiError> {
    if ptr.is_null() {
        return Ok(None);
    }
    // SAFETY: non-null and null-terminated per the caller's contract
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str()
        .map(|s| Some(s.to_string()))
        .map_err(|_| DefaultFfiError::invalid_string(name))
}
