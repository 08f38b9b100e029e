//! Error taxonomy for the wind-clump core
//!
//! Only two conditions exist:
//! - `InvalidInput`: a sensor value that cannot physically occur (negative wind speed,
//!   humidity outside 0-100%, pressure outside a sane bound, ...) or a malformed
//!   parameter bundle handed to the scene builder.
//! - `InvalidLayout`: a layout selector other than `ring` or `tower`.
//!
//! Extreme but physically possible values are clamped, never reported here.

use thiserror::Error;

/// Errors surfaced by the mapping, composition and scene-building stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindClumpError {
    /// A value is outside its physically meaningful range
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Name of the offending field (e.g. `"humidity_percent"`)
        field: &'static str,
        /// Human-readable description of the violated constraint
        reason: String,
    },

    /// Unsupported layout selector
    #[error("invalid layout '{0}': expected 'ring' or 'tower'")]
    InvalidLayout(String),
}

impl WindClumpError {
    /// Build an `InvalidInput` error for `field`.
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Reject non-finite values for `field`.
    pub(crate) fn require_finite(field: &'static str, value: f32) -> Result<f32> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::invalid_input(field, format!("must be finite, got {value}")))
        }
    }

    /// Reject values that are not finite and strictly positive.
    pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<f32> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self::invalid_input(
                field,
                format!("must be finite and positive, got {value}"),
            ))
        }
    }
}

/// Result alias used across the core.
pub type Result<T> = std::result::Result<T, WindClumpError>;
