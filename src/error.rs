//! Controller-specific error types.
//!
//! Every error here is a configuration defect detected at construction or
//! load time.  Once a [`crate::player::PlayerController`] exists, its tick and
//! collision handlers cannot fail: actions that are not yet allowed (firing on
//! cooldown, consuming hostile goo) are skipped, not reported.
//!
//! ## Usage
//!
//! ```rust
//! use goo_evolution::error::{ControllerError, ControllerResult};
//!
//! fn check_threshold(energy_until_next: u32) -> ControllerResult<()> {
//!     if energy_until_next == 0 {
//!         return Err(ControllerError::ZeroThreshold {
//!             stage: 0,
//!             name: "Blob".into(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Top-level error enum for the player controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// The evolution roster has no stages; stage 0 cannot exist.
    EmptyRoster,

    /// A stage's energy threshold is zero, which would divide by zero when
    /// computing growth progress.
    ZeroThreshold {
        /// Roster index of the offending stage.
        stage: usize,
        /// Display name of the offending stage.
        name: String,
    },

    /// A stage's scale range is inverted or not finite.
    InvalidScaleRange {
        /// Roster index of the offending stage.
        stage: usize,
        scale_min: f32,
        scale_max: f32,
    },

    /// A tuning constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A stage transition targeted an index past the end of the roster.
    StageOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of stages in the roster.
        stage_count: usize,
    },

    /// A stage transition tried to move backwards.
    StageRegression {
        /// Current stage index.
        from: usize,
        /// Requested (lower) stage index.
        to: usize,
    },

    /// The TOML override file could not be parsed.
    ConfigParse {
        path: String,
        message: String,
    },
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::EmptyRoster => {
                write!(f, "evolution roster is empty: at least one stage is required")
            }
            ControllerError::ZeroThreshold { stage, name } => write!(
                f,
                "evolution stage {} ('{}') has an energy threshold of 0",
                stage, name
            ),
            ControllerError::InvalidScaleRange {
                stage,
                scale_min,
                scale_max,
            } => write!(
                f,
                "evolution stage {} has invalid scale range [{}, {}]",
                stage, scale_min, scale_max
            ),
            ControllerError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            ControllerError::StageOutOfRange { index, stage_count } => write!(
                f,
                "stage index {} is out of range for a roster of {} stages",
                index, stage_count
            ),
            ControllerError::StageRegression { from, to } => write!(
                f,
                "evolution cannot regress from stage {} to stage {}",
                from, to
            ),
            ControllerError::ConfigParse { path, message } => {
                write!(f, "failed to parse {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for ControllerError {}

/// Convenience alias: a `Result` using `ControllerError` as the error type.
pub type ControllerResult<T> = Result<T, ControllerError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `value` is negative or not finite.
pub fn validate_non_negative(name: &'static str, value: f32) -> ControllerResult<()> {
    if !value.is_finite() || value < 0.0 {
        Err(ControllerError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `value` is not strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> ControllerResult<()> {
    if !value.is_finite() || value <= 0.0 {
        Err(ControllerError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}
