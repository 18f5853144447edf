//! Typed error for step construction.
//!
//! The control core performs no I/O of its own, so the only error it
//! generates is a rejected configuration.  Collaborator failures travel as
//! opaque [`anyhow::Error`]s through the port traits instead.
//!
//! All variants are `Copy` so they can be returned from validation without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A step configuration that must be rejected before the step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A timer or pump duration is zero.  The `&'static str` names the field.
    ZeroDuration(&'static str),
    /// The debounce sample count is zero.
    ZeroSampleCount,
    /// A temperature is NaN or infinite.  The `&'static str` names the field.
    InvalidTemperature(&'static str),
    /// A hop alert is scheduled earlier than the timer start.
    /// Carries the 1-based alert index.
    OffsetExceedsTimer(usize),
    /// More hop alerts than the boil step can hold.
    TooManyHopAlerts,
    /// A hop alert label does not fit the fixed-size label buffer.
    LabelTooLong(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDuration(field) => write!(f, "{field} must be greater than zero"),
            Self::ZeroSampleCount => write!(f, "sample count must be at least 1"),
            Self::InvalidTemperature(field) => write!(f, "{field} is not a finite temperature"),
            Self::OffsetExceedsTimer(n) => {
                write!(f, "hop alert {n} is scheduled before the timer starts")
            }
            Self::TooManyHopAlerts => write!(f, "too many hop alerts"),
            Self::LabelTooLong(n) => write!(f, "hop alert {n} label is too long"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// `Result` alias for configuration validation.
pub type Result<T> = core::result::Result<T, ConfigError>;
