//! Configuration types
//!
//! Button timing is fixed at compile time. Control-loop settings are plain
//! structs with reference defaults that are validated once, when the
//! component using them is constructed.

pub mod timing;
pub mod types;

pub use timing::*;
pub use types::*;

/// Errors found while validating configuration
///
/// These are setup-time errors; nothing in the tick path produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sample period is zero, negative, or not finite
    ZeroSamplePeriod,
    /// `out_min` is not below `out_max`, or a bound is not finite
    InvalidOutputBounds,
    /// A PID gain or the derivative time constant is not finite
    InvalidGain,
    /// Filter coefficient outside `(0, 1]`
    InvalidFilterCoefficient,
    /// Encoder pulses per revolution is zero
    ZeroPulsesPerRevolution,
    /// Quadrature multiplier is zero
    ZeroQuadratureMultiplier,
    /// Gear ratio is zero, negative, or not finite
    InvalidGearRatio,
    /// Full-scale speed is zero, negative, or not finite
    InvalidFullScale,
    /// Actuator reports an empty duty range
    ZeroDutyRange,
    /// Tick period is zero or not a multiple of the base tick
    InvalidTickPeriod,
    /// PID sample period differs from the scheduled control period
    SamplePeriodMismatch,
    /// Button period differs from the tick the button thresholds assume
    ButtonPeriodMismatch,
}

pub(crate) fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
