//! Control-loop configuration types
//!
//! Defaults are the reference values for the handheld: an 11 PPR encoder
//! behind a 4.4:1 gearbox, regulated in RPM at 10 Hz.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{is_positive, ConfigError, TICK_INTERVAL_MS};
use crate::traits::StopMode;

/// Physical unit of the estimated speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedUnit {
    /// Revolutions per minute
    #[default]
    Rpm,
    /// Revolutions per second
    Rps,
}

impl SpeedUnit {
    /// Convert revolutions per second into this unit
    pub fn from_rps(self, rps: f32) -> f32 {
        match self {
            SpeedUnit::Rpm => rps * 60.0,
            SpeedUnit::Rps => rps,
        }
    }
}

/// PID regulator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f32,
    /// Integral gain (per second)
    pub ki: f32,
    /// Derivative gain (seconds)
    pub kd: f32,
    /// Sample period in seconds
    pub ts: f32,
    /// Lower output bound
    pub out_min: f32,
    /// Upper output bound
    pub out_max: f32,
    /// Derivative low-pass time constant in seconds
    ///
    /// Zero or negative disables the filter and differentiates the error
    /// directly. Useful values lie between `0.01 * ts` and `10 * ts`.
    pub tau: f32,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 5.0,
            kd: 0.0,
            ts: 0.1,
            out_min: -1300.0,
            out_max: 1300.0,
            tau: 0.3,
        }
    }
}

impl PidConfig {
    /// Symmetric output bounds `[-limit, limit]`
    pub fn with_symmetric_limit(mut self, limit: f32) -> Self {
        self.out_min = -limit;
        self.out_max = limit;
        self
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.ts) {
            return Err(ConfigError::ZeroSamplePeriod);
        }
        if !self.out_min.is_finite() || !self.out_max.is_finite() || self.out_min >= self.out_max
        {
            return Err(ConfigError::InvalidOutputBounds);
        }
        let gains = [self.kp, self.ki, self.kd, self.tau];
        if gains.iter().any(|g| !g.is_finite()) {
            return Err(ConfigError::InvalidGain);
        }
        Ok(())
    }
}

/// Encoder and gearbox configuration for speed estimation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EncoderConfig {
    /// Encoder lines per motor revolution
    pub pulses_per_revolution: u16,
    /// Counts per line produced by the quadrature decoder (4 for x4 mode)
    pub quadrature_multiplier: u8,
    /// Motor revolutions per output-shaft revolution
    pub gear_ratio: f32,
    /// Unit of the reported speed
    pub unit: SpeedUnit,
    /// Exponential filter weight of the newest sample, in `(0, 1]`
    pub filter_alpha: f32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            pulses_per_revolution: 11,
            quadrature_multiplier: 4,
            gear_ratio: 4.4,
            unit: SpeedUnit::Rpm,
            filter_alpha: 0.3,
        }
    }
}

impl EncoderConfig {
    /// Counter increments per output-shaft revolution
    pub fn counts_per_output_revolution(&self) -> f32 {
        self.pulses_per_revolution as f32 * self.quadrature_multiplier as f32 * self.gear_ratio
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pulses_per_revolution == 0 {
            return Err(ConfigError::ZeroPulsesPerRevolution);
        }
        if self.quadrature_multiplier == 0 {
            return Err(ConfigError::ZeroQuadratureMultiplier);
        }
        if !is_positive(self.gear_ratio) {
            return Err(ConfigError::InvalidGearRatio);
        }
        if !(self.filter_alpha > 0.0 && self.filter_alpha <= 1.0) {
            return Err(ConfigError::InvalidFilterCoefficient);
        }
        Ok(())
    }
}

/// Mapping from regulator output to actuator commands
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuatorConfig {
    /// Regulator output that maps to full duty
    pub full_scale_speed: f32,
    /// How the motor is stopped when the loop stops
    pub stop_mode: StopMode,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            full_scale_speed: 1300.0,
            stop_mode: StopMode::Coast,
        }
    }
}

impl ActuatorConfig {
    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.full_scale_speed) {
            return Err(ConfigError::InvalidFullScale);
        }
        Ok(())
    }
}

/// Tick rates derived from the base timer interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerConfig {
    /// Base timer period in milliseconds
    pub base_tick_ms: u32,
    /// Button engine period in milliseconds
    ///
    /// Must equal [`TICK_INTERVAL_MS`]: the button thresholds are counted
    /// in ticks of that length.
    pub button_period_ms: u32,
    /// Speed loop period in milliseconds
    pub control_period_ms: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_tick_ms: TICK_INTERVAL_MS,
            button_period_ms: TICK_INTERVAL_MS,
            control_period_ms: 100,
        }
    }
}

impl SchedulerConfig {
    /// Speed loop period in seconds
    pub fn control_period_s(&self) -> f32 {
        self.control_period_ms as f32 / 1000.0
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_tick_ms;
        if base == 0 {
            return Err(ConfigError::InvalidTickPeriod);
        }
        for period in [self.button_period_ms, self.control_period_ms] {
            if period == 0 || period % base != 0 {
                return Err(ConfigError::InvalidTickPeriod);
            }
        }
        if self.button_period_ms != TICK_INTERVAL_MS {
            return Err(ConfigError::ButtonPeriodMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(PidConfig::default().validate(), Ok(()));
        assert_eq!(EncoderConfig::default().validate(), Ok(()));
        assert_eq!(ActuatorConfig::default().validate(), Ok(()));
        assert_eq!(SchedulerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_sample_period_rejected() {
        let config = PidConfig {
            ts: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSamplePeriod));

        let config = PidConfig {
            ts: -0.1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSamplePeriod));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = PidConfig {
            out_min: 10.0,
            out_max: -10.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidOutputBounds));
    }

    #[test]
    fn test_nan_gain_rejected() {
        let config = PidConfig {
            kd: f32::NAN,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidGain));
    }

    #[test]
    fn test_symmetric_limit() {
        let config = PidConfig::default().with_symmetric_limit(100.0);
        assert_eq!(config.out_min, -100.0);
        assert_eq!(config.out_max, 100.0);
    }

    #[test]
    fn test_encoder_validation() {
        let config = EncoderConfig {
            pulses_per_revolution: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPulsesPerRevolution));

        let config = EncoderConfig {
            quadrature_multiplier: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroQuadratureMultiplier));

        let config = EncoderConfig {
            gear_ratio: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidGearRatio));

        let config = EncoderConfig {
            filter_alpha: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidFilterCoefficient));
    }

    #[test]
    fn test_counts_per_output_revolution() {
        let config = EncoderConfig::default();
        let counts = config.counts_per_output_revolution();
        assert!(counts > 193.5 && counts < 193.7);
    }

    #[test]
    fn test_speed_unit_conversion() {
        assert_eq!(SpeedUnit::Rpm.from_rps(2.0), 120.0);
        assert_eq!(SpeedUnit::Rps.from_rps(2.0), 2.0);
    }

    #[test]
    fn test_scheduler_periods_must_align() {
        let config = SchedulerConfig {
            control_period_ms: 102,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickPeriod));

        let config = SchedulerConfig {
            base_tick_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickPeriod));
    }

    #[test]
    fn test_button_period_fixed_to_tick_interval() {
        let config = SchedulerConfig {
            button_period_ms: 20,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ButtonPeriodMismatch));

        // A finer base tick is fine as long as buttons still run every 5 ms
        let config = SchedulerConfig {
            base_tick_ms: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_control_period_seconds() {
        assert_eq!(SchedulerConfig::default().control_period_s(), 0.1);
    }
}
