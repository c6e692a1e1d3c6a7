//! PID regulator
//!
//! Floating-point PID with:
//! - trapezoidal integration, clamped to the output bounds
//! - rejection of the integration step that drives the output into saturation
//! - derivative on the measurement, smoothed by a bilinear low-pass filter
//!
//! The derivative acts on the measurement rather than the error so a
//! setpoint step does not produce a derivative kick.

use crate::config::{ConfigError, PidConfig};

/// Mutable regulator state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PidState {
    /// Accumulated integral term, always inside the output bounds
    integrator: f32,
    prev_error: f32,
    prev_measurement: f32,
    /// Filtered derivative term
    differentiator: f32,
    /// Output of the last accepted update
    output: f32,
}

/// PID regulator
#[derive(Debug, Clone)]
pub struct PidRegulator {
    config: PidConfig,
    state: PidState,
}

impl PidRegulator {
    /// Create a regulator with zeroed state
    pub fn new(config: PidConfig) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            warn!("PID config rejected: {}", e);
            return Err(e);
        }

        Ok(Self {
            config,
            state: PidState::default(),
        })
    }

    /// Compute the next output
    ///
    /// Called once per sample period. The output is always inside
    /// `[out_min, out_max]`. A non-finite setpoint or measurement is
    /// rejected: the state is left untouched and the previous output is
    /// returned.
    pub fn update(&mut self, setpoint: f32, measurement: f32) -> f32 {
        if !setpoint.is_finite() || !measurement.is_finite() {
            warn!("PID input not finite, holding output");
            return self.state.output;
        }

        let PidConfig {
            kp,
            ki,
            kd,
            ts,
            out_min,
            out_max,
            tau,
        } = self.config;
        let state = &mut self.state;

        let error = setpoint - measurement;
        let p = kp * error;

        let increment = 0.5 * ki * ts * (error + state.prev_error);
        state.integrator = (state.integrator + increment).clamp(out_min, out_max);

        state.differentiator = if tau <= 0.0 {
            kd * (error - state.prev_error) / ts
        } else {
            let alpha = (2.0 * tau - ts) / (2.0 * tau + ts);
            let slope = (measurement - state.prev_measurement) / ts;
            alpha * state.differentiator - (2.0 * kd / (2.0 * tau + ts)) * slope
        };

        let output = p + state.integrator + state.differentiator;
        let clamped = output.clamp(out_min, out_max);

        if clamped != output {
            state.integrator = (state.integrator - increment).clamp(out_min, out_max);
        }

        state.prev_error = error;
        state.prev_measurement = measurement;
        state.output = clamped;

        clamped
    }

    /// Zero the integrator, history and derivative filter
    ///
    /// Gains and bounds are kept. Call before re-engaging the loop so no
    /// history from a previous run leaks into the first sample.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }

    /// Replace the gains
    ///
    /// Resets the state to avoid a bump from the old integrator.
    pub fn set_gains(&mut self, kp: f32, ki: f32, kd: f32) -> Result<(), ConfigError> {
        let config = PidConfig {
            kp,
            ki,
            kd,
            ..self.config
        };
        config.validate()?;

        self.config = config;
        self.reset();
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Sample period in seconds
    pub fn sample_period(&self) -> f32 {
        self.config.ts
    }

    /// Current integral term
    pub fn integrator(&self) -> f32 {
        self.state.integrator
    }

    /// Current derivative term
    pub fn derivative(&self) -> f32 {
        self.state.differentiator
    }

    /// Error from the previous update
    pub fn last_error(&self) -> f32 {
        self.state.prev_error
    }
}
