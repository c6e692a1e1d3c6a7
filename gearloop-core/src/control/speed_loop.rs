//! Closed-loop motor speed control
//!
//! Each control tick samples the encoder, runs the PID regulator against
//! the setpoint, and maps the signed regulator output onto the H-bridge:
//! the sign selects the direction and the magnitude, relative to the
//! configured full-scale speed, selects the PWM duty.
//!
//! # Usage
//!
//! ```ignore
//! let mut speed_loop = SpeedControlLoop::new(
//!     encoder,
//!     hbridge,
//!     PidConfig::default(),
//!     EncoderConfig::default(),
//!     ActuatorConfig::default(),
//! )?;
//! speed_loop.start();
//!
//! // Every 100 ms:
//! let rpm = speed_loop.step(500.0);
//! ```

use super::pid::PidRegulator;
use super::speed::SpeedEstimator;
use crate::config::{ActuatorConfig, ConfigError, EncoderConfig, PidConfig};
use crate::traits::{ActuatorError, Direction, MotorActuator, PulseCounter};

/// Operating mode of the speed loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopMode {
    /// No sampling, motor stopped
    #[default]
    Stopped,
    /// Speed is sampled but the motor is not driven
    Monitoring,
    /// Speed is regulated to the setpoint
    Regulating,
}

/// Direction and duty for one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuationCommand {
    /// Rotation direction
    pub direction: Direction,
    /// PWM duty in `0..=max_duty`
    pub duty: u16,
}

/// Map a signed regulator output onto the actuator duty range
///
/// `|command| / full_scale` is saturated at 1 and scaled to `max_duty`.
/// Zero and positive commands drive forward. A non-finite command maps to
/// zero duty.
pub fn actuation_for(command: f32, full_scale: f32, max_duty: u16) -> ActuationCommand {
    if !command.is_finite() {
        return ActuationCommand {
            direction: Direction::Forward,
            duty: 0,
        };
    }

    let direction = Direction::from_sign(command);
    let magnitude = if command < 0.0 { -command } else { command };

    let fraction = (magnitude / full_scale).min(1.0);
    let duty = if fraction > 0.0 {
        (fraction * max_duty as f32) as u16
    } else {
        0
    };

    ActuationCommand { direction, duty }
}

/// Speed control loop over a pulse counter and a motor actuator
pub struct SpeedControlLoop<C, A> {
    estimator: SpeedEstimator<C>,
    pid: PidRegulator,
    actuator: A,
    config: ActuatorConfig,
    mode: LoopMode,
    measured: f32,
    command: f32,
    last_fault: Option<ActuatorError>,
}

impl<C: PulseCounter, A: MotorActuator> SpeedControlLoop<C, A> {
    /// Create a stopped loop
    ///
    /// The PID sample period is also the interval passed to the estimator.
    pub fn new(
        counter: C,
        actuator: A,
        pid_config: PidConfig,
        encoder_config: EncoderConfig,
        config: ActuatorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if actuator.max_duty() == 0 {
            warn!("Actuator reports an empty duty range");
            return Err(ConfigError::ZeroDutyRange);
        }

        Ok(Self {
            estimator: SpeedEstimator::new(counter, encoder_config)?,
            pid: PidRegulator::new(pid_config)?,
            actuator,
            config,
            mode: LoopMode::Stopped,
            measured: 0.0,
            command: 0.0,
            last_fault: None,
        })
    }

    /// Start regulating from a clean regulator state
    ///
    /// Pulses counted before the start are discarded.
    pub fn start(&mut self) {
        self.pid.reset();
        self.estimator.discard_pending();
        self.mode = LoopMode::Regulating;
        info!("Speed loop started");
    }

    /// Sample speed on each step without driving the motor
    ///
    /// A running regulation is stopped first. Pulses counted before
    /// monitoring starts are discarded.
    pub fn monitor(&mut self) -> Result<(), ActuatorError> {
        let result = match self.mode {
            LoopMode::Monitoring => return Ok(()),
            LoopMode::Regulating => self.stop(),
            LoopMode::Stopped => Ok(()),
        };
        self.estimator.discard_pending();
        self.mode = LoopMode::Monitoring;
        info!("Speed loop monitoring");
        result
    }

    /// Stop the loop
    ///
    /// Resets the regulator, stops the motor with the configured stop mode
    /// and zeroes the measured speed. The loop stays stopped even if the
    /// actuator reports a fault.
    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.mode = LoopMode::Stopped;
        self.pid.reset();
        self.estimator.reset();
        self.measured = 0.0;
        self.command = 0.0;
        info!("Speed loop stopped");

        let result = self.actuator.stop(self.config.stop_mode);
        if let Err(e) = result {
            warn!("Actuator stop failed: {}", e);
            self.last_fault = Some(e);
        }
        result
    }

    /// Run one control tick
    ///
    /// Returns the measured speed. Does nothing while stopped. Actuator
    /// faults are recorded and retried on the next tick.
    pub fn step(&mut self, setpoint: f32) -> f32 {
        match self.mode {
            LoopMode::Stopped => return self.measured,
            LoopMode::Monitoring => {
                self.measured = self.estimator.sample(self.pid.sample_period());
            }
            LoopMode::Regulating => {
                self.measured = self.estimator.sample(self.pid.sample_period());
                self.command = self.pid.update(setpoint, self.measured);

                let cmd = actuation_for(
                    self.command,
                    self.config.full_scale_speed,
                    self.actuator.max_duty(),
                );
                match self.actuator.set_actuation(cmd.direction, cmd.duty) {
                    Ok(()) => self.last_fault = None,
                    Err(e) => {
                        warn!("Actuator fault: {}", e);
                        self.last_fault = Some(e);
                    }
                }
            }
        }

        self.measured
    }

    /// Stop the loop and clear all history
    pub fn reset(&mut self) -> Result<(), ActuatorError> {
        self.last_fault = None;
        self.stop()
    }

    /// Current mode
    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    /// Check if the loop samples speed
    pub fn is_running(&self) -> bool {
        self.mode != LoopMode::Stopped
    }

    /// Last measured speed, zero while stopped
    pub fn measured_speed(&self) -> f32 {
        self.measured
    }

    /// Last regulator output
    pub fn command(&self) -> f32 {
        self.command
    }

    /// Actuator fault from the most recent actuation, if any
    pub fn last_fault(&self) -> Option<ActuatorError> {
        self.last_fault
    }

    /// Access the regulator, e.g. for retuning
    pub fn pid_mut(&mut self) -> &mut PidRegulator {
        &mut self.pid
    }

    /// Access the regulator
    pub fn pid(&self) -> &PidRegulator {
        &self.pid
    }

    /// Access the estimator
    pub fn estimator_mut(&mut self) -> &mut SpeedEstimator<C> {
        &mut self.estimator
    }

    /// Access the actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Access the actuator mutably
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }
}
