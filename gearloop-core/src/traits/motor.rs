//! Motor actuator trait
//!
//! The speed loop drives a brushed DC gear-motor through a two-input
//! H-bridge: a direction selection plus a PWM magnitude, or one of the two
//! stop modes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Positive speed
    #[default]
    Forward,
    /// Negative speed
    Reverse,
}

impl Direction {
    /// Direction selected by the sign of a signed command
    ///
    /// Zero maps to `Forward`.
    pub fn from_sign(value: f32) -> Self {
        if value < 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    /// Get the opposite direction
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// How the motor is stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopMode {
    /// Short the motor terminals for active braking
    Brake,
    /// Release the motor terminals and let it freewheel
    #[default]
    Coast,
}

/// Errors that can occur with actuator operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Direction pin write failed
    PinFault,
    /// PWM update failed
    PwmFault,
    /// Duty value above the actuator range
    InvalidDuty,
}

/// Motor actuation interface
pub trait MotorActuator {
    /// Full-scale duty value (100% on)
    fn max_duty(&self) -> u16;

    /// Drive the motor in `direction` with `duty` in `0..=max_duty()`
    fn set_actuation(&mut self, direction: Direction, duty: u16) -> Result<(), ActuatorError>;

    /// Actively brake the motor
    fn brake(&mut self) -> Result<(), ActuatorError>;

    /// Let the motor freewheel
    fn coast(&mut self) -> Result<(), ActuatorError>;

    /// Stop the motor using the given mode
    fn stop(&mut self, mode: StopMode) -> Result<(), ActuatorError> {
        match mode {
            StopMode::Brake => self.brake(),
            StopMode::Coast => self.coast(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_sign() {
        assert_eq!(Direction::from_sign(12.5), Direction::Forward);
        assert_eq!(Direction::from_sign(0.0), Direction::Forward);
        assert_eq!(Direction::from_sign(-0.1), Direction::Reverse);
    }

    #[test]
    fn test_direction_reversed() {
        assert_eq!(Direction::Forward.reversed(), Direction::Reverse);
        assert_eq!(Direction::Reverse.reversed(), Direction::Forward);
    }
}
