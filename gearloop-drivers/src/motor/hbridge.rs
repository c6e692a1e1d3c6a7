//! H-bridge motor actuator
//!
//! Drives a brushed DC motor through a driver with two direction inputs
//! (AIN1, AIN2) and a separate PWM enable input, TB6612 style.
//!
//! | AIN1 | AIN2 | PWM  | Motor state |
//! |------|------|------|-------------|
//! | 0    | 1    | duty | Forward     |
//! | 1    | 0    | duty | Reverse     |
//! | 1    | 1    | -    | Brake       |
//! | 0    | 0    | -    | Coast       |

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use gearloop_core::traits::{ActuatorError, Direction, MotorActuator};

/// Last state commanded to the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeState {
    /// Driving with the given direction and duty
    Driving(Direction, u16),
    /// Both inputs high
    Braking,
    /// Both inputs low
    #[default]
    Coasting,
}

/// Two-input H-bridge with PWM speed control
pub struct HBridgeActuator<IN1, IN2, PWM> {
    ain1: IN1,
    ain2: IN2,
    pwm: PWM,
    /// Swap the meaning of forward and reverse
    inverted: bool,
    state: BridgeState,
}

impl<IN1, IN2, PWM> HBridgeActuator<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin,
    PWM: SetDutyCycle,
{
    /// Create an actuator and put the motor in coast
    pub fn new(ain1: IN1, ain2: IN2, pwm: PWM) -> Result<Self, ActuatorError> {
        Self::with_inversion(ain1, ain2, pwm, false)
    }

    /// Create an actuator for a motor wired with swapped terminals
    pub fn with_inversion(
        ain1: IN1,
        ain2: IN2,
        pwm: PWM,
        inverted: bool,
    ) -> Result<Self, ActuatorError> {
        let mut actuator = Self {
            ain1,
            ain2,
            pwm,
            inverted,
            state: BridgeState::Coasting,
        };
        actuator.coast()?;
        Ok(actuator)
    }

    /// Last commanded bridge state
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Release the pins
    pub fn release(self) -> (IN1, IN2, PWM) {
        (self.ain1, self.ain2, self.pwm)
    }

    fn set_inputs(&mut self, ain1: bool, ain2: bool) -> Result<(), ActuatorError> {
        let r1 = if ain1 {
            self.ain1.set_high()
        } else {
            self.ain1.set_low()
        };
        r1.map_err(|_| ActuatorError::PinFault)?;

        let r2 = if ain2 {
            self.ain2.set_high()
        } else {
            self.ain2.set_low()
        };
        r2.map_err(|_| ActuatorError::PinFault)
    }
}

impl<IN1, IN2, PWM> MotorActuator for HBridgeActuator<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin,
    PWM: SetDutyCycle,
{
    fn max_duty(&self) -> u16 {
        self.pwm.max_duty_cycle()
    }

    fn set_actuation(&mut self, direction: Direction, duty: u16) -> Result<(), ActuatorError> {
        if duty > self.pwm.max_duty_cycle() {
            return Err(ActuatorError::InvalidDuty);
        }

        let wired = if self.inverted {
            direction.reversed()
        } else {
            direction
        };
        match wired {
            Direction::Forward => self.set_inputs(false, true)?,
            Direction::Reverse => self.set_inputs(true, false)?,
        }

        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorError::PwmFault)?;
        self.state = BridgeState::Driving(direction, duty);
        Ok(())
    }

    fn brake(&mut self) -> Result<(), ActuatorError> {
        self.set_inputs(true, true)?;
        self.state = BridgeState::Braking;
        Ok(())
    }

    fn coast(&mut self) -> Result<(), ActuatorError> {
        self.set_inputs(false, false)?;
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| ActuatorError::PwmFault)?;
        self.state = BridgeState::Coasting;
        Ok(())
    }
}
