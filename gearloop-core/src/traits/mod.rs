//! Collaborator traits
//!
//! These traits define the interface between the control core and the
//! hardware-specific code that reads buttons, counts encoder pulses,
//! drives the motor and carries the diagnostic stream.

pub mod diagnostics;
pub mod encoder;
pub mod input;
pub mod motor;

pub use diagnostics::{DiagnosticError, DiagnosticSink};
pub use encoder::{PulseCounter, SensorError};
pub use input::{ButtonId, FnLevelReader, InputError, LevelReader};
pub use motor::{ActuatorError, Direction, MotorActuator, StopMode};
