//! Motor speed control
//!
//! - [`SpeedEstimator`]: filtered output-shaft speed from a quadrature counter
//! - [`PidRegulator`]: PID with anti-windup and filtered derivative
//! - [`SpeedControlLoop`]: the two composed with a motor actuator

mod pid;
mod speed;
mod speed_loop;

pub use pid::PidRegulator;
pub use speed::SpeedEstimator;
pub use speed_loop::{actuation_for, ActuationCommand, LoopMode, SpeedControlLoop};
