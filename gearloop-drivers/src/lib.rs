//! Peripheral driver implementations
//!
//! Concrete implementations of the collaborator traits defined in
//! gearloop-core, built on `embedded-hal` 1.0 and gearloop-hal:
//!
//! - Button inputs (GPIO bank)
//! - Motor actuator (two-input H-bridge with PWM)
//! - Speed sensing (timer in quadrature encoder mode)
//! - Diagnostic stream (UART)

#![no_std]
#![deny(unsafe_code)]

pub mod diagnostics;
pub mod encoder;
pub mod input;
pub mod motor;
