//! Gearloop Hardware Abstraction Layer
//!
//! Traits for the peripherals the controller needs that `embedded-hal` 1.0
//! does not cover. Chip HALs implement these; the drivers in
//! `gearloop-drivers` build on them together with the `embedded-hal`
//! digital and PWM traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  gearloop-core (board-agnostic logic)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gearloop-drivers (collaborators)       │
//! └─────────────────────────────────────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │ gearloop-hal    │     │ embedded-hal    │
//! │ counter, uart   │     │ gpio, pwm       │
//! └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`counter::CounterRegister`] - Timer in quadrature encoder mode
//! - [`uart::UartTx`] - Serial transmit

#![no_std]
#![deny(unsafe_code)]

pub mod counter;
pub mod uart;

pub use counter::CounterRegister;
pub use uart::UartTx;
