//! Board-agnostic core logic for the Gearloop handheld controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (button levels, pulse counter, motor actuator)
//! - Button debounce and event engine
//! - Encoder speed estimation
//! - PID regulation and the closed-loop speed controller
//! - Tick scheduling for the two control rates
//! - The tick-driven runtime that ties them together
//! - Diagnostic line formatting
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod logging;

pub mod button;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod runtime;
pub mod scheduler;
pub mod traits;
