//! Button input drivers

pub mod gpio;

pub use gpio::GpioButtonBank;
