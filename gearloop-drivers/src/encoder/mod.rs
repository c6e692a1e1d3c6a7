//! Speed sensing drivers

pub mod quadrature;

pub use quadrature::TimerEncoder;
