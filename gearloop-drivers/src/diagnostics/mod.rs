//! Diagnostic output drivers

pub mod serial;

pub use serial::SerialDiagnostics;
