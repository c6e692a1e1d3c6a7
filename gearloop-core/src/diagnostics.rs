//! Diagnostic sample stream
//!
//! Formats one `setpoint,measurement` line per control step for plotting
//! tools on the serial port. Values are printed with two decimals.

use core::fmt::Write;

use heapless::String;

use crate::traits::{DiagnosticError, DiagnosticSink};

/// Capacity of one formatted line
pub const LINE_CAPACITY: usize = 32;

/// One formatted diagnostic line
pub type DiagnosticLine = String<LINE_CAPACITY>;

/// Format a `setpoint,measurement\n` line
pub fn format_sample(setpoint: f32, measurement: f32) -> Result<DiagnosticLine, DiagnosticError> {
    let mut line = DiagnosticLine::new();
    writeln!(line, "{:.2},{:.2}", setpoint, measurement).map_err(|_| DiagnosticError::LineTooLong)?;
    Ok(line)
}

/// Format a sample and write it to `sink`
pub fn report<S: DiagnosticSink>(
    sink: &mut S,
    setpoint: f32,
    measurement: f32,
) -> Result<(), DiagnosticError> {
    let line = format_sample(setpoint, measurement)?;
    sink.write_line(&line)
}
