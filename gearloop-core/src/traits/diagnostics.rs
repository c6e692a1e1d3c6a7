//! Diagnostic text stream sink

/// Errors that can occur on the diagnostic stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiagnosticError {
    /// Formatted line does not fit the line buffer
    LineTooLong,
    /// Underlying transport write failed
    WriteFailed,
}

/// Output for `setpoint,measurement` lines
///
/// The sink is an optional consumer; the control core never reads back
/// from it.
pub trait DiagnosticSink {
    /// Write one complete line, including its terminator
    fn write_line(&mut self, line: &str) -> Result<(), DiagnosticError>;
}
