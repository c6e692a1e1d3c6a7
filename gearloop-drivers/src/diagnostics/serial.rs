//! Serial diagnostic sink
//!
//! Streams `setpoint,measurement` lines over a UART for host-side plotting.

use gearloop_core::traits::{DiagnosticError, DiagnosticSink};
use gearloop_hal::UartTx;

/// Diagnostic sink writing lines to a UART transmitter
pub struct SerialDiagnostics<U> {
    uart: U,
    /// Emit `\r\n` instead of `\n` for terminal emulators
    crlf: bool,
    lines: u32,
}

impl<U: UartTx> SerialDiagnostics<U> {
    /// Create a sink that writes lines unchanged
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            crlf: false,
            lines: 0,
        }
    }

    /// Create a sink that terminates lines with `\r\n`
    pub fn with_crlf(uart: U) -> Self {
        Self {
            crlf: true,
            ..Self::new(uart)
        }
    }

    /// Lines written successfully
    pub fn lines_written(&self) -> u32 {
        self.lines
    }

    /// Release the UART
    pub fn release(self) -> U {
        self.uart
    }
}

impl<U: UartTx> DiagnosticSink for SerialDiagnostics<U> {
    fn write_line(&mut self, line: &str) -> Result<(), DiagnosticError> {
        let body = line.strip_suffix('\n').unwrap_or(line);
        let terminator: &[u8] = if self.crlf { b"\r\n" } else { b"\n" };

        self.uart
            .write_blocking(body.as_bytes())
            .and_then(|()| self.uart.write_blocking(terminator))
            .and_then(|()| self.uart.flush())
            .map_err(|_| DiagnosticError::WriteFailed)?;

        self.lines = self.lines.wrapping_add(1);
        Ok(())
    }
}
