//! Quadrature pulse counter trait

/// Errors that can occur with speed sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Counter register read failed
    ReadFailed,
    /// Counter register reset failed
    ResetFailed,
}

/// Exclusive access to a hardware quadrature counter
///
/// The counter accumulates signed pulses between calls. Reading it also
/// zeroes it, so there must be exactly one owner: the speed estimator takes
/// the counter by value and nothing else may reset the register.
pub trait PulseCounter {
    /// Read the pulses accumulated since the last call and zero the counter
    ///
    /// The value is the raw register interpreted as 16-bit two's
    /// complement, so reverse rotation yields a negative delta.
    fn read_and_reset(&mut self) -> Result<i16, SensorError>;
}
