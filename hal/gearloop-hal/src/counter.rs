//! Hardware counter abstractions
//!
//! A timer configured in quadrature encoder mode counts up or down with
//! each edge of the two encoder channels. The register is 16 bits wide and
//! wraps in both directions.

/// Free-running 16-bit up/down counter register
pub trait CounterRegister {
    /// Error type for register access
    type Error;

    /// Read the raw counter value
    fn count(&mut self) -> Result<u16, Self::Error>;

    /// Overwrite the counter value
    fn set_count(&mut self, value: u16) -> Result<(), Self::Error>;
}

impl<T: CounterRegister + ?Sized> CounterRegister for &mut T {
    type Error = T::Error;

    fn count(&mut self) -> Result<u16, Self::Error> {
        (**self).count()
    }

    fn set_count(&mut self, value: u16) -> Result<(), Self::Error> {
        (**self).set_count(value)
    }
}
