//! GPIO button bank
//!
//! Maps button ids to input pins so the button engine can read raw levels
//! by id. Pins are read as-is; polarity is applied by the engine.

use embedded_hal::digital::InputPin;
use gearloop_core::button::ButtonError;
use gearloop_core::traits::{ButtonId, InputError, LevelReader};
use heapless::Vec;

/// Fixed set of button input pins
pub struct GpioButtonBank<P, const N: usize> {
    pins: Vec<(ButtonId, P), N>,
}

impl<P: InputPin, const N: usize> GpioButtonBank<P, N> {
    /// Create an empty bank
    pub fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Wire a pin to a button id
    pub fn add(&mut self, id: ButtonId, pin: P) -> Result<(), ButtonError> {
        if self.pins.iter().any(|(existing, _)| *existing == id) {
            return Err(ButtonError::AlreadyRegistered);
        }
        self.pins
            .push((id, pin))
            .map_err(|_| ButtonError::CapacityExceeded)
    }

    /// Number of wired pins
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Check if no pin is wired
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Release the pins
    pub fn release(self) -> Vec<(ButtonId, P), N> {
        self.pins
    }
}

impl<P: InputPin, const N: usize> Default for GpioButtonBank<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: InputPin, const N: usize> LevelReader for GpioButtonBank<P, N> {
    fn read_level(&mut self, id: ButtonId) -> Result<bool, InputError> {
        let (_, pin) = self
            .pins
            .iter_mut()
            .find(|(existing, _)| *existing == id)
            .ok_or(InputError::UnknownButton)?;

        pin.is_high().map_err(|_| InputError::ReadFailed)
    }
}
