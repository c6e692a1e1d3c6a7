//! Digital input traits for button levels

/// Button identifier passed to the level reader
pub type ButtonId = u8;

/// Errors that can occur while reading a button level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// The peripheral read failed
    ReadFailed,
    /// No input is wired to this button id
    UnknownButton,
}

/// Raw level reader keyed by button id
///
/// Called once per registered button on every button tick, so
/// implementations must be short and non-blocking. Returns the electrical
/// level (`true` = high); polarity is applied by the button engine.
pub trait LevelReader {
    /// Read the raw level of the input wired to `id`
    fn read_level(&mut self, id: ButtonId) -> Result<bool, InputError>;
}

/// Level reader backed by a plain function or closure
///
/// Useful for boards where the level lookup is a `match` over pins.
pub struct FnLevelReader<F> {
    read: F,
}

impl<F> FnLevelReader<F>
where
    F: FnMut(ButtonId) -> bool,
{
    /// Wrap a level lookup function
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F> LevelReader for FnLevelReader<F>
where
    F: FnMut(ButtonId) -> bool,
{
    fn read_level(&mut self, id: ButtonId) -> Result<bool, InputError> {
        Ok((self.read)(id))
    }
}

impl<T: LevelReader + ?Sized> LevelReader for &mut T {
    fn read_level(&mut self, id: ButtonId) -> Result<bool, InputError> {
        (**self).read_level(id)
    }
}
