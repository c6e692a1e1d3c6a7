//! Button engine
//!
//! Owns a fixed number of button slots and advances every registered
//! button once per button tick. Registration hands out a stable
//! [`ButtonHandle`] (the slot index), so callers never hold references into
//! the engine.
//!
//! # Usage
//!
//! ```
//! use gearloop_core::button::{ButtonEngine, ButtonEvent};
//! use gearloop_core::traits::FnLevelReader;
//!
//! // Pull-up buttons read low while pressed
//! let reader = FnLevelReader::new(|_id| true);
//! let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(reader);
//! let select = engine.register(1, false).unwrap();
//!
//! // In the 5 ms timer interrupt:
//! for report in engine.advance_all() {
//!     if report.event == ButtonEvent::SingleClick {
//!         // ...
//!     }
//! }
//! assert_eq!(engine.current_event(select), Ok(ButtonEvent::None));
//! ```

use heapless::Vec;

use super::event::ButtonEvent;
use super::machine::{Button, ButtonCallback};
use crate::traits::{ButtonId, LevelReader};

/// Stable reference to a registered button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonHandle(usize);

impl ButtonHandle {
    /// Slot index in the engine
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Errors from button registration and lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonError {
    /// A button with this id is already registered
    AlreadyRegistered,
    /// Every slot is in use
    CapacityExceeded,
    /// Handle does not refer to a registered button
    UnknownHandle,
    /// Event kind has no callback slot
    InvalidEvent,
}

/// Event produced by one button on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonReport {
    /// Handle of the button
    pub handle: ButtonHandle,
    /// Button identifier
    pub id: ButtonId,
    /// Event that fired
    pub event: ButtonEvent,
}

/// Events produced by one call to [`ButtonEngine::advance_all`]
pub type ButtonReports<const N: usize> = Vec<ButtonReport, N>;

/// Fixed-capacity button engine
pub struct ButtonEngine<R, const N: usize> {
    reader: R,
    slots: [Option<Button>; N],
}

impl<R: LevelReader, const N: usize> ButtonEngine<R, N> {
    /// Create an engine with all slots free
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Register a button and return its handle
    ///
    /// `active_level` is the raw level read while the button is pressed.
    /// Call during initialization only.
    pub fn register(&mut self, id: ButtonId, active_level: bool) -> Result<ButtonHandle, ButtonError> {
        if self.find(id).is_some() {
            warn!("Button {} already registered", id);
            return Err(ButtonError::AlreadyRegistered);
        }

        let index = self
            .slots
            .iter()
            .position(|slot| slot.is_none())
            .ok_or(ButtonError::CapacityExceeded)?;

        self.slots[index] = Some(Button::new(id, active_level));
        debug!("Button {} registered in slot {}", id, index);
        Ok(ButtonHandle(index))
    }

    /// Remove a button from the engine
    ///
    /// Its slot may be reused by a later registration.
    pub fn unregister(&mut self, handle: ButtonHandle) -> Result<Button, ButtonError> {
        let button = self
            .slots
            .get_mut(handle.index())
            .and_then(Option::take)
            .ok_or(ButtonError::UnknownHandle)?;
        debug!("Button {} unregistered", button.id());
        Ok(button)
    }

    /// Look up the handle of a registered button id
    pub fn find(&self, id: ButtonId) -> Option<ButtonHandle> {
        self.slots.iter().enumerate().find_map(|(i, slot)| match slot {
            Some(button) if button.id() == id => Some(ButtonHandle(i)),
            _ => None,
        })
    }

    /// Attach a callback to an event kind
    pub fn attach(
        &mut self,
        handle: ButtonHandle,
        event: ButtonEvent,
        callback: ButtonCallback,
    ) -> Result<(), ButtonError> {
        let button = self.get_mut(handle)?;
        if button.attach(event, callback) {
            Ok(())
        } else {
            Err(ButtonError::InvalidEvent)
        }
    }

    /// Attach a callback by raw event index
    ///
    /// Indices at or above [`ButtonEvent::COUNT`] are rejected.
    pub fn attach_index(
        &mut self,
        handle: ButtonHandle,
        index: usize,
        callback: ButtonCallback,
    ) -> Result<(), ButtonError> {
        let event = ButtonEvent::from_index(index).ok_or(ButtonError::InvalidEvent)?;
        self.attach(handle, event, callback)
    }

    /// Remove the callback for an event kind
    pub fn detach(&mut self, handle: ButtonHandle, event: ButtonEvent) -> Result<(), ButtonError> {
        let button = self.get_mut(handle)?;
        if button.detach(event) {
            Ok(())
        } else {
            Err(ButtonError::InvalidEvent)
        }
    }

    /// Advance every registered button by one tick
    ///
    /// Callbacks run synchronously, in slot order, before this returns.
    /// The returned list holds one report per button whose current event
    /// is not [`ButtonEvent::None`].
    pub fn advance_all(&mut self) -> ButtonReports<N> {
        let mut reports = ButtonReports::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(button) = slot else {
                continue;
            };

            let raw = self.reader.read_level(button.id());
            if raw.is_err() {
                warn!("Button {} read failed", button.id());
            }

            let event = button.tick(raw);
            if event.is_some() {
                trace!("Button {}: {}", button.id(), event);
                // One report per slot, so this cannot exceed N
                let _ = reports.push(ButtonReport {
                    handle: ButtonHandle(index),
                    id: button.id(),
                    event,
                });
            }
        }

        reports
    }

    /// Event produced by the most recent tick for a button
    pub fn current_event(&self, handle: ButtonHandle) -> Result<ButtonEvent, ButtonError> {
        self.get(handle).map(Button::event)
    }

    /// Event produced by the most recent tick for a button id
    pub fn current_event_for(&self, id: ButtonId) -> Option<ButtonEvent> {
        self.find(id)
            .and_then(|handle| self.current_event(handle).ok())
    }

    /// Get a registered button
    pub fn get(&self, handle: ButtonHandle) -> Result<&Button, ButtonError> {
        self.slots
            .get(handle.index())
            .and_then(Option::as_ref)
            .ok_or(ButtonError::UnknownHandle)
    }

    /// Get a registered button mutably
    pub fn get_mut(&mut self, handle: ButtonHandle) -> Result<&mut Button, ButtonError> {
        self.slots
            .get_mut(handle.index())
            .and_then(Option::as_mut)
            .ok_or(ButtonError::UnknownHandle)
    }

    /// Return a button to Idle
    pub fn reset(&mut self, handle: ButtonHandle) -> Result<(), ButtonError> {
        self.get_mut(handle).map(Button::reset)
    }

    /// Number of registered buttons
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if no button is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over registered buttons with their handles
    pub fn iter(&self) -> impl Iterator<Item = (ButtonHandle, &Button)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|b| (ButtonHandle(i), b)))
    }

    /// Access the level reader
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SHORT_TICKS;
    use crate::traits::InputError;
    use core::sync::atomic::{AtomicU32, Ordering};

    /// Level table indexed by button id; pull-up wiring, so `true` = released
    struct MockLevels {
        levels: [bool; 8],
        fail: bool,
    }

    impl MockLevels {
        fn released() -> Self {
            Self {
                levels: [true; 8],
                fail: false,
            }
        }
    }

    impl LevelReader for MockLevels {
        fn read_level(&mut self, id: ButtonId) -> Result<bool, InputError> {
            if self.fail {
                return Err(InputError::ReadFailed);
            }
            self.levels
                .get(id as usize)
                .copied()
                .ok_or(InputError::UnknownButton)
        }
    }

    fn run(engine: &mut ButtonEngine<MockLevels, 4>, ticks: u32, counts: &mut [u32; 8]) {
        for _ in 0..ticks {
            for report in engine.advance_all() {
                counts[report.event.index().unwrap_or(7)] += 1;
            }
        }
    }

    #[test]
    fn test_register_and_find() {
        let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(MockLevels::released());

        let a = engine.register(1, false).unwrap();
        let b = engine.register(2, false).unwrap();
        assert_ne!(a, b);
        assert_eq!(engine.find(2), Some(b));
        assert_eq!(engine.find(3), None);
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(MockLevels::released());
        engine.register(1, false).unwrap();
        assert_eq!(engine.register(1, true), Err(ButtonError::AlreadyRegistered));
    }

    #[test]
    fn test_capacity() {
        let mut engine: ButtonEngine<_, 2> = ButtonEngine::new(MockLevels::released());
        engine.register(1, false).unwrap();
        let second = engine.register(2, false).unwrap();
        assert_eq!(engine.register(3, false), Err(ButtonError::CapacityExceeded));

        // Freed slots are reused
        engine.unregister(second).unwrap();
        assert_eq!(engine.register(3, false), Ok(second));
    }

    #[test]
    fn test_unregister_invalidates_handle() {
        let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(MockLevels::released());
        let handle = engine.register(1, false).unwrap();

        let button = engine.unregister(handle).unwrap();
        assert_eq!(button.id(), 1);
        assert_eq!(engine.current_event(handle), Err(ButtonError::UnknownHandle));
        assert_eq!(engine.unregister(handle).unwrap_err(), ButtonError::UnknownHandle);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_invalid_event_index() {
        fn noop(_: &Button) {}

        let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(MockLevels::released());
        let handle = engine.register(1, false).unwrap();

        assert_eq!(engine.attach_index(handle, 3, noop), Ok(()));
        assert_eq!(
            engine.attach_index(handle, ButtonEvent::COUNT, noop),
            Err(ButtonError::InvalidEvent)
        );
        assert_eq!(
            engine.attach(handle, ButtonEvent::None, noop),
            Err(ButtonError::InvalidEvent)
        );
        assert_eq!(engine.detach(handle, ButtonEvent::SingleClick), Ok(()));
    }

    #[test]
    fn test_advance_reports_events() {
        let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(MockLevels::released());
        let a = engine.register(1, false).unwrap();
        let b = engine.register(2, false).unwrap();

        engine.reader_mut().levels[1] = false;
        let mut counts = [0u32; 8];
        run(&mut engine, 10, &mut counts);
        assert_eq!(counts[ButtonEvent::PressDown.index().unwrap()], 1);
        assert_eq!(engine.get(a).unwrap().repeat_count(), 1);
        assert_eq!(engine.current_event_for(2), Some(ButtonEvent::None));
        assert_eq!(engine.current_event_for(9), None);
        assert!(!engine.get(b).unwrap().is_pressed());

        engine.reader_mut().levels[1] = true;
        run(&mut engine, SHORT_TICKS as u32 + 10, &mut counts);
        assert_eq!(counts[ButtonEvent::SingleClick.index().unwrap()], 1);
        assert_eq!(engine.current_event(a), Ok(ButtonEvent::None));
    }

    #[test]
    fn test_read_failure_is_not_a_press() {
        let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(MockLevels::released());
        let handle = engine.register(1, false).unwrap();

        engine.reader_mut().fail = true;
        let mut counts = [0u32; 8];
        run(&mut engine, 20, &mut counts);
        assert_eq!(counts.iter().sum::<u32>(), 0);
        assert!(!engine.get(handle).unwrap().is_pressed());
    }

    #[test]
    fn test_unknown_button_reads_hold_level() {
        let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(MockLevels::released());
        engine.register(42, false).unwrap();

        let reports = engine.advance_all();
        assert!(reports.is_empty());
    }

    static CLICKS: AtomicU32 = AtomicU32::new(0);

    fn on_click(button: &Button) {
        assert_eq!(button.event(), ButtonEvent::SingleClick);
        CLICKS.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn test_callback_runs_before_return() {
        let mut engine: ButtonEngine<_, 4> = ButtonEngine::new(MockLevels::released());
        let handle = engine.register(3, false).unwrap();
        engine.attach(handle, ButtonEvent::SingleClick, on_click).unwrap();

        engine.reader_mut().levels[3] = false;
        let mut counts = [0u32; 8];
        run(&mut engine, 8, &mut counts);
        engine.reader_mut().levels[3] = true;

        let mut seen = false;
        for _ in 0..SHORT_TICKS + 10 {
            let reports = engine.advance_all();
            if reports.iter().any(|r| r.event == ButtonEvent::SingleClick) {
                assert_eq!(CLICKS.load(Ordering::Relaxed), 1);
                seen = true;
            }
        }
        assert!(seen);
    }
}
