//! Per-button debounce and gesture state machine
//!
//! Each button is advanced once per button tick. The raw level is first
//! debounced, then the debounced level drives a five-state machine that
//! recognizes presses, releases, click sequences and long presses.

use super::event::ButtonEvent;
use crate::config::{DEBOUNCE_TICKS, LONG_TICKS, PRESS_REPEAT_MAX, SHORT_TICKS};
use crate::traits::{ButtonId, InputError};

/// Callback invoked synchronously when its event fires
pub type ButtonCallback = fn(&Button);

/// Gesture recognizer states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Released, no sequence in progress
    #[default]
    Idle,
    /// First press of a sequence is held
    Press,
    /// Released, waiting for another press inside the click window
    Release,
    /// A repeated press is held
    Repeat,
    /// Held past the long-press threshold
    LongHold,
}

/// A single button instance
#[derive(Debug, Clone)]
pub struct Button {
    id: ButtonId,
    active_level: bool,
    level: bool,
    debounce_cnt: u8,
    state: ButtonState,
    ticks: u16,
    repeat: u8,
    event: ButtonEvent,
    callbacks: [Option<ButtonCallback>; ButtonEvent::COUNT],
}

impl Button {
    /// Create a released button
    ///
    /// `active_level` is the raw level read while the button is pressed
    /// (`false` for buttons wired to ground with a pull-up).
    pub fn new(id: ButtonId, active_level: bool) -> Self {
        Self {
            id,
            active_level,
            level: !active_level,
            debounce_cnt: 0,
            state: ButtonState::Idle,
            ticks: 0,
            repeat: 0,
            event: ButtonEvent::None,
            callbacks: [None; ButtonEvent::COUNT],
        }
    }

    /// Button identifier
    pub fn id(&self) -> ButtonId {
        self.id
    }

    /// Raw level that means "pressed"
    pub fn active_level(&self) -> bool {
        self.active_level
    }

    /// Committed (debounced) raw level
    pub fn level(&self) -> bool {
        self.level
    }

    /// Current recognizer state
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Event produced by the most recent tick
    pub fn event(&self) -> ButtonEvent {
        self.event
    }

    /// Presses counted in the current sequence
    pub fn repeat_count(&self) -> u8 {
        self.repeat
    }

    /// Ticks spent in the current state phase
    pub fn elapsed_ticks(&self) -> u16 {
        self.ticks
    }

    /// Check if the debounced level is active
    pub fn is_pressed(&self) -> bool {
        self.level == self.active_level
    }

    /// Set or replace the callback for an event kind
    ///
    /// Returns `false` for [`ButtonEvent::None`], which has no slot.
    pub fn attach(&mut self, event: ButtonEvent, callback: ButtonCallback) -> bool {
        match event.index() {
            Some(i) => {
                self.callbacks[i] = Some(callback);
                true
            }
            None => false,
        }
    }

    /// Remove the callback for an event kind
    pub fn detach(&mut self, event: ButtonEvent) -> bool {
        match event.index() {
            Some(i) => {
                self.callbacks[i] = None;
                true
            }
            None => false,
        }
    }

    /// Check if an event kind has a callback
    pub fn has_callback(&self, event: ButtonEvent) -> bool {
        event
            .index()
            .map(|i| self.callbacks[i].is_some())
            .unwrap_or(false)
    }

    /// Return to Idle and clear counters
    ///
    /// The debounced level and callbacks are kept.
    pub fn reset(&mut self) {
        self.state = ButtonState::Idle;
        self.ticks = 0;
        self.repeat = 0;
        self.event = ButtonEvent::None;
        self.debounce_cnt = 0;
    }

    /// Advance by one tick with the raw level read for this button
    ///
    /// A failed read counts as "level unchanged", so a flaky input can only
    /// delay a transition, never fabricate one. Returns the event that
    /// became current.
    pub fn tick(&mut self, raw: Result<bool, InputError>) -> ButtonEvent {
        let raw = raw.unwrap_or(self.level);

        if self.state != ButtonState::Idle {
            self.ticks = self.ticks.saturating_add(1);
        }

        self.debounce(raw);

        self.event = ButtonEvent::None;
        self.step();
        self.event
    }

    fn debounce(&mut self, raw: bool) {
        if raw != self.level {
            self.debounce_cnt += 1;
            if self.debounce_cnt >= DEBOUNCE_TICKS {
                self.level = raw;
                self.debounce_cnt = 0;
            }
        } else {
            self.debounce_cnt = 0;
        }
    }

    fn step(&mut self) {
        let active = self.is_pressed();

        match self.state {
            ButtonState::Idle => {
                if active {
                    self.fire(ButtonEvent::PressDown);
                    self.ticks = 0;
                    self.repeat = 1;
                    self.state = ButtonState::Press;
                }
            }
            ButtonState::Press => {
                if !active {
                    self.fire(ButtonEvent::PressUp);
                    self.ticks = 0;
                    self.state = ButtonState::Release;
                } else if self.ticks > LONG_TICKS {
                    self.fire(ButtonEvent::LongPressStart);
                    self.state = ButtonState::LongHold;
                }
            }
            ButtonState::Release => {
                if active {
                    self.fire(ButtonEvent::PressDown);
                    if self.repeat < PRESS_REPEAT_MAX {
                        self.repeat += 1;
                    }
                    self.fire(ButtonEvent::PressRepeat);
                    self.ticks = 0;
                    self.state = ButtonState::Repeat;
                } else if self.ticks > SHORT_TICKS {
                    match self.repeat {
                        1 => self.fire(ButtonEvent::SingleClick),
                        2 => self.fire(ButtonEvent::DoubleClick),
                        _ => {}
                    }
                    self.state = ButtonState::Idle;
                }
            }
            ButtonState::Repeat => {
                if !active {
                    self.fire(ButtonEvent::PressUp);
                    if self.ticks < SHORT_TICKS {
                        self.ticks = 0;
                        self.state = ButtonState::Release;
                    } else {
                        self.state = ButtonState::Idle;
                    }
                } else if self.ticks > SHORT_TICKS {
                    // Keeps the tick count: the long-press threshold is
                    // measured from this press edge.
                    self.state = ButtonState::Press;
                }
            }
            ButtonState::LongHold => {
                if active {
                    self.fire(ButtonEvent::LongPressHold);
                } else {
                    self.fire(ButtonEvent::PressUp);
                    self.state = ButtonState::Idle;
                }
            }
        }
    }

    fn fire(&mut self, event: ButtonEvent) {
        self.event = event;
        if let Some(callback) = event.index().and_then(|i| self.callbacks[i]) {
            callback(self);
        }
    }
}
