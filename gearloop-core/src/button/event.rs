//! Button events

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events produced by a button on a tick
///
/// The first seven kinds can carry a callback; `None` marks a tick on which
/// nothing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ButtonEvent {
    /// Debounced level became active
    PressDown,
    /// Debounced level became inactive
    PressUp,
    /// Another press started inside the click window
    PressRepeat,
    /// One press-release, then the click window expired
    SingleClick,
    /// Two press-releases, then the click window expired
    DoubleClick,
    /// Held past the long-press threshold
    LongPressStart,
    /// Still held after a long press started (every tick)
    LongPressHold,
    /// Nothing happened this tick
    #[default]
    None,
}

impl ButtonEvent {
    /// Number of event kinds that can carry a callback
    pub const COUNT: usize = 7;

    /// Callback slot index, or `None` for [`ButtonEvent::None`]
    pub fn index(self) -> Option<usize> {
        match self {
            ButtonEvent::PressDown => Some(0),
            ButtonEvent::PressUp => Some(1),
            ButtonEvent::PressRepeat => Some(2),
            ButtonEvent::SingleClick => Some(3),
            ButtonEvent::DoubleClick => Some(4),
            ButtonEvent::LongPressStart => Some(5),
            ButtonEvent::LongPressHold => Some(6),
            ButtonEvent::None => None,
        }
    }

    /// Event for a callback slot index
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ButtonEvent::PressDown),
            1 => Some(ButtonEvent::PressUp),
            2 => Some(ButtonEvent::PressRepeat),
            3 => Some(ButtonEvent::SingleClick),
            4 => Some(ButtonEvent::DoubleClick),
            5 => Some(ButtonEvent::LongPressStart),
            6 => Some(ButtonEvent::LongPressHold),
            _ => None,
        }
    }

    /// Check if this is a completed click gesture
    pub fn is_click(&self) -> bool {
        matches!(self, ButtonEvent::SingleClick | ButtonEvent::DoubleClick)
    }

    /// Check if this event belongs to a long press
    pub fn is_long_press(&self) -> bool {
        matches!(
            self,
            ButtonEvent::LongPressStart | ButtonEvent::LongPressHold
        )
    }

    /// Check if this is a raw level edge
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            ButtonEvent::PressDown | ButtonEvent::PressUp | ButtonEvent::PressRepeat
        )
    }

    /// Check if anything happened
    pub fn is_some(&self) -> bool {
        *self != ButtonEvent::None
    }
}

/// Set of event kinds, used to filter what reaches the UI queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventMask(u8);

impl EventMask {
    /// No events
    pub const NONE: Self = Self(0);
    /// Every event kind except `None`
    pub const ALL: Self = Self((1 << ButtonEvent::COUNT) - 1);

    /// Completed click gestures only
    pub const fn clicks() -> Self {
        Self((1 << 3) | (1 << 4))
    }

    /// Add an event kind
    pub fn with(self, event: ButtonEvent) -> Self {
        match event.index() {
            Some(i) => Self(self.0 | (1 << i)),
            None => self,
        }
    }

    /// Check if an event kind is in the set
    pub fn contains(&self, event: ButtonEvent) -> bool {
        match event.index() {
            Some(i) => self.0 & (1 << i) != 0,
            None => false,
        }
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::ALL
    }
}
