//! Button timing constants
//!
//! All thresholds are expressed in button ticks. They are shared by every
//! button instance.

/// Button tick interval in milliseconds
pub const TICK_INTERVAL_MS: u32 = 5;

/// Consecutive ticks a new level must persist before it is committed
pub const DEBOUNCE_TICKS: u8 = 3;

/// Click window: release or re-press gap (200 ms)
pub const SHORT_TICKS: u16 = (200 / TICK_INTERVAL_MS) as u16;

/// Long-press threshold (1000 ms)
pub const LONG_TICKS: u16 = (1000 / TICK_INTERVAL_MS) as u16;

/// Upper bound of the consecutive-press counter
pub const PRESS_REPEAT_MAX: u8 = 15;

/// Maximum registered buttons on the reference board
pub const MAX_BUTTONS: usize = 8;

/// Convert a duration in milliseconds to button ticks (rounding down)
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms / TICK_INTERVAL_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_thresholds() {
        assert_eq!(SHORT_TICKS, 40);
        assert_eq!(LONG_TICKS, 200);
        assert!(DEBOUNCE_TICKS as u16 <= SHORT_TICKS);
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(15), 3);
        assert_eq!(ms_to_ticks(14), 2);
    }
}
