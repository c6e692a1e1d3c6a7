//! Timer-backed quadrature encoder
//!
//! The timer counts encoder edges in hardware. Each sample reads the
//! register as a signed 16-bit delta and zeroes it, so the count never has
//! time to wrap between samples at the supported speeds.
//!
//! If zeroing fails, the raw value just read becomes the baseline for the
//! next delta so those pulses are not counted twice.

use gearloop_core::traits::{PulseCounter, SensorError};
use gearloop_hal::CounterRegister;

/// Quadrature encoder on a hardware counter
pub struct TimerEncoder<T> {
    timer: T,
    /// Negate deltas for encoders mounted the other way round
    inverted: bool,
    /// Register value already accounted for, non-zero after a failed reset
    baseline: u16,
}

impl<T: CounterRegister> TimerEncoder<T> {
    /// Take ownership of the counter and zero it
    pub fn new(timer: T) -> Result<Self, SensorError> {
        Self::with_inversion(timer, false)
    }

    /// Like [`new`](Self::new), optionally negating every delta
    pub fn with_inversion(mut timer: T, inverted: bool) -> Result<Self, SensorError> {
        timer.set_count(0).map_err(|_| SensorError::ResetFailed)?;
        Ok(Self {
            timer,
            inverted,
            baseline: 0,
        })
    }

    /// Release the counter
    pub fn release(self) -> T {
        self.timer
    }
}

impl<T: CounterRegister> PulseCounter for TimerEncoder<T> {
    fn read_and_reset(&mut self) -> Result<i16, SensorError> {
        let raw = self.timer.count().map_err(|_| SensorError::ReadFailed)?;
        if self.timer.set_count(0).is_err() {
            self.baseline = raw;
            return Err(SensorError::ResetFailed);
        }

        // Two's complement: 0xFFFF is one count backwards
        let delta = raw.wrapping_sub(core::mem::take(&mut self.baseline)) as i16;
        Ok(if self.inverted {
            delta.wrapping_neg()
        } else {
            delta
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock timer register
    struct MockTimer {
        count: u16,
        fail_read: bool,
        fail_write: bool,
    }

    impl MockTimer {
        fn new(count: u16) -> Self {
            Self {
                count,
                fail_read: false,
                fail_write: false,
            }
        }
    }

    impl CounterRegister for MockTimer {
        type Error = ();

        fn count(&mut self) -> Result<u16, Self::Error> {
            if self.fail_read {
                return Err(());
            }
            Ok(self.count)
        }

        fn set_count(&mut self, value: u16) -> Result<(), Self::Error> {
            if self.fail_write {
                return Err(());
            }
            self.count = value;
            Ok(())
        }
    }

    #[test]
    fn test_new_zeroes_counter() {
        let encoder = TimerEncoder::new(MockTimer::new(1234)).unwrap();
        assert_eq!(encoder.release().count, 0);
    }

    #[test]
    fn test_forward_delta() {
        let mut encoder = TimerEncoder::new(MockTimer::new(0)).unwrap();
        encoder.timer.count = 250;

        assert_eq!(encoder.read_and_reset(), Ok(250));
        assert_eq!(encoder.timer.count, 0);
        assert_eq!(encoder.read_and_reset(), Ok(0));
    }

    #[test]
    fn test_reverse_delta_is_negative() {
        let mut encoder = TimerEncoder::new(MockTimer::new(0)).unwrap();
        encoder.timer.count = 0u16.wrapping_sub(10);

        assert_eq!(encoder.read_and_reset(), Ok(-10));
    }

    #[test]
    fn test_inverted() {
        let mut encoder = TimerEncoder::with_inversion(MockTimer::new(0), true).unwrap();
        encoder.timer.count = 40;
        assert_eq!(encoder.read_and_reset(), Ok(-40));

        // i16::MIN has no positive counterpart and stays put
        encoder.timer.count = 0x8000;
        assert_eq!(encoder.read_and_reset(), Ok(i16::MIN));
    }

    #[test]
    fn test_faults() {
        let mut encoder = TimerEncoder::new(MockTimer::new(0)).unwrap();

        encoder.timer.fail_read = true;
        assert_eq!(encoder.read_and_reset(), Err(SensorError::ReadFailed));

        encoder.timer.fail_read = false;
        encoder.timer.fail_write = true;
        assert_eq!(encoder.read_and_reset(), Err(SensorError::ResetFailed));
        encoder.timer.fail_write = false;

        let mut timer = MockTimer::new(5);
        timer.fail_write = true;
        assert_eq!(TimerEncoder::new(timer).err(), Some(SensorError::ResetFailed));
    }

    #[test]
    fn test_failed_reset_not_counted_twice() {
        let mut encoder = TimerEncoder::new(MockTimer::new(0)).unwrap();

        encoder.timer.count = 100;
        encoder.timer.fail_write = true;
        assert_eq!(encoder.read_and_reset(), Err(SensorError::ResetFailed));

        // 100 more pulses over the next period
        encoder.timer.fail_write = false;
        encoder.timer.count = 200;
        assert_eq!(encoder.read_and_reset(), Ok(100));
        assert_eq!(encoder.timer.count, 0);

        encoder.timer.count = 30;
        assert_eq!(encoder.read_and_reset(), Ok(30));
    }

    #[test]
    fn test_failed_reset_across_wrap() {
        let mut encoder = TimerEncoder::with_inversion(MockTimer::new(0), true).unwrap();

        encoder.timer.count = 0xFFF0;
        encoder.timer.fail_write = true;
        assert_eq!(encoder.read_and_reset(), Err(SensorError::ResetFailed));

        // Kept counting backwards past the baseline
        encoder.timer.fail_write = false;
        encoder.timer.count = 0xFFE0;
        assert_eq!(encoder.read_and_reset(), Ok(16));
    }

    #[test]
    fn test_feeds_speed_estimator() {
        use gearloop_core::config::EncoderConfig;
        use gearloop_core::control::SpeedEstimator;

        let encoder = TimerEncoder::new(MockTimer::new(0)).unwrap();
        let mut estimator = SpeedEstimator::new(encoder, EncoderConfig::default()).unwrap();

        estimator.counter_mut().timer.count = 0u16.wrapping_sub(100);
        assert!(estimator.sample(0.1) < 0.0);
    }
}
