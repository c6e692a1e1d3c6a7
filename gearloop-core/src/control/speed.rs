//! Encoder speed estimation
//!
//! Converts the pulses counted during one sample interval into output-shaft
//! speed, then smooths it with a first-order exponential filter.

use crate::config::{is_positive, ConfigError, EncoderConfig};
use crate::traits::PulseCounter;

/// Filtered speed estimator
///
/// Owns its pulse counter: sampling reads and zeroes the counter, so no
/// other context may touch the register.
pub struct SpeedEstimator<C> {
    counter: C,
    config: EncoderConfig,
    /// Counts per output revolution, precomputed from the config
    counts_per_rev: f32,
    last_delta: i16,
    speed: f32,
}

impl<C: PulseCounter> SpeedEstimator<C> {
    /// Create an estimator with a zero speed estimate
    pub fn new(counter: C, config: EncoderConfig) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            warn!("Encoder config rejected: {}", e);
            return Err(e);
        }

        Ok(Self {
            counter,
            counts_per_rev: config.counts_per_output_revolution(),
            config,
            last_delta: 0,
            speed: 0.0,
        })
    }

    /// Sample the counter over an interval of `dt` seconds
    ///
    /// Returns the new filtered speed. A failed counter access or a
    /// non-positive `dt` leaves the estimate unchanged.
    pub fn sample(&mut self, dt: f32) -> f32 {
        if !is_positive(dt) {
            warn!("Speed sample with non-positive interval");
            return self.speed;
        }

        match self.counter.read_and_reset() {
            Ok(delta) => self.apply_delta(delta, dt),
            Err(_e) => {
                warn!("Pulse counter fault: {}", _e);
                self.speed
            }
        }
    }

    /// Drop the pulses counted since the previous sample
    ///
    /// Used when sampling (re)starts so pulses counted while nothing was
    /// sampling are not read as one interval.
    pub fn discard_pending(&mut self) {
        match self.counter.read_and_reset() {
            Ok(_delta) => trace!("Discarded {} pending pulses", _delta),
            Err(_e) => warn!("Pulse counter fault while discarding: {}", _e),
        }
    }

    /// Feed a pulse delta measured over `dt` seconds
    fn apply_delta(&mut self, delta: i16, dt: f32) -> f32 {
        self.last_delta = delta;
        let rps = delta as f32 / self.counts_per_rev / dt;
        self.filter(self.config.unit.from_rps(rps))
    }

    /// Blend an unfiltered speed into the estimate
    fn filter(&mut self, raw: f32) -> f32 {
        let alpha = self.config.filter_alpha;
        self.speed = alpha * raw + (1.0 - alpha) * self.speed;
        self.speed
    }

    /// Zero the estimate
    ///
    /// The hardware counter is not touched; pair with
    /// [`discard_pending`](Self::discard_pending) before sampling again.
    pub fn reset(&mut self) {
        self.speed = 0.0;
        self.last_delta = 0;
    }

    /// Current filtered speed
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Pulse delta of the last successful sample
    pub fn last_delta(&self) -> i16 {
        self.last_delta
    }

    /// Encoder configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Access the pulse counter
    pub fn counter_mut(&mut self) -> &mut C {
        &mut self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedUnit;
    use crate::traits::SensorError;

    struct MockCounter {
        pending: i16,
        fail: bool,
        resets: u32,
    }

    impl MockCounter {
        fn new() -> Self {
            Self {
                pending: 0,
                fail: false,
                resets: 0,
            }
        }
    }

    impl PulseCounter for MockCounter {
        fn read_and_reset(&mut self) -> Result<i16, SensorError> {
            if self.fail {
                return Err(SensorError::ReadFailed);
            }
            self.resets += 1;
            Ok(core::mem::take(&mut self.pending))
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        let diff = a - b;
        diff < 1e-3 && diff > -1e-3
    }

    #[test]
    fn test_filter_sequence() {
        let mut est = SpeedEstimator::new(MockCounter::new(), EncoderConfig::default()).unwrap();

        let expected = [3.0, 5.1, 6.57];
        for want in expected {
            assert!(approx(est.filter(10.0), want));
        }
    }

    #[test]
    fn test_delta_to_rpm() {
        let config = EncoderConfig {
            filter_alpha: 1.0,
            ..Default::default()
        };
        let mut est = SpeedEstimator::new(MockCounter::new(), config).unwrap();

        // One output revolution in 0.1 s = 600 rpm
        let counts = config.counts_per_output_revolution();
        est.counter_mut().pending = 194;
        let speed = est.sample(0.1);
        assert!(approx(speed, 194.0 / counts * 600.0));
        assert_eq!(est.last_delta(), 194);
    }

    #[test]
    fn test_rps_unit() {
        let config = EncoderConfig {
            pulses_per_revolution: 10,
            quadrature_multiplier: 1,
            gear_ratio: 1.0,
            unit: SpeedUnit::Rps,
            filter_alpha: 1.0,
        };
        let mut est = SpeedEstimator::new(MockCounter::new(), config).unwrap();

        assert!(approx(est.apply_delta(5, 0.1), 5.0));
    }

    #[test]
    fn test_reverse_is_negative() {
        let mut est = SpeedEstimator::new(MockCounter::new(), EncoderConfig::default()).unwrap();

        // 0xFFF6 read back from the register
        est.counter_mut().pending = -10;
        assert!(est.sample(0.1) < 0.0);
    }

    #[test]
    fn test_counter_reset_each_sample() {
        let mut est = SpeedEstimator::new(MockCounter::new(), EncoderConfig::default()).unwrap();

        est.counter_mut().pending = 50;
        est.sample(0.1);
        est.sample(0.1);
        assert_eq!(est.counter_mut().resets, 2);
        assert_eq!(est.last_delta(), 0);
    }

    #[test]
    fn test_fault_holds_estimate() {
        let mut est = SpeedEstimator::new(MockCounter::new(), EncoderConfig::default()).unwrap();

        est.counter_mut().pending = 100;
        let before = est.sample(0.1);
        est.counter_mut().fail = true;
        assert_eq!(est.sample(0.1), before);
        assert_eq!(est.speed(), before);
    }

    #[test]
    fn test_zero_interval_holds_estimate() {
        let mut est = SpeedEstimator::new(MockCounter::new(), EncoderConfig::default()).unwrap();

        est.counter_mut().pending = 100;
        assert_eq!(est.sample(0.0), 0.0);
        // Counter left untouched
        assert_eq!(est.counter_mut().pending, 100);
    }

    #[test]
    fn test_reset() {
        let mut est = SpeedEstimator::new(MockCounter::new(), EncoderConfig::default()).unwrap();

        est.counter_mut().pending = 100;
        est.sample(0.1);
        est.reset();
        assert_eq!(est.speed(), 0.0);
        assert_eq!(est.last_delta(), 0);
    }

    #[test]
    fn test_discard_pending() {
        let mut est = SpeedEstimator::new(MockCounter::new(), EncoderConfig::default()).unwrap();

        est.counter_mut().pending = 3000;
        est.discard_pending();
        assert_eq!(est.counter_mut().pending, 0);
        assert_eq!(est.speed(), 0.0);
        assert_eq!(est.sample(0.1), 0.0);

        // A counter fault leaves the estimate alone
        est.counter_mut().fail = true;
        est.discard_pending();
        assert_eq!(est.speed(), 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EncoderConfig {
            filter_alpha: 0.0,
            ..Default::default()
        };
        assert_eq!(
            SpeedEstimator::new(MockCounter::new(), config).err(),
            Some(ConfigError::InvalidFilterCoefficient)
        );
    }
}
