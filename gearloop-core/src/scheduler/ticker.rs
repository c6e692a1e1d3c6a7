//! Tick rate division
//!
//! The board has one periodic timer interrupt. The button engine and the
//! speed loop run at their own rates, derived here by counting base ticks.

use crate::config::{ConfigError, SchedulerConfig};

/// Fires once every `period` base ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RateDivider {
    period: u32,
    count: u32,
}

impl RateDivider {
    /// Create a divider; a period of zero is treated as one
    pub const fn new(period: u32) -> Self {
        Self {
            period: if period == 0 { 1 } else { period },
            count: 0,
        }
    }

    /// Count one base tick and report whether the divided tick is due
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }

    /// Restart the count so the next due tick is a full period away
    pub fn restart(&mut self) {
        self.count = 0;
    }

    /// Divider period in base ticks
    pub fn period(&self) -> u32 {
        self.period
    }
}

/// Work due on one base tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickDue {
    /// Advance the button engine
    pub buttons: bool,
    /// Run one speed loop step
    pub control: bool,
}

/// Derives the button and control rates from the base tick
///
/// The control rate can be stopped and restarted independently; the button
/// rate always runs.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    config: SchedulerConfig,
    buttons: RateDivider,
    control: RateDivider,
    control_enabled: bool,
    ticks: u32,
}

impl TickScheduler {
    /// Create a scheduler with the control rate stopped
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let base = config.base_tick_ms;
        Ok(Self {
            config,
            buttons: RateDivider::new(config.button_period_ms / base),
            control: RateDivider::new(config.control_period_ms / base),
            control_enabled: false,
            ticks: 0,
        })
    }

    /// Count one base tick
    pub fn tick(&mut self) -> TickDue {
        self.ticks = self.ticks.wrapping_add(1);

        let buttons = self.buttons.tick();
        let control = self.control_enabled && self.control.tick();
        TickDue { buttons, control }
    }

    /// Start the control rate; the first step is one full period away
    pub fn start_control(&mut self) {
        self.control.restart();
        self.control_enabled = true;
    }

    /// Stop the control rate
    pub fn stop_control(&mut self) {
        self.control_enabled = false;
    }

    /// Check if the control rate is running
    pub fn control_enabled(&self) -> bool {
        self.control_enabled
    }

    /// Base ticks counted since creation (wrapping)
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Elapsed time in milliseconds (wrapping)
    pub fn elapsed_ms(&self) -> u32 {
        self.ticks.wrapping_mul(self.config.base_tick_ms)
    }

    /// Scheduler configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
