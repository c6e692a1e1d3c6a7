//! Tick-driven runtime
//!
//! Composes the button engine, the UI event queue, the speed loop and the
//! tick scheduler behind a single [`Runtime::on_tick`] entry point that the
//! board calls from its base timer interrupt.
//!
//! ```ignore
//! let mut runtime: Runtime<_, _, _, 4, 16> =
//!     Runtime::new(engine, speed_loop, SchedulerConfig::default())?;
//! runtime.start_loop(500.0);
//!
//! // Every 5 ms:
//! let outcome = runtime.on_tick();
//! if outcome.measurement.is_some() {
//!     let _ = runtime.report(&mut serial);
//! }
//! ```

use crate::button::{ButtonEngine, ButtonQueue, ButtonReports};
use crate::config::{ConfigError, SchedulerConfig};
use crate::control::{LoopMode, SpeedControlLoop};
use crate::diagnostics;
use crate::scheduler::TickScheduler;
use crate::traits::{
    ActuatorError, DiagnosticError, DiagnosticSink, LevelReader, MotorActuator, PulseCounter,
};

/// Largest accepted difference between the PID sample period and the
/// scheduled control period, in seconds
const PERIOD_TOLERANCE_S: f32 = 1e-6;

/// What happened on one base tick
#[derive(Debug, Clone, Default)]
pub struct TickOutcome<const N: usize> {
    /// Button events produced this tick
    pub buttons: ButtonReports<N>,
    /// Measured speed, if the speed loop stepped this tick
    pub measurement: Option<f32>,
}

/// Button engine, event queue and speed loop on one tick source
pub struct Runtime<R, C, A, const N: usize, const Q: usize> {
    engine: ButtonEngine<R, N>,
    queue: ButtonQueue<Q>,
    speed_loop: SpeedControlLoop<C, A>,
    scheduler: TickScheduler,
    setpoint: f32,
}

impl<R, C, A, const N: usize, const Q: usize> Runtime<R, C, A, N, Q>
where
    R: LevelReader,
    C: PulseCounter,
    A: MotorActuator,
{
    /// Compose a runtime with the speed loop stopped
    ///
    /// The PID sample period must equal the scheduled control period.
    pub fn new(
        engine: ButtonEngine<R, N>,
        speed_loop: SpeedControlLoop<C, A>,
        config: SchedulerConfig,
    ) -> Result<Self, ConfigError> {
        let scheduler = TickScheduler::new(config)?;

        let mismatch = speed_loop.pid().sample_period() - config.control_period_s();
        if mismatch > PERIOD_TOLERANCE_S || mismatch < -PERIOD_TOLERANCE_S {
            warn!(
                "PID sample period does not match control period {} ms",
                config.control_period_ms
            );
            return Err(ConfigError::SamplePeriodMismatch);
        }

        Ok(Self {
            engine,
            queue: ButtonQueue::new(),
            speed_loop,
            scheduler,
            setpoint: 0.0,
        })
    }

    /// Handle one base timer tick
    ///
    /// Advances the button engine and, when due, steps the speed loop.
    /// Button reports are also pushed to the event queue.
    pub fn on_tick(&mut self) -> TickOutcome<N> {
        let due = self.scheduler.tick();
        let mut outcome = TickOutcome::default();

        if due.buttons {
            outcome.buttons = self.engine.advance_all();
            self.queue.push_reports(&outcome.buttons);
        }

        if due.control {
            outcome.measurement = Some(self.speed_loop.step(self.setpoint));
        }

        outcome
    }

    /// Start regulating toward `setpoint`
    pub fn start_loop(&mut self, setpoint: f32) {
        self.setpoint = setpoint;
        self.speed_loop.start();
        self.scheduler.start_control();
    }

    /// Start sampling speed without driving the motor
    pub fn start_monitor(&mut self) -> Result<(), ActuatorError> {
        let result = self.speed_loop.monitor();
        self.scheduler.start_control();
        result
    }

    /// Stop the control tick and the speed loop
    pub fn stop_loop(&mut self) -> Result<(), ActuatorError> {
        self.scheduler.stop_control();
        self.speed_loop.stop()
    }

    /// Change the setpoint used by the next control steps
    pub fn set_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint;
    }

    /// Current setpoint
    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }

    /// Current speed loop mode
    pub fn loop_mode(&self) -> LoopMode {
        self.speed_loop.mode()
    }

    /// Write the current `setpoint,measurement` line to `sink`
    pub fn report<S: DiagnosticSink>(&self, sink: &mut S) -> Result<(), DiagnosticError> {
        diagnostics::report(sink, self.setpoint, self.speed_loop.measured_speed())
    }

    /// Access the button engine
    pub fn engine(&self) -> &ButtonEngine<R, N> {
        &self.engine
    }

    /// Access the button engine mutably
    pub fn engine_mut(&mut self) -> &mut ButtonEngine<R, N> {
        &mut self.engine
    }

    /// Access the UI event queue
    pub fn queue_mut(&mut self) -> &mut ButtonQueue<Q> {
        &mut self.queue
    }

    /// Access the speed loop
    pub fn speed_loop(&self) -> &SpeedControlLoop<C, A> {
        &self.speed_loop
    }

    /// Access the speed loop mutably
    pub fn speed_loop_mut(&mut self) -> &mut SpeedControlLoop<C, A> {
        &mut self.speed_loop
    }

    /// Access the tick scheduler
    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }
}
