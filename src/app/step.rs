//! Process step composition root.
//!
//! [`ProcessStep`] owns one phase's detector, duty cycle, timer and hop
//! alerts, and drives them from a single polling entry point.  All I/O
//! flows through port traits passed in at call sites, so a step is
//! testable with mock adapters and a hand-cranked clock.
//!
//! ```text
//!  KettlePort ──▶ ┌──────────────────────────────┐ ──▶ NotifyPort
//!                 │         ProcessStep          │
//!   PumpPort ◀──  │ Detector · DutyCycle · Hops  │ ──▶ TimerPort
//!                 └──────────────────────────────┘
//! ```
//!
//! Each tick:
//! 1. read the kettle once;
//! 2. run the duty cycle and apply its command;
//! 3. run the detector and, on reach, the phase's reached action;
//! 4. fire due hop alerts;
//! 5. complete if the timer has expired.

use anyhow::Context;
use log::{info, warn};

use crate::config::StepConfig;
use crate::control::duty_cycle::DutyCycle;
use crate::control::threshold::ThresholdDetector;
use crate::error::ConfigError;
use crate::scheduler::WindowedScheduler;
use crate::timer::{TimerState, TimerWindow};

use super::commands::StepCommand;
use super::events::{Lifecycle, Notification, Outcome};
use super::ports::{KettlePort, NotifyPort, PumpPort, TimerPort};
use super::profile::{Message, PhaseKind, PhaseProfile, PumpMode, ReachedAction};

/// Kettle setpoint that turns heating off.
pub const TARGET_OFF: f32 = 0.0;

/// One brewing phase.
pub struct ProcessStep {
    config: StepConfig,
    profile: PhaseProfile,
    lifecycle: Lifecycle,
    detector: ThresholdDetector,
    duty_cycle: Option<DutyCycle>,
    timer: TimerWindow,
    hops: WindowedScheduler,
    /// The detector has reported the target reached during this run.
    reached: bool,
    /// Set by [`finish`](Self::finish).  Every later init, tick and
    /// command except `finish` itself is a no-op.
    finished: bool,
}

impl ProcessStep {
    /// Validate `config` and build an idle step.
    pub fn new(config: StepConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let profile = PhaseProfile::from_config(&config);
        let samples = match &config {
            StepConfig::Chill(c) => c.samples,
            StepConfig::Mash(c) => c.samples,
            StepConfig::Boil(c) => c.samples,
        };
        Ok(Self {
            detector: ThresholdDetector::new(samples),
            duty_cycle: None,
            timer: TimerWindow::new(config.timer_secs()),
            hops: Self::fresh_hops(&config),
            profile,
            config,
            lifecycle: Lifecycle::Idle,
            reached: false,
            finished: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Set the kettle target, put the pump in its starting state and start
    /// or prime the timer.  Idle → Running.
    pub fn init(
        &mut self,
        now: u64,
        hw: &mut (impl KettlePort + PumpPort),
        host: &mut impl TimerPort,
    ) -> anyhow::Result<()> {
        if self.finished || self.lifecycle != Lifecycle::Idle {
            warn!("{:?}: init ignored, step is {:?}", self.kind(), self.lifecycle);
            return Ok(());
        }

        hw.set_target_temperature(self.profile.init_target)
            .context("setting initial target temperature")?;

        match self.profile.pump {
            PumpMode::Continuous => {
                hw.set_pump(true).context("starting pump")?;
            }
            PumpMode::Cycled {
                work_secs,
                rest_secs,
                ..
            } => {
                hw.set_pump(false).context("stopping pump")?;
                self.duty_cycle = Some(DutyCycle::new(work_secs, rest_secs, now));
            }
        }

        if self.profile.timer_at_init {
            self.start_timer(now, host);
        }

        self.lifecycle = Lifecycle::Running;
        info!(
            "{:?}: started, target {:.1}\u{00b0}C",
            self.kind(),
            self.profile.init_target
        );
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle.  Does nothing unless the step is running
    /// and has not been finished.
    ///
    /// A failing kettle or pump call aborts the tick at that call without
    /// recording the failed command; the next poll is the retry.
    pub fn tick(
        &mut self,
        now: u64,
        hw: &mut (impl KettlePort + PumpPort),
        host: &mut (impl TimerPort + NotifyPort),
    ) -> anyhow::Result<Lifecycle> {
        if self.finished || self.lifecycle != Lifecycle::Running {
            return Ok(self.lifecycle);
        }

        let celsius = hw
            .read_temperature()
            .context("reading kettle temperature")?;

        // 1. Pump duty cycle
        if let (Some(dc), PumpMode::Cycled { gate, .. }) = (&mut self.duty_cycle, self.profile.pump)
        {
            if let Some(cmd) = dc.poll(now, gate.is_open(celsius)) {
                hw.set_pump(cmd.is_on()).context("switching pump")?;
                dc.commit(now, cmd);
            }
        }

        // 2. Debounced target detection
        if self
            .detector
            .observe(celsius, self.profile.comparator, self.profile.threshold)
        {
            self.on_target_reached(now, celsius, hw, host)?;
            if self.lifecycle.is_completed() {
                return Ok(self.lifecycle);
            }
        }

        // 3. Hop alerts
        for label in self.hops.tick(now, &self.timer) {
            host.notify(&Notification::hop_alert(&label));
        }

        // 4. Timer expiry
        if self.timer.state(now) == TimerState::Finished {
            let outcome = if self.reached {
                Outcome::TargetReached
            } else {
                Outcome::TimedOut
            };
            let msg = self.profile.on_expiry;
            self.complete(now, outcome, msg, hw, host)?;
        }

        Ok(self.lifecycle)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a host command.  After `finish`, only `Finish` has an effect.
    pub fn handle_command(
        &mut self,
        cmd: StepCommand,
        now: u64,
        hw: &mut (impl KettlePort + PumpPort),
        host: &mut impl TimerPort,
    ) -> anyhow::Result<()> {
        match cmd {
            StepCommand::StartTimerNow => {
                self.start_timer_now(now, host);
                Ok(())
            }
            StepCommand::Reset => self.reset(now, hw, host),
            StepCommand::Finish => self.finish(now, hw),
        }
    }

    /// Start the countdown if it has never been started and the step has
    /// not been finished.
    pub fn start_timer_now(&mut self, now: u64, host: &mut impl TimerPort) {
        if !self.finished && self.timer.state(now) == TimerState::NotStarted {
            self.start_timer(now, host);
        }
    }

    /// Stop the timer, reassert the target and re-arm the hop alerts.
    /// The lifecycle state is left as it is.
    ///
    /// The detector streak is carried over, not cleared, so a restarted
    /// phase may reach its target on fewer fresh samples.
    pub fn reset(
        &mut self,
        now: u64,
        hw: &mut impl KettlePort,
        host: &mut impl TimerPort,
    ) -> anyhow::Result<()> {
        if self.finished {
            warn!("{:?}: reset ignored, step was finished", self.kind());
            return Ok(());
        }
        self.timer.stop();
        host.timer_stopped();
        hw.set_target_temperature(self.profile.reset_target)
            .context("reasserting target temperature")?;

        self.hops = Self::fresh_hops(&self.config);
        self.reached = false;
        if self.profile.timer_on_reset {
            self.start_timer(now, host);
        }
        info!(
            "{:?}: reset, target {:.1}\u{00b0}C, streak kept at {}",
            self.kind(),
            self.profile.reset_target,
            self.detector.current_streak()
        );
        Ok(())
    }

    /// Force-terminate: target to zero and pump off, from any state.
    /// Idempotent.  The lifecycle value is left as it is, but the step
    /// stops acting on ticks and commands.
    ///
    /// Both commands are attempted even if the first fails; the first
    /// error is returned.
    pub fn finish(&mut self, now: u64, hw: &mut (impl KettlePort + PumpPort)) -> anyhow::Result<()> {
        let target = hw
            .set_target_temperature(TARGET_OFF)
            .context("turning kettle target off");
        let pump = hw.set_pump(false).context("stopping pump");
        if let (Ok(()), Some(dc)) = (&pump, &mut self.duty_cycle) {
            dc.force_off(now);
        }
        self.finished = true;

        match target.and(pump) {
            Ok(()) => {
                info!("{:?}: finished, kettle and pump off", self.kind());
                Ok(())
            }
            Err(e) => {
                warn!("{:?}: finish incomplete: {:#}", self.kind(), e);
                Err(e)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn kind(&self) -> PhaseKind {
        self.profile.kind
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// `finish()` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn timer(&self) -> &TimerWindow {
        &self.timer
    }

    pub fn timer_state(&self, now: u64) -> TimerState {
        self.timer.state(now)
    }

    pub fn detector(&self) -> &ThresholdDetector {
        &self.detector
    }

    pub fn duty_cycle(&self) -> Option<&DutyCycle> {
        self.duty_cycle.as_ref()
    }

    pub fn hop_alerts(&self) -> &WindowedScheduler {
        &self.hops
    }

    pub fn profile(&self) -> &PhaseProfile {
        &self.profile
    }

    // ── Internal ──────────────────────────────────────────────

    fn fresh_hops(config: &StepConfig) -> WindowedScheduler {
        match config {
            StepConfig::Boil(c) => WindowedScheduler::from_hop_alerts(&c.hop_alerts),
            _ => WindowedScheduler::new(),
        }
    }

    fn start_timer(&mut self, now: u64, host: &mut impl TimerPort) {
        let ends_at = self.timer.start(now);
        host.timer_started(self.timer.total_secs(), ends_at);
        info!(
            "{:?}: timer started, {}s, ends at t={}s",
            self.kind(),
            self.timer.total_secs(),
            ends_at
        );
    }

    fn on_target_reached(
        &mut self,
        now: u64,
        celsius: f32,
        hw: &mut (impl KettlePort + PumpPort),
        host: &mut (impl TimerPort + NotifyPort),
    ) -> anyhow::Result<()> {
        if !self.reached {
            info!(
                "{:?}: target {:.1}\u{00b0}C reached at {:.1}\u{00b0}C",
                self.kind(),
                self.profile.threshold,
                celsius
            );
        }

        match self.profile.on_reached {
            ReachedAction::Complete(msg) => {
                self.reached = true;
                self.complete(now, Outcome::TargetReached, msg, hw, host)
            }
            ReachedAction::ArmTimer {
                settle_target,
                notice,
            } => {
                self.reached = true;
                if self.timer.state(now) != TimerState::NotStarted {
                    return Ok(());
                }
                if let Some(target) = settle_target {
                    hw.set_target_temperature(target)
                        .context("settling target temperature")?;
                }
                self.start_timer(now, host);
                if let Some(msg) = notice {
                    host.notify(&Notification::persistent(msg.title, msg.body));
                }
                Ok(())
            }
        }
    }

    /// Pump off, notify once, mark completed, hand off to the host.
    fn complete(
        &mut self,
        now: u64,
        outcome: Outcome,
        msg: Message,
        hw: &mut impl PumpPort,
        host: &mut impl NotifyPort,
    ) -> anyhow::Result<()> {
        hw.set_pump(false).context("stopping pump at completion")?;
        if let Some(dc) = &mut self.duty_cycle {
            dc.force_off(now);
        }
        host.notify(&Notification::persistent(msg.title, msg.body));
        self.lifecycle = Lifecycle::Completed(outcome);

        match outcome {
            Outcome::TargetReached => info!("{:?}: completed ({:?})", self.kind(), outcome),
            Outcome::TimedOut => warn!("{:?}: completed ({:?})", self.kind(), outcome),
        }
        host.advance_to_next_phase();
        Ok(())
    }
}
