//! Pump duty-cycle scheduler.
//!
//! Alternates a binary actuator between a work interval and a rest
//! interval measured from the last toggle.  A temperature gate decides
//! whether cycling may proceed at all; while the gate is closed the pump
//! is held off.
//!
//! ```text
//!          work_secs             rest_secs
//!   ON  ┌──────────────┐                    ┌────────
//!       │              │                    │
//!   OFF ┘              └────────────────────┘
//!       ^ toggle       ^ toggle             ^ toggle
//! ```
//!
//! The scheduler starts in the OFF state, so the first toggle happens after
//! `rest_secs`.

use log::debug;

/// Command for the pump actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpCommand {
    On,
    Off,
}

impl PumpCommand {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Temperature precondition for cycling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Cycle only at or above this temperature (mash).
    Floor(f32),
    /// Cycle only at or below this temperature (boil).
    Ceiling(f32),
}

impl Gate {
    pub fn is_open(self, celsius: f32) -> bool {
        match self {
            Self::Floor(min) => celsius >= min,
            Self::Ceiling(max) => celsius <= max,
        }
    }
}

/// Work/rest alternation state.
///
/// Invariant: the pump is physically on iff `active`.
#[derive(Debug, Clone)]
pub struct DutyCycle {
    work_secs: u64,
    rest_secs: u64,
    active: bool,
    last_toggle: u64,
}

impl DutyCycle {
    /// Create a scheduler that is OFF and whose rest interval starts at `now`.
    pub fn new(work_secs: u32, rest_secs: u32, now: u64) -> Self {
        Self {
            work_secs: u64::from(work_secs),
            rest_secs: u64::from(rest_secs),
            active: false,
            last_toggle: now,
        }
    }

    /// Advance the schedule and record the result as applied.
    ///
    /// Equivalent to [`poll`](Self::poll) followed by
    /// [`commit`](Self::commit).  Use the pair instead when the actuator
    /// write can fail.
    pub fn tick(&mut self, now: u64, gate_open: bool) -> Option<PumpCommand> {
        let cmd = self.poll(now, gate_open);
        if let Some(cmd) = cmd {
            self.commit(now, cmd);
        }
        cmd
    }

    /// Command the schedule wants at `now`, without changing state.
    ///
    /// * gate closed: always `Some(Off)`.
    /// * gate open and the current interval elapsed: the flipped state.
    /// * otherwise `None`; the pump holds its state.
    pub fn poll(&self, now: u64, gate_open: bool) -> Option<PumpCommand> {
        if !gate_open {
            return Some(PumpCommand::Off);
        }

        let interval = if self.active {
            self.work_secs
        } else {
            self.rest_secs
        };

        if now >= self.last_toggle.saturating_add(interval) {
            Some(if self.active {
                PumpCommand::Off
            } else {
                PumpCommand::On
            })
        } else {
            None
        }
    }

    /// Record that `cmd` reached the pump at `now`.  A command that changes
    /// the pump state is a toggle and starts the next interval; a repeat of
    /// the current state changes nothing.
    pub fn commit(&mut self, now: u64, cmd: PumpCommand) {
        if cmd.is_on() == self.active {
            return;
        }
        self.active = cmd.is_on();
        self.last_toggle = now;
        debug!(
            "DutyCycle: pump {} at t={}s",
            if self.active { "on" } else { "off" },
            now
        );
    }

    /// Mark the pump off without waiting for the schedule (step finish).
    pub fn force_off(&mut self, now: u64) {
        self.commit(now, PumpCommand::Off);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_toggle(&self) -> u64 {
        self.last_toggle
    }
}
