//! Per-phase strategy descriptor.
//!
//! Chill, mash and boil share one orchestration loop.  What differs is
//! captured here as plain data: comparator direction, what reaching the
//! target triggers, how the pump runs, and the notification texts.
//!
//! ```text
//! ┌───────┬───────────┬───────────────┬──────────────────┬──────────────┐
//! │ Phase │ Compare   │ On reached    │ Pump             │ Timer at init│
//! ├───────┼───────────┼───────────────┼──────────────────┼──────────────┤
//! │ Chill │ ≤ target  │ complete      │ on continuously  │ started      │
//! │ Mash  │ ≥ t + ovs │ settle, arm   │ cycled, floor    │ primed       │
//! │ Boil  │ ≥ target  │ arm           │ cycled, ceiling  │ primed       │
//! └───────┴───────────┴───────────────┴──────────────────┴──────────────┘
//! ```

use crate::config::StepConfig;
use crate::control::duty_cycle::Gate;
use crate::control::threshold::Comparator;

/// The brewing phase a step implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Chill,
    Mash,
    Boil,
}

/// Static notification text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub title: &'static str,
    pub body: &'static str,
}

/// What happens the first time the detector reports the target reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReachedAction {
    /// Pump off, notify, complete with `TargetReached`.
    Complete(Message),
    /// If the timer has not been started: optionally move the kettle
    /// setpoint, start the timer, optionally notify.
    ArmTimer {
        settle_target: Option<f32>,
        notice: Option<Message>,
    },
}

/// How the pump is driven while the step runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PumpMode {
    /// On at init, off at completion.
    Continuous,
    /// Work/rest cycling behind a temperature gate; off at init.
    Cycled {
        work_secs: u32,
        rest_secs: u32,
        gate: Gate,
    },
}

/// Everything that distinguishes one phase from another.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseProfile {
    pub kind: PhaseKind,
    pub comparator: Comparator,
    /// Temperature the detector compares against.
    pub threshold: f32,
    /// Kettle setpoint issued by `init()`.
    pub init_target: f32,
    /// Kettle setpoint reasserted by `reset()`.
    pub reset_target: f32,
    pub on_reached: ReachedAction,
    pub pump: PumpMode,
    /// Start the timer in `init()` rather than on reaching the target.
    pub timer_at_init: bool,
    /// Restart the timer in `reset()`.
    pub timer_on_reset: bool,
    /// Sent when the timer expires.
    pub on_expiry: Message,
}

impl PhaseProfile {
    pub fn from_config(config: &StepConfig) -> Self {
        match config {
            StepConfig::Chill(c) => Self {
                kind: PhaseKind::Chill,
                comparator: Comparator::AtMost,
                threshold: c.target_c,
                init_target: c.target_c,
                reset_target: c.target_c,
                on_reached: ReachedAction::Complete(Message {
                    title: "Yeast Pitch Temp Reached!",
                    body: "Move to fermentation tank",
                }),
                pump: PumpMode::Continuous,
                timer_at_init: true,
                timer_on_reset: true,
                on_expiry: Message {
                    title: "Step Temp Wasn't Reached!",
                    body: "Good luck:(",
                },
            },
            StepConfig::Mash(c) => Self {
                kind: PhaseKind::Mash,
                comparator: Comparator::AtLeast,
                threshold: c.target_c + c.overshoot_c,
                init_target: c.target_c + c.overshoot_c,
                reset_target: c.target_c,
                on_reached: ReachedAction::ArmTimer {
                    settle_target: Some(c.target_c),
                    notice: Some(Message {
                        title: "Mash Temp Reached!",
                        body: "Insert Grain",
                    }),
                },
                pump: PumpMode::Cycled {
                    work_secs: c.pump_work_secs,
                    rest_secs: c.pump_rest_secs,
                    gate: Gate::Floor(c.pump_min_temp_c),
                },
                timer_at_init: false,
                timer_on_reset: false,
                on_expiry: Message {
                    title: "Mash Step Completed!",
                    body: "Starting the next step",
                },
            },
            StepConfig::Boil(c) => Self {
                kind: PhaseKind::Boil,
                comparator: Comparator::AtLeast,
                threshold: c.target_c,
                init_target: c.target_c,
                reset_target: c.target_c,
                on_reached: ReachedAction::ArmTimer {
                    settle_target: None,
                    notice: None,
                },
                pump: PumpMode::Cycled {
                    work_secs: c.pump_work_secs,
                    rest_secs: c.pump_rest_secs,
                    gate: Gate::Ceiling(c.pump_max_temp_c),
                },
                timer_at_init: false,
                timer_on_reset: false,
                on_expiry: Message {
                    title: "Boil Step Completed!",
                    body: "Starting the next step",
                },
            },
        }
    }
}
