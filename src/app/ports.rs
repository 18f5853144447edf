//! Port traits: the hexagonal boundary between step logic and the host.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ProcessStep (domain)
//! ```
//!
//! The host (brewery controller) implements these traits.  The
//! [`ProcessStep`](super::step::ProcessStep) consumes them via generics, so
//! the control core never touches a thermometer, relay or UI directly.
//!
//! Kettle and pump calls can fail; their errors are opaque to the core and
//! abort the current tick.  Timer and notification calls are fire-and-forget.

use super::events::Notification;

// ───────────────────────────────────────────────────────────────
// Kettle port (driven adapter: sensor/heater ↔ domain)
// ───────────────────────────────────────────────────────────────

/// The kettle the step is attached to.
pub trait KettlePort {
    /// Current measured temperature in Celsius.  May be noisy.
    fn read_temperature(&mut self) -> anyhow::Result<f32>;

    /// Ask the kettle's own control loop to drive toward `celsius`.
    /// `0.0` turns heating off.
    fn set_target_temperature(&mut self, celsius: f32) -> anyhow::Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Pump port (driven adapter: domain → actuator)
// ───────────────────────────────────────────────────────────────

/// The circulation pump.  A command takes effect before the next tick.
pub trait PumpPort {
    fn set_pump(&mut self, on: bool) -> anyhow::Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain → host timer display)
// ───────────────────────────────────────────────────────────────

/// Mirrors the step's countdown to the host so it can display it.
///
/// The step's own [`TimerWindow`](crate::timer::TimerWindow) stays the
/// authority on whether the timer has started or finished.
pub trait TimerPort {
    /// The countdown started (or restarted) and ends at `ends_at`.
    fn timer_started(&mut self, duration_secs: u64, ends_at: u64);

    /// The countdown was cancelled.
    fn timer_stopped(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Notify port (driven adapter: domain → user / orchestrator)
// ───────────────────────────────────────────────────────────────

/// User alerts and phase hand-off.
pub trait NotifyPort {
    /// Show an alert.  Delivery is the host's concern.
    fn notify(&mut self, notification: &Notification);

    /// Retire this step and activate the next phase.
    fn advance_to_next_phase(&mut self);
}
