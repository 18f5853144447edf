//! Inbound commands to a process step.
//!
//! These represent actions requested by the brewer or the host
//! orchestrator that [`ProcessStep::handle_command`](super::step::ProcessStep::handle_command)
//! interprets and acts upon.

/// Commands the host can send into a running step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCommand {
    /// "Start Timer Now" dashboard action: start the countdown if it has
    /// not been started yet.
    StartTimerNow,

    /// Manual retry: stop the timer and reassert the target temperature.
    Reset,

    /// Forced abort / advance: target to zero, pump off.
    Finish,
}
