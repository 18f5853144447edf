//! Outbound step events.
//!
//! The [`ProcessStep`](super::step::ProcessStep) sends [`Notification`]s
//! through the [`NotifyPort`](super::ports::NotifyPort) and reports its
//! [`Lifecycle`] from every tick.

use core::fmt::Write;

use heapless::String;

/// Maximum notification body length in bytes.
pub const BODY_CAPACITY: usize = 64;

/// A user-facing alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub body: String<BODY_CAPACITY>,
    /// Auto-dismiss after this many seconds.  `None` stays until dismissed.
    pub timeout_secs: Option<u32>,
}

impl Notification {
    /// An alert the brewer has to dismiss by hand.  Overlong bodies are
    /// truncated at a character boundary.
    pub fn persistent(title: &'static str, body: &str) -> Self {
        let mut buf = String::new();
        for ch in body.chars() {
            if buf.push(ch).is_err() {
                break;
            }
        }
        Self {
            title,
            body: buf,
            timeout_secs: None,
        }
    }

    /// "Please add <label>".
    pub fn hop_alert(label: &str) -> Self {
        let mut body = String::new();
        if write!(body, "Please add {label}").is_err() {
            body.clear();
            let _ = body.push_str("Please add hops");
        }
        Self {
            title: "Hop Alert",
            body,
            timeout_secs: None,
        }
    }
}

/// How a step reached `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TargetReached,
    TimedOut,
}

/// Step lifecycle.
///
/// ```text
///  Idle ──init()──▶ Running ──[reached / timer done]──▶ Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Completed(Outcome),
}

impl Lifecycle {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed(_))
    }
}
