//! Log-based host adapter.
//!
//! Implements [`TimerPort`] and [`NotifyPort`] by writing to the `log`
//! facade.  Useful on a headless controller, and as the default host when
//! a step runs without a dashboard attached.

use log::info;

use crate::app::events::Notification;
use crate::app::ports::{NotifyPort, TimerPort};

/// Adapter that logs timer changes and notifications, and latches phase
/// hand-off requests for the caller to poll.
#[derive(Debug, Default)]
pub struct LogHost {
    ends_at: Option<u64>,
    advance_requested: bool,
}

impl LogHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// End time of the running countdown, as last reported by the step.
    pub fn timer_ends_at(&self) -> Option<u64> {
        self.ends_at
    }

    /// Returns `true` once after the step asked to advance.
    pub fn take_advance(&mut self) -> bool {
        core::mem::take(&mut self.advance_requested)
    }
}

impl TimerPort for LogHost {
    fn timer_started(&mut self, duration_secs: u64, ends_at: u64) {
        self.ends_at = Some(ends_at);
        info!("TIMER | start | duration={}s ends_at={}", duration_secs, ends_at);
    }

    fn timer_stopped(&mut self) {
        self.ends_at = None;
        info!("TIMER | stop");
    }
}

impl NotifyPort for LogHost {
    fn notify(&mut self, notification: &Notification) {
        match notification.timeout_secs {
            Some(secs) => info!(
                "NOTIFY | {} | {} | timeout={}s",
                notification.title, notification.body, secs
            ),
            None => info!(
                "NOTIFY | {} | {} | persistent",
                notification.title, notification.body
            ),
        }
    }

    fn advance_to_next_phase(&mut self) {
        self.advance_requested = true;
        info!("PHASE | advance requested");
    }
}
