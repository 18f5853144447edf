//! Windowed one-shot event scheduler.
//!
//! Fires named events at fixed offsets measured backward from the end of
//! a [`TimerWindow`].  Used by the boil step for hop-addition alerts.
//!
//! ```text
//!  start                                                  end_at
//!    │◀──────────────────── total_secs ────────────────────▶│
//!    │                 │◀──────── offset_before_end ───────▶│
//!    │                 ▲
//!    │            event fires on the first tick at or after here
//! ```
//!
//! Each event fires exactly once.  The scheduler does nothing unless the
//! timer is running, and it never re-arms itself: a step that restarts its
//! timer builds a fresh scheduler.

use core::fmt::Write;

use heapless::{String, Vec};
use log::{info, warn};

use crate::config::{HOP_LABEL_CAPACITY, HopAlert, MAX_HOP_ALERTS};
use crate::timer::{TimerState, TimerWindow};

// ═══════════════════════════════════════════════════════════════
//  Event types
// ═══════════════════════════════════════════════════════════════

/// Fixed-capacity event label.
pub type Label = String<HOP_LABEL_CAPACITY>;

/// Labels fired by a single tick.
pub type FiredLabels = Vec<Label, MAX_HOP_ALERTS>;

/// A single one-shot entry.
#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    label: Label,
    /// Seconds before the timer's end at which the event fires.
    offset_before_end: u64,
    fired: bool,
}

impl ScheduledEvent {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn offset_before_end(&self) -> u64 {
        self.offset_before_end
    }

    pub fn fired(&self) -> bool {
        self.fired
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Ordered set of one-shot events tied to a timer window.
#[derive(Debug, Clone, Default)]
pub struct WindowedScheduler {
    events: Vec<ScheduledEvent, MAX_HOP_ALERTS>,
}

impl WindowedScheduler {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Build from validated hop alerts.  Unlabelled alerts become "Hop N".
    pub fn from_hop_alerts(alerts: &[HopAlert]) -> Self {
        let mut sched = Self::new();
        for (i, alert) in alerts.iter().enumerate() {
            let mut label = Label::new();
            let written = match &alert.label {
                Some(text) => label.push_str(text).is_ok(),
                None => write!(label, "Hop {}", i + 1).is_ok(),
            };
            if !written {
                warn!("Scheduler: hop alert {} label dropped (too long)", i + 1);
                continue;
            }
            let offset = u64::from(alert.minutes_before_end) * 60;
            if sched.add(label, offset).is_none() {
                warn!("Scheduler: hop alert {} dropped (no free slot)", i + 1);
            }
        }
        sched
    }

    /// Add an event.  Returns the slot index, or `None` if full.
    pub fn add(&mut self, label: Label, offset_before_end: u64) -> Option<usize> {
        let slot = self.events.len();
        let event = ScheduledEvent {
            label,
            offset_before_end,
            fired: false,
        };
        self.events.push(event).ok()?;
        info!(
            "Scheduler: added '{}' at slot {} ({}s before end)",
            self.events[slot].label, slot, offset_before_end
        );
        Some(slot)
    }

    /// Fire every pending event whose window has opened.
    ///
    /// No-op unless `timer` is running at `now`.  Events are evaluated
    /// independently, so several may fire in one tick if their offsets
    /// coincide or the tick arrived late.
    pub fn tick(&mut self, now: u64, timer: &TimerWindow) -> FiredLabels {
        let mut fired = FiredLabels::new();

        if timer.state(now) != TimerState::Running {
            return fired;
        }
        let Some(end_at) = timer.end_at() else {
            return fired;
        };

        for event in self.events.iter_mut().filter(|e| !e.fired) {
            if now >= end_at.saturating_sub(event.offset_before_end) {
                event.fired = true;
                info!(
                    "Scheduler: '{}' fired at t={}s ({}s before end)",
                    event.label, now, event.offset_before_end
                );
                // Capacity matches the event table, so this cannot overflow.
                let _ = fired.push(event.label.clone());
            }
        }

        fired
    }

    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    /// Number of events that have not fired yet.
    pub fn pending_count(&self) -> usize {
        self.events.iter().filter(|e| !e.fired).count()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
