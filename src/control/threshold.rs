//! Debounced threshold detection.
//!
//! A single noisy thermometer reading must not trigger an irreversible
//! phase change, so the detector only reports "reached" once the last
//! `required_streak` samples all satisfied the comparator.  Any sample
//! that does not qualify resets the streak to zero.

use log::debug;

/// Direction of the threshold test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Qualifies when `sample <= target` (cooling down).
    AtMost,
    /// Qualifies when `sample >= target` (heating up).
    AtLeast,
}

impl Comparator {
    pub fn holds(self, sample: f32, target: f32) -> bool {
        match self {
            Self::AtMost => sample <= target,
            Self::AtLeast => sample >= target,
        }
    }
}

/// Consecutive-success counter.
///
/// Invariant: `current_streak <= required_streak`.
#[derive(Debug, Clone)]
pub struct ThresholdDetector {
    required_streak: u32,
    current_streak: u32,
}

impl ThresholdDetector {
    /// `required_streak` is clamped to at least 1; configuration validation
    /// rejects zero before a detector is ever built.
    pub fn new(required_streak: u32) -> Self {
        Self {
            required_streak: required_streak.max(1),
            current_streak: 0,
        }
    }

    /// Feed one sample.  Returns `true` while the most recent run of
    /// qualifying samples is at least `required_streak` long.
    pub fn observe(&mut self, sample: f32, comparator: Comparator, target: f32) -> bool {
        if comparator.holds(sample, target) {
            // Saturate at the requirement.
            self.current_streak = (self.current_streak + 1).min(self.required_streak);
            debug!(
                "Threshold: {:.2} qualifies against {:.2} ({}/{})",
                sample, target, self.current_streak, self.required_streak
            );
            self.current_streak == self.required_streak
        } else {
            self.current_streak = 0;
            false
        }
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn required_streak(&self) -> u32 {
        self.required_streak
    }

    /// Drop any partial streak.
    pub fn clear(&mut self) {
        self.current_streak = 0;
    }
}
