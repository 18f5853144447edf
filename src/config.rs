//! Step configuration parameters
//!
//! One typed parameter block per brewing phase.  Values arrive from the
//! host at step construction and are validated there; a step never
//! discovers a bad configuration mid-run.

use serde::{Deserialize, Serialize};

use crate::app::profile::PhaseKind;
use crate::error::{ConfigError, Result};

/// Default number of consecutive readings before the chiller shuts down.
pub const DEFAULT_CHILL_SAMPLES: u32 = 5;

/// Maximum number of hop alerts a boil step can hold.
pub const MAX_HOP_ALERTS: usize = 5;

/// Maximum length of a hop alert label in bytes.
pub const HOP_LABEL_CAPACITY: usize = 24;

// ---------------------------------------------------------------------------
// Chill
// ---------------------------------------------------------------------------

/// Counter-flow chiller: run the pump until the wort is cold enough or the
/// upper time bound passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChillConfig {
    /// Desired (yeast pitch) temperature in Celsius.
    pub target_c: f32,
    /// Upper bound in minutes; the step concludes regardless of temperature.
    pub timer_minutes: u32,
    /// Consecutive readings at or below target before shutting down.
    pub samples: u32,
}

impl Default for ChillConfig {
    fn default() -> Self {
        Self {
            target_c: 20.0,
            timer_minutes: 30,
            samples: DEFAULT_CHILL_SAMPLES,
        }
    }
}

// ---------------------------------------------------------------------------
// Mash
// ---------------------------------------------------------------------------

/// Mash rest with strike-temperature overshoot and a cycling pump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MashConfig {
    /// Mash temperature in Celsius.
    pub target_c: f32,
    /// Rest length in minutes, counted from the moment strike temp is reached.
    pub timer_minutes: u32,
    /// Degrees above `target_c` to heat to before grain goes in.
    pub overshoot_c: f32,
    /// Seconds the pump runs before resting.
    pub pump_work_secs: u32,
    /// Seconds the pump rests between work intervals.
    pub pump_rest_secs: u32,
    /// Pump cycling starts at or above this temperature.
    pub pump_min_temp_c: f32,
    /// Consecutive readings at or above strike temp before the timer starts.
    pub samples: u32,
}

impl Default for MashConfig {
    fn default() -> Self {
        Self {
            target_c: 66.0,
            timer_minutes: 60,
            overshoot_c: 1.0,
            pump_work_secs: 600,
            pump_rest_secs: 60,
            pump_min_temp_c: 40.0,
            samples: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Boil
// ---------------------------------------------------------------------------

/// A single hop addition reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopAlert {
    /// Minutes before the end of the boil at which the alert fires.
    pub minutes_before_end: u32,
    /// Shown in the notification body.  Defaults to "Hop N".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl HopAlert {
    pub fn new(minutes_before_end: u32) -> Self {
        Self {
            minutes_before_end,
            label: None,
        }
    }

    pub fn labelled(minutes_before_end: u32, label: &str) -> Self {
        Self {
            minutes_before_end,
            label: Some(label.to_owned()),
        }
    }
}

/// Boil with hop alerts and a pump that pauses above a ceiling temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilConfig {
    /// Boil temperature in Celsius.
    pub target_c: f32,
    /// Boil length in minutes, counted from the moment boil temp is reached.
    pub timer_minutes: u32,
    /// Up to [`MAX_HOP_ALERTS`] reminders, in display order.
    pub hop_alerts: Vec<HopAlert>,
    /// Seconds the pump runs before resting.
    pub pump_work_secs: u32,
    /// Seconds the pump rests between work intervals.
    pub pump_rest_secs: u32,
    /// Pump cycling stops above this temperature.
    pub pump_max_temp_c: f32,
    /// Consecutive readings at or above boil temp before the timer starts.
    pub samples: u32,
}

impl Default for BoilConfig {
    fn default() -> Self {
        Self {
            target_c: 100.0,
            timer_minutes: 90,
            hop_alerts: Vec::new(),
            pump_work_secs: 200,
            pump_rest_secs: 100,
            pump_max_temp_c: 100.0,
            samples: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// StepConfig
// ---------------------------------------------------------------------------

/// Configuration for any one process step, tagged by phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum StepConfig {
    Chill(ChillConfig),
    Mash(MashConfig),
    Boil(BoilConfig),
}

impl StepConfig {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Chill(_) => PhaseKind::Chill,
            Self::Mash(_) => PhaseKind::Mash,
            Self::Boil(_) => PhaseKind::Boil,
        }
    }

    /// Timer length in seconds.
    pub fn timer_secs(&self) -> u64 {
        let minutes = match self {
            Self::Chill(c) => c.timer_minutes,
            Self::Mash(c) => c.timer_minutes,
            Self::Boil(c) => c.timer_minutes,
        };
        u64::from(minutes) * 60
    }

    /// Reject any value that would make the step misbehave at runtime.
    /// Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Chill(c) => {
                check_temp("target_c", c.target_c)?;
                check_nonzero("timer_minutes", c.timer_minutes)?;
                check_samples(c.samples)
            }
            Self::Mash(c) => {
                check_temp("target_c", c.target_c)?;
                check_temp("overshoot_c", c.overshoot_c)?;
                check_temp("pump_min_temp_c", c.pump_min_temp_c)?;
                check_nonzero("timer_minutes", c.timer_minutes)?;
                check_nonzero("pump_work_secs", c.pump_work_secs)?;
                check_nonzero("pump_rest_secs", c.pump_rest_secs)?;
                check_samples(c.samples)
            }
            Self::Boil(c) => {
                check_temp("target_c", c.target_c)?;
                check_temp("pump_max_temp_c", c.pump_max_temp_c)?;
                check_nonzero("timer_minutes", c.timer_minutes)?;
                check_nonzero("pump_work_secs", c.pump_work_secs)?;
                check_nonzero("pump_rest_secs", c.pump_rest_secs)?;
                check_samples(c.samples)?;
                if c.hop_alerts.len() > MAX_HOP_ALERTS {
                    return Err(ConfigError::TooManyHopAlerts);
                }
                for (i, hop) in c.hop_alerts.iter().enumerate() {
                    if hop.minutes_before_end > c.timer_minutes {
                        return Err(ConfigError::OffsetExceedsTimer(i + 1));
                    }
                    if hop
                        .label
                        .as_ref()
                        .is_some_and(|l| l.len() > HOP_LABEL_CAPACITY)
                    {
                        return Err(ConfigError::LabelTooLong(i + 1));
                    }
                }
                Ok(())
            }
        }
    }

    /// Parse a JSON document and validate it.  Missing fields take defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| anyhow::anyhow!("step config is not valid JSON: {e}"))?;
        config.validate()?;
        Ok(config)
    }
}

fn check_temp(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidTemperature(field))
    }
}

fn check_nonzero(field: &'static str, value: u32) -> Result<()> {
    if value == 0 {
        Err(ConfigError::ZeroDuration(field))
    } else {
        Ok(())
    }
}

fn check_samples(samples: u32) -> Result<()> {
    if samples == 0 {
        Err(ConfigError::ZeroSampleCount)
    } else {
        Ok(())
    }
}
