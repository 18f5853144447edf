//! Brewing process-step control library.
//!
//! Models chill, mash and boil as independently polled process steps.
//! Each step samples a kettle temperature, cycles a circulation pump,
//! runs a countdown, fires hop alerts and tells the host when to move on.
//! All hardware and UI access goes through the port traits in
//! [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod scheduler;
pub mod timer;

pub use app::commands::StepCommand;
pub use app::events::{Lifecycle, Notification, Outcome};
pub use app::profile::PhaseKind;
pub use app::step::ProcessStep;
pub use config::StepConfig;
pub use error::ConfigError;
