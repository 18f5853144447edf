//! Application core: process-step orchestration with zero I/O.
//!
//! Chill, mash and boil are one generic [`step::ProcessStep`] configured by
//! a [`profile::PhaseProfile`].  All interaction with the kettle, pump and
//! brewer happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real hardware.

pub mod commands;
pub mod events;
pub mod ports;
pub mod profile;
pub mod step;
