//! Control mechanisms shared by every process step.

pub mod duty_cycle;
pub mod threshold;
