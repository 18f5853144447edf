//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements  | Connects to                  |
//! |-------------|-------------|------------------------------|
//! | `gpio_pump` | PumpPort    | embedded-hal `OutputPin`     |
//! | `log_host`  | TimerPort   | `log` facade                 |
//! |             | NotifyPort  |                              |
//!
//! The kettle (thermometer + heater loop) belongs to the host controller
//! and has no adapter here.

pub mod gpio_pump;
pub mod log_host;
