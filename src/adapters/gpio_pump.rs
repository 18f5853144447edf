//! Circulation pump on a relay or MOSFET gate driven by one GPIO.
//!
//! Implements [`PumpPort`] over any `embedded-hal` 1.0 [`OutputPin`], so
//! the same adapter serves a board HAL on target and a mock pin on host.
//!
//! ## Wiring
//!
//! Most relay boards are active-low.  Pass `active_low = true` to
//! [`GpioPump::new`] and the adapter drives the pin low to run the pump.

use anyhow::anyhow;
use embedded_hal::digital::{Error as _, OutputPin};
use log::debug;

use crate::app::ports::PumpPort;

/// Pump adapter over a single output pin.
pub struct GpioPump<P: OutputPin> {
    pin: P,
    active_low: bool,
    running: bool,
}

impl<P: OutputPin> GpioPump<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            running: false,
        }
    }

    /// Last state successfully written to the pin.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Give the pin back (e.g. to reconfigure it).
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> PumpPort for GpioPump<P> {
    fn set_pump(&mut self, on: bool) -> anyhow::Result<()> {
        let drive_high = on != self.active_low;
        let result = if drive_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|e| anyhow!("pump pin write failed: {:?}", e.kind()))?;

        if self.running != on {
            debug!("Pump: {}", if on { "on" } else { "off" });
        }
        self.running = on;
        Ok(())
    }
}
