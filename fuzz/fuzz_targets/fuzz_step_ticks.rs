//! Fuzz target: `ProcessStep::tick` under arbitrary readings and clocks
//!
//! The first byte picks the phase.  Each following pair of bytes is one
//! poll: a temperature in 0.5 °C steps and a forward time step.  Checks:
//! - No panics
//! - At most one completion notification and one phase hand-off
//! - Each hop alert fires at most once
//!
//! cargo fuzz run fuzz_step_ticks

#![no_main]

use brewsteps::app::ports::{KettlePort, NotifyPort, PumpPort, TimerPort};
use brewsteps::config::{BoilConfig, ChillConfig, HopAlert, MashConfig};
use brewsteps::{Notification, ProcessStep, StepConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Sim {
    celsius: f32,
    notices: usize,
    hop_alerts: usize,
    advances: usize,
}

impl KettlePort for Sim {
    fn read_temperature(&mut self) -> anyhow::Result<f32> {
        Ok(self.celsius)
    }

    fn set_target_temperature(&mut self, _celsius: f32) -> anyhow::Result<()> {
        Ok(())
    }
}

impl PumpPort for Sim {
    fn set_pump(&mut self, _on: bool) -> anyhow::Result<()> {
        Ok(())
    }
}

impl TimerPort for Sim {
    fn timer_started(&mut self, _duration_secs: u64, _ends_at: u64) {}
    fn timer_stopped(&mut self) {}
}

impl NotifyPort for Sim {
    fn notify(&mut self, notification: &Notification) {
        if notification.title == "Hop Alert" {
            self.hop_alerts += 1;
        } else {
            self.notices += 1;
        }
    }

    fn advance_to_next_phase(&mut self) {
        self.advances += 1;
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&phase, polls)) = data.split_first() else {
        return;
    };

    let config = match phase % 3 {
        0 => StepConfig::Chill(ChillConfig {
            timer_minutes: 2,
            ..Default::default()
        }),
        1 => StepConfig::Mash(MashConfig {
            timer_minutes: 2,
            pump_work_secs: 7,
            pump_rest_secs: 3,
            ..Default::default()
        }),
        _ => StepConfig::Boil(BoilConfig {
            timer_minutes: 3,
            hop_alerts: vec![HopAlert::new(3), HopAlert::new(1), HopAlert::new(0)],
            ..Default::default()
        }),
    };
    let hop_count = match &config {
        StepConfig::Boil(c) => c.hop_alerts.len(),
        _ => 0,
    };

    let Ok(mut step) = ProcessStep::new(config) else {
        return;
    };
    let mut sim = Sim::default();
    let mut hw = Sim::default();
    let mut now = 0u64;
    if step.init(now, &mut hw, &mut sim).is_err() {
        return;
    }

    for poll in polls.chunks_exact(2) {
        hw.celsius = f32::from(poll[0]) * 0.5;
        now += u64::from(poll[1]);
        let _ = step.tick(now, &mut hw, &mut sim);
    }

    assert!(sim.notices <= 2, "mash sends at most a notice and a completion");
    assert!(sim.advances <= 1);
    assert!(sim.hop_alerts <= hop_count);
});
