//! Boil step: timer starts at boil temp, hop alerts fire before the end,
//! pump pauses above the ceiling.

use brewsteps::config::{BoilConfig, HopAlert};
use brewsteps::timer::TimerState;
use brewsteps::{Lifecycle, Outcome, StepCommand, StepConfig};

use crate::mock_hw::{TimerCall, started};

fn boil(hop_alerts: Vec<HopAlert>) -> StepConfig {
    StepConfig::Boil(BoilConfig {
        hop_alerts,
        ..Default::default()
    })
}

#[test]
fn reaching_boil_starts_timer_silently() {
    let (mut step, mut hw, mut host) = started(boil(vec![]), 95.0);
    assert_eq!(step.timer_state(0), TimerState::NotStarted);

    hw.temperature = 100.0;
    step.tick(5, &mut hw, &mut host).unwrap();
    assert_eq!(
        host.timer_calls,
        [TimerCall::Started {
            duration_secs: 5400,
            ends_at: 5405
        }]
    );
    assert!(host.notifications.is_empty());
}

// ── Hop alerts ───────────────────────────────────────────────

#[test]
fn sixty_minute_hop_fires_once_at_its_offset() {
    let (mut step, mut hw, mut host) = started(boil(vec![HopAlert::new(60)]), 100.0);
    step.tick(5, &mut hw, &mut host).unwrap();
    let end_at = step.timer().end_at().unwrap();
    assert_eq!(end_at, 5 + 90 * 60);
    let fire_at = end_at - 60 * 60;

    for t in 6..fire_at {
        step.tick(t, &mut hw, &mut host).unwrap();
    }
    assert_eq!(host.count_titled("Hop Alert"), 0);

    step.tick(fire_at, &mut hw, &mut host).unwrap();
    assert_eq!(host.count_titled("Hop Alert"), 1);
    assert_eq!(host.notifications[0].body.as_str(), "Please add Hop 1");

    for t in fire_at + 1..end_at {
        step.tick(t, &mut hw, &mut host).unwrap();
    }
    assert_eq!(host.count_titled("Hop Alert"), 1);
}

#[test]
fn hop_alerts_fire_even_if_boil_drops_below_target() {
    let (mut step, mut hw, mut host) = started(boil(vec![HopAlert::new(80)]), 100.0);
    step.tick(0, &mut hw, &mut host).unwrap();

    hw.temperature = 98.0;
    step.tick(600, &mut hw, &mut host).unwrap();
    assert_eq!(host.count_titled("Hop Alert"), 1);
}

#[test]
fn delayed_poll_fires_due_hops_together() {
    let hops = vec![
        HopAlert::labelled(60, "Magnum"),
        HopAlert::new(30),
        HopAlert::new(10),
        HopAlert::new(0),
    ];
    let (mut step, mut hw, mut host) = started(boil(hops), 100.0);
    step.tick(0, &mut hw, &mut host).unwrap();

    step.tick(65 * 60, &mut hw, &mut host).unwrap();
    let bodies: Vec<&str> = host.notifications.iter().map(|n| n.body.as_str()).collect();
    assert_eq!(bodies, ["Please add Magnum", "Please add Hop 2"]);
    assert_eq!(step.hop_alerts().pending_count(), 2);
}

#[test]
fn zero_offset_hop_is_overtaken_by_expiry() {
    // Offset 0 opens exactly at expiry, when the timer is no longer running.
    let (mut step, mut hw, mut host) = started(boil(vec![HopAlert::new(0)]), 100.0);
    step.tick(0, &mut hw, &mut host).unwrap();

    let state = step.tick(90 * 60, &mut hw, &mut host).unwrap();
    assert_eq!(state, Lifecycle::Completed(Outcome::TargetReached));
    assert_eq!(host.titles(), ["Boil Step Completed!"]);
}

#[test]
fn reset_rearms_hop_alerts() {
    let (mut step, mut hw, mut host) = started(boil(vec![HopAlert::new(85)]), 100.0);
    step.tick(0, &mut hw, &mut host).unwrap();
    step.tick(300, &mut hw, &mut host).unwrap();
    assert_eq!(host.count_titled("Hop Alert"), 1);

    step.handle_command(StepCommand::Reset, 400, &mut hw, &mut host)
        .unwrap();
    assert_eq!(step.timer_state(400), TimerState::NotStarted);
    assert_eq!(step.hop_alerts().pending_count(), 1);

    step.tick(401, &mut hw, &mut host).unwrap();
    step.tick(701, &mut hw, &mut host).unwrap();
    assert_eq!(host.count_titled("Hop Alert"), 2);
}

// ── Pump ceiling ─────────────────────────────────────────────

#[test]
fn pump_paused_above_ceiling_then_resumes() {
    let (mut step, mut hw, mut host) = started(boil(vec![]), 101.0);

    for t in (0..500).step_by(5) {
        step.tick(t, &mut hw, &mut host).unwrap();
    }
    assert!(hw.pump_calls().iter().all(|on| !on));

    hw.temperature = 99.5;
    step.tick(500, &mut hw, &mut host).unwrap();
    assert!(hw.pump_on(), "rest interval long elapsed, pump starts at once");

    hw.temperature = 100.5;
    step.tick(505, &mut hw, &mut host).unwrap();
    assert!(!hw.pump_on());
}

#[test]
fn boil_completes_after_timer() {
    let (mut step, mut hw, mut host) = started(boil(vec![]), 100.0);
    step.tick(0, &mut hw, &mut host).unwrap();

    assert_eq!(
        step.tick(90 * 60, &mut hw, &mut host).unwrap(),
        Lifecycle::Completed(Outcome::TargetReached)
    );
    assert_eq!(host.titles(), ["Boil Step Completed!"]);
    assert_eq!(host.notifications[0].body.as_str(), "Starting the next step");
    assert!(!hw.pump_on());
    assert_eq!(host.advances, 1);
}
