//! Behaviour shared by every phase: construction, guards, commands and
//! collaborator failures.

use brewsteps::config::{BoilConfig, ChillConfig, HopAlert, MashConfig};
use brewsteps::timer::TimerState;
use brewsteps::{ConfigError, Lifecycle, Outcome, ProcessStep, StepCommand, StepConfig};

use crate::mock_hw::{HwCall, MockHardware, MockHost, TimerCall, started};

fn quick_chill() -> StepConfig {
    StepConfig::Chill(ChillConfig {
        target_c: 10.0,
        timer_minutes: 30,
        samples: 1,
    })
}

// ── Construction ─────────────────────────────────────────────

#[test]
fn new_rejects_invalid_configs() {
    let zero_samples = StepConfig::Chill(ChillConfig {
        samples: 0,
        ..Default::default()
    });
    assert_eq!(
        ProcessStep::new(zero_samples).err(),
        Some(ConfigError::ZeroSampleCount)
    );

    let late_hop = StepConfig::Boil(BoilConfig {
        timer_minutes: 60,
        hop_alerts: vec![HopAlert::new(30), HopAlert::new(70)],
        ..Default::default()
    });
    assert_eq!(
        ProcessStep::new(late_hop).err(),
        Some(ConfigError::OffsetExceedsTimer(2))
    );

    let no_rest = StepConfig::Mash(MashConfig {
        pump_rest_secs: 0,
        ..Default::default()
    });
    assert_eq!(
        ProcessStep::new(no_rest).err(),
        Some(ConfigError::ZeroDuration("pump_rest_secs"))
    );
}

#[test]
fn new_step_is_idle_with_nothing_started() {
    let step = ProcessStep::new(quick_chill()).unwrap();
    assert_eq!(step.lifecycle(), Lifecycle::Idle);
    assert_eq!(step.timer_state(0), TimerState::NotStarted);
    assert!(step.duty_cycle().is_none());
}

// ── Guards ───────────────────────────────────────────────────

#[test]
fn tick_before_init_touches_nothing() {
    let mut step = ProcessStep::new(quick_chill()).unwrap();
    let mut hw = MockHardware::new(5.0);
    let mut host = MockHost::new();

    assert_eq!(step.tick(10, &mut hw, &mut host).unwrap(), Lifecycle::Idle);
    assert_eq!(hw.reads, 0);
    assert!(hw.calls.is_empty());
    assert!(host.notifications.is_empty());
}

#[test]
fn second_init_is_ignored() {
    let (mut step, mut hw, mut host) = started(quick_chill(), 20.0);
    hw.calls.clear();

    step.init(50, &mut hw, &mut host).unwrap();
    assert!(hw.calls.is_empty());
    assert_eq!(host.timer_calls.len(), 1);
}

#[test]
fn completed_step_ignores_ticks() {
    let (mut step, mut hw, mut host) = started(quick_chill(), 5.0);
    assert_eq!(
        step.tick(1, &mut hw, &mut host).unwrap(),
        Lifecycle::Completed(Outcome::TargetReached)
    );
    let reads = hw.reads;

    hw.temperature = 50.0;
    assert_eq!(
        step.tick(2000, &mut hw, &mut host).unwrap(),
        Lifecycle::Completed(Outcome::TargetReached)
    );
    assert_eq!(hw.reads, reads);
    assert_eq!(host.notifications.len(), 1);
    assert_eq!(host.advances, 1);
}

#[test]
fn each_tick_reads_the_kettle_once() {
    let (mut step, mut hw, mut host) = started(StepConfig::Mash(MashConfig::default()), 50.0);
    for t in 0..20 {
        step.tick(t, &mut hw, &mut host).unwrap();
    }
    assert_eq!(hw.reads, 20);
}

// ── Commands ─────────────────────────────────────────────────

#[test]
fn start_timer_now_only_starts_once() {
    let (mut step, mut hw, mut host) = started(StepConfig::Mash(MashConfig::default()), 20.0);

    step.handle_command(StepCommand::StartTimerNow, 5, &mut hw, &mut host)
        .unwrap();
    step.handle_command(StepCommand::StartTimerNow, 50, &mut hw, &mut host)
        .unwrap();
    assert_eq!(
        host.timer_calls,
        [TimerCall::Started {
            duration_secs: 3600,
            ends_at: 3605
        }]
    );
}

#[test]
fn start_timer_now_is_noop_when_timer_started_at_init() {
    let (mut step, mut hw, mut host) = started(quick_chill(), 20.0);
    step.handle_command(StepCommand::StartTimerNow, 100, &mut hw, &mut host)
        .unwrap();
    assert_eq!(host.timer_calls.len(), 1);
    assert_eq!(step.timer().end_at(), Some(1800));
}

#[test]
fn finish_before_init_is_safe_and_idempotent() {
    let mut step = ProcessStep::new(StepConfig::Boil(BoilConfig::default())).unwrap();
    let mut hw = MockHardware::new(20.0);
    let mut host = MockHost::new();

    step.handle_command(StepCommand::Finish, 0, &mut hw, &mut host)
        .unwrap();
    step.handle_command(StepCommand::Finish, 1, &mut hw, &mut host)
        .unwrap();
    assert_eq!(
        hw.calls,
        [
            HwCall::SetTarget(0.0),
            HwCall::SetPump(false),
            HwCall::SetTarget(0.0),
            HwCall::SetPump(false),
        ]
    );
    assert_eq!(step.lifecycle(), Lifecycle::Idle);
    assert!(host.notifications.is_empty());
}

#[test]
fn finish_mid_run_stops_the_duty_cycle() {
    let (mut step, mut hw, mut host) = started(StepConfig::Mash(MashConfig::default()), 50.0);
    step.tick(60, &mut hw, &mut host).unwrap();
    assert!(step.duty_cycle().unwrap().is_active());

    step.finish(70, &mut hw).unwrap();
    assert!(!hw.pump_on());
    assert_eq!(hw.last_target(), Some(0.0));
    assert!(!step.duty_cycle().unwrap().is_active());
}

#[test]
fn ticks_after_finish_are_inert() {
    let (mut step, mut hw, mut host) = started(StepConfig::Mash(MashConfig::default()), 50.0);
    step.finish(10, &mut hw).unwrap();
    assert!(step.is_finished());
    hw.calls.clear();
    let reads = hw.reads;

    // Past the rest interval, and hot enough to arm the timer.
    hw.temperature = 70.0;
    for t in 11..200 {
        step.tick(t, &mut hw, &mut host).unwrap();
    }
    assert_eq!(hw.reads, reads);
    assert!(hw.calls.is_empty());
    assert!(!step.duty_cycle().unwrap().is_active());
    assert!(host.notifications.is_empty());
    assert!(host.timer_calls.is_empty());
    assert_eq!(host.advances, 0);
}

#[test]
fn commands_after_finish_are_ignored() {
    let (mut step, mut hw, mut host) = started(StepConfig::Mash(MashConfig::default()), 50.0);
    step.finish(10, &mut hw).unwrap();
    hw.calls.clear();

    step.handle_command(StepCommand::StartTimerNow, 20, &mut hw, &mut host)
        .unwrap();
    step.handle_command(StepCommand::Reset, 30, &mut hw, &mut host)
        .unwrap();
    assert!(hw.calls.is_empty());
    assert!(host.timer_calls.is_empty());
    assert_eq!(step.timer_state(30), TimerState::NotStarted);

    step.handle_command(StepCommand::Finish, 40, &mut hw, &mut host)
        .unwrap();
    assert_eq!(hw.calls, [HwCall::SetTarget(0.0), HwCall::SetPump(false)]);
}

#[test]
fn init_after_finish_is_ignored() {
    let mut step = ProcessStep::new(quick_chill()).unwrap();
    let mut hw = MockHardware::new(20.0);
    let mut host = MockHost::new();

    step.finish(0, &mut hw).unwrap();
    hw.calls.clear();
    step.init(1, &mut hw, &mut host).unwrap();
    assert_eq!(step.lifecycle(), Lifecycle::Idle);
    assert!(hw.calls.is_empty());
    assert!(host.timer_calls.is_empty());
}

#[test]
fn finish_attempts_both_commands_when_pump_fails() {
    let (mut step, mut hw, _host) = started(StepConfig::Mash(MashConfig::default()), 50.0);
    hw.fail_pump = true;

    let err = step.finish(10, &mut hw).unwrap_err();
    assert!(format!("{err:#}").contains("relay stuck"));
    assert_eq!(hw.last_target(), Some(0.0));
}

#[test]
fn finish_attempts_pump_when_kettle_fails() {
    let (mut step, mut hw, _host) = started(StepConfig::Boil(BoilConfig::default()), 50.0);
    hw.fail_target = true;
    hw.calls.clear();

    let err = step.finish(10, &mut hw).unwrap_err();
    assert!(format!("{err:#}").contains("kettle unreachable"));
    assert_eq!(hw.calls, [HwCall::SetPump(false)]);
}

// ── Collaborator failures ────────────────────────────────────

#[test]
fn read_failure_aborts_tick_with_context() {
    let (mut step, mut hw, mut host) = started(quick_chill(), 5.0);
    hw.fail_reads = true;

    let err = step.tick(1, &mut hw, &mut host).unwrap_err();
    let text = format!("{err:#}");
    assert!(text.contains("reading kettle temperature"), "{text}");
    assert!(text.contains("thermometer offline"), "{text}");
    assert_eq!(step.lifecycle(), Lifecycle::Running);

    hw.fail_reads = false;
    assert_eq!(
        step.tick(2, &mut hw, &mut host).unwrap(),
        Lifecycle::Completed(Outcome::TargetReached)
    );
}

#[test]
fn pump_failure_at_completion_retries_on_next_tick() {
    let (mut step, mut hw, mut host) = started(quick_chill(), 5.0);
    hw.fail_pump = true;

    assert!(step.tick(1, &mut hw, &mut host).is_err());
    assert_eq!(step.lifecycle(), Lifecycle::Running);
    assert!(host.notifications.is_empty());
    assert_eq!(host.advances, 0);

    hw.fail_pump = false;
    assert_eq!(
        step.tick(2, &mut hw, &mut host).unwrap(),
        Lifecycle::Completed(Outcome::TargetReached)
    );
    assert_eq!(host.notifications.len(), 1);
    assert_eq!(host.advances, 1);
}

#[test]
fn failed_pump_toggle_is_retried_next_tick() {
    let (mut step, mut hw, mut host) = started(StepConfig::Mash(MashConfig::default()), 50.0);
    hw.calls.clear();

    hw.fail_pump = true;
    let err = step.tick(60, &mut hw, &mut host).unwrap_err();
    assert!(format!("{err:#}").contains("switching pump"));
    assert!(!step.duty_cycle().unwrap().is_active());
    assert_eq!(step.duty_cycle().unwrap().last_toggle(), 0);

    hw.fail_pump = false;
    step.tick(61, &mut hw, &mut host).unwrap();
    assert_eq!(hw.pump_calls(), [true]);
    assert!(step.duty_cycle().unwrap().is_active());

    // The work interval runs from the successful write.
    for t in 62..=660 {
        step.tick(t, &mut hw, &mut host).unwrap();
    }
    assert!(hw.pump_on());
    step.tick(661, &mut hw, &mut host).unwrap();
    assert_eq!(hw.pump_calls(), [true, false]);
}

#[test]
fn init_failure_leaves_step_idle() {
    let mut step = ProcessStep::new(quick_chill()).unwrap();
    let mut hw = MockHardware::new(20.0);
    let mut host = MockHost::new();
    hw.fail_target = true;

    let err = step.init(0, &mut hw, &mut host).unwrap_err();
    assert!(format!("{err:#}").contains("setting initial target temperature"));
    assert_eq!(step.lifecycle(), Lifecycle::Idle);
    assert!(host.timer_calls.is_empty());

    hw.fail_target = false;
    step.init(1, &mut hw, &mut host).unwrap();
    assert_eq!(step.lifecycle(), Lifecycle::Running);
}
