// tests/session.rs

use free_flight_autotune::records::{
    ArmedState, FlightMode, ManualControlCommand, RelayMeasurement, RelayTuningResult,
    StabilizationSettings, TuningBehavior, TuningMode,
};
use free_flight_autotune::tuning::{relay_gains, CommitReport, PITCH_RATIOS, ROLL_RATIOS};
use free_flight_autotune::{
    Autotune, AutotuneError, MockSettings, Phase, StorageError, TickOutcome, Watchdog,
};

#[derive(Default)]
struct Flags {
    updates: u32,
}

impl Watchdog for Flags {
    fn register_flag(&mut self) {}

    fn update_flag(&mut self) {
        self.updates += 1;
    }
}

fn tuning_store(behavior: TuningBehavior) -> MockSettings {
    let mut store = MockSettings::new();
    store.flight_status.flight_mode = FlightMode::Autotune;
    store.relay_tuning_settings.mode = TuningMode::Rate;
    store.relay_tuning_settings.behavior = behavior;
    store.relay_tuning_result = RelayTuningResult {
        roll: RelayMeasurement {
            period_ms: 500.0,
            gain: 0.3,
        },
        pitch: RelayMeasurement {
            period_ms: 400.0,
            gain: 0.5,
        },
    };
    store
}

/// Flies a whole session at a 10 ms tick and returns the commit outcome.
fn fly_session(
    autotune: &mut Autotune,
    store: &mut MockSettings,
    watchdog: &mut Flags,
) -> (Vec<Phase>, TickOutcome) {
    let mut phases = vec![autotune.phase().phase()];
    let mut now = 0u32;
    let mut tick = |autotune: &mut Autotune, store: &mut MockSettings, phases: &mut Vec<Phase>| {
        let outcome = autotune.tick(now, store, watchdog);
        let phase = autotune.phase().phase();
        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
        now += 10;
        outcome
    };

    // On the ground in autotune mode
    for _ in 0..50 {
        tick(autotune, store, &mut phases);
    }

    // Take off and fly until both axes are measured
    store.flight_status.armed = ArmedState::Armed;
    store.manual_control = ManualControlCommand {
        roll: 0.1,
        pitch: 0.1,
        yaw: -0.2,
        throttle: 0.55,
    };
    while autotune.phase().phase() != Phase::Finished {
        tick(autotune, store, &mut phases);
    }
    for _ in 0..100 {
        tick(autotune, store, &mut phases);
    }

    // Land and disarm
    store.flight_status.armed = ArmedState::Disarmed;
    store.manual_control.throttle = 0.0;
    loop {
        let outcome = tick(autotune, store, &mut phases);
        if let TickOutcome::Committed { .. } = outcome {
            return (phases, outcome);
        }
    }
}

#[test]
fn session_phases_are_monotonic() {
    let mut autotune = Autotune::new();
    let mut store = tuning_store(TuningBehavior::Measure);
    let mut watchdog = Flags::default();

    let (phases, _) = fly_session(&mut autotune, &mut store, &mut watchdog);

    assert_eq!(
        phases,
        vec![
            Phase::Init,
            Phase::Start,
            Phase::Roll,
            Phase::Pitch,
            Phase::Finished,
            Phase::Commit,
            Phase::Init,
        ]
    );
    assert_eq!(watchdog.updates, store.desired_writes);
}

#[test]
fn measure_session_leaves_settings_unchanged() {
    let mut autotune = Autotune::new();
    let mut store = tuning_store(TuningBehavior::Measure);
    let mut watchdog = Flags::default();

    let (_, outcome) = fly_session(&mut autotune, &mut store, &mut watchdog);

    assert!(matches!(
        outcome,
        TickOutcome::Committed {
            result: Ok(CommitReport::Discarded),
            ..
        }
    ));
    assert_eq!(store.stabilization_settings, StabilizationSettings::new());
    assert_eq!(store.persist_calls, 0);
}

#[test]
fn compute_session_applies_without_saving() {
    let mut autotune = Autotune::new();
    let mut store = tuning_store(TuningBehavior::Compute);
    let mut watchdog = Flags::default();

    fly_session(&mut autotune, &mut store, &mut watchdog);

    let roll = relay_gains(500.0, 0.3, &ROLL_RATIOS);
    let pitch = relay_gains(400.0, 0.5, &PITCH_RATIOS);
    let settings = store.stabilization_settings;
    assert_eq!(settings.rate_pid.roll.kp, roll.rate_kp);
    assert_eq!(settings.rate_pid.roll.ki, roll.rate_ki);
    assert_eq!(settings.attitude_pi.roll.kp, roll.attitude_kp);
    assert_eq!(settings.rate_pid.pitch.kp, pitch.rate_kp);
    assert_eq!(settings.attitude_pi.pitch.ki, pitch.attitude_ki);
    assert_eq!(store.persist_calls, 0);
    assert!(store.saved_stabilization_settings.is_none());
}

#[test]
fn save_session_applies_and_persists() {
    let mut autotune = Autotune::new();
    let mut store = tuning_store(TuningBehavior::Save);
    let mut watchdog = Flags::default();

    let (_, outcome) = fly_session(&mut autotune, &mut store, &mut watchdog);

    assert!(matches!(
        outcome,
        TickOutcome::Committed {
            result: Ok(CommitReport::Saved(_)),
            ..
        }
    ));
    assert_eq!(store.persist_calls, 1);
    assert_eq!(
        store.saved_stabilization_settings,
        Some(store.stabilization_settings)
    );
}

#[test]
fn save_failure_is_reported_and_not_retried() {
    let mut autotune = Autotune::new();
    let mut store = tuning_store(TuningBehavior::Save);
    store.persist_error = Some(StorageError::Unavailable);
    let mut watchdog = Flags::default();

    let (_, outcome) = fly_session(&mut autotune, &mut store, &mut watchdog);

    assert!(matches!(
        outcome,
        TickOutcome::Committed {
            result: Err(AutotuneError::Storage(StorageError::Unavailable)),
            ..
        }
    ));
    assert_ne!(store.stabilization_settings, StabilizationSettings::new());

    // Back in init on the ground; further ticks do not save again
    for now in 0..20 {
        autotune.tick(1_000_000 + now * 10, &mut store, &mut watchdog);
    }
    assert_eq!(autotune.phase().phase(), Phase::Init);
    assert_eq!(store.persist_calls, 1);
}

#[test]
fn leaving_autotune_never_commands_relay() {
    let mut autotune = Autotune::new();
    let mut store = tuning_store(TuningBehavior::Compute);
    let mut watchdog = Flags::default();
    store.flight_status.armed = ArmedState::Armed;
    store.manual_control.throttle = 0.5;

    let mut now = 0;
    while autotune.phase().phase() != Phase::Pitch {
        autotune.tick(now, &mut store, &mut watchdog);
        now += 10;
    }

    store.flight_status.flight_mode = FlightMode::Stabilized1;
    let writes = store.desired_writes;
    for _ in 0..100 {
        assert_eq!(
            autotune.tick(now, &mut store, &mut watchdog),
            TickOutcome::Idle
        );
        assert!(!store.stabilization_desired.unwrap().has_relay_axis());
        now += 50;
    }
    // One relay-free record replaces the session's last setpoint
    assert_eq!(store.desired_writes, writes + 1);
    assert_eq!(store.settings_writes, 0);

    // Disarming outside autotune mode never commits
    store.flight_status.armed = ArmedState::Disarmed;
    store.manual_control.throttle = 0.0;
    store.flight_status.flight_mode = FlightMode::Autotune;
    for _ in 0..10 {
        let outcome = autotune.tick(now, &mut store, &mut watchdog);
        assert!(!outcome.desired().unwrap().has_relay_axis());
        now += 10;
    }
    assert_eq!(autotune.phase().phase(), Phase::Init);
    assert_eq!(store.settings_writes, 0);
}

#[test]
fn leaving_autotune_during_roll_clears_relay_setpoint() {
    let mut autotune = Autotune::new();
    let mut store = tuning_store(TuningBehavior::Save);
    let mut watchdog = Flags::default();
    store.flight_status.armed = ArmedState::Armed;
    store.manual_control.throttle = 0.5;

    let mut now = 0;
    while autotune.phase().phase() != Phase::Roll {
        autotune.tick(now, &mut store, &mut watchdog);
        now += 10;
    }
    autotune.tick(now, &mut store, &mut watchdog);
    assert!(store.stabilization_desired.unwrap().has_relay_axis());

    store.flight_status.flight_mode = FlightMode::Stabilized1;
    for _ in 0..10 {
        now += 50;
        autotune.tick(now, &mut store, &mut watchdog);
    }

    assert_eq!(autotune.phase().phase(), Phase::Init);
    let desired = store.stabilization_desired.unwrap();
    assert!(!desired.has_relay_axis());
    assert!((desired.throttle - 0.5).abs() < 1e-6);
    assert_eq!(store.persist_calls, 0);
}
