// demos/session_sim.rs

use core::cell::Cell;
use free_flight_autotune::pid::{CascadeControllers, RateControlData};
use free_flight_autotune::records::{
    ArmedState, Axis, FlightMode, ModuleState, RelayMeasurement, TuningBehavior,
};
use free_flight_autotune::{
    AutotuneConfig, AutotuneTask, MockSettings, Phase, TaskInfo, TaskMonitor, TickOutcome,
    TimeSource, Watchdog,
};

struct SimClock(Cell<u32>);

impl TimeSource for SimClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

struct SimWatchdog;

impl Watchdog for SimWatchdog {
    fn register_flag(&mut self) {
        println!("watchdog: flag registered");
    }

    fn update_flag(&mut self) {}
}

struct SimMonitor;

impl TaskMonitor for SimMonitor {
    fn register_task(&mut self, task: TaskInfo) {
        println!(
            "monitor: {} ({} bytes, priority {})",
            task.name, task.stack_bytes, task.priority
        );
    }
}

fn main() {
    let mut store = MockSettings::new();
    store.hw_settings.autotune = ModuleState::Enabled;
    store.relay_tuning_settings.behavior = TuningBehavior::Save;
    store.relay_tuning_result.roll = RelayMeasurement {
        period_ms: 500.0,
        gain: 0.3,
    };
    store.relay_tuning_result.pitch = RelayMeasurement {
        period_ms: 400.0,
        gain: 0.5,
    };

    // Shorter windows keep the printout readable.
    let mut config = AutotuneConfig::new();
    config.measure_time_ms = 5_000;

    let Some(mut task) = AutotuneTask::start(store, SimWatchdog, &mut SimMonitor, config) else {
        println!("autotune disabled");
        return;
    };

    let before = CascadeControllers::from_settings(&task.store().stabilization_settings, Axis::Roll);
    println!(
        "roll before: rate kp {:.4} ki {:.4}, attitude kp {:.4} ki {:.4}",
        before.rate.kp, before.rate.ki, before.attitude.kp, before.attitude.ki
    );

    let clock = SimClock(Cell::new(0));
    let mut last_phase = Phase::Init;
    let mut landed = false;

    loop {
        let now = clock.now_ms();
        let store = task.store_mut();
        store.flight_status.flight_mode = FlightMode::Autotune;
        if now >= 500 && !landed {
            store.flight_status.armed = ArmedState::Armed;
            store.manual_control.throttle = 0.5;
        }
        if last_phase == Phase::Finished {
            store.flight_status.armed = ArmedState::Disarmed;
            store.manual_control.throttle = 0.0;
            landed = true;
        }

        let outcome = task.step(&clock);
        let phase = task.autotune().phase().phase();
        if phase != last_phase {
            println!("t = {:>6} ms: {:?} -> {:?}", now, last_phase, phase);
            last_phase = phase;
        }
        if let TickOutcome::Committed { result, .. } = outcome {
            println!("commit: {:?}", result);
            break;
        }

        clock.0.set(now + outcome.delay_ms(task.autotune().config()));
    }

    let settings = task.store().stabilization_settings;
    let mut after = CascadeControllers::from_settings(&settings, Axis::Roll);
    println!(
        "roll after:  rate kp {:.4} ki {:.4}, attitude kp {:.4} ki {:.4}",
        after.rate.kp, after.rate.ki, after.attitude.kp, after.attitude.ki
    );

    // One rate loop step with the tuned gains
    after.rate.set_point(100.0);
    let output = after.rate.compute(RateControlData {
        rate: 80.0,
        dt: 0.01,
        integral_limit: after.rate_i_limit,
        reset_integral: false,
    });
    println!("roll rate output for 20 deg/s error: {:.4}", output);
    println!(
        "saved: {}",
        task.store().saved_stabilization_settings.is_some()
    );
}
