// src/autotune/task.rs

//! Module lifecycle: the one-time enablement decision, registration with
//! the task monitor and watchdog, and the periodic loop.

use crate::accessor::SettingsAccessor;
use crate::autotune::{Autotune, AutotuneConfig, TickOutcome};
use crate::log::{log_debug, log_info};
use crate::records::ModuleState;
use crate::system::{TaskInfo, TaskMonitor, TimeSource, Watchdog};
use embedded_hal::delay::DelayNs;

/// Descriptor of the autotune task.
pub const AUTOTUNE_TASK: TaskInfo = TaskInfo {
    name: "Autotune",
    stack_bytes: 1024,
    priority: 2,
};

/// Decides once at startup whether the module runs.
///
/// With the `builtin` feature the module is always enabled; otherwise the
/// optional module flag in the hardware settings decides.
pub fn initialize<S: SettingsAccessor>(store: &S) -> bool {
    if cfg!(feature = "builtin") {
        return true;
    }
    store.hw_settings().autotune == ModuleState::Enabled
}

/// The autotune task with its collaborators.
pub struct AutotuneTask<S, W> {
    autotune: Autotune,
    store: S,
    watchdog: W,
}

impl<S: SettingsAccessor, W: Watchdog> AutotuneTask<S, W> {
    /// Starts the task if the module is enabled.
    ///
    /// Registers the task with `monitor` and the watchdog flag once.
    /// Returns `None` when the module is disabled.
    pub fn start<M: TaskMonitor>(
        store: S,
        mut watchdog: W,
        monitor: &mut M,
        config: AutotuneConfig,
    ) -> Option<Self> {
        if !initialize(&store) {
            log_info!("autotune: module disabled");
            return None;
        }

        monitor.register_task(AUTOTUNE_TASK);
        watchdog.register_flag();
        log_info!("autotune: task started");
        log_debug!(
            "autotune: prepare {} ms, measure {} ms per axis",
            config.prepare_time_ms,
            config.measure_time_ms
        );

        Some(Self {
            autotune: Autotune::with_config(config),
            store,
            watchdog,
        })
    }

    /// Runs one tick at the current time of `clock`.
    pub fn step<C: TimeSource>(&mut self, clock: &C) -> TickOutcome {
        self.autotune
            .tick(clock.now_ms(), &mut self.store, &mut self.watchdog)
    }

    /// Runs one tick and then yields for the period the outcome calls for:
    /// the idle period while the gate is closed, the tick period otherwise.
    pub fn step_and_yield<C: TimeSource, D: DelayNs>(
        &mut self,
        clock: &C,
        delay: &mut D,
    ) -> TickOutcome {
        let outcome = self.step(clock);
        delay.delay_ms(outcome.delay_ms(self.autotune.config()));
        outcome
    }

    /// Runs the task loop forever, yielding after every tick.
    pub fn run<C: TimeSource, D: DelayNs>(&mut self, clock: &C, delay: &mut D) -> ! {
        loop {
            self.step_and_yield(clock, delay);
        }
    }

    /// Returns the state machine.
    pub fn autotune(&self) -> &Autotune {
        &self.autotune
    }

    /// Returns the settings store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the settings store for modification.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Returns the watchdog.
    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }
}
