// src/autotune.rs

//! # Relay Autotune State Machine
//!
//! This module drives a tuning session from the flight controller's own
//! periodic loop. While the pilot holds the autotune flight mode, the
//! session waits for the vehicle to be armed and flying, lets it settle in
//! normal control, then engages the relay on roll and on pitch in turn for
//! a fixed measurement window each. After landing and disarming, the
//! measured oscillations are turned into new loop gains.
//!
//! ## Overview
//!
//! [`Autotune::tick`] runs once per loop iteration:
//!
//! 1. The watchdog flag is refreshed.
//! 2. The safety gate is evaluated. Outside the autotune flight mode the
//!    session returns to [`TuningPhase::Init`], no matter which phase was
//!    active. A session cut short publishes one setpoint record without
//!    relay; otherwise nothing is written.
//! 3. The setpoint record is rebuilt from the manual input as in normal
//!    flight, and the relay mode is overlaid on the axis being measured.
//!    Yaw is always rate controlled from the stick.
//! 4. In the commit phase the result is applied per the configured
//!    [`TuningBehavior`](crate::records::TuningBehavior).
//! 5. The phase advances and the setpoint record is published.
//!
//! All records are read and written through the
//! [`SettingsAccessor`](crate::accessor::SettingsAccessor) passed to
//! `tick`, so the state machine owns nothing but its phase.

pub mod gate;
pub mod phase;
pub use phase::*;
pub mod task;
pub use task::*;

use crate::accessor::SettingsAccessor;
use crate::error::AutotuneError;
use crate::log::{log_info, log_warn};
use crate::records::{
    ManualControlCommand, StabilizationDesired, StabilizationMode, StabilizationSettings,
    TunedAxis, TuningMode,
};
use crate::system::Watchdog;
use crate::tuning::{commit_tuning, CommitReport};

/// Timing of a tuning session and of the task loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutotuneConfig {
    /// Time spent in normal control before the relay is engaged (ms).
    pub prepare_time_ms: u32,
    /// Relay measurement window per axis (ms).
    pub measure_time_ms: u32,
    /// Loop delay while a session is active (ms).
    pub tick_period_ms: u32,
    /// Loop delay while the gate is closed (ms).
    pub idle_period_ms: u32,
}

impl AutotuneConfig {
    /// Creates a configuration with the default timing.
    ///
    /// Example Usage
    /// ```
    /// use free_flight_autotune::autotune::AutotuneConfig;
    ///
    /// let mut config = AutotuneConfig::new();
    ///
    /// // Measure each axis for 20 seconds instead of 30.
    /// config.measure_time_ms = 20_000;
    /// ```
    pub fn new() -> Self {
        Self {
            prepare_time_ms: 2000,
            measure_time_ms: 30_000,
            tick_period_ms: 10,
            idle_period_ms: 50,
        }
    }
}

impl Default for AutotuneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// The gate is closed. Nothing is written, except on the tick that cuts
    /// a session short, which publishes one normal setpoint record so no
    /// relay command outlives the session.
    Idle,
    /// A session is running.
    Active {
        /// Phase for the next tick.
        phase: Phase,
        /// Published setpoint record.
        desired: StabilizationDesired,
    },
    /// The session committed its result and returned to init.
    Committed {
        /// Published setpoint record.
        desired: StabilizationDesired,
        /// Outcome of the commit.
        result: Result<CommitReport, AutotuneError>,
    },
}

impl TickOutcome {
    /// Returns the loop delay that should follow this tick.
    pub fn delay_ms(&self, config: &AutotuneConfig) -> u32 {
        match self {
            TickOutcome::Idle => config.idle_period_ms,
            TickOutcome::Active { .. } | TickOutcome::Committed { .. } => config.tick_period_ms,
        }
    }

    /// Returns the published setpoint record, if any.
    pub fn desired(&self) -> Option<&StabilizationDesired> {
        match self {
            TickOutcome::Idle => None,
            TickOutcome::Active { desired, .. } | TickOutcome::Committed { desired, .. } => {
                Some(desired)
            }
        }
    }
}

/// Relay autotune state machine.
#[derive(Debug, Clone)]
pub struct Autotune {
    config: AutotuneConfig,
    phase: TuningPhase,
}

impl Autotune {
    /// Creates a state machine in the init phase.
    pub fn with_config(config: AutotuneConfig) -> Self {
        Self {
            config,
            phase: TuningPhase::Init,
        }
    }

    /// Creates a state machine with the default timing.
    pub fn new() -> Self {
        Self::with_config(AutotuneConfig::new())
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TuningPhase {
        self.phase
    }

    /// Returns the timing configuration.
    pub fn config(&self) -> &AutotuneConfig {
        &self.config
    }

    /// Runs one iteration of the tuning loop at time `now_ms`.
    pub fn tick<S: SettingsAccessor, W: Watchdog>(
        &mut self,
        now_ms: u32,
        store: &mut S,
        watchdog: &mut W,
    ) -> TickOutcome {
        watchdog.update_flag();

        let status = store.flight_status();
        if !gate::session_active(&status) {
            if self.phase != TuningPhase::Init {
                log_warn!(
                    "autotune: left autotune mode during {:?}, session reset",
                    self.phase.phase()
                );
                // Replace any relay setpoint left over from the session
                let desired = stored_normal_desired(store);
                store.set_stabilization_desired(desired);
            }
            self.phase = TuningPhase::Init;
            return TickOutcome::Idle;
        }

        let mode = store.relay_tuning_settings().mode;
        let mut desired = stored_normal_desired(store);
        if let Some(axis) = self.phase.relay_axis() {
            match axis {
                TunedAxis::Roll => desired.mode.roll = mode.relay_mode(),
                TunedAxis::Pitch => desired.mode.pitch = mode.relay_mode(),
            }
        }

        let current = self.phase;
        let result = match current {
            TuningPhase::Commit => Some(commit_tuning(store)),
            _ => None,
        };

        self.phase = current.next(now_ms, &status, desired.throttle, &self.config);
        if self.phase.phase() != current.phase() {
            log_info!(
                "autotune: {:?} -> {:?} at {} ms",
                current.phase(),
                self.phase.phase(),
                now_ms
            );
        }

        store.set_stabilization_desired(desired);

        match result {
            Some(result) => TickOutcome::Committed { desired, result },
            None => TickOutcome::Active {
                phase: self.phase.phase(),
                desired,
            },
        }
    }
}

impl Default for Autotune {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the setpoint record for normal flight from the sticks.
///
/// Roll and pitch use rate or attitude control per the tuning mode; yaw is
/// always rate controlled.
pub fn normal_desired(
    manual: &ManualControlCommand,
    settings: &StabilizationSettings,
    mode: TuningMode,
) -> StabilizationDesired {
    let (roll, pitch) = match mode {
        TuningMode::Rate => (
            manual.roll * settings.manual_rate.roll,
            manual.pitch * settings.manual_rate.pitch,
        ),
        TuningMode::Attitude => (
            manual.roll * settings.roll_max,
            manual.pitch * settings.pitch_max,
        ),
    };

    let mut desired = StabilizationDesired {
        roll,
        pitch,
        yaw: manual.yaw * settings.manual_rate.yaw,
        throttle: manual.throttle,
        ..StabilizationDesired::default()
    };
    desired.mode.roll = mode.normal_mode();
    desired.mode.pitch = mode.normal_mode();
    desired.mode.yaw = StabilizationMode::Rate;
    desired
}

fn stored_normal_desired<S: SettingsAccessor>(store: &S) -> StabilizationDesired {
    normal_desired(
        &store.manual_control(),
        &store.stabilization_settings(),
        store.relay_tuning_settings().mode,
    )
}
