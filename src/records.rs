// src/records.rs

//! # Settings Records
//!
//! Typed snapshots of the records the autotune module reads and writes
//! through a [`SettingsAccessor`](crate::accessor::SettingsAccessor).
//! Every record is a plain `Copy` value: the accessor hands out a fresh copy
//! on each read and publishes a whole record on each write, so a consumer
//! never observes a half-updated record.

/// Control axis of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Rotation about the longitudinal axis.
    Roll,
    /// Rotation about the lateral axis.
    Pitch,
    /// Rotation about the vertical axis.
    Yaw,
}

/// Flight mode selected by the pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlightMode {
    /// Direct passthrough of stick inputs.
    #[default]
    Manual,
    /// First configurable stabilized mode.
    Stabilized1,
    /// Second configurable stabilized mode.
    Stabilized2,
    /// Third configurable stabilized mode.
    Stabilized3,
    /// Relay autotuning of the roll and pitch loops.
    Autotune,
    /// Altitude hold.
    AltitudeHold,
    /// Position hold.
    PositionHold,
}

/// Arming state of the vehicle.
///
/// `Arming` is the transient state while the arming gesture is held; it
/// counts as neither armed nor disarmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmedState {
    /// Motors are disabled.
    #[default]
    Disarmed,
    /// Arming gesture in progress.
    Arming,
    /// Motors are live.
    Armed,
}

/// Snapshot of the flight status record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlightStatus {
    /// Arming state.
    pub armed: ArmedState,
    /// Selected flight mode.
    pub flight_mode: FlightMode,
}

/// Normalized manual control input.
///
/// Roll, pitch and yaw are in `[-1, 1]`. Throttle is in `[-1, 1]` with
/// zero or below meaning idle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManualControlCommand {
    /// Roll stick.
    pub roll: f32,
    /// Pitch stick.
    pub pitch: f32,
    /// Yaw stick.
    pub yaw: f32,
    /// Throttle stick.
    pub throttle: f32,
}

/// Gains of one PID loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains<T> {
    /// Proportional gain.
    pub kp: T,
    /// Integral gain.
    pub ki: T,
    /// Derivative gain. Zero for the attitude PI loops.
    pub kd: T,
    /// Upper limit for the integral term to prevent windup.
    pub i_limit: T,
}

/// Per-axis values for roll, pitch and yaw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisValues<T> {
    /// Roll value.
    pub roll: T,
    /// Pitch value.
    pub pitch: T,
    /// Yaw value.
    pub yaw: T,
}

impl<T: Copy> AxisValues<T> {
    /// Returns the value for `axis`.
    pub fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::Roll => self.roll,
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
        }
    }
}

/// Stabilization loop settings shared with the stabilization module.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StabilizationSettings {
    /// Inner rate loop gains per axis.
    pub rate_pid: AxisValues<PidGains<f32>>,
    /// Outer attitude loop gains per axis.
    pub attitude_pi: AxisValues<PidGains<f32>>,
    /// Stick-to-rate scale factors (deg/s at full stick).
    pub manual_rate: AxisValues<f32>,
    /// Maximum commanded roll angle (deg).
    pub roll_max: f32,
    /// Maximum commanded pitch angle (deg).
    pub pitch_max: f32,
}

impl StabilizationSettings {
    /// Creates settings with the factory defaults.
    pub fn new() -> Self {
        let rate = PidGains {
            kp: 0.003,
            ki: 0.003,
            kd: 0.000_02,
            i_limit: 0.3,
        };
        let attitude = PidGains {
            kp: 2.5,
            ki: 0.0,
            kd: 0.0,
            i_limit: 50.0,
        };
        Self {
            rate_pid: AxisValues {
                roll: rate,
                pitch: rate,
                yaw: PidGains { kp: 0.0035, ki: 0.0035, ..rate },
            },
            attitude_pi: AxisValues {
                roll: attitude,
                pitch: attitude,
                yaw: attitude,
            },
            manual_rate: AxisValues {
                roll: 150.0,
                pitch: 150.0,
                yaw: 150.0,
            },
            roll_max: 55.0,
            pitch_max: 55.0,
        }
    }

    /// Returns a mutable reference to the rate loop gains of `axis`.
    pub fn rate_pid_mut(&mut self, axis: Axis) -> &mut PidGains<f32> {
        match axis {
            Axis::Roll => &mut self.rate_pid.roll,
            Axis::Pitch => &mut self.rate_pid.pitch,
            Axis::Yaw => &mut self.rate_pid.yaw,
        }
    }

    /// Returns a mutable reference to the attitude loop gains of `axis`.
    pub fn attitude_pi_mut(&mut self, axis: Axis) -> &mut PidGains<f32> {
        match axis {
            Axis::Roll => &mut self.attitude_pi.roll,
            Axis::Pitch => &mut self.attitude_pi.pitch,
            Axis::Yaw => &mut self.attitude_pi.yaw,
        }
    }
}

impl Default for StabilizationSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Which control loop the relay excites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuningMode {
    /// Relay on the inner rate loop.
    #[default]
    Rate,
    /// Relay on the outer attitude loop.
    Attitude,
}

/// How far a finished session carries its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuningBehavior {
    /// Keep the measurement only; gains are not computed.
    #[default]
    Measure,
    /// Apply the computed gains to the live settings.
    Compute,
    /// Apply the computed gains and save them to durable storage.
    Save,
}

/// Relay tuning configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayTuningSettings {
    /// Excited loop.
    pub mode: TuningMode,
    /// Result handling.
    pub behavior: TuningBehavior,
}

/// Oscillation measured on one axis while the relay was engaged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayMeasurement {
    /// Oscillation period (ms).
    pub period_ms: f32,
    /// Oscillation amplitude ratio.
    pub gain: f32,
}

/// Relay measurements produced by the stabilization module.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayTuningResult {
    /// Roll axis measurement.
    pub roll: RelayMeasurement,
    /// Pitch axis measurement.
    pub pitch: RelayMeasurement,
}

impl RelayTuningResult {
    /// Returns the measurement for a tunable axis.
    pub fn axis(&self, axis: TunedAxis) -> RelayMeasurement {
        match axis {
            TunedAxis::Roll => self.roll,
            TunedAxis::Pitch => self.pitch,
        }
    }
}

/// Axes the relay tuner measures. Yaw is never excited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TunedAxis {
    /// Roll axis.
    Roll,
    /// Pitch axis.
    Pitch,
}

impl From<TunedAxis> for Axis {
    fn from(axis: TunedAxis) -> Self {
        match axis {
            TunedAxis::Roll => Axis::Roll,
            TunedAxis::Pitch => Axis::Pitch,
        }
    }
}

/// Control mode requested from the stabilization module for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StabilizationMode {
    /// Angular rate control.
    #[default]
    Rate,
    /// Attitude angle control.
    Attitude,
    /// Relay excitation of the rate loop.
    RelayRate,
    /// Relay excitation of the attitude loop.
    RelayAttitude,
}

impl StabilizationMode {
    /// Returns `true` for the relay excitation modes.
    pub fn is_relay(self) -> bool {
        matches!(
            self,
            StabilizationMode::RelayRate | StabilizationMode::RelayAttitude
        )
    }
}

impl TuningMode {
    /// Normal (non-relay) mode for the roll and pitch axes.
    pub fn normal_mode(self) -> StabilizationMode {
        match self {
            TuningMode::Rate => StabilizationMode::Rate,
            TuningMode::Attitude => StabilizationMode::Attitude,
        }
    }

    /// Relay mode used while an axis is measured.
    pub fn relay_mode(self) -> StabilizationMode {
        match self {
            TuningMode::Rate => StabilizationMode::RelayRate,
            TuningMode::Attitude => StabilizationMode::RelayAttitude,
        }
    }
}

/// Setpoint record consumed by the stabilization module.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StabilizationDesired {
    /// Control mode per axis.
    pub mode: AxisValues<StabilizationMode>,
    /// Roll command (deg/s or deg depending on mode).
    pub roll: f32,
    /// Pitch command (deg/s or deg depending on mode).
    pub pitch: f32,
    /// Yaw rate command (deg/s).
    pub yaw: f32,
    /// Throttle passthrough.
    pub throttle: f32,
}

impl StabilizationDesired {
    /// Returns `true` if any axis is in a relay mode.
    pub fn has_relay_axis(&self) -> bool {
        self.mode.roll.is_relay() || self.mode.pitch.is_relay() || self.mode.yaw.is_relay()
    }
}

/// State of an optional firmware module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleState {
    /// Module is not started.
    #[default]
    Disabled,
    /// Module is started at boot.
    Enabled,
}

/// Hardware settings relevant to this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HwSettings {
    /// Optional module flag for autotune.
    pub autotune: ModuleState,
}
