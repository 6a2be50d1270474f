// src/accessor.rs

//! # Settings Accessor
//!
//! The autotune engine never reaches into global settings. Every record it
//! needs is read and written through a [`SettingsAccessor`] passed in by the
//! caller, which lets the state machine run against [`MockSettings`] on the
//! host exactly as it runs against the firmware's object store.

use crate::error::StorageError;
use crate::records::{
    FlightStatus, HwSettings, ManualControlCommand, RelayTuningResult, RelayTuningSettings,
    StabilizationDesired, StabilizationSettings,
};

/// Records the engine saves to durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordKind {
    /// [`StabilizationSettings`].
    StabilizationSettings,
}

/// Synchronous get/set access to the settings records.
///
/// Reads return a fresh copy of the whole record; writes publish a whole
/// record at once.
pub trait SettingsAccessor {
    /// Reads the flight status.
    fn flight_status(&self) -> FlightStatus;

    /// Reads the latest manual control command.
    fn manual_control(&self) -> ManualControlCommand;

    /// Reads the stabilization settings.
    fn stabilization_settings(&self) -> StabilizationSettings;

    /// Publishes new stabilization settings to the live control loop.
    fn set_stabilization_settings(&mut self, settings: StabilizationSettings);

    /// Reads the relay tuning configuration.
    fn relay_tuning_settings(&self) -> RelayTuningSettings;

    /// Reads the latest relay measurements.
    fn relay_tuning_result(&self) -> RelayTuningResult;

    /// Publishes the setpoint record for the stabilization module.
    fn set_stabilization_desired(&mut self, desired: StabilizationDesired);

    /// Reads the hardware settings.
    fn hw_settings(&self) -> HwSettings;

    /// Saves the current in-memory copy of `record` to durable storage.
    fn persist(&mut self, record: RecordKind) -> Result<(), StorageError>;
}

/// In-memory settings store for host testing and simulation.
///
/// All records are public so a test can stage inputs between ticks. Writes
/// and save requests are counted.
#[derive(Debug, Clone, Default)]
pub struct MockSettings {
    /// Flight status returned to readers.
    pub flight_status: FlightStatus,
    /// Manual control command returned to readers.
    pub manual_control: ManualControlCommand,
    /// Live stabilization settings.
    pub stabilization_settings: StabilizationSettings,
    /// Relay tuning configuration.
    pub relay_tuning_settings: RelayTuningSettings,
    /// Relay measurements.
    pub relay_tuning_result: RelayTuningResult,
    /// Hardware settings.
    pub hw_settings: HwSettings,
    /// Last published setpoint record, if any.
    pub stabilization_desired: Option<StabilizationDesired>,
    /// Last saved copy of the stabilization settings, if any.
    pub saved_stabilization_settings: Option<StabilizationSettings>,
    /// Number of setpoint writes.
    pub desired_writes: u32,
    /// Number of stabilization settings writes.
    pub settings_writes: u32,
    /// Number of save requests, failed ones included.
    pub persist_calls: u32,
    /// Error returned by every save request while set.
    pub persist_error: Option<StorageError>,
}

impl MockSettings {
    /// Creates a store with default records.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsAccessor for MockSettings {
    fn flight_status(&self) -> FlightStatus {
        self.flight_status
    }

    fn manual_control(&self) -> ManualControlCommand {
        self.manual_control
    }

    fn stabilization_settings(&self) -> StabilizationSettings {
        self.stabilization_settings
    }

    fn set_stabilization_settings(&mut self, settings: StabilizationSettings) {
        self.stabilization_settings = settings;
        self.settings_writes += 1;
    }

    fn relay_tuning_settings(&self) -> RelayTuningSettings {
        self.relay_tuning_settings
    }

    fn relay_tuning_result(&self) -> RelayTuningResult {
        self.relay_tuning_result
    }

    fn set_stabilization_desired(&mut self, desired: StabilizationDesired) {
        self.stabilization_desired = Some(desired);
        self.desired_writes += 1;
    }

    fn hw_settings(&self) -> HwSettings {
        self.hw_settings
    }

    fn persist(&mut self, record: RecordKind) -> Result<(), StorageError> {
        self.persist_calls += 1;
        if let Some(error) = self.persist_error {
            return Err(error);
        }
        match record {
            RecordKind::StabilizationSettings => {
                self.saved_stabilization_settings = Some(self.stabilization_settings);
            }
        }
        Ok(())
    }
}
