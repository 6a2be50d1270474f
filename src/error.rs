// src/error.rs

//! Error types for relay tuning and settings storage.

use crate::records::TunedAxis;
use core::fmt;

/// Errors reported by the settings store when saving a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// The write to durable storage failed.
    WriteFailed,
    /// No space is left for the record.
    NoSpace,
    /// The storage backend is not available.
    Unavailable,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::WriteFailed => write!(f, "settings write failed"),
            StorageError::NoSpace => write!(f, "no space left for settings"),
            StorageError::Unavailable => write!(f, "settings storage unavailable"),
        }
    }
}

/// Errors from the relay tuning computation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuningError {
    /// The measured period or gain cannot produce usable gains.
    InvalidMeasurement {
        /// Axis the measurement belongs to.
        axis: TunedAxis,
        /// Measured oscillation period (ms).
        period_ms: f32,
        /// Measured oscillation amplitude ratio.
        gain: f32,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::InvalidMeasurement {
                axis,
                period_ms,
                gain,
            } => write!(
                f,
                "invalid {:?} relay measurement (period {} ms, gain {})",
                axis, period_ms, gain
            ),
        }
    }
}

/// Errors surfaced when a tuning session commits its result.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutotuneError {
    /// Gains could not be computed; settings were left untouched.
    Tuning(TuningError),
    /// Gains were applied but saving them failed.
    Storage(StorageError),
}

impl From<TuningError> for AutotuneError {
    fn from(error: TuningError) -> Self {
        AutotuneError::Tuning(error)
    }
}

impl From<StorageError> for AutotuneError {
    fn from(error: StorageError) -> Self {
        AutotuneError::Storage(error)
    }
}

impl fmt::Display for AutotuneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutotuneError::Tuning(error) => write!(f, "tuning failed: {}", error),
            AutotuneError::Storage(error) => write!(f, "saving tuned gains failed: {}", error),
        }
    }
}
