// src/lib.rs

//! # Relay Autotune for Flight Stabilization
//!
//! This crate provides a `no_std`, no-alloc relay-feedback autotuner for the
//! roll and pitch loops of a flight controller. It runs on the vehicle:
//! while the pilot holds the autotune flight mode it engages a relay on
//! each axis in turn, and once the vehicle has landed it turns the measured
//! oscillation period and amplitude into new rate and attitude loop gains.
//!
//! The engine is driven by a periodic loop and talks to the rest of the
//! firmware only through the [`SettingsAccessor`], [`Watchdog`] and
//! [`TaskMonitor`] traits, so it runs unchanged on the host against
//! [`MockSettings`].

#![no_std]
#![deny(missing_docs)]

mod log;

pub mod accessor;
pub mod autotune;
pub mod error;
pub mod pid;
pub mod records;
pub mod system;
pub mod tuning;

#[doc(inline)]
pub use accessor::{MockSettings, RecordKind, SettingsAccessor};
#[doc(inline)]
pub use autotune::{Autotune, AutotuneConfig, AutotuneTask, Phase, TickOutcome, TuningPhase};
#[doc(inline)]
pub use error::{AutotuneError, StorageError, TuningError};
#[doc(inline)]
pub use system::{TaskInfo, TaskMonitor, TimeSource, Watchdog};

#[cfg(test)]
mod test_utils;
