// src/tuning/commit.rs

//! Applies a finished session's result according to the configured
//! [`TuningBehavior`].

use crate::accessor::{RecordKind, SettingsAccessor};
use crate::error::{AutotuneError, TuningError};
use crate::log::{log_error, log_info, log_warn};
use crate::records::{TunedAxis, TuningBehavior};
use crate::tuning::relay::{apply_gains, tune_axis, TunedAxes};

/// What a commit did with the measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommitReport {
    /// Measure-only session; nothing was computed or written.
    Discarded,
    /// Gains were applied to the live settings.
    Applied(TunedAxes),
    /// Gains were applied and saved to durable storage.
    Saved(TunedAxes),
}

/// Computes gains from the latest relay measurements and handles them per
/// the configured behavior.
///
/// Both axes are computed before anything is written, so a rejected
/// measurement leaves the settings untouched. A failed save is returned
/// as an error but the applied in-memory settings are kept.
pub fn commit_tuning<S: SettingsAccessor>(store: &mut S) -> Result<CommitReport, AutotuneError> {
    let behavior = store.relay_tuning_settings().behavior;
    if behavior == TuningBehavior::Measure {
        log_info!("autotune: measure only, gains not computed");
        return Ok(CommitReport::Discarded);
    }

    let result = store.relay_tuning_result();
    let tune = |axis| tune_axis(axis, result.axis(axis)).map_err(reject);
    let tuned = TunedAxes {
        roll: tune(TunedAxis::Roll)?,
        pitch: tune(TunedAxis::Pitch)?,
    };

    let mut settings = store.stabilization_settings();
    apply_gains(&mut settings, TunedAxis::Roll, &tuned.roll);
    apply_gains(&mut settings, TunedAxis::Pitch, &tuned.pitch);
    store.set_stabilization_settings(settings);
    log_info!(
        "autotune: applied roll kp {} ki {}, pitch kp {} ki {}",
        tuned.roll.rate_kp,
        tuned.roll.rate_ki,
        tuned.pitch.rate_kp,
        tuned.pitch.rate_ki
    );

    if behavior == TuningBehavior::Compute {
        return Ok(CommitReport::Applied(tuned));
    }

    if let Err(error) = store.persist(RecordKind::StabilizationSettings) {
        log_error!("autotune: saving tuned gains failed: {:?}", error);
        return Err(error.into());
    }
    Ok(CommitReport::Saved(tuned))
}

fn reject(error: TuningError) -> AutotuneError {
    log_warn!("autotune: {:?}, settings unchanged", error);
    error.into()
}
