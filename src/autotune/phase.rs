// src/autotune/phase.rs

//! Tuning phases and their transitions.

use crate::autotune::gate;
use crate::autotune::AutotuneConfig;
use crate::records::{FlightStatus, TunedAxis};
use crate::system::elapsed_ms;

/// Phase of a tuning session, ordered along the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Waiting for the vehicle to be armed and flying.
    Init,
    /// Flying in normal control before excitation.
    Start,
    /// Relay engaged on roll.
    Roll,
    /// Relay engaged on pitch.
    Pitch,
    /// Both axes measured, waiting for landing.
    Finished,
    /// Landed, applying the result.
    Commit,
}

/// Session state. Timed phases carry the tick at which they were entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuningPhase {
    /// Waiting for the vehicle to be armed and flying.
    #[default]
    Init,
    /// Flying in normal control before excitation.
    Start {
        /// Entry time (ms).
        since_ms: u32,
    },
    /// Relay engaged on roll.
    Roll {
        /// Entry time (ms).
        since_ms: u32,
    },
    /// Relay engaged on pitch.
    Pitch {
        /// Entry time (ms).
        since_ms: u32,
    },
    /// Both axes measured, waiting for landing.
    Finished,
    /// Landed, applying the result.
    Commit,
}

impl TuningPhase {
    /// Returns the phase without its timestamp.
    pub fn phase(&self) -> Phase {
        match self {
            TuningPhase::Init => Phase::Init,
            TuningPhase::Start { .. } => Phase::Start,
            TuningPhase::Roll { .. } => Phase::Roll,
            TuningPhase::Pitch { .. } => Phase::Pitch,
            TuningPhase::Finished => Phase::Finished,
            TuningPhase::Commit => Phase::Commit,
        }
    }

    /// Returns the axis driven by the relay in this phase.
    pub fn relay_axis(&self) -> Option<TunedAxis> {
        match self {
            TuningPhase::Roll { .. } => Some(TunedAxis::Roll),
            TuningPhase::Pitch { .. } => Some(TunedAxis::Pitch),
            TuningPhase::Init
            | TuningPhase::Start { .. }
            | TuningPhase::Finished
            | TuningPhase::Commit => None,
        }
    }

    /// Computes the phase for the next tick.
    ///
    /// `throttle` is the commanded throttle of this tick. Timed phases move
    /// on once the elapsed time reaches their threshold.
    pub fn next(
        self,
        now_ms: u32,
        status: &FlightStatus,
        throttle: f32,
        config: &AutotuneConfig,
    ) -> TuningPhase {
        let elapsed = |since_ms: u32| elapsed_ms(now_ms, since_ms);

        match self {
            TuningPhase::Init => {
                if gate::ready_to_start(status, throttle) {
                    TuningPhase::Start { since_ms: now_ms }
                } else {
                    TuningPhase::Init
                }
            }
            TuningPhase::Start { since_ms } => {
                if elapsed(since_ms) >= config.prepare_time_ms {
                    TuningPhase::Roll { since_ms: now_ms }
                } else {
                    self
                }
            }
            TuningPhase::Roll { since_ms } => {
                if elapsed(since_ms) >= config.measure_time_ms {
                    TuningPhase::Pitch { since_ms: now_ms }
                } else {
                    self
                }
            }
            TuningPhase::Pitch { since_ms } => {
                if elapsed(since_ms) >= config.measure_time_ms {
                    TuningPhase::Finished
                } else {
                    self
                }
            }
            TuningPhase::Finished => {
                if gate::safely_landed(status, throttle) {
                    TuningPhase::Commit
                } else {
                    TuningPhase::Finished
                }
            }
            TuningPhase::Commit => TuningPhase::Init,
        }
    }
}
