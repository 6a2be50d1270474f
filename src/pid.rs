// src/pid.rs

//! # PID Control Module
//!
//! This module builds the stabilization loop controllers that consume the
//! tuned gains: a PID controller for the inner rate loop and a PI controller
//! for the outer attitude loop of each axis. Controllers are
//! [`piddiy::PidController`]s driven by the compute callbacks defined here,
//! generic over any [`Number`] type, including fixed-point types.
//!
//! [`CascadeControllers::from_settings`] is where gains applied by a
//! committed tuning session reach the control loops.

pub mod attitude;
pub use attitude::*;
pub mod rate;
pub use rate::*;

use crate::records::{Axis, StabilizationSettings};
use piddiy::{Number as PiddiyNumber, PidController};

/// Custom trait to encapsulate base number requirements.
pub trait Number: PiddiyNumber {
    /// Clamps generic PartialOrd values within a given range.
    fn clamp(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if max < self {
            max
        } else {
            self
        }
    }
}

impl<T: PiddiyNumber> Number for T {}

/// Rate and attitude controllers for one axis.
pub struct CascadeControllers<T: Number> {
    /// Inner rate loop.
    pub rate: PidController<T, RateControlData<T>>,
    /// Outer attitude loop.
    pub attitude: PidController<T, AttitudeControlData<T>>,
    /// Rate loop integral limit.
    pub rate_i_limit: T,
    /// Attitude loop integral limit.
    pub attitude_i_limit: T,
}

impl CascadeControllers<f32> {
    /// Builds the controllers of `axis` from the stabilization settings.
    pub fn from_settings(settings: &StabilizationSettings, axis: Axis) -> Self {
        let rate_gains = settings.rate_pid.get(axis);
        let attitude_gains = settings.attitude_pi.get(axis);
        Self {
            rate: rate_controller(&rate_gains),
            attitude: attitude_controller(&attitude_gains),
            rate_i_limit: rate_gains.i_limit,
            attitude_i_limit: attitude_gains.i_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{apply_gains, relay_gains, ROLL_RATIOS};
    use crate::records::TunedAxis;

    /// Test that controllers built after tuning carry the tuned gains.
    #[test]
    fn test_pid_cascade_from_tuned_settings() {
        let mut settings = StabilizationSettings::new();
        let gains = relay_gains(500.0, 0.3, &ROLL_RATIOS);
        apply_gains(&mut settings, TunedAxis::Roll, &gains);

        let roll = CascadeControllers::from_settings(&settings, Axis::Roll);
        assert_eq!(roll.rate.kp, gains.rate_kp);
        assert_eq!(roll.rate.ki, gains.rate_ki);
        assert_eq!(roll.rate.kd, settings.rate_pid.roll.kd);
        assert_eq!(roll.attitude.kp, gains.attitude_kp);
        assert_eq!(roll.attitude.ki, gains.attitude_ki);
        assert_eq!(roll.attitude.kd, 0.0);
        assert_eq!(roll.rate_i_limit, settings.rate_pid.roll.i_limit);

        let yaw = CascadeControllers::from_settings(&settings, Axis::Yaw);
        assert_eq!(yaw.rate.kp, settings.rate_pid.yaw.kp);
    }
}
