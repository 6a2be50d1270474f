// src/pid/attitude.rs

//! # Attitude Loop Controller
//!
//! Outer loop PI: turns an attitude error into the rate command for the
//! inner loop. The derivative term is always zero.

use crate::pid::Number;
use crate::records::PidGains;
use piddiy::PidController;

/// Control data for the attitude loop compute callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeControlData<T> {
    /// Measured attitude angle, typically from the estimator.
    pub angle: T,
    /// The time delta since the last computation.
    pub dt: T,
    /// The maximum allowed value for the integral term.
    pub integral_limit: T,
    /// Flag to reset the integral term.
    pub reset_integral: bool,
}

/// Attitude loop compute callback.
pub fn compute_attitude<T: Number>(
    pid: &mut PidController<T, AttitudeControlData<T>>,
    data: AttitudeControlData<T>,
) -> (T, T, T) {
    let error = pid.set_point - data.angle;
    let integral = if data.reset_integral {
        T::zero()
    } else {
        (pid.integral + error * data.dt).clamp(-data.integral_limit, data.integral_limit)
    };

    (error, integral, T::zero())
}

/// Builds an attitude loop controller from `gains`. The derivative gain is
/// ignored.
pub fn attitude_controller<T: Number>(
    gains: &PidGains<T>,
) -> PidController<T, AttitudeControlData<T>> {
    let mut pid = PidController::new();
    pid.compute_fn(compute_attitude)
        .set_point(T::zero())
        .kp(gains.kp)
        .ki(gains.ki)
        .kd(T::zero());
    pid
}
