// src/pid/rate.rs

//! # Rate Loop Controller
//!
//! Inner loop PID: tracks a commanded angular rate against the gyro.

use crate::pid::Number;
use crate::records::PidGains;
use piddiy::PidController;

/// Control data for the rate loop compute callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateControlData<T> {
    /// Measured angular rate, typically reported by a gyro.
    pub rate: T,
    /// The time delta since the last computation.
    pub dt: T,
    /// The maximum allowed value for the integral term.
    pub integral_limit: T,
    /// Flag to reset the integral term, typically on the ground.
    pub reset_integral: bool,
}

/// Rate loop compute callback.
pub fn compute_rate<T: Number>(
    pid: &mut PidController<T, RateControlData<T>>,
    data: RateControlData<T>,
) -> (T, T, T) {
    let error = pid.set_point - data.rate;
    let integral = if data.reset_integral {
        T::zero()
    } else {
        (pid.integral + error * data.dt).clamp(-data.integral_limit, data.integral_limit)
    };
    let derivative = (error - pid.error) / data.dt;

    (error, integral, derivative)
}

/// Builds a rate loop controller from `gains`.
pub fn rate_controller<T: Number>(gains: &PidGains<T>) -> PidController<T, RateControlData<T>> {
    let mut pid = PidController::new();
    pid.compute_fn(compute_rate)
        .set_point(T::zero())
        .kp(gains.kp)
        .ki(gains.ki)
        .kd(gains.kd);
    pid
}
