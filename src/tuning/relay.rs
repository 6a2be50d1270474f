// src/tuning/relay.rs

//! # Relay Tuning Gains
//!
//! A relay in the loop drives the axis into a bounded oscillation at the
//! ultimate frequency. From the oscillation period `Tu` and the amplitude
//! ratio `a` the ultimate gain is `Ku = 4 / (π a)`. The rate loop crossover
//! is then placed at a fixed fraction of the ultimate frequency, with the
//! controller zero a further fraction below it. The attitude loop sees the
//! closed rate loop as an integrator, so its gains follow from its own
//! crossover directly.

use crate::error::TuningError;
use crate::records::{RelayMeasurement, StabilizationSettings, TunedAxis};
use core::f32::consts::PI;

/// Bandwidth ratios used to place the loop crossovers for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisRatios {
    /// Rate loop crossover as a fraction of the ultimate frequency.
    pub gain_inner: f32,
    /// Rate loop zero as a fraction of its crossover.
    pub zero_inner: f32,
    /// Attitude loop crossover as a fraction of the rate loop crossover.
    pub gain_outer: f32,
    /// Attitude loop zero as a fraction of its crossover.
    pub zero_outer: f32,
}

/// Ratios for the roll axis.
pub const ROLL_RATIOS: AxisRatios = AxisRatios {
    gain_inner: 1.0 / 3.0,
    zero_inner: 1.0 / 3.0,
    gain_outer: 1.0 / 3.0,
    zero_outer: 1.0 / 3.0,
};

/// Ratios for the pitch axis. Pitch has less actuator authority, so its
/// loops are placed lower.
pub const PITCH_RATIOS: AxisRatios = AxisRatios {
    gain_inner: 1.0 / 5.0,
    zero_inner: 1.0 / 5.0,
    gain_outer: 1.0 / 5.0,
    zero_outer: 1.0 / 5.0,
};

impl TunedAxis {
    /// Returns the bandwidth ratios for this axis.
    pub fn ratios(self) -> AxisRatios {
        match self {
            TunedAxis::Roll => ROLL_RATIOS,
            TunedAxis::Pitch => PITCH_RATIOS,
        }
    }
}

/// Gains derived from one relay measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TunedGains {
    /// Rate loop proportional gain.
    pub rate_kp: f32,
    /// Rate loop integral gain.
    pub rate_ki: f32,
    /// Attitude loop proportional gain.
    pub attitude_kp: f32,
    /// Attitude loop integral gain.
    pub attitude_ki: f32,
}

/// Gains for both measured axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TunedAxes {
    /// Roll gains.
    pub roll: TunedGains,
    /// Pitch gains.
    pub pitch: TunedGains,
}

/// Computes loop gains from an oscillation period (ms) and amplitude ratio.
///
/// Pure: identical inputs always yield bit-identical gains. Inputs are not
/// checked; see [`tune_axis`].
pub fn relay_gains(period_ms: f32, gain: f32, ratios: &AxisRatios) -> TunedGains {
    // Ultimate frequency (rad/s)
    let wu = 1000.0 * 2.0 * PI / period_ms;

    // Rate loop crossover and controller zero (rad/s)
    let wc = wu * ratios.gain_inner;
    let zc = wc * ratios.zero_inner;

    let kpu = 4.0 / PI / gain;
    let rate_kp = kpu * ratios.gain_inner;
    let rate_ki = zc * rate_kp;

    // Attitude loop, plant is the integral of the closed rate loop
    let wc2 = wc * ratios.gain_outer;
    let attitude_kp = wc2;
    let attitude_ki = wc2 * ratios.zero_outer * attitude_kp;

    TunedGains {
        rate_kp,
        rate_ki,
        attitude_kp,
        attitude_ki,
    }
}

/// Computes gains for `axis`, rejecting measurements that are not finite
/// and positive.
pub fn tune_axis(axis: TunedAxis, measurement: RelayMeasurement) -> Result<TunedGains, TuningError> {
    let usable = |value: f32| value.is_finite() && value > 0.0;
    if !usable(measurement.period_ms) || !usable(measurement.gain) {
        return Err(TuningError::InvalidMeasurement {
            axis,
            period_ms: measurement.period_ms,
            gain: measurement.gain,
        });
    }

    let gains = relay_gains(measurement.period_ms, measurement.gain, &axis.ratios());
    let finite = gains.rate_kp.is_finite()
        && gains.rate_ki.is_finite()
        && gains.attitude_kp.is_finite()
        && gains.attitude_ki.is_finite();
    if !finite {
        return Err(TuningError::InvalidMeasurement {
            axis,
            period_ms: measurement.period_ms,
            gain: measurement.gain,
        });
    }
    Ok(gains)
}

/// Writes `gains` into the rate and attitude loops of `axis`.
///
/// Only the proportional and integral terms change; derivative gains and
/// integral limits keep their configured values.
pub fn apply_gains(settings: &mut StabilizationSettings, axis: TunedAxis, gains: &TunedGains) {
    let rate = settings.rate_pid_mut(axis.into());
    rate.kp = gains.rate_kp;
    rate.ki = gains.rate_ki;

    let attitude = settings.attitude_pi_mut(axis.into());
    attitude.kp = gains.attitude_kp;
    attitude.ki = gains.attitude_ki;
}
