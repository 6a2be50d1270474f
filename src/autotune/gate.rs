// src/autotune/gate.rs

//! Safety gate and flight-condition checks for a tuning session.
//!
//! [`session_active`] is the only test for whether a session may run. It is
//! evaluated before any phase logic on every tick, and a closed gate sends
//! the state machine back to idle from any phase.

use crate::records::{ArmedState, FlightMode, FlightStatus};

/// Returns `true` while the pilot has autotune selected.
pub fn session_active(status: &FlightStatus) -> bool {
    status.flight_mode == FlightMode::Autotune
}

/// Returns `true` once the vehicle is armed with throttle applied.
pub fn ready_to_start(status: &FlightStatus, throttle: f32) -> bool {
    status.armed == ArmedState::Armed && throttle > 0.0
}

/// Returns `true` once the vehicle is disarmed with the throttle at idle.
pub fn safely_landed(status: &FlightStatus, throttle: f32) -> bool {
    status.armed == ArmedState::Disarmed && throttle <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(armed: ArmedState, flight_mode: FlightMode) -> FlightStatus {
        FlightStatus { armed, flight_mode }
    }

    /// Test that only the autotune flight mode opens the gate.
    #[test]
    fn test_gate_session_active_only_in_autotune() {
        assert!(session_active(&status(
            ArmedState::Disarmed,
            FlightMode::Autotune
        )));
        for mode in [
            FlightMode::Manual,
            FlightMode::Stabilized1,
            FlightMode::Stabilized2,
            FlightMode::Stabilized3,
            FlightMode::AltitudeHold,
            FlightMode::PositionHold,
        ] {
            assert!(!session_active(&status(ArmedState::Armed, mode)));
        }
    }

    /// Test the start condition requires both armed and throttle.
    #[test]
    fn test_gate_ready_to_start() {
        let armed = status(ArmedState::Armed, FlightMode::Autotune);
        assert!(ready_to_start(&armed, 0.1));
        assert!(!ready_to_start(&armed, 0.0));
        assert!(!ready_to_start(
            &status(ArmedState::Arming, FlightMode::Autotune),
            0.5
        ));
        assert!(!ready_to_start(
            &status(ArmedState::Disarmed, FlightMode::Autotune),
            0.5
        ));
    }

    /// Test the landing condition requires both disarmed and idle throttle.
    #[test]
    fn test_gate_safely_landed() {
        let disarmed = status(ArmedState::Disarmed, FlightMode::Autotune);
        assert!(safely_landed(&disarmed, 0.0));
        assert!(safely_landed(&disarmed, -1.0));
        assert!(!safely_landed(&disarmed, 0.05));
        assert!(!safely_landed(
            &status(ArmedState::Arming, FlightMode::Autotune),
            0.0
        ));
        assert!(!safely_landed(
            &status(ArmedState::Armed, FlightMode::Autotune),
            0.0
        ));
    }
}
