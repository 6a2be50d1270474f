// src/tuning.rs

//! # Relay Tuning Module
//!
//! This module turns relay oscillation measurements into rate and attitude
//! loop gains and applies them to the stabilization settings according to
//! the configured [`TuningBehavior`](crate::records::TuningBehavior).

pub mod commit;
pub use commit::*;
pub mod relay;
pub use relay::*;
