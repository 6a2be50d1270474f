// src/test_utils.rs

//! This module contains utilities for testing.

use crate::system::{TaskInfo, TaskMonitor, TimeSource, Watchdog};
use core::cell::Cell;
use embedded_hal::delay::DelayNs;
use num_traits::float::FloatCore;

/// A constant defining the tolerance within which floating-point values
/// are considered close enough to be equal.
pub const TEST_TOLERANCE: f32 = 1e-5;

/// Checks if two floating point numbers are close enough to be considered
/// equal.
///
/// # Arguments
/// * `target` - The target value.
/// * `value` - The value to compare against the target.
///
/// # Returns
/// `true` if the absolute difference between `target` and `value` is less than
/// `TEST_TOLERANCE`, otherwise `false`.
pub fn value_close(target: f32, value: f32) -> bool {
    value_close_within(target, value, TEST_TOLERANCE)
}

/// Checks if two floating point numbers are within `tolerance` of each
/// other. Used for hand-derived reference values.
pub fn value_close_within(target: f32, value: f32, tolerance: f32) -> bool {
    FloatCore::abs(target - value) < tolerance
}

/// Watchdog double that counts registrations and updates.
#[derive(Debug, Default)]
pub struct CountingWatchdog {
    pub registrations: u32,
    pub updates: u32,
}

impl Watchdog for CountingWatchdog {
    fn register_flag(&mut self) {
        self.registrations += 1;
    }

    fn update_flag(&mut self) {
        self.updates += 1;
    }
}

/// Task monitor double that records registrations.
#[derive(Debug, Default)]
pub struct RecordingMonitor {
    pub tasks: u32,
    pub last: Option<TaskInfo>,
}

impl TaskMonitor for RecordingMonitor {
    fn register_task(&mut self, task: TaskInfo) {
        self.tasks += 1;
        self.last = Some(task);
    }
}

/// Manually advanced millisecond clock.
#[derive(Debug, Default)]
pub struct TestClock {
    now_ms: Cell<u32>,
}

impl TestClock {
    pub fn set(&self, now_ms: u32) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now_ms.set(self.now_ms.get().wrapping_add(ms));
    }
}

impl TimeSource for TestClock {
    fn now_ms(&self) -> u32 {
        self.now_ms.get()
    }
}

/// Delay double that records requested millisecond delays.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    delays_ms: [u32; 16],
    len: usize,
}

impl RecordingDelay {
    pub fn recorded(&self) -> &[u32] {
        &self.delays_ms[..self.len]
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms[self.len] = ms;
        self.len += 1;
    }
}
