// src/system.rs

//! System collaborators of the autotune task: the watchdog, the task
//! monitor and the millisecond time source.

/// Watchdog flag owned by the autotune task.
///
/// Once registered the flag must be updated on every tick. A flag that goes
/// stale is treated as a hung task by the system.
pub trait Watchdog {
    /// Registers the flag. Called once at task start.
    fn register_flag(&mut self);

    /// Refreshes the flag.
    fn update_flag(&mut self);
}

/// Descriptor published to the task monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskInfo {
    /// Task name.
    pub name: &'static str,
    /// Stack size (bytes).
    pub stack_bytes: u32,
    /// Priority above the idle task.
    pub priority: u8,
}

/// Task monitor used for diagnostic visibility.
pub trait TaskMonitor {
    /// Registers a running task.
    fn register_task(&mut self, task: TaskInfo);
}

/// Monotonic millisecond clock.
///
/// The counter may wrap; see [`elapsed_ms`].
pub trait TimeSource {
    /// Returns the current time in milliseconds since system start.
    fn now_ms(&self) -> u32;
}

/// Returns the time elapsed from `since_ms` to `now_ms`, across a counter
/// wrap.
pub fn elapsed_ms(now_ms: u32, since_ms: u32) -> u32 {
    now_ms.wrapping_sub(since_ms)
}
