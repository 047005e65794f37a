//! Pacing constants for drivers.
//!
//! The core has no clock; a driver runs steps at an instruction rate and ticks
//! the timers at [`TIMER_HZ`].

/// Rate at which the delay and sound timers count down.
pub const TIMER_HZ: u32 = 60;

/// Instruction rate a driver paces at when asked for real time without an
/// explicit rate.
pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;

/// Number of steps to run between two 60 Hz timer ticks at `rate` steps per
/// second. Never returns zero.
#[must_use]
pub const fn steps_per_timer_tick(rate: u32) -> u32 {
    let steps = rate / TIMER_HZ;
    if steps == 0 {
        1
    } else {
        steps
    }
}

/// Nanoseconds between two steps at `rate` steps per second.
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn step_interval_nanos(rate: u32) -> u64 {
    if rate == 0 {
        0
    } else {
        1_000_000_000 / rate as u64
    }
}
