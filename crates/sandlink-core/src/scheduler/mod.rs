//! Host event-loop timer scheduling.
//!
//! Devices never own their timing: the host event loop does. [`Scheduler`]
//! is the seam between the two — a device registers a recurring callback and
//! holds only the opaque [`TimerId`] the scheduler mints.

pub mod manual;
pub mod runtime;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

use std::time::Duration;

use crate::error::SchedulerError;

/// Opaque identifier for a registered timer.
///
/// Minted by the scheduler; holders never invent or reuse ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub(crate) u64);

/// Callback invoked on every timer firing.
///
/// Runs on the host event loop, so it must return quickly and never block.
pub type TimerCallback = Box<dyn FnMut() + Send>;

/// Recurring-timer registration seam between devices and the host event loop.
pub trait Scheduler: Send + Sync {
    /// Register `callback` to run every `period`. The first firing happens
    /// one full period after registration.
    fn register_repeating(
        &self,
        period: Duration,
        callback: TimerCallback,
    ) -> Result<TimerId, SchedulerError>;

    /// Cancel a previously registered timer.
    ///
    /// Best-effort: returns `false` for unknown or already-cancelled ids. A
    /// firing already in flight may still complete.
    fn cancel(&self, id: TimerId) -> bool;
}
