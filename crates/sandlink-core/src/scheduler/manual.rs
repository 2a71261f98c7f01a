//! Deterministic scheduler driven by an explicit virtual clock.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{Scheduler, TimerCallback, TimerId};
use crate::error::SchedulerError;

const LOCK_MSG: &str = "manual scheduler lock poisoned";

struct ManualTimer {
    period: Duration,
    next_due: Duration,
    callback: TimerCallback,
}

struct Inner {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<u64, ManualTimer>,
}

/// Scheduler for hosts that own their own loop, and for deterministic tests.
///
/// Nothing fires on its own: [`advance`](ManualScheduler::advance) moves the
/// virtual clock forward and fires every timer that falls due, re-arming
/// each by its period.
pub struct ManualScheduler {
    inner: Mutex<Inner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                now: Duration::ZERO,
                next_id: 1,
                timers: BTreeMap::new(),
            }),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.lock().expect(LOCK_MSG).now
    }

    /// Number of timers currently registered.
    pub fn timer_count(&self) -> usize {
        self.inner.lock().expect(LOCK_MSG).timers.len()
    }

    /// Periods of all registered timers, in registration order.
    pub fn periods(&self) -> Vec<Duration> {
        self.inner
            .lock()
            .expect(LOCK_MSG)
            .timers
            .values()
            .map(|t| t.period)
            .collect()
    }

    /// Advance the virtual clock by `delta`, firing every timer that falls
    /// due. Timers are fired in due-time order; a timer due several times
    /// within `delta` fires once per elapsed period.
    pub fn advance(&self, delta: Duration) {
        let target = self.inner.lock().expect(LOCK_MSG).now + delta;

        loop {
            let next = {
                let inner = self.inner.lock().expect(LOCK_MSG);
                inner
                    .timers
                    .iter()
                    .filter(|(_, t)| t.next_due <= target)
                    .min_by_key(|(id, t)| (t.next_due, **id))
                    .map(|(id, t)| (*id, t.next_due))
            };

            let Some((id, due)) = next else { break };

            // The callback runs outside the lock so it can reach back into
            // the scheduler.
            let mut timer = {
                let mut inner = self.inner.lock().expect(LOCK_MSG);
                inner.now = due;
                match inner.timers.remove(&id) {
                    Some(timer) => timer,
                    None => continue,
                }
            };

            (timer.callback)();
            timer.next_due = due + timer.period;

            self.inner.lock().expect(LOCK_MSG).timers.insert(id, timer);
        }

        self.inner.lock().expect(LOCK_MSG).now = target;
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn register_repeating(
        &self,
        period: Duration,
        callback: TimerCallback,
    ) -> Result<TimerId, SchedulerError> {
        let mut inner = self.inner.lock().expect(LOCK_MSG);

        let id = inner.next_id;
        inner.next_id += 1;

        let next_due = inner.now + period;
        inner.timers.insert(
            id,
            ManualTimer {
                period,
                next_due,
                callback,
            },
        );

        Ok(TimerId(id))
    }

    fn cancel(&self, id: TimerId) -> bool {
        self.inner
            .lock()
            .expect(LOCK_MSG)
            .timers
            .remove(&id.0)
            .is_some()
    }
}
