//! Tokio-backed scheduler.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{Scheduler, TimerCallback, TimerId};
use crate::error::SchedulerError;

const LOCK_MSG: &str = "scheduler task map poisoned";

/// Scheduler driving timers from a tokio runtime.
///
/// Each registration spawns one task that ticks at the requested period and
/// invokes the callback inline. Cancellation aborts the task.
pub struct TokioScheduler {
    handle: Handle,
    tasks: Mutex<HashMap<TimerId, JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl TokioScheduler {
    /// Create a scheduler on the current tokio runtime.
    pub fn new() -> Result<Self, SchedulerError> {
        let handle = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;

        Ok(Self {
            handle,
            tasks: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Number of timers currently registered.
    pub fn timer_count(&self) -> usize {
        self.tasks.lock().expect(LOCK_MSG).len()
    }
}

impl Scheduler for TokioScheduler {
    fn register_repeating(
        &self,
        period: Duration,
        mut callback: TimerCallback,
    ) -> Result<TimerId, SchedulerError> {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let task = self.handle.spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                callback();
            }
        });

        self.tasks.lock().expect(LOCK_MSG).insert(id, task);

        Ok(id)
    }

    fn cancel(&self, id: TimerId) -> bool {
        match self.tasks.lock().expect(LOCK_MSG).remove(&id) {
            Some(task) => {
                task.abort();
                true
            }
            None => {
                debug!(id = id.0, "cancel for unknown timer");
                false
            }
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.lock().expect(LOCK_MSG).drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_new_outside_runtime_fails() {
        assert!(matches!(
            TokioScheduler::new(),
            Err(SchedulerError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_timer_fires_repeatedly() {
        let scheduler = TokioScheduler::new().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        scheduler
            .register_repeating(
                Duration::from_millis(20),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(110)).await;
        assert!(count.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_cancel_stops_firing() {
        let scheduler = TokioScheduler::new().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();

        let id = scheduler
            .register_repeating(
                Duration::from_millis(20),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(scheduler.cancel(id));
        assert_eq!(scheduler.timer_count(), 0);

        let after_cancel = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[tokio::test]
    async fn test_cancel_unknown_timer() {
        let scheduler = TokioScheduler::new().unwrap();
        assert!(!scheduler.cancel(TimerId(999)));
    }
}
