//! Task Scheduling
//!
//! Delayed and repeating tasks on a tokio runtime. The dispatcher uses this
//! to hand decoded packets to handlers off the transport's read path.
//!
//! A task scheduled with an `interval` repeats until its [`ScheduledTask`]
//! is cancelled; dropping the handle does not cancel it.

use crate::error::{constants, ProtocolError, Result};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;

/// Boxed task body; `FnMut` so repeating tasks can keep state between runs.
pub type Task = Box<dyn FnMut() + Send + 'static>;

/// Runs tasks now, after a delay, or at a fixed interval.
pub trait Scheduler: Send + Sync + 'static {
    fn schedule(
        &self,
        delay: Option<Duration>,
        interval: Option<Duration>,
        task: Task,
    ) -> ScheduledTask;
}

impl dyn Scheduler {
    /// Run `task` once, as soon as possible.
    pub fn run<F>(&self, task: F) -> ScheduledTask
    where
        F: FnMut() + Send + 'static,
    {
        self.schedule(None, None, Box::new(task))
    }

    /// Run `task` once after `delay`.
    pub fn run_later<F>(&self, delay: Duration, task: F) -> ScheduledTask
    where
        F: FnMut() + Send + 'static,
    {
        self.schedule(Some(delay), None, Box::new(task))
    }

    /// Run `task` every `interval`, starting after `delay`.
    pub fn run_repeating<F>(&self, delay: Duration, interval: Duration, task: F) -> ScheduledTask
    where
        F: FnMut() + Send + 'static,
    {
        self.schedule(Some(delay), Some(interval), Box::new(task))
    }
}

/// Handle to a scheduled task.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Stop the task. A run that is already executing finishes first.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Scheduler backed by a tokio runtime handle.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime the caller is running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| ProtocolError::Runtime(format!("{}: {e}", constants::ERR_NO_RUNTIME)))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(
        &self,
        delay: Option<Duration>,
        interval: Option<Duration>,
        mut task: Task,
    ) -> ScheduledTask {
        let handle = self.handle.spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            match interval {
                Some(interval) => loop {
                    task();
                    trace!(interval_ms = interval.as_millis() as u64, "Repeating task ran");
                    tokio::time::sleep(interval).await;
                },
                None => task(),
            }
        });

        ScheduledTask { handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_current_outside_runtime_fails() {
        assert!(matches!(
            TokioScheduler::current(),
            Err(ProtocolError::Runtime(_))
        ));
    }

    #[tokio::test]
    #[allow(clippy::expect_used)]
    async fn test_run_later_executes_once() {
        let scheduler = TokioScheduler::current().expect("runtime");
        let scheduler: &dyn Scheduler = &scheduler;
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let task = scheduler.run_later(Duration::from_millis(10), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
    }

    #[tokio::test]
    #[allow(clippy::expect_used)]
    async fn test_repeating_task_stops_on_cancel() {
        let scheduler = TokioScheduler::current().expect("runtime");
        let scheduler: &dyn Scheduler = &scheduler;
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let task = scheduler.run_repeating(Duration::ZERO, Duration::from_millis(5), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        task.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let after_cancel = count.load(Ordering::SeqCst);
        assert!(after_cancel >= 2, "ran {after_cancel} times");
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
        assert!(task.is_finished());
    }
}
