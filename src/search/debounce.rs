use std::time::{Duration, Instant};

/// Handle of one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    id: TaskId,
    due: Instant,
    payload: T,
}

/// Cancellable deferred task with a fixed quiet period.
///
/// At most one task is pending. Scheduling a new one cancels the previous one
/// outright; nothing is queued. The owner drives time by calling
/// [`Debouncer::poll`] from its event loop, so the same type works under any
/// scheduler and in tests with synthetic instants.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<ScheduledTask<T>>,
    next_id: u64,
    cancelled: u64,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None, next_id: 0, cancelled: 0 }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is pending and schedule `payload` to fire once `delay`
    /// has passed since `now`
    pub fn schedule(&mut self, payload: T, now: Instant) -> TaskId {
        self.cancel();
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending = Some(ScheduledTask { id, due: now + self.delay, payload });
        id
    }

    /// Drop the pending task, returning its payload
    pub fn cancel(&mut self) -> Option<T> {
        let task = self.pending.take()?;
        self.cancelled += 1;
        Some(task.payload)
    }

    /// Fire the pending task if its quiet period is over
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(task) if now >= task.due => self.pending.take().map(|task| task.payload),
            _ => None,
        }
    }

    /// Take the pending payload immediately, ignoring the quiet period
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|task| task.payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_id(&self) -> Option<TaskId> {
        self.pending.as_ref().map(|task| task.id)
    }

    /// When the pending task becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|task| task.due)
    }

    /// Number of tasks cancelled before they fired
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}
