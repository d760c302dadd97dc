//! Cancellable scheduled tasks
//!
//! Every timer the player uses (controls idle-hide, position poll, autoplay
//! countdown, skip-feedback flash) is a task in one [`Scheduler`]. Starting a
//! task returns a [`TaskHandle`]; the owner keeps it and cancels it on every
//! exit path. Time only moves when the host calls [`Scheduler::pop_due`] /
//! [`Scheduler::advance_to`], so the whole model stays single-threaded and
//! deterministic.

use std::time::Duration;
use tracing::debug;

/// Smallest period a repeating task may have
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// What a scheduled task is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    HideControls,
    PositionPoll,
    AutoplayCountdown,
    SkipFeedback,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::HideControls => write!(f, "hide-controls"),
            TaskKind::PositionPoll => write!(f, "position-poll"),
            TaskKind::AutoplayCountdown => write!(f, "autoplay-countdown"),
            TaskKind::SkipFeedback => write!(f, "skip-feedback"),
        }
    }
}

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    id: u64,
    kind: TaskKind,
}

impl TaskHandle {
    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}

#[derive(Debug, Clone)]
struct Task {
    handle: TaskHandle,
    deadline: Duration,
    period: Option<Duration>,
}

/// Counters for task creation and cancellation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub created: u64,
    pub cancelled: u64,
    pub fired: u64,
    /// Highest number of simultaneously active autoplay countdowns
    pub peak_countdowns: usize,
}

/// Single-threaded task scheduler on a virtual clock
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    tasks: Vec<Task>,
    stats: SchedulerStats,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run a task once after `delay`
    pub fn once(&mut self, kind: TaskKind, delay: Duration) -> TaskHandle {
        self.insert(kind, delay, None)
    }

    /// Run a task every `period`, first after one period
    pub fn repeating(&mut self, kind: TaskKind, period: Duration) -> TaskHandle {
        let period = period.max(MIN_PERIOD);
        self.insert(kind, period, Some(period))
    }

    fn insert(&mut self, kind: TaskKind, delay: Duration, period: Option<Duration>) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle { id: self.next_id, kind };
        self.tasks.push(Task {
            handle,
            deadline: self.now + delay,
            period,
        });
        self.stats.created += 1;
        self.stats.peak_countdowns = self
            .stats
            .peak_countdowns
            .max(self.active_count(TaskKind::AutoplayCountdown));

        debug!(task = %kind, id = handle.id, delay_ms = delay.as_millis() as u64, "Task scheduled");
        handle
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        let removed = self.tasks.len() != before;
        if removed {
            self.stats.cancelled += 1;
            debug!(task = %handle.kind, id = handle.id, "Task cancelled");
        }
        removed
    }

    /// Cancel the task behind an optional handle, clearing the slot
    pub fn cancel_slot(&mut self, slot: &mut Option<TaskHandle>) -> bool {
        match slot.take() {
            Some(handle) => self.cancel(handle),
            None => false,
        }
    }

    /// Cancel every task
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        self.stats.cancelled += count as u64;
        count
    }

    pub fn is_active(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// Number of active tasks of a kind
    pub fn active_count(&self, kind: TaskKind) -> usize {
        self.tasks.iter().filter(|t| t.handle.kind == kind).count()
    }

    /// Total number of active tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.iter().map(|t| t.deadline).min()
    }

    /// Fire the earliest task due at or before `until`, moving the clock to
    /// its deadline. One-shot tasks are removed; repeating tasks are
    /// rescheduled. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TaskHandle> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.handle.id))
            .map(|(i, _)| i)?;

        let deadline = self.tasks[index].deadline;
        self.now = self.now.max(deadline);
        self.stats.fired += 1;

        let handle = self.tasks[index].handle;
        match self.tasks[index].period {
            Some(period) => self.tasks[index].deadline = deadline + period,
            None => {
                self.tasks.remove(index);
            }
        }
        Some(handle)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
