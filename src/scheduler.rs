//! Scheduling capability used by the time-based operators.
//!
//! Operators never reach for a global clock: every timed operator takes a
//! [`Scheduler`] argument. Tests pass [`TestScheduler`], a virtual clock that
//! only moves when told to; applications pass [`LocalScheduler`] (feature
//! `local-scheduler`) or [`TokioScheduler`] (feature `tokio-scheduler`).
//!
//! A scheduler offers two queues:
//!
//! - **timers** (`schedule`): run the task after an optional delay. A `None`
//!   delay means "as soon as possible, after the current turn".
//! - **microtasks** (`schedule_micro`): run the task before any timer that is
//!   due at the same moment.

pub use std::time::Duration;

use crate::disposable::{Disposable, Teardown};

mod test_scheduler;
pub use test_scheduler::TestScheduler;

#[cfg(feature = "local-scheduler")]
mod local_scheduler;
#[cfg(feature = "local-scheduler")]
pub use local_scheduler::LocalScheduler;

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// A boxed unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks later on the current thread.
pub trait Scheduler: Clone + 'static {
  /// Schedules `task` to run once `delay` has elapsed.
  fn schedule(&self, task: Task, delay: Option<Duration>) -> TaskHandle;

  /// Schedules `task` as a microtask.
  fn schedule_micro(&self, task: Task) -> TaskHandle;

  /// Convenience form of [`Scheduler::schedule`] taking an unboxed closure.
  fn schedule_fn(&self, task: impl FnOnce() + 'static, delay: Option<Duration>) -> TaskHandle
  where
    Self: Sized,
  {
    self.schedule(Box::new(task), delay)
  }
}

/// Handle to a scheduled task.
///
/// The handle closes when the task has run or has been cancelled, so a
/// handle stored in a [`CompoundDisposable`](crate::disposable::CompoundDisposable)
/// is pruned once it is no longer needed.
#[derive(Clone, Debug)]
pub struct TaskHandle(Disposable);

impl Default for TaskHandle {
  fn default() -> Self { Self::with_abort(|| {}) }
}

impl TaskHandle {
  /// A handle whose cancellation only marks it closed.
  pub fn new() -> Self { Self::default() }

  /// A handle that runs `abort` when cancelled before the task ran.
  pub fn with_abort(abort: impl FnOnce() + 'static) -> Self {
    TaskHandle(Disposable::new(move || {
      tracing::trace!("scheduled task cancelled");
      abort();
    }))
  }

  /// Cancels the task if it has not run yet.
  #[inline]
  pub fn cancel(&self) { self.0.dispose() }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.is_disposed() }

  /// Marks the task as run without triggering its abort action.
  pub(crate) fn finish(&self) { self.0.close() }
}

impl From<TaskHandle> for Teardown {
  #[inline]
  fn from(handle: TaskHandle) -> Self { Teardown::Action(handle.0) }
}
