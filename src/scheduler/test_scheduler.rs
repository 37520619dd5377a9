//! Virtual-clock scheduler for deterministic tests of time-based operators.
//!
//! Virtual time only advances when the test says so. Timers that become due
//! run synchronously inside [`TestScheduler::advance_by`] or
//! [`TestScheduler::flush`], in order of due time and then in scheduling
//! order. Microtasks run before the next timer and after every timer.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::{prelude::*, scheduler::TestScheduler};
//!
//! TestScheduler::init();
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//! Signal::<i32>::of(42)
//!   .delay(Duration::from_millis(100), TestScheduler)
//!   .subscribe_next(move |v| c_seen.borrow_mut().push(v));
//!
//! TestScheduler::advance_by(Duration::from_millis(99));
//! assert!(seen.borrow().is_empty());
//! TestScheduler::advance_by(Duration::from_millis(1));
//! assert_eq!(*seen.borrow(), vec![42]);
//! ```
//!
//! State is thread-local: every test thread has its own clock and queues.

use std::{
  cell::RefCell,
  cmp::Ordering,
  collections::{BinaryHeap, VecDeque},
};

use super::{Duration, Scheduler, Task, TaskHandle};

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  timers: BinaryHeap<ScheduledTask>,
  microtasks: VecDeque<(Task, TaskHandle)>,
  next_task_id: usize,
  initialized: bool,
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  task: Task,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

thread_local! {
  static TEST_SCHEDULER_STATE: RefCell<TestSchedulerState>
    = RefCell::new(TestSchedulerState::default());
}

/// A virtual time scheduler.
///
/// Zero-sized: every instance on a thread shares the same clock and queues.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestScheduler;

impl TestScheduler {
  /// Resets the clock to zero and drops every queued task.
  ///
  /// Must be called at the start of each test; `#[rxsignal_macro::test(virtual_time)]`
  /// does it for you.
  pub fn init() {
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      state.virtual_time = Duration::ZERO;
      state.timers.clear();
      state.microtasks.clear();
      state.next_task_id = 0;
      state.initialized = true;
    });
  }

  fn ensure_initialized() {
    TEST_SCHEDULER_STATE.with(|state| {
      assert!(
        state.borrow().initialized,
        "TestScheduler::init() must be called before using the scheduler"
      );
    });
  }

  /// Current virtual time.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn now() -> Duration {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time)
  }

  /// Number of queued timers and microtasks that are still live.
  pub fn pending_count() -> usize {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| {
      let state = state.borrow();
      let timers = state
        .timers
        .iter()
        .filter(|t| !t.handle.is_closed())
        .count();
      let micro = state
        .microtasks
        .iter()
        .filter(|(_, h)| !h.is_closed())
        .count();
      timers + micro
    })
  }

  pub fn is_empty() -> bool { Self::pending_count() == 0 }

  /// Runs queued microtasks, including the ones they queue, until none is
  /// left. Virtual time does not move.
  pub fn run_microtasks() {
    Self::ensure_initialized();
    loop {
      let next = TEST_SCHEDULER_STATE.with(|state| state.borrow_mut().microtasks.pop_front());
      let Some((task, handle)) = next else { break };
      if handle.is_closed() {
        continue;
      }
      handle.finish();
      task();
    }
  }

  fn execute_tasks_until(target_time: Option<Duration>) {
    Self::run_microtasks();
    loop {
      let next = TEST_SCHEDULER_STATE.with(|state| {
        let mut state = state.borrow_mut();
        while state
          .timers
          .peek()
          .is_some_and(|t| t.handle.is_closed())
        {
          state.timers.pop();
        }
        let due = state
          .timers
          .peek()
          .is_some_and(|t| target_time.map_or(true, |limit| t.scheduled_time <= limit));
        if !due {
          return None;
        }
        let task = state.timers.pop()?;
        if task.scheduled_time > state.virtual_time {
          state.virtual_time = task.scheduled_time;
        }
        Some(task)
      });

      let Some(scheduled) = next else { break };
      scheduled.handle.finish();
      (scheduled.task)();
      Self::run_microtasks();
    }
  }

  /// Advances virtual time by `duration`, running every task that becomes
  /// due on the way.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn advance_by(duration: Duration) {
    Self::ensure_initialized();
    let target_time = TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time + duration);

    Self::execute_tasks_until(Some(target_time));

    TEST_SCHEDULER_STATE.with(|state| {
      state.borrow_mut().virtual_time = target_time;
    });
  }

  /// Runs every queued task, moving the clock to each task's due time.
  ///
  /// Tasks that keep rescheduling themselves (such as `interval`) make this
  /// loop forever; cancel them first or use `advance_by`.
  pub fn flush() {
    Self::ensure_initialized();
    Self::execute_tasks_until(None);
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, task: Task, delay: Option<Duration>) -> TaskHandle {
    TestScheduler::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      let scheduled_time = state.virtual_time + delay.unwrap_or(Duration::ZERO);
      let task_id = state.next_task_id;
      state.next_task_id += 1;
      let handle = TaskHandle::new();
      state
        .timers
        .push(ScheduledTask { scheduled_time, task_id, task, handle: handle.clone() });
      handle
    })
  }

  fn schedule_micro(&self, task: Task) -> TaskHandle {
    TestScheduler::ensure_initialized();
    let handle = TaskHandle::new();
    TEST_SCHEDULER_STATE.with(|state| {
      state
        .borrow_mut()
        .microtasks
        .push_back((task, handle.clone()))
    });
    handle
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, mem, rc::Rc};

  use super::*;

  fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    (log, move |name| {
      let log = c_log.clone();
      Box::new(move || log.borrow_mut().push(name))
    })
  }

  #[rxsignal_macro::test]
  fn zero_sized_and_copy() {
    assert_eq!(mem::size_of::<TestScheduler>(), 0);
    let s1 = TestScheduler;
    let _s2 = s1;
    let _s3 = s1;
  }

  #[rxsignal_macro::test]
  fn init_resets() {
    TestScheduler::init();
    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(TestScheduler::now(), Duration::from_millis(100));
    TestScheduler.schedule(Box::new(|| {}), Some(Duration::from_millis(5)));
    TestScheduler::init();
    assert_eq!(TestScheduler::now(), Duration::ZERO);
    assert!(TestScheduler::is_empty());
  }

  #[cfg(not(target_arch = "wasm32"))]
  #[rxsignal_macro::test]
  #[should_panic(expected = "TestScheduler::init() must be called")]
  fn panics_without_init() {
    TEST_SCHEDULER_STATE.with(|s| s.borrow_mut().initialized = false);
    TestScheduler::now();
  }

  #[rxsignal_macro::test(virtual_time)]
  fn runs_in_time_then_fifo_order() {
    let (log, task) = recorder();
    TestScheduler.schedule(task("late"), Some(Duration::from_millis(20)));
    TestScheduler.schedule(task("first"), Some(Duration::from_millis(10)));
    TestScheduler.schedule(task("second"), Some(Duration::from_millis(10)));

    TestScheduler::advance_by(Duration::from_millis(10));
    assert_eq!(*log.borrow(), vec!["first", "second"]);
    assert_eq!(TestScheduler::pending_count(), 1);

    TestScheduler::flush();
    assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
    assert_eq!(TestScheduler::now(), Duration::from_millis(20));
  }

  #[rxsignal_macro::test(virtual_time)]
  fn cancelled_tasks_never_run() {
    let (log, task) = recorder();
    let handle = TestScheduler.schedule(task("cancelled"), Some(Duration::from_millis(10)));
    handle.cancel();
    assert_eq!(TestScheduler::pending_count(), 0);
    TestScheduler::advance_by(Duration::from_millis(10));
    assert!(log.borrow().is_empty());
  }

  #[rxsignal_macro::test(virtual_time)]
  fn microtasks_run_before_due_timers() {
    let (log, task) = recorder();
    TestScheduler.schedule(task("timer"), None);
    TestScheduler.schedule_micro(task("micro"));
    TestScheduler::advance_by(Duration::ZERO);
    assert_eq!(*log.borrow(), vec!["micro", "timer"]);
  }

  #[rxsignal_macro::test(virtual_time)]
  fn tasks_scheduled_while_running_are_honoured() {
    let (log, task) = recorder();
    let nested = task("nested");
    TestScheduler.schedule(
      Box::new(move || {
        TestScheduler.schedule(nested, Some(Duration::from_millis(5)));
      }),
      Some(Duration::from_millis(5)),
    );
    TestScheduler::advance_by(Duration::from_millis(9));
    assert!(log.borrow().is_empty());
    TestScheduler::advance_by(Duration::from_millis(1));
    assert_eq!(*log.borrow(), vec!["nested"]);
  }

  #[rxsignal_macro::test(virtual_time)]
  fn handle_closes_after_run() {
    let handle = TestScheduler.schedule(Box::new(|| {}), None);
    assert!(!handle.is_closed());
    TestScheduler::flush();
    assert!(handle.is_closed());
  }
}
