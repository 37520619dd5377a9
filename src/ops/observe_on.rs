//! Moving subscription and delivery onto a scheduler.

use std::rc::Rc;

use crate::{
  notification::Notification,
  scheduler::{Scheduler, TaskHandle},
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

/// Where `subscribe_on` and `observe_on` run their work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScheduleMode {
  /// On the calling stack, immediately.
  #[default]
  Sync,
  /// As a zero-delay timer task.
  Async,
  /// As a microtask.
  Micro,
}

fn run_on<S: Scheduler>(
  mode: ScheduleMode, scheduler: &S, task: impl FnOnce() + 'static,
) -> Option<TaskHandle> {
  match mode {
    ScheduleMode::Sync => {
      task();
      None
    }
    ScheduleMode::Async => Some(scheduler.schedule_fn(task, None)),
    ScheduleMode::Micro => Some(scheduler.schedule_micro(Box::new(task))),
  }
}

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Performs the upstream subscription according to `mode`.
  pub fn subscribe_on<S: Scheduler>(&self, mode: ScheduleMode, scheduler: S) -> Signal<T, E> {
    if mode == ScheduleMode::Sync {
      return self.clone();
    }
    let source = self.clone();
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let (c_source, c_down) = (source.clone(), down.clone());
      run_on(mode, &scheduler, move || {
        c_source.subscribe_observer(Rc::new(c_down));
      })
    })
  }

  /// Delivers every event according to `mode`, preserving order.
  pub fn observe_on<S: Scheduler>(&self, mode: ScheduleMode, scheduler: S) -> Signal<T, E> {
    if mode == ScheduleMode::Sync {
      return self.clone();
    }
    self.lift(move || {
      let scheduler = scheduler.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| {
        let c_down = down.clone();
        down.add_teardown(run_on(mode, &scheduler, move || n.deliver_to(&c_down)));
      }
    })
  }
}
