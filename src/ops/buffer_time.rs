//! Time-windowed batching.

use std::{cell::RefCell, mem, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  scheduler::{Duration, Scheduler, TaskHandle},
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

struct BufferTimeState<T> {
  batch: Vec<T>,
  timer: Option<TaskHandle>,
}

impl<T> BufferTimeState<T> {
  fn cancel_timer(&mut self) {
    if let Some(timer) = self.timer.take() {
      timer.cancel();
    }
  }

  /// Splits off what a flush emits. With a positive `max_count` only full
  /// batches leave, unless `completing`.
  fn take_batches(&mut self, max_count: usize, completing: bool) -> Vec<Vec<T>> {
    self.cancel_timer();
    if self.batch.is_empty() {
      return vec![];
    }
    if max_count == 0 || (completing && self.batch.len() <= max_count) {
      return vec![mem::take(&mut self.batch)];
    }
    let mut batches = vec![];
    while self.batch.len() >= max_count {
      let rest = self.batch.split_off(max_count);
      batches.push(mem::replace(&mut self.batch, rest));
    }
    if completing && !self.batch.is_empty() {
      batches.push(mem::take(&mut self.batch));
    }
    batches
  }
}

fn emit<T, E>(
  state: &RefCell<BufferTimeState<T>>, down: &ProxySubscriber<Vec<T>, E>, max_count: usize,
  completing: bool,
) {
  let batches = state.borrow_mut().take_batches(max_count, completing);
  for batch in batches {
    down.send_next(batch);
  }
}

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Collects values into time windows of `window`.
  ///
  /// A window opens with the first value after the previous flush, so the
  /// timer restarts after every flush, and is emitted when its timer fires.
  /// With `max_count > 0` batches hold exactly `max_count` values: a full
  /// batch is emitted at once, and a timer flush keeps any shorter remainder
  /// for later. Completion emits whatever is pending, then completes.
  pub fn buffer_time<S: Scheduler>(
    &self, window: Duration, max_count: usize, scheduler: S,
  ) -> Signal<Vec<T>, E> {
    let source = self.clone();
    Signal::create(move |down: ProxySubscriber<Vec<T>, E>| {
      let state = Rc::new(RefCell::new(BufferTimeState { batch: Vec::new(), timer: None }));
      let scheduler = scheduler.clone();
      let c_down = down.clone();
      let handle = source.subscribe_notification(move |n| match n {
        Notification::Next(v) => {
          let (full, opens_window) = {
            let mut state = state.borrow_mut();
            state.batch.push(v);
            (max_count > 0 && state.batch.len() >= max_count, state.timer.is_none())
          };
          if full {
            emit(&state, &c_down, max_count, false);
          } else if opens_window {
            let (t_state, t_down) = (state.clone(), c_down.clone());
            let timer =
              scheduler.schedule_fn(move || emit(&t_state, &t_down, max_count, false), Some(window));
            c_down.add_teardown(timer.clone());
            state.borrow_mut().timer = Some(timer);
          }
        }
        Notification::Complete => {
          emit(&state, &c_down, max_count, true);
          c_down.send_complete();
        }
        Notification::Error(e) => {
          let mut state = state.borrow_mut();
          state.cancel_timer();
          state.batch.clear();
          drop(state);
          c_down.send_error(e);
        }
      });
      down.add_teardown(handle);
    })
  }
}
