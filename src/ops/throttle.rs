//! Trailing-edge rate limiting: `throttle_time` and `audit_time`.

use std::{cell::RefCell, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  scheduler::{Duration, Scheduler, TaskHandle},
  signal::Signal,
  subscriber::ProxySubscriber,
};

struct Held<T> {
  value: Option<T>,
  timer: Option<TaskHandle>,
}

impl<T> Held<T> {
  fn cancel_timer(&mut self) {
    if let Some(timer) = self.timer.take() {
      timer.cancel();
    }
  }
}

fn release<T, E>(held: &RefCell<Held<T>>, down: &ProxySubscriber<T, E>) {
  let value = {
    let mut held = held.borrow_mut();
    held.timer = None;
    held.value.take()
  };
  if let Some(v) = value {
    down.send_next(v);
  }
}

fn arm<T: 'static, E: 'static, S: Scheduler>(
  held: &Rc<RefCell<Held<T>>>, down: &ProxySubscriber<T, E>, scheduler: &S, period: Duration,
) {
  let (c_held, c_down) = (held.clone(), down.clone());
  let timer = scheduler.schedule_fn(move || release(&c_held, &c_down), Some(period));
  down.add_teardown(timer.clone());
  held.borrow_mut().timer = Some(timer);
}

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Holds the latest value and emits it once `quiet` has passed without a
  /// new value; every value restarts the timer.
  ///
  /// A value still held when the source completes is emitted before the
  /// completion.
  pub fn throttle_time<S: Scheduler>(&self, quiet: Duration, scheduler: S) -> Signal<T, E> {
    self.lift(move || {
      let scheduler = scheduler.clone();
      let held = Rc::new(RefCell::new(Held { value: None, timer: None }));
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          {
            let mut held = held.borrow_mut();
            held.cancel_timer();
            held.value = Some(v);
          }
          arm(&held, down, &scheduler, quiet);
        }
        Notification::Complete => {
          held.borrow_mut().cancel_timer();
          release(&held, down);
          down.send_complete();
        }
        Notification::Error(e) => {
          held.borrow_mut().cancel_timer();
          down.send_error(e);
        }
      }
    })
  }

  /// Opens a window of `period` on the first value and emits the latest
  /// value seen when the window closes. Values inside an open window do not
  /// extend it.
  ///
  /// A value still held when the source completes is dropped.
  pub fn audit_time<S: Scheduler>(&self, period: Duration, scheduler: S) -> Signal<T, E> {
    self.lift(move || {
      let scheduler = scheduler.clone();
      let held = Rc::new(RefCell::new(Held { value: None, timer: None }));
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          let window_open = {
            let mut held = held.borrow_mut();
            held.value = Some(v);
            held.timer.is_some()
          };
          if !window_open {
            arm(&held, down, &scheduler, period);
          }
        }
        other => {
          let mut state = held.borrow_mut();
          state.cancel_timer();
          state.value = None;
          drop(state);
          other.deliver_to(down);
        }
      }
    })
  }
}
