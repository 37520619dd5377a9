use std::{cell::Cell, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  scheduler::{Duration, Scheduler},
  signal::Signal,
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Leading-edge debounce: a value passes immediately, then every value
  /// arriving within `quiet` of it is dropped.
  ///
  /// The suppression window is not extended by the dropped values.
  pub fn debounce_time<S: Scheduler>(&self, quiet: Duration, scheduler: S) -> Signal<T, E> {
    self.lift(move || {
      let scheduler = scheduler.clone();
      let suppressed = Rc::new(Cell::new(false));
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          if suppressed.replace(true) {
            return;
          }
          down.send_next(v);
          let reopen = suppressed.clone();
          down.add_teardown(scheduler.schedule_fn(move || reopen.set(false), Some(quiet)));
        }
        other => other.deliver_to(down),
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{prelude::*, scheduler::TestScheduler, subject::Subject};

  #[rxsignal_macro::test(virtual_time)]
  fn passes_leading_value_then_suppresses() {
    let subject = Subject::<i32>::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    subject
      .to_signal()
      .debounce_time(Duration::from_millis(100), TestScheduler)
      .subscribe_next(move |v| c_seen.borrow_mut().push(v));

    subject.send_next(1);
    subject.send_next(2);
    TestScheduler::advance_by(Duration::from_millis(60));
    subject.send_next(3);
    TestScheduler::advance_by(Duration::from_millis(40));
    subject.send_next(4);
    assert_eq!(*seen.borrow(), vec![1, 4]);
  }

  #[rxsignal_macro::test(virtual_time)]
  fn dispose_cancels_window_timer() {
    let subject = Subject::<i32>::new();
    let handle = subject
      .to_signal()
      .debounce_time(Duration::from_millis(100), TestScheduler)
      .subscribe_next(|_| {});
    subject.send_next(1);
    assert_eq!(TestScheduler::pending_count(), 1);
    handle.dispose();
    assert_eq!(TestScheduler::pending_count(), 0);
  }
}
