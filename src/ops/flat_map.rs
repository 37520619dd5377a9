use std::{cell::Cell, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Maps every value to a signal and merges all of them.
  ///
  /// Completes once this signal and every inner signal completed; any error
  /// ends the whole subscription.
  pub fn flat_map<U: 'static>(&self, f: impl Fn(T) -> Signal<U, E> + 'static) -> Signal<U, E> {
    let source = self.clone();
    let f = Rc::new(f);
    Signal::create(move |down: ProxySubscriber<U, E>| {
      // Live sources, the outer one included.
      let active = Rc::new(Cell::new(1usize));
      let settle = {
        let (down, active) = (down.clone(), active.clone());
        move || {
          active.set(active.get() - 1);
          if active.get() == 0 {
            down.send_complete();
          }
        }
      };
      let (c_down, f) = (down.clone(), f.clone());
      down.add_teardown(source.subscribe_notification(move |n| match n {
        Notification::Next(v) => {
          if c_down.is_disposed() {
            return;
          }
          active.set(active.get() + 1);
          let (inner_down, inner_settle) = (c_down.clone(), settle.clone());
          c_down.add_teardown(f(v).subscribe_notification(move |n| match n {
            Notification::Next(v) => inner_down.send_next(v),
            Notification::Complete => inner_settle(),
            Notification::Error(e) => inner_down.send_error(e),
          }));
        }
        Notification::Complete => settle(),
        Notification::Error(e) => c_down.send_error(e),
      }));
    })
  }
}
