use std::{cell::Cell, iter, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Interleaves the values of this signal and `others`.
  ///
  /// Completes once every source completed; the first error from any source
  /// ends the merged signal and releases the others.
  pub fn merge(&self, others: impl IntoIterator<Item = Signal<T, E>>) -> Signal<T, E> {
    Signal::merge_all(iter::once(self.clone()).chain(others))
  }

  /// Static form of [`Signal::merge`]. An empty list completes at once.
  pub fn merge_all(signals: impl IntoIterator<Item = Signal<T, E>>) -> Signal<T, E> {
    let signals: Rc<[Signal<T, E>]> = signals.into_iter().collect();
    if signals.is_empty() {
      return Signal::empty();
    }
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let remaining = Rc::new(Cell::new(signals.len()));
      for signal in signals.iter() {
        if down.is_disposed() {
          break;
        }
        let (c_down, remaining) = (down.clone(), remaining.clone());
        down.add_teardown(signal.subscribe_notification(move |n| match n {
          Notification::Next(v) => c_down.send_next(v),
          Notification::Complete => {
            remaining.set(remaining.get() - 1);
            if remaining.get() == 0 {
              c_down.send_complete();
            }
          }
          Notification::Error(e) => c_down.send_error(e),
        }));
      }
    })
  }
}
