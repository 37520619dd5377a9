use std::{collections::VecDeque, rc::Rc};

use crate::{notification::Notification, observer::Observer, signal::Signal, subscriber::ProxySubscriber};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Emits the first `count` values, completing as soon as the last of them
  /// is delivered. `take(0)` completes at subscription without subscribing
  /// upstream.
  pub fn take(&self, count: usize) -> Signal<T, E> {
    if count == 0 {
      return Signal::empty();
    }
    self.lift(move || {
      let mut taken = 0;
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          taken += 1;
          down.send_next(v);
          if taken == count {
            down.send_complete();
          }
        }
        other => other.deliver_to(down),
      }
    })
  }

  /// Buffers the last `count` values and emits them when the source
  /// completes.
  pub fn take_last(&self, count: usize) -> Signal<T, E> {
    self.lift(move || {
      let mut buffer = VecDeque::with_capacity(count.min(16));
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          if count == 0 {
            return;
          }
          if buffer.len() == count {
            buffer.pop_front();
          }
          buffer.push_back(v);
        }
        Notification::Complete => {
          for v in buffer.drain(..) {
            down.send_next(v);
          }
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Emits values while `predicate` holds, completing on the first value
  /// that fails it.
  pub fn take_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Signal<T, E> {
    let predicate = Rc::new(predicate);
    self.lift(move || {
      let predicate = predicate.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          if predicate(&v) {
            down.send_next(v);
          } else {
            down.send_complete();
          }
        }
        other => other.deliver_to(down),
      }
    })
  }

  /// The first value, if any. Completes without a value on an empty source.
  pub fn first(&self) -> Signal<T, E> { self.take(1) }

  /// The last value, if any. Completes without a value on an empty source.
  pub fn last(&self) -> Signal<T, E> { self.take_last(1) }
}
