use std::rc::Rc;

use crate::{notification::Notification, observer::Observer, signal::Signal, subscriber::ProxySubscriber};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Drops the first `count` values.
  pub fn skip(&self, count: usize) -> Signal<T, E> {
    self.lift(move || {
      let mut seen = 0;
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          if seen >= count {
            down.send_next(v);
          } else {
            seen += 1;
          }
        }
        other => other.deliver_to(down),
      }
    })
  }

  /// Buffers every value and, on completion, emits all but the last
  /// `count`.
  pub fn skip_last(&self, count: usize) -> Signal<T, E> {
    self.lift(move || {
      let mut buffer = Vec::new();
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => buffer.push(v),
        Notification::Complete => {
          let keep = buffer.len().saturating_sub(count);
          for v in buffer.drain(..).take(keep) {
            down.send_next(v);
          }
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Drops values while `predicate` holds, then lets everything through.
  pub fn skip_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Signal<T, E> {
    let predicate = Rc::new(predicate);
    self.lift(move || {
      let predicate = predicate.clone();
      let mut skipping = true;
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          if skipping && !predicate(&v) {
            skipping = false;
          }
          if !skipping {
            down.send_next(v);
          }
        }
        other => other.deliver_to(down),
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  fn values<T: 'static>(signal: &Signal<T>) -> Vec<T> {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    signal.subscribe_next(move |v| c_log.borrow_mut().push(v));
    log.take()
  }

  #[rxsignal_macro::test]
  fn skips() {
    assert_eq!(values(&Signal::from_iter(1..=5).skip(3)), vec![4, 5]);
    assert_eq!(values(&Signal::from_iter(1..=5).skip_last(2)), vec![1, 2, 3]);
    assert_eq!(values(&Signal::from_iter(1..=2).skip_last(5)), Vec::<i32>::new());
    assert_eq!(values(&Signal::from_iter([1, 5, 2, 6]).skip_while(|v| *v < 3)), vec![5, 2, 6]);
  }
}
