use std::rc::Rc;

use super::{Observable, Signal};
use crate::observer::Observer;

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Emits `value` then completes.
  pub fn of(value: T) -> Self
  where
    T: Clone,
  {
    Signal::create(move |s| {
      s.send_next(value.clone());
      s.send_complete();
    })
  }

  /// Errors with `err` at subscription.
  pub fn throw_err(err: E) -> Self
  where
    E: Clone,
  {
    Signal::create(move |s| s.send_error(err.clone()))
  }

  /// Completes at subscription without emitting.
  pub fn empty() -> Self { Signal::create(|s| s.send_complete()) }

  /// Never emits and never terminates.
  pub fn never() -> Self { Signal::create(|_| ()) }

  /// Emits every item of `iter`, then completes.
  ///
  /// Emission stops early once the subscription is disposed.
  ///
  /// ```
  /// use rxsignal::prelude::*;
  ///
  /// Signal::<i32>::from_iter(vec![0, 1, 2, 3]).subscribe_next(|v| println!("{v}"));
  /// ```
  pub fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = T> + Clone + 'static,
  {
    Signal::create(move |s| {
      for v in iter.clone() {
        if s.is_disposed() {
          return;
        }
        s.send_next(v);
      }
      s.send_complete();
    })
  }

  /// Calls `factory` on every subscription and subscribes to the signal it
  /// returns.
  pub fn defer(factory: impl Fn() -> Signal<T, E> + 'static) -> Self {
    Signal::create(move |s| factory().subscribe_observer(Rc::new(s)))
  }
}

impl<E: 'static> Signal<i64, E> {
  /// Emits `count` numbers starting at `start`, `step` apart, then completes.
  pub fn from_range(start: i64, count: usize, step: i64) -> Self {
    Signal::create(move |s| {
      let mut v = start;
      for _ in 0..count {
        if s.is_disposed() {
          return;
        }
        s.send_next(v);
        v += step;
      }
      s.send_complete();
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::{error::SignalError, notification::Notification, prelude::*};

  fn collect<T: 'static>(signal: &Signal<T>) -> Rc<RefCell<Vec<Notification<T, SignalError>>>> {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    signal.subscribe_notification(move |n| c_log.borrow_mut().push(n));
    log
  }

  #[rxsignal_macro::test]
  fn of_emits_then_completes() {
    let log = collect(&Signal::of(7));
    assert_eq!(*log.borrow(), vec![Notification::Next(7), Notification::Complete]);
  }

  #[rxsignal_macro::test]
  fn throw_err_and_empty() {
    let log = collect(&Signal::<i32>::throw_err(SignalError::custom("x")));
    assert_eq!(*log.borrow(), vec![Notification::Error(SignalError::custom("x"))]);
    let log = collect(&Signal::<i32>::empty());
    assert_eq!(*log.borrow(), vec![Notification::Complete]);
    let log = collect(&Signal::<i32>::never());
    assert!(log.borrow().is_empty());
  }

  #[rxsignal_macro::test]
  fn from_range_steps() {
    let log = collect(&Signal::from_range(10, 3, -5));
    assert_eq!(
      *log.borrow(),
      vec![
        Notification::Next(10),
        Notification::Next(5),
        Notification::Next(0),
        Notification::Complete
      ]
    );
  }

  #[rxsignal_macro::test]
  fn from_iter_stops_when_disposed() {
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    Signal::<i32>::from_iter(1..100)
      .take(3)
      .subscribe_next(move |v| c_seen.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
  }

  #[rxsignal_macro::test]
  fn defer_builds_per_subscription() {
    let calls = Rc::new(Cell::new(0));
    let c_calls = calls.clone();
    let signal = Signal::<usize>::defer(move || {
      c_calls.set(c_calls.get() + 1);
      Signal::of(c_calls.get())
    });
    assert!(calls.get() == 0);
    let first = collect(&signal);
    let second = collect(&signal);
    assert_eq!(first.borrow()[0], Notification::Next(1));
    assert_eq!(second.borrow()[0], Notification::Next(2));
  }
}
