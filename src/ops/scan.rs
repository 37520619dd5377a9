use std::rc::Rc;

use crate::{notification::Notification, observer::Observer, signal::Signal, subscriber::ProxySubscriber};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Folds every value into an accumulator starting at `seed` and emits
  /// each intermediate accumulator.
  ///
  /// ```
  /// use std::{cell::RefCell, rc::Rc};
  ///
  /// use rxsignal::prelude::*;
  ///
  /// let sums = Rc::new(RefCell::new(vec![]));
  /// let c_sums = sums.clone();
  /// Signal::<i32>::from_iter([1, 2, 3])
  ///   .scan(10, |acc, v| acc + v)
  ///   .subscribe_next(move |v| c_sums.borrow_mut().push(v));
  /// assert_eq!(*sums.borrow(), vec![11, 13, 16]);
  /// ```
  pub fn scan<A: Clone + 'static>(&self, seed: A, f: impl Fn(A, T) -> A + 'static) -> Signal<A, E> {
    self.try_scan(seed, move |acc, v| Ok(f(acc, v)))
  }

  /// Like [`Signal::scan`] with a fallible fold; an `Err` ends the signal.
  pub fn try_scan<A: Clone + 'static>(
    &self, seed: A, f: impl Fn(A, T) -> Result<A, E> + 'static,
  ) -> Signal<A, E> {
    let f = Rc::new(f);
    self.lift(move || {
      let f = f.clone();
      let mut acc = Some(seed.clone());
      move |n: Notification<T, E>, down: &ProxySubscriber<A, E>| match n {
        Notification::Next(v) => {
          let Some(current) = acc.take() else { return };
          match f(current, v) {
            Ok(next) => {
              acc = Some(next.clone());
              down.send_next(next);
            }
            Err(e) => down.send_error(e),
          }
        }
        Notification::Complete => down.send_complete(),
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Scans with the first value as the seed; the first value is emitted
  /// as is.
  pub fn scan_with_first(&self, f: impl Fn(T, T) -> T + 'static) -> Signal<T, E>
  where
    T: Clone,
  {
    let f = Rc::new(f);
    self.lift(move || {
      let f = f.clone();
      let mut acc: Option<T> = None;
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          let next = match acc.take() {
            Some(current) => f(current, v),
            None => v,
          };
          acc = Some(next.clone());
          down.send_next(next);
        }
        other => other.deliver_to(down),
      }
    })
  }

  /// Emits the final accumulator of [`Signal::scan`] on completion. An empty
  /// source completes without emitting.
  pub fn reduce<A: Clone + 'static>(&self, seed: A, f: impl Fn(A, T) -> A + 'static) -> Signal<A, E> {
    self.scan(seed, f).take_last(1)
  }

  pub fn reduce_with_first(&self, f: impl Fn(T, T) -> T + 'static) -> Signal<T, E>
  where
    T: Clone,
  {
    self.scan_with_first(f).take_last(1)
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{error::SignalError, prelude::*};

  fn values<T: 'static>(signal: &Signal<T>) -> Rc<RefCell<Vec<T>>> {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    signal.subscribe_next(move |v| c_log.borrow_mut().push(v));
    log
  }

  #[rxsignal_macro::test]
  fn scan_with_first_emits_first_unchanged() {
    let log = values(&Signal::from_iter([3, 4, 5]).scan_with_first(|a, b| a * b));
    assert_eq!(*log.borrow(), vec![3, 12, 60]);
  }

  #[rxsignal_macro::test]
  fn try_scan_stops_on_err() {
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::from_iter([1, 2, 3])
      .try_scan(0, |acc, v| if acc > 1 { Err(SignalError::custom("overflow")) } else { Ok(acc + v) })
      .subscribe(move |v| c_log.borrow_mut().push(v), || {}, move |e| c_errors.borrow_mut().push(e));
    assert_eq!(*log.borrow(), vec![1, 3]);
    assert_eq!(*errors.borrow(), vec![SignalError::custom("overflow")]);
  }

  #[rxsignal_macro::test]
  fn reduce_emits_last_accumulator() {
    let log = values(&Signal::from_iter(1..=4).reduce(0, |acc, v| acc + v));
    assert_eq!(*log.borrow(), vec![10]);
    let log = values(&Signal::from_iter(1..=4).reduce_with_first(|a, b| a.max(b)));
    assert_eq!(*log.borrow(), vec![4]);
    let log = values(&Signal::<i32>::empty().reduce(0, |acc, v| acc + v));
    assert!(log.borrow().is_empty());
  }
}
