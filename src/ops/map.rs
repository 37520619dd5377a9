use std::rc::Rc;

use crate::{notification::Notification, observer::Observer, signal::Signal, subscriber::ProxySubscriber};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Transforms every value with `f`.
  pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Signal<U, E> {
    self.map_with_index(move |v, _| f(v))
  }

  /// Like [`Signal::map`], also passing the zero-based index of the value
  /// within the subscription.
  pub fn map_with_index<U: 'static>(&self, f: impl Fn(T, usize) -> U + 'static) -> Signal<U, E> {
    self.try_map_with_index(move |v, i| Ok(f(v, i)))
  }

  /// Transforms every value with a fallible `f`; an `Err` ends the signal
  /// with that error.
  pub fn try_map<U: 'static>(&self, f: impl Fn(T) -> Result<U, E> + 'static) -> Signal<U, E> {
    self.try_map_with_index(move |v, _| f(v))
  }

  pub fn try_map_with_index<U: 'static>(
    &self, f: impl Fn(T, usize) -> Result<U, E> + 'static,
  ) -> Signal<U, E> {
    let f = Rc::new(f);
    self.lift(move || {
      let f = f.clone();
      let mut index = 0;
      move |n: Notification<T, E>, down: &ProxySubscriber<U, E>| match n {
        Notification::Next(v) => {
          let i = index;
          index += 1;
          match f(v, i) {
            Ok(v) => down.send_next(v),
            Err(e) => down.send_error(e),
          }
        }
        Notification::Complete => down.send_complete(),
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Replaces every value with a clone of `value`.
  pub fn map_to<U: Clone + 'static>(&self, value: U) -> Signal<U, E> {
    self.map(move |_| value.clone())
  }

  /// Lets through the values for which `predicate` holds.
  pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Signal<T, E> {
    self.filter_with_index(move |v, _| predicate(v))
  }

  pub fn filter_with_index(&self, predicate: impl Fn(&T, usize) -> bool + 'static) -> Signal<T, E> {
    self.try_filter_with_index(move |v, i| Ok(predicate(v, i)))
  }

  /// Filters with a fallible predicate; an `Err` ends the signal with that
  /// error.
  pub fn try_filter(&self, predicate: impl Fn(&T) -> Result<bool, E> + 'static) -> Signal<T, E> {
    self.try_filter_with_index(move |v, _| predicate(v))
  }

  fn try_filter_with_index(
    &self, predicate: impl Fn(&T, usize) -> Result<bool, E> + 'static,
  ) -> Signal<T, E> {
    let predicate = Rc::new(predicate);
    self.lift(move || {
      let predicate = predicate.clone();
      let mut index = 0;
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          let i = index;
          index += 1;
          match predicate(&v, i) {
            Ok(true) => down.send_next(v),
            Ok(false) => {}
            Err(e) => down.send_error(e),
          }
        }
        other => other.deliver_to(down),
      }
    })
  }

  /// Drops every value, keeping only the terminal event.
  pub fn ignore_values(&self) -> Signal<T, E> { self.filter(|_| false) }
}
