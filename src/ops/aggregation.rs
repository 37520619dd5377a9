//! Operators that answer one question about the whole sequence and emit a
//! single value.

use std::rc::Rc;

use crate::{
  error::SignalError, notification::Notification, observer::Observer, signal::Signal,
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Emits the number of values once the source completes.
  pub fn count(&self) -> Signal<usize, E> {
    self.lift(|| {
      let mut count = 0;
      move |n: Notification<T, E>, down: &ProxySubscriber<usize, E>| match n {
        Notification::Next(_) => count += 1,
        Notification::Complete => {
          down.send_next(count);
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Emits `false` at the first value failing `predicate`, or `true` when
  /// the source completes.
  pub fn every(&self, predicate: impl Fn(&T) -> bool + 'static) -> Signal<bool, E> {
    let predicate = Rc::new(predicate);
    self.lift(move || {
      let predicate = predicate.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<bool, E>| match n {
        Notification::Next(v) => {
          if !predicate(&v) {
            down.send_next(false);
            down.send_complete();
          }
        }
        Notification::Complete => {
          down.send_next(true);
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Emits `true` at the first value passing `predicate`, or `false` when
  /// the source completes.
  pub fn some(&self, predicate: impl Fn(&T) -> bool + 'static) -> Signal<bool, E> {
    let predicate = Rc::new(predicate);
    self.lift(move || {
      let predicate = predicate.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<bool, E>| match n {
        Notification::Next(v) => {
          if predicate(&v) {
            down.send_next(true);
            down.send_complete();
          }
        }
        Notification::Complete => {
          down.send_next(false);
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Emits the first value passing `predicate`, or `None` if the source
  /// completes without one.
  pub fn find(&self, predicate: impl Fn(&T) -> bool + 'static) -> Signal<Option<T>, E> {
    let predicate = Rc::new(predicate);
    self.lift(move || {
      let predicate = predicate.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<Option<T>, E>| match n {
        Notification::Next(v) => {
          if predicate(&v) {
            down.send_next(Some(v));
            down.send_complete();
          }
        }
        Notification::Complete => {
          down.send_next(None);
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Like [`Signal::find`], emitting the zero-based position instead.
  pub fn find_index(&self, predicate: impl Fn(&T) -> bool + 'static) -> Signal<Option<usize>, E> {
    let predicate = Rc::new(predicate);
    self.lift(move || {
      let predicate = predicate.clone();
      let mut index = 0;
      move |n: Notification<T, E>, down: &ProxySubscriber<Option<usize>, E>| match n {
        Notification::Next(v) => {
          if predicate(&v) {
            down.send_next(Some(index));
            down.send_complete();
          }
          index += 1;
        }
        Notification::Complete => {
          down.send_next(None);
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Emits the value at `index`. A source that completes too early yields
  /// `default`, if given, then completes.
  pub fn element_at(&self, index: usize, default: Option<T>) -> Signal<T, E>
  where
    T: Clone,
  {
    self.lift(move || {
      let mut default = default.clone();
      let mut seen = 0;
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          if seen == index {
            down.send_next(v);
            down.send_complete();
          }
          seen += 1;
        }
        Notification::Complete => {
          if let Some(v) = default.take() {
            down.send_next(v);
          }
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Emits whether the source completed without a value.
  pub fn is_empty(&self) -> Signal<bool, E> {
    self.lift(|| {
      |n: Notification<T, E>, down: &ProxySubscriber<bool, E>| match n {
        Notification::Next(_) => {
          down.send_next(false);
          down.send_complete();
        }
        Notification::Complete => {
          down.send_next(true);
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Mirrors the source, emitting `value` if it completes empty.
  pub fn default_if_empty(&self, value: T) -> Signal<T, E>
  where
    T: Clone,
  {
    self.lift(move || {
      let mut fallback = Some(value.clone());
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          fallback = None;
          down.send_next(v);
        }
        Notification::Complete => {
          if let Some(v) = fallback.take() {
            down.send_next(v);
          }
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }

  /// Mirrors the source, erroring with [`SignalError::Empty`] if it
  /// completes empty.
  pub fn error_if_empty(&self) -> Signal<T, E>
  where
    E: From<SignalError>,
  {
    self.lift(|| {
      let mut empty = true;
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          empty = false;
          down.send_next(v);
        }
        Notification::Complete if empty => down.send_error(SignalError::Empty.into()),
        n => n.deliver_to(down),
      }
    })
  }
}
