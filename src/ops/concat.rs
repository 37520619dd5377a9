use std::rc::Rc;

use crate::{
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Emits everything from this signal, then, once it completes, everything
  /// from `other`.
  ///
  /// `other` is subscribed only after this signal completed; an error ends
  /// the sequence.
  pub fn concat(&self, other: Signal<T, E>) -> Signal<T, E> {
    let first = self.clone();
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let (c_down, other) = (down.clone(), other.clone());
      let mut other = Some(other);
      first.subscribe_notification(move |n| match n {
        Notification::Next(v) => c_down.send_next(v),
        Notification::Error(e) => c_down.send_error(e),
        Notification::Complete => {
          if let Some(other) = other.take() {
            other.subscribe_observer(Rc::new(c_down.clone()));
          }
        }
      })
    })
  }

  /// Subscribes to each signal in turn. An empty list completes at once.
  pub fn concat_all(signals: impl IntoIterator<Item = Signal<T, E>>) -> Signal<T, E> {
    signals
      .into_iter()
      .reduce(|acc, next| acc.concat(next))
      .unwrap_or_else(Signal::empty)
  }

  /// Emits `value` before anything from this signal.
  pub fn start_with(&self, value: T) -> Signal<T, E>
  where
    T: Clone,
  {
    Signal::of(value).concat(self.clone())
  }

  /// Emits `value` after this signal completed.
  pub fn end_with(&self, value: T) -> Signal<T, E>
  where
    T: Clone,
  {
    self.concat(Signal::of(value))
  }

  /// Waits for this signal to complete, dropping its values, then continues
  /// with `other`.
  pub fn then<U: 'static>(&self, other: Signal<U, E>) -> Signal<U, E> {
    let first = self.clone();
    Signal::create(move |down: ProxySubscriber<U, E>| {
      let (c_down, other) = (down.clone(), other.clone());
      let mut other = Some(other);
      first.subscribe_notification(move |n| match n {
        Notification::Next(_) => {}
        Notification::Error(e) => c_down.send_error(e),
        Notification::Complete => {
          if let Some(other) = other.take() {
            other.subscribe_observer(Rc::new(c_down.clone()));
          }
        }
      })
    })
  }
}
