use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use super::Subject;
use crate::{
  disposable::CompoundDisposable,
  error::SignalError,
  observer::{Observer, ObserverRef},
  signal::Observable,
  subscriber::ProxySubscriber,
};

/// A subject that remembers its latest value and hands it to each new
/// subscriber.
///
/// Once terminated, new subscribers only receive the terminal event.
pub struct CurrentSubject<T, E = SignalError>(Rc<CurrentInner<T, E>>);

struct CurrentInner<T, E> {
  live: Subject<T, E>,
  value: RefCell<Option<T>>,
  version: Cell<usize>,
}

impl<T, E> Clone for CurrentSubject<T, E> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T, E> CurrentSubject<T, E> {
  /// A subject holding `initial`.
  pub fn new(initial: T) -> Self { Self::with_value(Some(initial)) }

  /// A subject with no value yet.
  pub fn empty() -> Self { Self::with_value(None) }

  fn with_value(value: Option<T>) -> Self {
    CurrentSubject(Rc::new(CurrentInner {
      live: Subject::new(),
      value: RefCell::new(value),
      version: Cell::new(0),
    }))
  }

  /// The latest value, if any.
  pub fn value(&self) -> Option<T>
  where
    T: Clone,
  {
    self.0.value.borrow().clone()
  }

  pub fn subscriber_count(&self) -> usize { self.0.live.subscriber_count() }

  pub fn is_terminated(&self) -> bool { self.0.live.is_terminated() }
}

impl<T: Clone, E: Clone> Observer<T, E> for CurrentSubject<T, E> {
  fn send_next(&self, value: T) {
    if self.is_terminated() {
      return;
    }
    *self.0.value.borrow_mut() = Some(value.clone());
    self.0.version.set(self.0.version.get() + 1);
    self.0.live.send_next(value);
  }

  fn send_complete(&self) { self.0.live.send_complete() }

  fn send_error(&self, err: E) { self.0.live.send_error(err) }

  fn did_subscribe(&self, scope: &CompoundDisposable) { self.0.live.did_subscribe(scope) }
}

impl<T: Clone + 'static, E: Clone + 'static> Observable<T, E> for CurrentSubject<T, E> {
  fn subscribe_observer(&self, observer: ObserverRef<T, E>) -> CompoundDisposable {
    let scope = CompoundDisposable::new();
    let proxy = ProxySubscriber::new(observer, scope.clone());
    if !self.is_terminated() {
      // Re-read if the replayed value caused a newer one to be sent.
      let mut replayed = None;
      while replayed != Some(self.0.version.get()) && !proxy.is_disposed() {
        replayed = Some(self.0.version.get());
        let value = self.0.value.borrow().clone();
        if let Some(v) = value {
          proxy.send_next(v);
        }
      }
    }
    self.0.live.attach(proxy);
    scope
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::notification::Notification;

  #[rxsignal_macro::test]
  fn new_subscribers_see_latest_only() {
    let subject = CurrentSubject::<i32>::new(0);
    subject.send_next(1);
    subject.send_next(2);
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    subject.subscribe_next(move |v| c_seen.borrow_mut().push(v));
    subject.send_next(3);
    assert_eq!(*seen.borrow(), vec![2, 3]);
    assert_eq!(subject.value(), Some(3));
  }

  #[rxsignal_macro::test]
  fn empty_replays_nothing() {
    let subject = CurrentSubject::<i32>::empty();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    subject.subscribe_next(move |v| c_seen.borrow_mut().push(v));
    assert!(seen.borrow().is_empty());
    assert_eq!(subject.value(), None);
  }

  #[rxsignal_macro::test]
  fn terminated_gives_terminal_only() {
    let subject = CurrentSubject::<i32>::new(5);
    subject.send_complete();
    subject.send_next(6);
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    subject.subscribe_notification(move |n| c_log.borrow_mut().push(n));
    assert_eq!(*log.borrow(), vec![Notification::Complete]);
    assert_eq!(subject.value(), Some(5));
  }

  #[rxsignal_macro::test]
  fn value_sent_during_replay_is_delivered() {
    let subject = CurrentSubject::<i32>::new(1);
    let seen = Rc::new(RefCell::new(vec![]));
    let (c_subject, c_seen) = (subject.clone(), seen.clone());
    subject.subscribe_next(move |v| {
      c_seen.borrow_mut().push(v);
      if v == 1 {
        c_subject.send_next(10);
      }
    });
    assert_eq!(*seen.borrow(), vec![1, 10]);
  }
}
