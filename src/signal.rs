//! Cold, lazily-started sources.
//!
//! A [`Signal`] is a definition: nothing runs until it is subscribed, and
//! every subscription runs the producer again, independently. Combinators in
//! [`ops`](crate::ops) derive new signals from existing ones.

use std::rc::Rc;

use crate::{
  disposable::{CompoundDisposable, Teardown},
  error::SignalError,
  notification::Notification,
  observer::ObserverRef,
  subscriber::{ProxySubscriber, Subscriber},
};

mod create;
mod from_future;
mod interval;

pub use from_future::{from_future, from_future_result};
pub use interval::interval;

type Producer<T, E> = dyn Fn(ProxySubscriber<T, E>) -> Teardown;

/// A cold value sequence.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// Signal::<i32>::from_iter([1, 2, 3])
///   .map(|v| v * 2)
///   .subscribe_next(move |v| c_seen.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![2, 4, 6]);
/// ```
pub struct Signal<T, E = SignalError> {
  producer: Rc<Producer<T, E>>,
}

impl<T, E> Clone for Signal<T, E> {
  fn clone(&self) -> Self { Self { producer: self.producer.clone() } }
}

/// Anything that can be subscribed to.
pub trait Observable<T, E> {
  /// Attaches `observer` and returns the disposal scope of the new
  /// subscription.
  fn subscribe_observer(&self, observer: ObserverRef<T, E>) -> CompoundDisposable;

  /// Subscribes with all three callbacks and returns the subscriber's
  /// disposal bag.
  fn subscribe(
    &self, next: impl FnMut(T) + 'static, complete: impl FnOnce() + 'static,
    error: impl FnOnce(E) + 'static,
  ) -> CompoundDisposable
  where
    Self: Sized,
    T: 'static,
    E: 'static,
  {
    attach(self, Subscriber::new(next, complete, error))
  }

  fn subscribe_next(&self, next: impl FnMut(T) + 'static) -> CompoundDisposable
  where
    Self: Sized,
    T: 'static,
    E: 'static,
  {
    attach(self, Subscriber::from_parts(Some(Box::new(next)), None, None))
  }

  fn subscribe_complete(&self, complete: impl FnOnce() + 'static) -> CompoundDisposable
  where
    Self: Sized,
    T: 'static,
    E: 'static,
  {
    attach(self, Subscriber::from_parts(None, Some(Box::new(complete)), None))
  }

  fn subscribe_error(&self, error: impl FnOnce(E) + 'static) -> CompoundDisposable
  where
    Self: Sized,
    T: 'static,
    E: 'static,
  {
    attach(self, Subscriber::from_parts(None, None, Some(Box::new(error))))
  }

  /// Routes every event, reified, through one callback.
  fn subscribe_notification(
    &self, handler: impl FnMut(Notification<T, E>) + 'static,
  ) -> CompoundDisposable
  where
    Self: Sized,
    T: 'static,
    E: 'static,
  {
    attach(self, Subscriber::from_handler(handler))
  }

  /// Views this source as a [`Signal`], for use with the combinators.
  fn to_signal(&self) -> Signal<T, E>
  where
    Self: Clone + Sized + 'static,
    T: 'static,
    E: 'static,
  {
    let source = self.clone();
    Signal::create(move |subscriber| source.subscribe_observer(Rc::new(subscriber)))
  }
}

fn attach<T: 'static, E: 'static, O: Observable<T, E> + ?Sized>(
  source: &O, subscriber: Rc<Subscriber<T, E>>,
) -> CompoundDisposable {
  source.subscribe_observer(subscriber.clone());
  subscriber.disposable().clone()
}

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Wraps `producer`, which runs once per subscription and returns the
  /// cleanup for that subscription.
  pub fn create<F, R>(producer: F) -> Self
  where
    F: Fn(ProxySubscriber<T, E>) -> R + 'static,
    R: Into<Teardown>,
  {
    Signal { producer: Rc::new(move |subscriber| producer(subscriber).into()) }
  }

  /// Derives a signal whose subscriptions feed every upstream event to a
  /// fresh handler built by `setup`.
  ///
  /// Upstream events reach the handler one at a time and at most one
  /// terminal event is seen. Disposing the downstream releases the upstream.
  pub(crate) fn lift<U, H>(&self, setup: impl Fn() -> H + 'static) -> Signal<U, E>
  where
    U: 'static,
    H: FnMut(Notification<T, E>, &ProxySubscriber<U, E>) + 'static,
  {
    let source = self.clone();
    Signal::create(move |downstream: ProxySubscriber<U, E>| {
      let mut handler = setup();
      let down = downstream.clone();
      let upstream = Subscriber::from_handler(move |n| handler(n, &down));
      source.subscribe_observer(upstream.clone());
      upstream.disposable().clone()
    })
  }
}

impl<T: 'static, E: 'static> Observable<T, E> for Signal<T, E> {
  fn subscribe_observer(&self, observer: ObserverRef<T, E>) -> CompoundDisposable {
    let scope = CompoundDisposable::new();
    let subscriber = ProxySubscriber::new(observer, scope.clone());
    let teardown = (self.producer)(subscriber);
    scope.add(teardown);
    scope
  }

  fn to_signal(&self) -> Signal<T, E> { self.clone() }
}

#[cfg(test)]
mod tests {
  use std::cell::{Cell, RefCell};

  use super::*;
  use crate::{disposable::Disposable, observer::Observer};

  #[rxsignal_macro::test]
  fn producer_runs_per_subscription() {
    let runs = Rc::new(Cell::new(0));
    let c_runs = runs.clone();
    let signal = Signal::<i32>::create(move |s| {
      c_runs.set(c_runs.get() + 1);
      s.send_next(c_runs.get());
      s.send_complete();
    });
    let seen = Rc::new(RefCell::new(vec![]));
    for _ in 0..2 {
      let seen = seen.clone();
      signal.subscribe_next(move |v| seen.borrow_mut().push(v));
    }
    assert_eq!(runs.get(), 2);
    assert_eq!(*seen.borrow(), vec![1, 2]);
  }

  #[rxsignal_macro::test]
  fn dispose_runs_teardown_and_stops_delivery() {
    let slot: Rc<RefCell<Option<ProxySubscriber<i32, SignalError>>>> = Rc::default();
    let torn_down = Rc::new(Cell::new(false));
    let signal = {
      let slot = slot.clone();
      let torn_down = torn_down.clone();
      Signal::create(move |s| {
        *slot.borrow_mut() = Some(s);
        let torn_down = torn_down.clone();
        Disposable::new(move || torn_down.set(true))
      })
    };
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let handle = signal.subscribe_next(move |v| c_seen.borrow_mut().push(v));
    let emit = |v| {
      if let Some(s) = slot.borrow().as_ref() {
        s.send_next(v);
      }
    };
    emit(1);
    handle.dispose();
    emit(2);
    assert!(torn_down.get());
    assert_eq!(*seen.borrow(), vec![1]);
  }

  #[rxsignal_macro::test]
  fn synchronous_completion_disposes_handle() {
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    let handle = Signal::<i32>::of(1).subscribe_complete(move || c_completed.set(true));
    assert!(completed.get());
    assert!(handle.is_disposed());
  }

  #[rxsignal_macro::test]
  fn lift_sees_one_terminal() {
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    Signal::<i32>::create(|s| {
      s.send_next(1);
      s.send_complete();
      s.send_next(2);
      s.send_error(SignalError::Empty);
    })
    .lift(|| |n: Notification<i32, SignalError>, down: &ProxySubscriber<String, SignalError>| {
      n.map(|v| v.to_string()).deliver_to(down)
    })
    .subscribe_notification(move |n| c_seen.borrow_mut().push(n));
    assert_eq!(
      *seen.borrow(),
      vec![Notification::Next("1".to_owned()), Notification::Complete]
    );
  }
}
