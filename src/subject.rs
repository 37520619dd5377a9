//! Hot multicast sources.
//!
//! A subject is both an [`Observer`] and an [`Observable`]: whatever is sent
//! into it is broadcast to its current subscribers. Three flavours:
//!
//! - [`Subject`]: live events only; late subscribers get the terminal event.
//! - [`ReplaySubject`]: replays the full event log to every new subscriber.
//! - [`CurrentSubject`]: replays only the latest value.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let subject = Subject::<i32>::new();
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//! subject.subscribe_next(move |v| c_seen.borrow_mut().push(v));
//! subject.send_next(1);
//! subject.send_next(2);
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! ```

use std::{cell::RefCell, rc::Rc};

use crate::{
  disposable::{CompoundDisposable, Disposable},
  error::SignalError,
  observer::{Observer, ObserverRef},
  signal::Observable,
  subscriber::ProxySubscriber,
};

mod current_subject;
mod replay_subject;
mod subscribers;

pub use current_subject::CurrentSubject;
pub use replay_subject::ReplaySubject;
use subscribers::{broadcast_complete, broadcast_error, broadcast_value, Subscribers};

/// Anything that can sit between a source and its consumers.
///
/// This is the sink bound of [`Connection`](crate::connection::Connection).
pub trait SubjectLike<T, E>: Observer<T, E> + Observable<T, E> + Clone + 'static {}

impl<T, E, S> SubjectLike<T, E> for S where S: Observer<T, E> + Observable<T, E> + Clone + 'static {}

#[derive(Clone)]
enum Terminal<E> {
  Complete,
  Error(E),
  Disposed,
}

/// A plain multicast subject.
///
/// Clones share the same subscriber set.
pub struct Subject<T, E = SignalError>(Rc<SubjectInner<T, E>>);

struct SubjectInner<T, E> {
  subscribers: RefCell<Subscribers<T, E>>,
  terminal: RefCell<Option<Terminal<E>>>,
  /// Upstream subscriptions feeding this subject.
  upstream: CompoundDisposable,
}

impl<T, E> Clone for Subject<T, E> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T, E> Default for Subject<T, E> {
  fn default() -> Self {
    Subject(Rc::new(SubjectInner {
      subscribers: RefCell::default(),
      terminal: RefCell::new(None),
      upstream: CompoundDisposable::new(),
    }))
  }
}

impl<T, E> Subject<T, E> {
  pub fn new() -> Self { Self::default() }

  /// Number of live subscriptions.
  pub fn subscriber_count(&self) -> usize { self.0.subscribers.borrow().len() }

  /// Whether a terminal event has been sent or the subject was disposed.
  pub fn is_terminated(&self) -> bool { self.0.terminal.borrow().is_some() }

  pub fn is_disposed(&self) -> bool { matches!(*self.0.terminal.borrow(), Some(Terminal::Disposed)) }

  /// Detaches every subscriber without a terminal event and releases the
  /// upstream feeding this subject. Later sends are ignored and later
  /// subscriptions end at once. Repeated calls do nothing.
  pub fn dispose(&self) {
    let observers = {
      let mut slot = self.0.terminal.borrow_mut();
      if slot.is_some() {
        return;
      }
      *slot = Some(Terminal::Disposed);
      self.0.subscribers.borrow_mut().take_all()
    };
    self.0.upstream.dispose();
    for observer in observers {
      observer.scope().dispose();
    }
  }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

  fn terminate(&self, terminal: Terminal<E>) -> Option<Vec<ProxySubscriber<T, E>>>
  where
    E: Clone,
  {
    {
      let mut slot = self.0.terminal.borrow_mut();
      if slot.is_some() {
        return None;
      }
      *slot = Some(terminal);
    }
    let observers = self.0.subscribers.borrow_mut().take_all();
    self.0.upstream.dispose();
    Some(observers)
  }
}

impl<T: 'static, E: Clone + 'static> Subject<T, E> {
  /// Registers an already-scoped consumer, or hands it the terminal event if
  /// the subject is done.
  pub(crate) fn attach(&self, proxy: ProxySubscriber<T, E>) {
    let terminal = self.0.terminal.borrow().clone();
    match terminal {
      Some(Terminal::Complete) => proxy.send_complete(),
      Some(Terminal::Error(e)) => proxy.send_error(e),
      Some(Terminal::Disposed) => proxy.scope().dispose(),
      None => {
        if proxy.is_disposed() {
          return;
        }
        let scope = proxy.scope().clone();
        let id = self.0.subscribers.borrow_mut().add(proxy);
        let inner = Rc::downgrade(&self.0);
        scope.add(Disposable::new(move || {
          if let Some(inner) = inner.upgrade() {
            inner.subscribers.borrow_mut().remove(id);
          }
        }));
      }
    }
  }
}

impl<T: Clone, E: Clone> Observer<T, E> for Subject<T, E> {
  fn send_next(&self, value: T) {
    if self.is_terminated() {
      return;
    }
    let observers = self.0.subscribers.borrow().snapshot();
    broadcast_value(observers, value);
  }

  fn send_complete(&self) {
    if let Some(observers) = self.terminate(Terminal::Complete) {
      tracing::trace!(subscribers = observers.len(), "subject completed");
      broadcast_complete(observers);
    }
  }

  fn send_error(&self, err: E) {
    if let Some(observers) = self.terminate(Terminal::Error(err.clone())) {
      tracing::trace!(subscribers = observers.len(), "subject errored");
      broadcast_error(observers, err);
    }
  }

  fn did_subscribe(&self, scope: &CompoundDisposable) { self.0.upstream.adopt(scope) }
}

impl<T: 'static, E: Clone + 'static> Observable<T, E> for Subject<T, E> {
  fn subscribe_observer(&self, observer: ObserverRef<T, E>) -> CompoundDisposable {
    let scope = CompoundDisposable::new();
    self.attach(ProxySubscriber::new(observer, scope.clone()));
    scope
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use super::*;
  use crate::{notification::Notification, signal::Signal};

  fn record(subject: &Subject<i32>) -> Rc<RefCell<Vec<Notification<i32, SignalError>>>> {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    subject.subscribe_notification(move |n| c_log.borrow_mut().push(n));
    log
  }

  #[rxsignal_macro::test]
  fn broadcasts_to_every_subscriber() {
    let subject = Subject::new();
    let first = record(&subject);
    subject.send_next(1);
    let second = record(&subject);
    subject.send_next(2);
    subject.send_complete();
    subject.send_next(3);
    assert_eq!(
      *first.borrow(),
      vec![Notification::Next(1), Notification::Next(2), Notification::Complete]
    );
    assert_eq!(*second.borrow(), vec![Notification::Next(2), Notification::Complete]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn late_subscriber_gets_terminal() {
    let subject = Subject::new();
    subject.send_error(SignalError::Empty);
    let late = record(&subject);
    assert_eq!(*late.borrow(), vec![Notification::Error(SignalError::Empty)]);
  }

  #[rxsignal_macro::test]
  fn dispose_unsubscribes() {
    let subject = Subject::<i32>::new();
    let handle = subject.subscribe_next(|_| {});
    assert_eq!(subject.subscriber_count(), 1);
    handle.dispose();
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn terminal_releases_upstream() {
    let subject = Subject::<i32>::new();
    let upstream = Subject::<i32>::new();
    upstream.subscribe_observer(Rc::new(subject.clone()));
    assert_eq!(upstream.subscriber_count(), 1);
    subject.send_complete();
    assert_eq!(upstream.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn dispose_twice_is_dispose_once() {
    let subject = Subject::<i32>::new();
    let upstream = Subject::<i32>::new();
    upstream.subscribe_observer(Rc::new(subject.clone()));
    let log = record(&subject);
    subject.send_next(1);

    subject.dispose();
    subject.dispose();
    assert!(subject.is_disposed());
    assert_eq!(subject.subscriber_count(), 0);
    assert_eq!(upstream.subscriber_count(), 0);

    subject.send_next(2);
    subject.send_complete();
    let late = record(&subject);
    assert_eq!(*log.borrow(), vec![Notification::Next(1)]);
    assert!(late.borrow().is_empty());
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn subscribe_during_broadcast_misses_current_value() {
    let subject = Subject::<i32>::new();
    let late = Rc::new(RefCell::new(vec![]));
    let (c_subject, c_late) = (subject.clone(), late.clone());
    let subscribed = Cell::new(false);
    subject.subscribe_next(move |_| {
      if !subscribed.replace(true) {
        let c_late = c_late.clone();
        c_subject.subscribe_next(move |v| c_late.borrow_mut().push(v));
      }
    });
    subject.send_next(1);
    subject.send_next(2);
    assert_eq!(*late.borrow(), vec![2]);
  }

  #[rxsignal_macro::test]
  fn feeds_from_a_signal() {
    let subject = Subject::new();
    let log = record(&subject);
    Signal::from_iter([1, 2]).subscribe_observer(Rc::new(subject.clone()));
    assert_eq!(
      *log.borrow(),
      vec![Notification::Next(1), Notification::Next(2), Notification::Complete]
    );
  }
}
