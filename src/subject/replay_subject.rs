use std::{cell::RefCell, rc::Rc};

use super::Subject;
use crate::{
  disposable::CompoundDisposable,
  error::SignalError,
  notification::Notification,
  observer::{Observer, ObserverRef},
  signal::Observable,
  subscriber::ProxySubscriber,
};

/// A subject that records every event and replays the whole log, in order,
/// to each new subscriber before any live event.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let subject = ReplaySubject::<i32>::new();
/// subject.send_next(1);
/// subject.send_next(2);
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// subject.subscribe_next(move |v| c_seen.borrow_mut().push(v));
/// subject.send_next(3);
/// assert_eq!(*seen.borrow(), vec![1, 2, 3]);
/// ```
pub struct ReplaySubject<T, E = SignalError>(Rc<ReplayInner<T, E>>);

struct ReplayInner<T, E> {
  live: Subject<T, E>,
  log: RefCell<Vec<Notification<T, E>>>,
}

impl<T, E> Clone for ReplaySubject<T, E> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T, E> Default for ReplaySubject<T, E> {
  fn default() -> Self {
    ReplaySubject(Rc::new(ReplayInner { live: Subject::new(), log: RefCell::default() }))
  }
}

impl<T, E> ReplaySubject<T, E> {
  pub fn new() -> Self { Self::default() }

  pub fn subscriber_count(&self) -> usize { self.0.live.subscriber_count() }

  pub fn is_terminated(&self) -> bool { self.0.live.is_terminated() }

  /// Number of recorded events, the terminal one included.
  pub fn log_len(&self) -> usize { self.0.log.borrow().len() }
}

impl<T: Clone, E: Clone> Observer<T, E> for ReplaySubject<T, E> {
  fn send_next(&self, value: T) {
    if self.is_terminated() {
      return;
    }
    self
      .0
      .log
      .borrow_mut()
      .push(Notification::Next(value.clone()));
    self.0.live.send_next(value);
  }

  fn send_complete(&self) {
    if self.is_terminated() {
      return;
    }
    self.0.log.borrow_mut().push(Notification::Complete);
    self.0.live.send_complete();
  }

  fn send_error(&self, err: E) {
    if self.is_terminated() {
      return;
    }
    self
      .0
      .log
      .borrow_mut()
      .push(Notification::Error(err.clone()));
    self.0.live.send_error(err);
  }

  fn did_subscribe(&self, scope: &CompoundDisposable) { self.0.live.did_subscribe(scope) }
}

impl<T: Clone + 'static, E: Clone + 'static> Observable<T, E> for ReplaySubject<T, E> {
  fn subscribe_observer(&self, observer: ObserverRef<T, E>) -> CompoundDisposable {
    let scope = CompoundDisposable::new();
    let proxy = ProxySubscriber::new(observer, scope.clone());
    // Events recorded while replaying are replayed too.
    let mut index = 0;
    loop {
      let next = self.0.log.borrow().get(index).cloned();
      let Some(n) = next else { break };
      index += 1;
      let terminal = n.is_terminal();
      n.deliver_to(&proxy);
      if terminal || proxy.is_disposed() {
        return scope;
      }
    }
    self.0.live.attach(proxy);
    scope
  }
}
