use crate::{
  disposable::{CompoundDisposable, Teardown},
  observer::{Observer, ObserverRef},
};

/// Relays events from a producer to the next observer within one disposal
/// scope.
///
/// Creating a proxy announces the scope to the inner observer, so a
/// terminal event at the inner end releases the scope. Events are dropped
/// once the scope is disposed. The proxy never owns teardown itself: cleanup
/// registered through it lands in the scope.
pub struct ProxySubscriber<T, E> {
  inner: ObserverRef<T, E>,
  scope: CompoundDisposable,
}

impl<T, E> Clone for ProxySubscriber<T, E> {
  fn clone(&self) -> Self { Self { inner: self.inner.clone(), scope: self.scope.clone() } }
}

impl<T, E> ProxySubscriber<T, E> {
  pub fn new(inner: ObserverRef<T, E>, scope: CompoundDisposable) -> Self {
    inner.did_subscribe(&scope);
    Self { inner, scope }
  }

  /// The disposal scope of this hop.
  #[inline]
  pub fn scope(&self) -> &CompoundDisposable { &self.scope }

  #[inline]
  pub fn is_disposed(&self) -> bool { self.scope.is_disposed() }

  /// Ties `teardown` to the lifetime of this subscription.
  #[inline]
  pub fn add_teardown(&self, teardown: impl Into<Teardown>) { self.scope.add(teardown) }
}

impl<T, E> Observer<T, E> for ProxySubscriber<T, E> {
  fn send_next(&self, value: T) {
    if !self.scope.is_disposed() {
      self.inner.send_next(value);
    }
  }

  fn send_complete(&self) {
    if !self.scope.is_disposed() {
      self.inner.send_complete();
    }
  }

  fn send_error(&self, err: E) {
    if !self.scope.is_disposed() {
      self.inner.send_error(err);
    }
  }

  fn did_subscribe(&self, scope: &CompoundDisposable) {
    if scope.ptr_eq(&self.scope) || scope.is_disposed() {
      return;
    }
    self.scope.add(scope.clone());
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::subscriber::Subscriber;

  #[rxsignal_macro::test]
  fn drops_events_after_scope_disposed() {
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let subscriber = Subscriber::<i32, ()>::new(move |v| c_seen.borrow_mut().push(v), || {}, |_| {});
    let proxy = ProxySubscriber::new(subscriber, CompoundDisposable::new());
    proxy.send_next(1);
    proxy.scope().dispose();
    proxy.send_next(2);
    assert_eq!(*seen.borrow(), vec![1]);
  }

  #[rxsignal_macro::test]
  fn inner_terminal_releases_scope() {
    let subscriber = Subscriber::<i32, ()>::new(|_| {}, || {}, |_| {});
    let scope = CompoundDisposable::new();
    let proxy = ProxySubscriber::new(subscriber, scope.clone());
    let upstream = CompoundDisposable::new();
    proxy.did_subscribe(&upstream);
    proxy.did_subscribe(&scope);
    proxy.send_complete();
    assert!(scope.is_disposed());
    assert!(upstream.is_disposed());
  }
}
