use crate::{disposable::KeyedSlots, observer::Observer, subscriber::ProxySubscriber};

/// The live consumers of a subject, keyed by subscription id.
///
/// Broadcasts work on a snapshot taken while the subject's borrow is held and
/// run after it is released, so consumers may subscribe, unsubscribe or send
/// back into the subject from their callbacks.
pub(crate) struct Subscribers<T, E> {
  inner: KeyedSlots<ProxySubscriber<T, E>>,
}

impl<T, E> Default for Subscribers<T, E> {
  fn default() -> Self { Self { inner: KeyedSlots::default() } }
}

impl<T, E> Subscribers<T, E> {
  #[inline]
  pub fn add(&mut self, observer: ProxySubscriber<T, E>) -> usize { self.inner.add(observer) }

  #[inline]
  pub fn remove(&mut self, id: usize) -> Option<ProxySubscriber<T, E>> { self.inner.remove(id) }

  #[inline]
  pub fn len(&self) -> usize { self.inner.len() }

  pub fn snapshot(&self) -> Vec<ProxySubscriber<T, E>> { self.inner.snapshot() }

  pub fn take_all(&mut self) -> Vec<ProxySubscriber<T, E>> { self.inner.drain() }
}

/// Sends `value` to every observer: clones for all but the last, which gets
/// the value itself.
pub(crate) fn broadcast_value<T: Clone, E>(observers: Vec<ProxySubscriber<T, E>>, value: T) {
  let mut iter = observers.into_iter().peekable();
  while let Some(observer) = iter.next() {
    if iter.peek().is_some() {
      observer.send_next(value.clone());
    } else {
      observer.send_next(value);
      break;
    }
  }
}

pub(crate) fn broadcast_error<T, E: Clone>(observers: Vec<ProxySubscriber<T, E>>, err: E) {
  let mut iter = observers.into_iter().peekable();
  while let Some(observer) = iter.next() {
    if iter.peek().is_some() {
      observer.send_error(err.clone());
    } else {
      observer.send_error(err);
      break;
    }
  }
}

pub(crate) fn broadcast_complete<T, E>(observers: Vec<ProxySubscriber<T, E>>) {
  for observer in observers {
    observer.send_complete();
  }
}
