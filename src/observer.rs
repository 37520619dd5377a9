//! Observer trait: the receiving side of a stream.
//!
//! Everything that can be handed to a producer implements [`Observer`]:
//! terminal [`Subscriber`](crate::subscriber::Subscriber)s, relaying
//! [`ProxySubscriber`](crate::subscriber::ProxySubscriber)s, subjects and
//! channel terminals.

use std::rc::Rc;

use crate::disposable::CompoundDisposable;

/// Receives values, errors and completion from a source.
///
/// All methods take `&self`: observers are shared through [`ObserverRef`]
/// and may be called reentrantly from inside their own callbacks.
pub trait Observer<T, E> {
  fn send_next(&self, value: T);

  fn send_complete(&self);

  fn send_error(&self, err: E);

  /// Called once per subscription with the disposal scope of that
  /// subscription, so the observer can tie the scope to its own lifetime.
  fn did_subscribe(&self, scope: &CompoundDisposable);
}

/// Shared, type-erased observer.
pub type ObserverRef<T, E> = Rc<dyn Observer<T, E>>;

impl<T, E, O> Observer<T, E> for Rc<O>
where
  O: Observer<T, E> + ?Sized,
{
  #[inline]
  fn send_next(&self, value: T) { (**self).send_next(value) }

  #[inline]
  fn send_complete(&self) { (**self).send_complete() }

  #[inline]
  fn send_error(&self, err: E) { (**self).send_error(err) }

  #[inline]
  fn did_subscribe(&self, scope: &CompoundDisposable) { (**self).did_subscribe(scope) }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;

  #[derive(Default)]
  struct Recorder {
    values: RefCell<Vec<i32>>,
    completed: RefCell<bool>,
  }

  impl Observer<i32, ()> for Recorder {
    fn send_next(&self, value: i32) { self.values.borrow_mut().push(value); }

    fn send_complete(&self) { *self.completed.borrow_mut() = true; }

    fn send_error(&self, _: ()) {}

    fn did_subscribe(&self, _: &CompoundDisposable) {}
  }

  #[rxsignal_macro::test]
  fn rc_forwards() {
    let recorder = Rc::new(Recorder::default());
    let erased: ObserverRef<i32, ()> = recorder.clone();
    erased.send_next(1);
    erased.send_next(2);
    erased.send_complete();
    assert_eq!(*recorder.values.borrow(), vec![1, 2]);
    assert!(*recorder.completed.borrow());
  }
}
