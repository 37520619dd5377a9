//! Terminal consumers.
//!
//! A [`Subscriber`] wraps the user's callbacks and owns the disposal bag of
//! one subscription. A [`ProxySubscriber`] sits between a producer and the
//! next observer and carries the disposal scope of that hop.

use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
  rc::{Rc, Weak},
};

use crate::{
  disposable::{CompoundDisposable, Disposable},
  notification::Notification,
  observer::Observer,
};

mod proxy;

pub use proxy::ProxySubscriber;

type Handler<T, E> = Box<dyn FnMut(Notification<T, E>)>;

/// The end of a subscription chain.
///
/// Terminal callbacks fire at most once. The first terminal event disposes
/// the subscriber's bag, which releases every upstream scope attached to it
/// and clears the callbacks, before the callback itself runs.
///
/// Notifications that arrive while a callback of this subscriber is still
/// running are queued and delivered in order once it returns, so callbacks
/// never overlap.
///
/// An error delivered to a subscriber built without an error callback is
/// dropped; the drop is reported as a `debug` level `tracing` event.
pub struct Subscriber<T, E> {
  handler: RefCell<Option<Handler<T, E>>>,
  queue: RefCell<VecDeque<Notification<T, E>>>,
  delivering: Cell<bool>,
  disposable: CompoundDisposable,
}

impl<T: 'static, E: 'static> Subscriber<T, E> {
  pub fn new(
    next: impl FnMut(T) + 'static, complete: impl FnOnce() + 'static,
    error: impl FnOnce(E) + 'static,
  ) -> Rc<Self> {
    Self::from_parts(Some(Box::new(next)), Some(Box::new(complete)), Some(Box::new(error)))
  }

  /// Builds a subscriber from optional callbacks; a missing callback ignores
  /// its event.
  pub fn from_parts(
    mut next: Option<Box<dyn FnMut(T)>>, mut complete: Option<Box<dyn FnOnce()>>,
    mut error: Option<Box<dyn FnOnce(E)>>,
  ) -> Rc<Self> {
    Self::from_handler(move |n| match n {
      Notification::Next(v) => {
        if let Some(next) = next.as_mut() {
          next(v);
        }
      }
      Notification::Complete => {
        if let Some(complete) = complete.take() {
          complete();
        }
      }
      Notification::Error(e) => match error.take() {
        Some(error) => error(e),
        None => tracing::debug!("subscriber has no error callback; error dropped"),
      },
    })
  }

  /// Builds a subscriber that routes every event through one handler.
  pub fn from_handler(handler: impl FnMut(Notification<T, E>) + 'static) -> Rc<Self> {
    Rc::new_cyclic(|weak: &Weak<Self>| {
      let disposable = CompoundDisposable::new();
      let weak = weak.clone();
      disposable.add(Disposable::new(move || {
        if let Some(this) = weak.upgrade() {
          let handler = this.handler.borrow_mut().take();
          this.queue.borrow_mut().clear();
          drop(handler);
        }
      }));
      Subscriber {
        handler: RefCell::new(Some(Box::new(handler))),
        queue: RefCell::new(VecDeque::new()),
        delivering: Cell::new(false),
        disposable,
      }
    })
  }
}

impl<T, E> Subscriber<T, E> {
  /// Stops delivery and releases everything this subscriber owns.
  pub fn dispose(&self) { self.disposable.dispose() }

  pub fn is_disposed(&self) -> bool { self.disposable.is_disposed() }

  pub fn disposable(&self) -> &CompoundDisposable { &self.disposable }

  fn deliver(&self, notification: Notification<T, E>) {
    if self.disposable.is_disposed() {
      return;
    }
    self.queue.borrow_mut().push_back(notification);
    if self.delivering.replace(true) {
      return;
    }
    loop {
      let notification = self.queue.borrow_mut().pop_front();
      let Some(notification) = notification else { break };
      let handler = self.handler.borrow_mut().take();
      if notification.is_terminal() {
        self.disposable.dispose();
        if let Some(mut handler) = handler {
          handler(notification);
        }
      } else if let Some(mut handler) = handler {
        handler(notification);
        if !self.disposable.is_disposed() {
          let mut slot = self.handler.borrow_mut();
          if slot.is_none() {
            *slot = Some(handler);
          }
        }
      }
    }
    self.delivering.set(false);
  }
}

impl<T, E> Observer<T, E> for Subscriber<T, E> {
  #[inline]
  fn send_next(&self, value: T) { self.deliver(Notification::Next(value)) }

  #[inline]
  fn send_complete(&self) { self.deliver(Notification::Complete) }

  #[inline]
  fn send_error(&self, err: E) { self.deliver(Notification::Error(err)) }

  fn did_subscribe(&self, scope: &CompoundDisposable) { self.disposable.adopt(scope) }
}
