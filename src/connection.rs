//! Binding a cold [`Signal`] to a hot subject.
//!
//! A [`Connection`] controls when the source starts: nothing runs until
//! [`Connection::connect`] (manual) or until the first subscriber of
//! [`Connection::auto_connect`] arrives (refcounted).
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let runs = Rc::new(Cell::new(0));
//! let c_runs = runs.clone();
//! let source = Signal::<i32>::create(move |s| {
//!   c_runs.set(c_runs.get() + 1);
//!   s.send_next(1);
//! });
//!
//! let connection = Connection::new(source, Subject::<i32>::new());
//! let shared = connection.auto_connect();
//! let first = shared.subscribe_next(|_| {});
//! let second = shared.subscribe_next(|_| {});
//! assert_eq!(runs.get(), 1);
//!
//! first.dispose();
//! second.dispose();
//! assert!(!connection.is_connected());
//! ```

use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::{
  disposable::{CompoundDisposable, Disposable},
  error::SignalError,
  signal::{Observable, Signal},
  subject::{Subject, SubjectLike},
  subscriber::ProxySubscriber,
};

/// One source signal feeding one sink subject.
///
/// Clones share the same connection state.
pub struct Connection<T, E = SignalError, S = Subject<T, E>>(Rc<ConnectionInner<T, E, S>>);

struct ConnectionInner<T, E, S> {
  source: Signal<T, E>,
  sink: S,
  handle: RefCell<Option<CompoundDisposable>>,
  ref_count: Cell<usize>,
}

impl<T, E, S> Clone for Connection<T, E, S> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: 'static, E: 'static, S: SubjectLike<T, E>> Connection<T, E, S> {
  pub fn new(source: Signal<T, E>, sink: S) -> Self {
    Connection(Rc::new(ConnectionInner {
      source,
      sink,
      handle: RefCell::new(None),
      ref_count: Cell::new(0),
    }))
  }

  /// The subject consumers subscribe to.
  #[inline]
  pub fn sink(&self) -> &S { &self.0.sink }

  /// Subscribes the sink to the source, once.
  ///
  /// Later calls return the same handle until [`Connection::disconnect`].
  /// Disposing the handle stops the source without allowing a fresh
  /// connect; use `disconnect` for that.
  pub fn connect(&self) -> CompoundDisposable {
    if let Some(handle) = self.0.handle.borrow().as_ref() {
      return handle.clone();
    }
    // Stored before subscribing so a reentrant connect sees it.
    let handle = CompoundDisposable::new();
    *self.0.handle.borrow_mut() = Some(handle.clone());
    tracing::debug!("connection connected");
    let sink = Rc::new(self.0.sink.clone());
    handle.add(self.0.source.subscribe_observer(sink));
    handle
  }

  /// Stops the source subscription; the next `connect` subscribes afresh.
  pub fn disconnect(&self) {
    let handle = self.0.handle.borrow_mut().take();
    if let Some(handle) = handle {
      tracing::debug!("connection disconnected");
      handle.dispose();
    }
  }

  /// Whether a live source subscription exists.
  pub fn is_connected(&self) -> bool {
    self
      .0
      .handle
      .borrow()
      .as_ref()
      .is_some_and(|handle| !handle.is_disposed())
  }

  /// Number of live subscribers counted by [`Connection::auto_connect`].
  pub fn ref_count(&self) -> usize { self.0.ref_count.get() }

  /// A signal over the sink that connects on its first subscriber and
  /// disconnects when the last one goes away.
  pub fn auto_connect(&self) -> Signal<T, E> {
    let connection = self.clone();
    Signal::create(move |down: ProxySubscriber<T, E>| {
      connection.sink().subscribe_observer(Rc::new(down.clone()));
      if down.is_disposed() {
        return;
      }
      let count = &connection.0.ref_count;
      count.set(count.get() + 1);
      if count.get() == 1 {
        connection.connect();
      }
      let release = connection.clone();
      down.add_teardown(Disposable::new(move || {
        let count = &release.0.ref_count;
        count.set(count.get() - 1);
        if count.get() == 0 {
          release.disconnect();
        }
      }));
    })
  }
}
