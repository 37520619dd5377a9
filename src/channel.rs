//! Symmetric bidirectional pipes.
//!
//! A [`Channel`] has two [`ChannelTerminal`]s. Whatever is sent into one
//! terminal is observed by the subscribers of the other, and a terminal event
//! on either side ends both directions.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let channel = Channel::<&str>::new(ChannelKind::Common);
//! let (client, server) = (channel.one(), channel.other());
//!
//! let received = Rc::new(RefCell::new(vec![]));
//! let c_received = received.clone();
//! server.subscribe_next(move |v| c_received.borrow_mut().push(v));
//! client.send_next("ping");
//! assert_eq!(*received.borrow(), vec!["ping"]);
//! ```

use std::rc::{Rc, Weak};

use crate::{
  disposable::CompoundDisposable,
  error::SignalError,
  notification::Notification,
  observer::{Observer, ObserverRef},
  signal::Observable,
  subject::{CurrentSubject, ReplaySubject, Subject},
  subscriber::Subscriber,
};

/// Which subject backs each direction of a [`Channel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelKind {
  /// Buffered: a late subscriber sees everything sent so far.
  #[default]
  Relay,
  /// Unbuffered: only live events.
  Common,
  /// Latest-only: a late subscriber sees the last value sent.
  Current,
}

enum ChannelSubject<T, E> {
  Relay(ReplaySubject<T, E>),
  Common(Subject<T, E>),
  Current(CurrentSubject<T, E>),
}

impl<T, E> ChannelSubject<T, E> {
  fn new(kind: ChannelKind) -> Self {
    match kind {
      ChannelKind::Relay => ChannelSubject::Relay(ReplaySubject::new()),
      ChannelKind::Common => ChannelSubject::Common(Subject::new()),
      ChannelKind::Current => ChannelSubject::Current(CurrentSubject::empty()),
    }
  }
}

impl<T: Clone, E: Clone> Observer<T, E> for ChannelSubject<T, E> {
  fn send_next(&self, value: T) {
    match self {
      ChannelSubject::Relay(s) => s.send_next(value),
      ChannelSubject::Common(s) => s.send_next(value),
      ChannelSubject::Current(s) => s.send_next(value),
    }
  }

  fn send_complete(&self) {
    match self {
      ChannelSubject::Relay(s) => s.send_complete(),
      ChannelSubject::Common(s) => s.send_complete(),
      ChannelSubject::Current(s) => s.send_complete(),
    }
  }

  fn send_error(&self, err: E) {
    match self {
      ChannelSubject::Relay(s) => s.send_error(err),
      ChannelSubject::Common(s) => s.send_error(err),
      ChannelSubject::Current(s) => s.send_error(err),
    }
  }

  fn did_subscribe(&self, scope: &CompoundDisposable) {
    match self {
      ChannelSubject::Relay(s) => s.did_subscribe(scope),
      ChannelSubject::Common(s) => s.did_subscribe(scope),
      ChannelSubject::Current(s) => s.did_subscribe(scope),
    }
  }
}

impl<T: Clone + 'static, E: Clone + 'static> ChannelSubject<T, E> {
  fn subscribe_observer(&self, observer: ObserverRef<T, E>) -> CompoundDisposable {
    match self {
      ChannelSubject::Relay(s) => s.subscribe_observer(observer),
      ChannelSubject::Common(s) => s.subscribe_observer(observer),
      ChannelSubject::Current(s) => s.subscribe_observer(observer),
    }
  }
}

/// One end of a [`Channel`]: sends go out to the other end, subscriptions
/// listen to what the other end sent.
pub struct ChannelTerminal<T, E = SignalError> {
  incoming: Rc<ChannelSubject<T, E>>,
  outgoing: Rc<ChannelSubject<T, E>>,
}

impl<T, E> Clone for ChannelTerminal<T, E> {
  fn clone(&self) -> Self {
    Self { incoming: self.incoming.clone(), outgoing: self.outgoing.clone() }
  }
}

impl<T: Clone, E: Clone> Observer<T, E> for ChannelTerminal<T, E> {
  #[inline]
  fn send_next(&self, value: T) { self.outgoing.send_next(value) }

  #[inline]
  fn send_complete(&self) { self.outgoing.send_complete() }

  #[inline]
  fn send_error(&self, err: E) { self.outgoing.send_error(err) }

  #[inline]
  fn did_subscribe(&self, scope: &CompoundDisposable) { self.outgoing.did_subscribe(scope) }
}

impl<T: Clone + 'static, E: Clone + 'static> Observable<T, E> for ChannelTerminal<T, E> {
  fn subscribe_observer(&self, observer: ObserverRef<T, E>) -> CompoundDisposable {
    self.incoming.subscribe_observer(observer)
  }
}

/// A pair of cross-wired terminals.
pub struct Channel<T, E = SignalError> {
  kind: ChannelKind,
  one: ChannelTerminal<T, E>,
  other: ChannelTerminal<T, E>,
}

impl<T: Clone + 'static, E: Clone + 'static> Default for Channel<T, E> {
  fn default() -> Self { Self::new(ChannelKind::default()) }
}

impl<T: Clone + 'static, E: Clone + 'static> Channel<T, E> {
  pub fn new(kind: ChannelKind) -> Self {
    let a = Rc::new(ChannelSubject::new(kind));
    let b = Rc::new(ChannelSubject::new(kind));
    forward_terminal(&a, Rc::downgrade(&b));
    forward_terminal(&b, Rc::downgrade(&a));
    Channel {
      kind,
      one: ChannelTerminal { incoming: b.clone(), outgoing: a.clone() },
      other: ChannelTerminal { incoming: a, outgoing: b },
    }
  }

  pub fn kind(&self) -> ChannelKind { self.kind }

  pub fn one(&self) -> ChannelTerminal<T, E> { self.one.clone() }

  pub fn other(&self) -> ChannelTerminal<T, E> { self.other.clone() }

  /// Both terminals, `one` first.
  pub fn split(self) -> (ChannelTerminal<T, E>, ChannelTerminal<T, E>) { (self.one, self.other) }
}

/// Ends `to` when `from` ends.
fn forward_terminal<T: Clone + 'static, E: Clone + 'static>(
  from: &ChannelSubject<T, E>, to: Weak<ChannelSubject<T, E>>,
) {
  let forward = Subscriber::from_handler(move |n: Notification<T, E>| {
    if !n.is_terminal() {
      return;
    }
    if let Some(to) = to.upgrade() {
      n.deliver_to(&*to);
    }
  });
  from.subscribe_observer(forward);
}
