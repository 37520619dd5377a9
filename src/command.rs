//! Bounded-concurrency execution of signal-producing actions.
//!
//! A [`Command`] turns repeated `execute(input)` calls into at most `N` live
//! invocations plus a FIFO backlog. Every invocation runs once, through a
//! [`Connection`] into a [`ReplaySubject`], so all subscribers of its handle
//! see the same outcome whenever they subscribe.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let save = Command::<_, String>::serial(|name: &'static str| Signal::of(format!("saved {name}")));
//! let saved = Rc::new(RefCell::new(vec![]));
//! let c_saved = saved.clone();
//! save
//!   .execute("draft")
//!   .subscribe_next(move |v| c_saved.borrow_mut().push(v));
//! assert_eq!(*saved.borrow(), vec!["saved draft".to_owned()]);
//! ```

use std::{
  cell::RefCell,
  collections::VecDeque,
  rc::{Rc, Weak},
};

use crate::{
  connection::Connection,
  disposable::KeyedSlots,
  error::SignalError,
  notification::Notification,
  signal::{Observable, Signal},
  subject::ReplaySubject,
  subscriber::Subscriber,
};

type Invocation<T, E> = Connection<T, E, ReplaySubject<T, E>>;

struct CommandState<T, E> {
  in_flight: KeyedSlots<Invocation<T, E>>,
  waiting: VecDeque<(usize, Invocation<T, E>)>,
}

/// A concurrency-gated executor.
///
/// - concurrency `0`: exclusive. Executing while an invocation is in flight
///   yields a signal that errors with [`SignalError::CommandBusy`]; nothing
///   is queued.
/// - concurrency `N > 0`: up to `N` invocations run at once, the rest wait
///   in FIFO order.
pub struct Command<I, T, E = SignalError> {
  factory: Rc<dyn Fn(I) -> Signal<T, E>>,
  concurrency: usize,
  state: Rc<RefCell<CommandState<T, E>>>,
}

impl<I, T, E> Clone for Command<I, T, E> {
  fn clone(&self) -> Self {
    Self { factory: self.factory.clone(), concurrency: self.concurrency, state: self.state.clone() }
  }
}

impl<I: 'static, T: Clone + 'static, E: Clone + From<SignalError> + 'static> Command<I, T, E> {
  pub fn new(concurrency: usize, factory: impl Fn(I) -> Signal<T, E> + 'static) -> Self {
    Command {
      factory: Rc::new(factory),
      concurrency,
      state: Rc::new(RefCell::new(CommandState {
        in_flight: KeyedSlots::default(),
        waiting: VecDeque::new(),
      })),
    }
  }

  /// Concurrency `0`: rejects calls while busy.
  pub fn exclusive(factory: impl Fn(I) -> Signal<T, E> + 'static) -> Self { Self::new(0, factory) }

  /// Concurrency `1`: one at a time, the rest queued.
  pub fn serial(factory: impl Fn(I) -> Signal<T, E> + 'static) -> Self { Self::new(1, factory) }

  pub fn concurrency(&self) -> usize { self.concurrency }

  /// Number of running invocations.
  pub fn in_flight(&self) -> usize { self.state.borrow().in_flight.len() }

  /// Number of invocations waiting for a free slot.
  pub fn queued(&self) -> usize { self.state.borrow().waiting.len() }

  fn limit(&self) -> usize { self.concurrency.max(1) }

  /// Starts, queues or rejects an invocation and returns its multicast
  /// handle.
  pub fn execute(&self, input: I) -> Signal<T, E> {
    if self.concurrency == 0 && self.in_flight() > 0 {
      tracing::debug!("command busy; invocation rejected");
      return Signal::throw_err(SignalError::CommandBusy.into());
    }

    let subject = ReplaySubject::new();
    let invocation = Connection::new((self.factory)(input), subject.clone());
    let id = self.state.borrow_mut().in_flight.reserve_id();
    subject.subscribe_observer(settle_hook(id, Rc::downgrade(&self.state), self.limit()));

    let admitted = {
      let mut state = self.state.borrow_mut();
      if state.in_flight.len() < self.limit() {
        state.in_flight.insert(id, invocation.clone());
        true
      } else {
        state.waiting.push_back((id, invocation.clone()));
        false
      }
    };
    if admitted {
      tracing::debug!(id, "command invocation admitted");
      invocation.connect();
    } else {
      tracing::debug!(id, queued = self.queued(), "command invocation queued");
    }
    subject.to_signal()
  }
}

/// Frees the slot of invocation `id` when it terminates and admits the head
/// of the queue.
fn settle_hook<T: Clone + 'static, E: Clone + 'static>(
  id: usize, state: Weak<RefCell<CommandState<T, E>>>, limit: usize,
) -> Rc<Subscriber<T, E>> {
  Subscriber::from_handler(move |n: Notification<T, E>| {
    if !n.is_terminal() {
      return;
    }
    let Some(state) = state.upgrade() else { return };
    let next = {
      let mut state = state.borrow_mut();
      state.in_flight.remove(id);
      if state.in_flight.len() < limit {
        state.waiting.pop_front().map(|(next_id, invocation)| {
          state.in_flight.insert(next_id, invocation.clone());
          (next_id, invocation)
        })
      } else {
        None
      }
    };
    tracing::debug!(id, "command invocation settled");
    if let Some((next_id, invocation)) = next {
      tracing::debug!(id = next_id, "command invocation admitted from queue");
      invocation.connect();
    }
  })
}
