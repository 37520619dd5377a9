use std::future::Future;

use futures::{
  future::{abortable, FutureExt},
  task::{LocalSpawn, LocalSpawnExt},
};

use super::Signal;
use crate::{disposable::Disposable, observer::Observer, subscriber::ProxySubscriber};

/// Converts a future into a signal that emits its output once, then
/// completes.
///
/// The future is driven by `spawner` and shared between subscriptions, so it
/// runs at most once no matter how many times the signal is subscribed.
/// Disposing a subscription before the future resolves detaches that
/// subscription only.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use futures::{executor::LocalPool, future};
/// use rxsignal::{prelude::*, signal::from_future};
///
/// let mut pool = LocalPool::new();
/// let seen = Rc::new(RefCell::new(vec![]));
/// let c_seen = seen.clone();
/// from_future::<_, SignalError, _>(future::ready(1), pool.spawner())
///   .subscribe_next(move |v| c_seen.borrow_mut().push(v));
/// pool.run();
/// assert_eq!(*seen.borrow(), vec![1]);
/// ```
///
/// Use [`from_future_result`] when the output is a `Result` that should end
/// the signal with an error.
pub fn from_future<F, E, S>(future: F, spawner: S) -> Signal<F::Output, E>
where
  F: Future + 'static,
  F::Output: Clone + 'static,
  E: Clone + 'static,
  S: LocalSpawn + Clone + 'static,
{
  from_future_result(future.map(Ok), spawner)
}

/// Converts a future of `Result` into a signal: `Ok(v)` emits `v` and
/// completes, `Err(e)` errors.
pub fn from_future_result<F, T, E, S>(future: F, spawner: S) -> Signal<T, E>
where
  F: Future<Output = Result<T, E>> + 'static,
  T: Clone + 'static,
  E: Clone + 'static,
  S: LocalSpawn + Clone + 'static,
{
  let shared = future.shared();
  Signal::create(move |s: ProxySubscriber<T, E>| {
    let (future, handle) = abortable(shared.clone());
    let subscriber = s.clone();
    let task = async move {
      if let Ok(result) = future.await {
        match result {
          Ok(v) => {
            subscriber.send_next(v);
            subscriber.send_complete();
          }
          Err(e) => subscriber.send_error(e),
        }
      }
    };
    if let Err(err) = spawner.spawn_local(task) {
      tracing::error!(%err, "failed to spawn future; signal will not emit");
    }
    Disposable::new(move || handle.abort())
  })
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use futures::{
    channel::oneshot,
    executor::LocalPool,
    future::{self, FutureExt},
  };

  use super::*;
  use crate::{error::SignalError, notification::Notification, prelude::*};

  #[rxsignal_macro::test]
  fn emits_output_then_completes() {
    let mut pool = LocalPool::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    from_future::<_, SignalError, _>(future::ready(3), pool.spawner())
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));
    assert!(log.borrow().is_empty());
    pool.run();
    assert_eq!(*log.borrow(), vec![Notification::Next(3), Notification::Complete]);
  }

  #[rxsignal_macro::test]
  fn err_becomes_error() {
    let mut pool = LocalPool::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    from_future_result::<_, i32, _, _>(future::ready(Err(SignalError::custom("nope"))), pool.spawner())
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));
    pool.run();
    assert_eq!(*log.borrow(), vec![Notification::Error(SignalError::custom("nope"))]);
  }

  #[rxsignal_macro::test]
  fn future_runs_once_for_many_subscribers() {
    let mut pool = LocalPool::new();
    let polls = Rc::new(RefCell::new(0));
    let c_polls = polls.clone();
    let (tx, rx) = oneshot::channel::<i32>();
    let signal = from_future::<_, SignalError, _>(
      rx.map(move |v| {
        *c_polls.borrow_mut() += 1;
        v.unwrap_or_default()
      }),
      pool.spawner(),
    );
    let seen = Rc::new(RefCell::new(vec![]));
    for _ in 0..2 {
      let seen = seen.clone();
      signal.subscribe_next(move |v| seen.borrow_mut().push(v));
    }
    pool.run_until_stalled();
    let _ = tx.send(5);
    pool.run();
    assert_eq!(*polls.borrow(), 1);
    assert_eq!(*seen.borrow(), vec![5, 5]);
  }

  #[rxsignal_macro::test]
  fn dispose_before_resolution() {
    let mut pool = LocalPool::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let handle = from_future::<_, SignalError, _>(future::ready(1), pool.spawner())
      .subscribe_next(move |v| c_seen.borrow_mut().push(v));
    handle.dispose();
    pool.run();
    assert!(seen.borrow().is_empty());
  }
}
