//! Resubscription on error (`retry`, `retry_with`) and on completion
//! (`repeat`).
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let attempts = Rc::new(Cell::new(0));
//! let c_attempts = attempts.clone();
//! let flaky = Signal::<i32>::create(move |s| {
//!   c_attempts.set(c_attempts.get() + 1);
//!   if c_attempts.get() < 3 {
//!     s.send_error(SignalError::custom("flaky"));
//!   } else {
//!     s.send_next(1);
//!     s.send_complete();
//!   }
//! });
//!
//! flaky.retry(5).subscribe_next(|v| assert_eq!(v, 1));
//! assert_eq!(attempts.get(), 3);
//! ```

use std::{cell::Cell, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  scheduler::{Duration, Scheduler, Task, TaskHandle},
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

/// Retry policy for [`Signal::retry_with`].
///
/// ```rust
/// use rxsignal::{ops::RetryConfig, scheduler::Duration};
///
/// let config = RetryConfig::new()
///   .count(3)
///   .delay(Duration::from_millis(100))
///   .reset_on_success();
/// assert_eq!(config.max_retries(), 3);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryConfig {
  count: usize,
  delay: Option<Duration>,
  reset_on_success: bool,
}

impl RetryConfig {
  /// No retries, no delay.
  pub fn new() -> Self { Self::default() }

  /// Maximum number of resubscriptions after an error.
  pub fn count(mut self, count: usize) -> Self {
    self.count = count;
    self
  }

  /// Wait `delay` before each resubscription.
  pub fn delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  /// Forget earlier failures once a value gets through.
  pub fn reset_on_success(mut self) -> Self {
    self.reset_on_success = true;
    self
  }

  pub fn max_retries(&self) -> usize { self.count }
}

type Delayer = Rc<dyn Fn(Task, Duration) -> TaskHandle>;

struct Retrying<T, E> {
  source: Signal<T, E>,
  config: RetryConfig,
  delayer: Option<Delayer>,
  failures: Cell<usize>,
}

fn attempt<T: 'static, E: 'static>(retrying: Rc<Retrying<T, E>>, down: ProxySubscriber<T, E>) {
  if down.is_disposed() {
    return;
  }
  let (c_down, c_retrying) = (down.clone(), retrying.clone());
  let handle = retrying.source.subscribe_notification(move |n| match n {
    Notification::Next(v) => {
      if c_retrying.config.reset_on_success {
        c_retrying.failures.set(0);
      }
      c_down.send_next(v);
    }
    Notification::Complete => c_down.send_complete(),
    Notification::Error(e) => {
      let failures = c_retrying.failures.get();
      if failures >= c_retrying.config.count {
        c_down.send_error(e);
        return;
      }
      c_retrying.failures.set(failures + 1);
      let (retrying, down) = (c_retrying.clone(), c_down.clone());
      match (c_retrying.config.delay, &c_retrying.delayer) {
        (Some(delay), Some(delayer)) => {
          c_down.add_teardown(delayer(Box::new(move || attempt(retrying, down)), delay));
        }
        _ => attempt(retrying, down),
      }
    }
  });
  down.add_teardown(handle);
}

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Resubscribes after an error, at most `count` times; the error after
  /// that passes through.
  ///
  /// `retry(2)` on a signal that always fails subscribes three times.
  pub fn retry(&self, count: usize) -> Signal<T, E> {
    self.resubscribing(RetryConfig::new().count(count), None)
  }

  /// Like [`Signal::retry`] with a [`RetryConfig`] policy. A configured delay
  /// is waited on `scheduler`.
  pub fn retry_with<S: Scheduler>(&self, config: RetryConfig, scheduler: S) -> Signal<T, E> {
    let delayer: Delayer = Rc::new(move |task, delay| scheduler.schedule(task, Some(delay)));
    self.resubscribing(config, Some(delayer))
  }

  fn resubscribing(&self, config: RetryConfig, delayer: Option<Delayer>) -> Signal<T, E> {
    if config.count == 0 {
      return self.clone();
    }
    let source = self.clone();
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let retrying = Rc::new(Retrying {
        source: source.clone(),
        config,
        delayer: delayer.clone(),
        failures: Cell::new(0),
      });
      attempt(retrying, down);
    })
  }

  /// Resubscribes after completion, `count` more times; the completion after
  /// that passes through.
  pub fn repeat(&self, count: usize) -> Signal<T, E> {
    if count == 0 {
      return self.clone();
    }
    let source = self.clone();
    Signal::create(move |down: ProxySubscriber<T, E>| {
      repeat_attempt(source.clone(), down, Rc::new(Cell::new(count)));
    })
  }
}

fn repeat_attempt<T: 'static, E: 'static>(
  source: Signal<T, E>, down: ProxySubscriber<T, E>, remaining: Rc<Cell<usize>>,
) {
  if down.is_disposed() {
    return;
  }
  let (c_source, c_down) = (source.clone(), down.clone());
  let handle = source.subscribe_notification(move |n| match n {
    Notification::Next(v) => c_down.send_next(v),
    Notification::Error(e) => c_down.send_error(e),
    Notification::Complete => {
      if remaining.get() == 0 {
        c_down.send_complete();
      } else {
        remaining.set(remaining.get() - 1);
        repeat_attempt(c_source.clone(), c_down.clone(), remaining.clone());
      }
    }
  });
  down.add_teardown(handle);
}
