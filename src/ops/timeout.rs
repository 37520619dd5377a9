use crate::{
  error::SignalError,
  notification::Notification,
  observer::Observer,
  scheduler::{Duration, Scheduler},
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: From<SignalError> + 'static> Signal<T, E> {
  /// Errors with [`SignalError::Timeout`] unless the source terminates
  /// within `limit` of subscribing.
  ///
  /// The deadline is fixed when the subscription starts: values do not push
  /// it back. It is disarmed when the source terminates or the subscription
  /// is disposed.
  pub fn timeout<S: Scheduler>(&self, limit: Duration, scheduler: S) -> Signal<T, E> {
    let source = self.clone();
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let c_down = down.clone();
      let deadline = scheduler.schedule_fn(
        move || {
          tracing::debug!(?limit, "signal timed out");
          c_down.send_error(SignalError::Timeout(limit).into());
        },
        Some(limit),
      );
      down.add_teardown(deadline.clone());

      let c_down = down.clone();
      let upstream = source.subscribe_notification(move |n: Notification<T, E>| {
        if n.is_terminal() {
          deadline.cancel();
        }
        n.deliver_to(&c_down);
      });
      down.add_teardown(upstream);
    })
  }
}
