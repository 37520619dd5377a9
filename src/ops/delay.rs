use crate::{
  notification::Notification,
  scheduler::{Duration, Scheduler},
  signal::Signal,
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Shifts every event, terminal ones included, `delay` later.
  ///
  /// Events keep their relative order. Disposing the subscription cancels
  /// every event still in flight.
  pub fn delay<S: Scheduler>(&self, delay: Duration, scheduler: S) -> Signal<T, E> {
    self.lift(move || {
      let scheduler = scheduler.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| {
        let c_down = down.clone();
        down.add_teardown(scheduler.schedule_fn(move || n.deliver_to(&c_down), Some(delay)));
      }
    })
  }
}
