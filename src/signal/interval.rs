use super::Signal;
use crate::{
  observer::Observer,
  scheduler::{Duration, Scheduler},
  subscriber::ProxySubscriber,
};

/// Emits `start`, `start + 1`, ... every `period`, forever.
///
/// Each tick schedules the next one; disposing the subscription cancels the
/// pending tick.
pub fn interval<E, S>(period: Duration, start: usize, scheduler: S) -> Signal<usize, E>
where
  E: 'static,
  S: Scheduler,
{
  Signal::create(move |s: ProxySubscriber<usize, E>| {
    schedule_tick(s, scheduler.clone(), period, start);
  })
}

fn schedule_tick<E: 'static, S: Scheduler>(
  subscriber: ProxySubscriber<usize, E>, scheduler: S, period: Duration, index: usize,
) {
  if subscriber.is_disposed() {
    return;
  }
  let c_subscriber = subscriber.clone();
  let c_scheduler = scheduler.clone();
  let handle = scheduler.schedule_fn(
    move || {
      c_subscriber.send_next(index);
      schedule_tick(c_subscriber, c_scheduler, period, index + 1);
    },
    Some(period),
  );
  subscriber.add_teardown(handle);
}
