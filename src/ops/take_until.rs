use std::{cell::RefCell, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Mirrors this signal until `notifier` emits or completes, then
  /// completes.
  ///
  /// The notifier is subscribed first, so a notifier that fires at once
  /// prevents the source from ever being subscribed. Notifier errors are
  /// ignored.
  pub fn take_until<N: 'static>(&self, notifier: &Signal<N, E>) -> Signal<T, E> {
    let (source, notifier) = (self.clone(), notifier.clone());
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let c_down = down.clone();
      down.add_teardown(notifier.subscribe_notification(move |n| match n {
        Notification::Next(_) | Notification::Complete => c_down.send_complete(),
        Notification::Error(_) => {}
      }));
      if !down.is_disposed() {
        source.subscribe_observer(Rc::new(down));
      }
    })
  }

  /// Emits the latest value of this signal each time `notifier` emits,
  /// provided a new value arrived since the last emission.
  ///
  /// When the notifier completes the pending value, if any, is emitted and
  /// the result completes.
  pub fn sample<N: 'static>(&self, notifier: &Signal<N, E>) -> Signal<T, E> {
    let (source, notifier) = (self.clone(), notifier.clone());
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let latest: Rc<RefCell<Option<T>>> = Rc::default();
      let (c_down, c_latest) = (down.clone(), latest.clone());
      down.add_teardown(source.subscribe_notification(move |n| match n {
        Notification::Next(v) => *c_latest.borrow_mut() = Some(v),
        Notification::Complete => c_down.send_complete(),
        Notification::Error(e) => c_down.send_error(e),
      }));
      if down.is_disposed() {
        return;
      }
      let c_down = down.clone();
      down.add_teardown(notifier.subscribe_notification(move |n| {
        let pending = match n {
          Notification::Error(_) => None,
          _ => latest.borrow_mut().take(),
        };
        if let Some(v) = pending {
          c_down.send_next(v);
        }
        match n {
          Notification::Next(_) => {}
          Notification::Complete => c_down.send_complete(),
          Notification::Error(e) => c_down.send_error(e),
        }
      }));
    })
  }
}
