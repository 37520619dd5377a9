use crate::{notification::Notification, observer::Observer, signal::Signal, subscriber::ProxySubscriber};

impl<T: 'static, E: Clone + 'static> Signal<T, E> {
  /// Emits every event, terminal ones included, as a [`Notification`] value,
  /// then passes the terminal event on.
  pub fn materialize(&self) -> Signal<Notification<T, E>, E> {
    self.lift(|| {
      |n: Notification<T, E>, down: &ProxySubscriber<Notification<T, E>, E>| match n {
        Notification::Next(v) => down.send_next(Notification::Next(v)),
        Notification::Complete => {
          down.send_next(Notification::Complete);
          down.send_complete();
        }
        Notification::Error(e) => {
          down.send_next(Notification::Error(e.clone()));
          down.send_error(e);
        }
      }
    })
  }
}

impl<T: 'static, E: 'static> Signal<Notification<T, E>, E> {
  /// Replays [`Notification`] values as real events.
  pub fn dematerialize(&self) -> Signal<T, E> {
    self.lift(|| {
      |n: Notification<Notification<T, E>, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(inner) => inner.deliver_to(down),
        Notification::Complete => down.send_complete(),
        Notification::Error(e) => down.send_error(e),
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{notification::Notification, prelude::*};

  #[rxsignal_macro::test]
  fn reifies_terminal_events() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<i32>::of(1)
      .concat(Signal::throw_err(SignalError::Empty))
      .materialize()
      .subscribe(move |n| c_log.borrow_mut().push(n), || {}, |_| {});
    assert_eq!(
      *log.borrow(),
      vec![Notification::Next(1), Notification::Error(SignalError::Empty)]
    );
  }

  #[rxsignal_macro::test]
  fn dematerialize_stops_at_reified_terminal() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<Notification<i32, SignalError>>::from_iter([
      Notification::Next(1),
      Notification::Complete,
      Notification::Next(2),
    ])
    .dematerialize()
    .subscribe_notification(move |n| c_log.borrow_mut().push(n));
    assert_eq!(*log.borrow(), vec![Notification::Next(1), Notification::Complete]);
  }
}
