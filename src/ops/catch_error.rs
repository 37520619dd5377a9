use std::rc::Rc;

use crate::{
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// On error, continues with the signal `recover` builds from it.
  pub fn catch_error(&self, recover: impl Fn(E) -> Signal<T, E> + 'static) -> Signal<T, E> {
    let source = self.clone();
    let recover = Rc::new(recover);
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let (c_down, recover) = (down.clone(), recover.clone());
      source.subscribe_notification(move |n| match n {
        Notification::Next(v) => c_down.send_next(v),
        Notification::Complete => c_down.send_complete(),
        Notification::Error(e) => {
          recover(e).subscribe_observer(Rc::new(c_down.clone()));
        }
      })
    })
  }

  /// On error, continues with `fallback`.
  pub fn catch_to(&self, fallback: Signal<T, E>) -> Signal<T, E> {
    self.catch_error(move |_| fallback.clone())
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{notification::Notification, prelude::*};

  #[rxsignal_macro::test]
  fn recovers_with_error_value() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<String>::of("a".to_owned())
      .concat(Signal::throw_err(SignalError::custom("b")))
      .catch_error(|e| Signal::of(e.to_string()))
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));
    assert_eq!(
      *log.borrow(),
      vec![
        Notification::Next("a".to_owned()),
        Notification::Next(SignalError::custom("b").to_string()),
        Notification::Complete
      ]
    );
  }

  #[rxsignal_macro::test]
  fn catch_to_can_fail_again() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<i32>::throw_err(SignalError::Empty)
      .catch_to(Signal::throw_err(SignalError::CommandBusy))
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));
    assert_eq!(*log.borrow(), vec![Notification::Error(SignalError::CommandBusy)]);
  }
}
