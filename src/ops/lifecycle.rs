use std::rc::Rc;

use crate::{
  disposable::Disposable,
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Runs `f` on every subscription, before subscribing upstream.
  pub fn initially(&self, f: impl Fn() + 'static) -> Signal<T, E> {
    let source = self.clone();
    Signal::defer(move || {
      f();
      source.clone()
    })
  }

  /// Peeks at every value.
  pub fn tap(&self, f: impl Fn(&T) + 'static) -> Signal<T, E> {
    let f = Rc::new(f);
    self.lift(move || {
      let f = f.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| {
        if let Notification::Next(v) = &n {
          f(v);
        }
        n.deliver_to(down);
      }
    })
  }

  /// Runs `f` when the source completes, before the completion is passed on.
  pub fn on_complete(&self, f: impl Fn() + 'static) -> Signal<T, E> {
    let f = Rc::new(f);
    self.lift(move || {
      let f = f.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| {
        if matches!(n, Notification::Complete) {
          f();
        }
        n.deliver_to(down);
      }
    })
  }

  /// Runs `f` with the error before it is passed on.
  pub fn on_error(&self, f: impl Fn(&E) + 'static) -> Signal<T, E> {
    let f = Rc::new(f);
    self.lift(move || {
      let f = f.clone();
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| {
        if let Notification::Error(e) = &n {
          f(e);
        }
        n.deliver_to(down);
      }
    })
  }

  /// Runs `f` exactly once per subscription, when it completes, errors or is
  /// disposed, whichever happens first.
  pub fn finalize(&self, f: impl Fn() + 'static) -> Signal<T, E> {
    let source = self.clone();
    let f = Rc::new(f);
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let f = f.clone();
      down.add_teardown(Disposable::new(move || f()));
      source.subscribe_observer(Rc::new(down))
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{prelude::*, subject::Subject};

  fn journal() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) + Clone) {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    (log, move |entry: &str| c_log.borrow_mut().push(entry.to_owned()))
  }

  #[rxsignal_macro::test]
  fn hooks_run_in_order() {
    let (log, write) = journal();
    let (w1, w2, w3, w4) = (write.clone(), write.clone(), write.clone(), write.clone());
    Signal::<i32>::of(1)
      .initially(move || w1("initially"))
      .tap(move |v| w2(&format!("tap {v}")))
      .on_complete(move || w3("complete"))
      .finalize(move || w4("finalize"))
      .subscribe_next(move |v| write(&format!("next {v}")));
    assert_eq!(
      *log.borrow(),
      vec!["initially", "tap 1", "next 1", "complete", "finalize"]
    );
  }

  #[rxsignal_macro::test]
  fn on_error_sees_the_error() {
    let (log, write) = journal();
    Signal::<i32>::throw_err(SignalError::Empty)
      .on_error(move |e| write(&e.to_string()))
      .subscribe_error(|_| {});
    assert_eq!(*log.borrow(), vec![SignalError::Empty.to_string()]);
  }

  #[rxsignal_macro::test]
  fn finalize_runs_once_on_dispose() {
    let (log, write) = journal();
    let subject = Subject::<i32>::new();
    let handle = subject
      .to_signal()
      .finalize(move || write("finalize"))
      .subscribe_next(|_| {});
    handle.dispose();
    handle.dispose();
    subject.send_complete();
    assert_eq!(*log.borrow(), vec!["finalize"]);
  }
}
