use std::{
  cell::{Cell, RefCell},
  mem,
  rc::Rc,
};

use crate::{
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

fn flush<T, E>(pending: &RefCell<Vec<T>>, down: &ProxySubscriber<Vec<T>, E>) {
  let batch = mem::take(&mut *pending.borrow_mut());
  if !batch.is_empty() {
    down.send_next(batch);
  }
}

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Collects values and emits them as a batch every time `notifier`
  /// emits. Empty batches are skipped.
  ///
  /// Completion of the source is held back until the next notifier value,
  /// which flushes the pending batch and then completes. Completion of the
  /// notifier flushes and completes at once.
  pub fn buffer<N: 'static>(&self, notifier: &Signal<N, E>) -> Signal<Vec<T>, E> {
    let source = self.clone();
    let notifier = notifier.clone();
    Signal::create(move |down: ProxySubscriber<Vec<T>, E>| {
      let pending: Rc<RefCell<Vec<T>>> = Rc::default();
      let source_done = Rc::new(Cell::new(false));

      let (c_pending, c_done, c_down) = (pending.clone(), source_done.clone(), down.clone());
      down.add_teardown(source.subscribe_notification(move |n| match n {
        Notification::Next(v) => c_pending.borrow_mut().push(v),
        Notification::Complete => c_done.set(true),
        Notification::Error(e) => c_down.send_error(e),
      }));

      if down.is_disposed() {
        return;
      }
      let c_down = down.clone();
      down.add_teardown(notifier.subscribe_notification(move |n| match n {
        Notification::Next(_) => {
          flush(&pending, &c_down);
          if source_done.get() {
            c_down.send_complete();
          }
        }
        Notification::Complete => {
          flush(&pending, &c_down);
          c_down.send_complete();
        }
        Notification::Error(e) => c_down.send_error(e),
      }));
    })
  }

  /// Emits batches of `count` values; a final partial batch is emitted on
  /// completion.
  ///
  /// # Panics
  ///
  /// Panics if `count` is zero.
  pub fn buffer_count(&self, count: usize) -> Signal<Vec<T>, E> {
    assert!(count > 0, "buffer_count requires a positive batch size");
    self.lift(move || {
      let mut batch = Vec::with_capacity(count);
      move |n: Notification<T, E>, down: &ProxySubscriber<Vec<T>, E>| match n {
        Notification::Next(v) => {
          batch.push(v);
          if batch.len() == count {
            down.send_next(mem::replace(&mut batch, Vec::with_capacity(count)));
          }
        }
        Notification::Complete => {
          if !batch.is_empty() {
            down.send_next(mem::take(&mut batch));
          }
          down.send_complete();
        }
        Notification::Error(e) => down.send_error(e),
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{notification::Notification, prelude::*, subject::Subject};

  #[rxsignal_macro::test]
  fn buffer_flushes_on_notifier() {
    let source = Subject::<i32>::new();
    let notifier = Subject::<()>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    source
      .to_signal()
      .buffer(&notifier.to_signal())
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));

    source.send_next(1);
    source.send_next(2);
    notifier.send_next(());
    notifier.send_next(());
    source.send_next(3);
    source.send_complete();
    assert_eq!(log.borrow().len(), 1);
    notifier.send_next(());
    assert_eq!(
      *log.borrow(),
      vec![
        Notification::Next(vec![1, 2]),
        Notification::Next(vec![3]),
        Notification::Complete
      ]
    );
    assert_eq!(notifier.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn buffer_completes_with_notifier() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<i32>::from_iter([1, 2])
      .merge([Signal::never()])
      .buffer(&Signal::<()>::empty())
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));
    assert_eq!(*log.borrow(), vec![Notification::Next(vec![1, 2]), Notification::Complete]);
  }

  #[rxsignal_macro::test]
  fn source_completion_waits_for_notifier() {
    let source = Subject::<i32>::new();
    let notifier = Subject::<()>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    source
      .to_signal()
      .buffer(&notifier.to_signal())
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));

    source.send_next(1);
    source.send_complete();
    assert!(log.borrow().is_empty());
    notifier.send_complete();
    assert_eq!(*log.borrow(), vec![Notification::Next(vec![1]), Notification::Complete]);
  }

  #[rxsignal_macro::test]
  fn buffer_count_batches() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<i32>::from_iter(1..=5)
      .buffer_count(2)
      .subscribe_next(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec![vec![1, 2], vec![3, 4], vec![5]]);
  }

  #[cfg(not(target_arch = "wasm32"))]
  #[rxsignal_macro::test]
  #[should_panic(expected = "positive batch size")]
  fn buffer_count_rejects_zero() { Signal::<i32>::empty().buffer_count(0); }
}
