use std::{cell::RefCell, iter, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

struct CombineState<T> {
  latest: Vec<Option<T>>,
  completed: usize,
}

impl<T: Clone> CombineState<T> {
  fn snapshot(&self) -> Option<Vec<T>> { self.latest.iter().cloned().collect() }
}

impl<T: Clone + 'static, E: 'static> Signal<T, E> {
  /// Emits the vector of the latest value of this signal and each of
  /// `others`, every time any of them emits, once all have emitted at least
  /// once.
  ///
  /// Completes once every source completed.
  pub fn combine(&self, others: impl IntoIterator<Item = Signal<T, E>>) -> Signal<Vec<T>, E> {
    Signal::combine_all(iter::once(self.clone()).chain(others))
  }

  /// Static form of [`Signal::combine`]. An empty list completes at once.
  pub fn combine_all(signals: impl IntoIterator<Item = Signal<T, E>>) -> Signal<Vec<T>, E> {
    let signals: Rc<[Signal<T, E>]> = signals.into_iter().collect();
    if signals.is_empty() {
      return Signal::empty();
    }
    Signal::create(move |down: ProxySubscriber<Vec<T>, E>| {
      let state = Rc::new(RefCell::new(CombineState {
        latest: signals.iter().map(|_| None).collect(),
        completed: 0,
      }));
      for (index, signal) in signals.iter().enumerate() {
        if down.is_disposed() {
          break;
        }
        let (c_down, state) = (down.clone(), state.clone());
        down.add_teardown(signal.subscribe_notification(move |n| match n {
          Notification::Next(v) => {
            let combined = {
              let mut state = state.borrow_mut();
              state.latest[index] = Some(v);
              state.snapshot()
            };
            if let Some(values) = combined {
              c_down.send_next(values);
            }
          }
          Notification::Complete => {
            let all_done = {
              let mut state = state.borrow_mut();
              state.completed += 1;
              state.completed == state.latest.len()
            };
            if all_done {
              c_down.send_complete();
            }
          }
          Notification::Error(e) => c_down.send_error(e),
        }));
      }
    })
  }
}
