use std::{cell::RefCell, collections::VecDeque, iter, rc::Rc};

use crate::{
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subscriber::ProxySubscriber,
};

struct ZipState<T> {
  queues: Vec<VecDeque<T>>,
  completed: Vec<bool>,
}

impl<T> ZipState<T> {
  fn pop_row(&mut self) -> Option<Vec<T>> {
    if self.queues.iter().any(VecDeque::is_empty) {
      return None;
    }
    self.queues.iter_mut().map(VecDeque::pop_front).collect()
  }

  /// A completed source with nothing buffered can never contribute again.
  fn exhausted(&self) -> bool {
    self
      .queues
      .iter()
      .zip(&self.completed)
      .any(|(queue, done)| *done && queue.is_empty())
  }
}

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Pairs the n-th value of this signal with the n-th value of each of
  /// `others`.
  ///
  /// Completes as soon as a completed source has no buffered value left.
  pub fn zip(&self, others: impl IntoIterator<Item = Signal<T, E>>) -> Signal<Vec<T>, E> {
    Signal::zip_all(iter::once(self.clone()).chain(others))
  }

  /// Static form of [`Signal::zip`]. An empty list completes at once.
  pub fn zip_all(signals: impl IntoIterator<Item = Signal<T, E>>) -> Signal<Vec<T>, E> {
    let signals: Rc<[Signal<T, E>]> = signals.into_iter().collect();
    if signals.is_empty() {
      return Signal::empty();
    }
    Signal::create(move |down: ProxySubscriber<Vec<T>, E>| {
      let state = Rc::new(RefCell::new(ZipState {
        queues: signals.iter().map(|_| VecDeque::new()).collect(),
        completed: vec![false; signals.len()],
      }));
      for (index, signal) in signals.iter().enumerate() {
        if down.is_disposed() {
          break;
        }
        let (c_down, state) = (down.clone(), state.clone());
        down.add_teardown(signal.subscribe_notification(move |n| match n {
          Notification::Next(v) => {
            let row = {
              let mut state = state.borrow_mut();
              state.queues[index].push_back(v);
              state.pop_row()
            };
            if let Some(row) = row {
              c_down.send_next(row);
              if state.borrow().exhausted() {
                c_down.send_complete();
              }
            }
          }
          Notification::Complete => {
            let exhausted = {
              let mut state = state.borrow_mut();
              state.completed[index] = true;
              state.exhausted()
            };
            if exhausted {
              c_down.send_complete();
            }
          }
          Notification::Error(e) => c_down.send_error(e),
        }));
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{notification::Notification, prelude::*};

  #[rxsignal_macro::test]
  fn pairs_by_position() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<i32>::from_iter([1, 2, 3])
      .zip([Signal::from_iter([10, 20])])
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));
    assert_eq!(
      *log.borrow(),
      vec![Notification::Next(vec![1, 10]), Notification::Next(vec![2, 20]), Notification::Complete]
    );
  }

  #[rxsignal_macro::test]
  fn zip_all_of_one_wraps_values() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::zip_all([Signal::<i32>::from_iter([1, 2])])
      .subscribe_next(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec![vec![1], vec![2]]);
  }
}
