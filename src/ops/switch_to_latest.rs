use std::{cell::RefCell, collections::HashMap, hash::Hash, rc::Rc};

use crate::{
  connection::Connection,
  disposable::CompoundDisposable,
  notification::Notification,
  observer::Observer,
  signal::{Observable, Signal},
  subject::Subject,
  subscriber::ProxySubscriber,
};

#[derive(Default)]
struct SwitchState {
  generation: usize,
  active: Option<CompoundDisposable>,
  outer_done: bool,
}

impl<T: 'static, E: Clone + 'static> Signal<Signal<T, E>, E> {
  /// Mirrors the most recent inner signal, releasing the previous one each
  /// time the outer signal emits.
  ///
  /// The outer signal is subscribed once per downstream subscription, through
  /// an internal [`Connection`]. Completes once the outer signal and the
  /// active inner signal have both completed.
  pub fn switch_to_latest(&self) -> Signal<T, E> {
    let outer = self.clone();
    Signal::create(move |down: ProxySubscriber<T, E>| {
      let relay = Subject::<Signal<T, E>, E>::new();
      let connection = Connection::new(outer.clone(), relay.clone());
      let state = Rc::new(RefCell::new(SwitchState::default()));
      let c_down = down.clone();
      down.add_teardown(relay.subscribe_notification(move |n| match n {
        Notification::Next(inner) => switch_to(&inner, &state, &c_down),
        Notification::Complete => {
          let done = {
            let mut state = state.borrow_mut();
            state.outer_done = true;
            state.active.is_none()
          };
          if done {
            c_down.send_complete();
          }
        }
        Notification::Error(e) => c_down.send_error(e),
      }));
      if !down.is_disposed() {
        down.add_teardown(connection.connect());
      }
    })
  }
}

fn switch_to<T: 'static, E: 'static>(
  inner: &Signal<T, E>, state: &Rc<RefCell<SwitchState>>, down: &ProxySubscriber<T, E>,
) {
  let (generation, previous) = {
    let mut state = state.borrow_mut();
    state.generation += 1;
    (state.generation, state.active.take())
  };
  if let Some(previous) = previous {
    previous.dispose();
  }
  let (c_down, c_state) = (down.clone(), state.clone());
  let handle = inner.subscribe_notification(move |n| match n {
    Notification::Next(v) => c_down.send_next(v),
    Notification::Error(e) => c_down.send_error(e),
    Notification::Complete => {
      let done = {
        let mut state = c_state.borrow_mut();
        if state.generation != generation {
          return;
        }
        state.active = None;
        state.outer_done
      };
      if done {
        c_down.send_complete();
      }
    }
  });
  if handle.is_disposed() {
    return;
  }
  let mut state = state.borrow_mut();
  if state.generation == generation {
    state.active = Some(handle.clone());
  }
  drop(state);
  down.add_teardown(handle);
}

impl<E: Clone + 'static> Signal<bool, E> {
  /// Follows `when_true` or `when_false` depending on the first value.
  pub fn if_else<T: 'static>(
    &self, when_true: Signal<T, E>, when_false: Signal<T, E>,
  ) -> Signal<T, E> {
    self
      .take(1)
      .map(move |v| if v { when_true.clone() } else { when_false.clone() })
      .switch_to_latest()
  }
}

impl<K: Eq + Hash + 'static, E: Clone + 'static> Signal<K, E> {
  /// Switches to the signal registered for each key, or to `default` for
  /// unknown keys.
  pub fn switch_case<T: 'static>(
    &self, cases: HashMap<K, Signal<T, E>>, default: Signal<T, E>,
  ) -> Signal<T, E> {
    self
      .map(move |key| cases.get(&key).cloned().unwrap_or_else(|| default.clone()))
      .switch_to_latest()
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, collections::HashMap, rc::Rc};

  use crate::{notification::Notification, prelude::*, subject::Subject};

  #[rxsignal_macro::test]
  fn releases_the_previous_inner() {
    let outer = Subject::<Signal<i32>>::new();
    let first = Subject::<i32>::new();
    let second = Subject::<i32>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    outer
      .to_signal()
      .switch_to_latest()
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));

    outer.send_next(first.to_signal());
    first.send_next(1);
    outer.send_next(second.to_signal());
    assert_eq!(first.subscriber_count(), 0);
    first.send_next(2);
    second.send_next(3);
    outer.send_complete();
    assert!(!log.borrow().contains(&Notification::Complete));
    second.send_complete();
    assert_eq!(
      *log.borrow(),
      vec![Notification::Next(1), Notification::Next(3), Notification::Complete]
    );
  }

  #[rxsignal_macro::test]
  fn outer_is_subscribed_once() {
    let outer = Subject::<Signal<i32>>::new();
    let handle = outer.to_signal().switch_to_latest().subscribe_next(|_| {});
    assert_eq!(outer.subscriber_count(), 1);
    handle.dispose();
    assert_eq!(outer.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn synchronous_inners_complete_with_outer() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<Signal<i32>>::from_iter([Signal::of(1), Signal::from_iter([2, 3])])
      .switch_to_latest()
      .subscribe_notification(move |n| c_log.borrow_mut().push(n));
    assert_eq!(
      *log.borrow(),
      vec![
        Notification::Next(1),
        Notification::Next(2),
        Notification::Next(3),
        Notification::Complete
      ]
    );
  }

  #[rxsignal_macro::test]
  fn if_else_picks_branch() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    Signal::<bool>::from_iter([false, true])
      .if_else(Signal::of("yes"), Signal::of("no"))
      .subscribe_next(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec!["no"]);
  }

  #[rxsignal_macro::test]
  fn switch_case_falls_back_to_default() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let cases = HashMap::from([("a", Signal::of(1)), ("b", Signal::of(2))]);
    Signal::<&str>::from_iter(["b", "z", "a"])
      .switch_case(cases, Signal::of(0))
      .subscribe_next(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec![2, 0, 1]);
  }
}
