use std::{collections::HashSet, hash::Hash, rc::Rc};

use crate::{notification::Notification, observer::Observer, signal::Signal, subscriber::ProxySubscriber};

impl<T: 'static, E: 'static> Signal<T, E> {
  /// Emits a value only if its key has not been seen before in this
  /// subscription.
  pub fn distinct<K>(&self, key: impl Fn(&T) -> K + 'static) -> Signal<T, E>
  where
    K: Eq + Hash + 'static,
  {
    let key = Rc::new(key);
    self.lift(move || {
      let key = key.clone();
      let mut seen = HashSet::new();
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          if seen.insert(key(&v)) {
            down.send_next(v);
          }
        }
        other => other.deliver_to(down),
      }
    })
  }

  /// Emits a value only if its key differs from the key of the previous
  /// value.
  pub fn distinct_until_key_changed<K>(&self, key: impl Fn(&T) -> K + 'static) -> Signal<T, E>
  where
    K: PartialEq + 'static,
  {
    let key = Rc::new(key);
    self.lift(move || {
      let key = key.clone();
      let mut last: Option<K> = None;
      move |n: Notification<T, E>, down: &ProxySubscriber<T, E>| match n {
        Notification::Next(v) => {
          let k = key(&v);
          if last.as_ref() != Some(&k) {
            last = Some(k);
            down.send_next(v);
          }
        }
        other => other.deliver_to(down),
      }
    })
  }

  /// Drops consecutive duplicates.
  pub fn distinct_until_value_changed(&self) -> Signal<T, E>
  where
    T: PartialEq + Clone,
  {
    self.distinct_until_key_changed(T::clone)
  }
}
