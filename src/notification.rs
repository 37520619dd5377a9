//! Reified stream events.

use crate::observer::Observer;

/// A single `next`, `complete` or `error` event.
///
/// Used by replaying subjects, `materialize`/`dematerialize`, deferred
/// delivery and internally by every operator that routes events through one
/// handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T, E> {
  Next(T),
  Complete,
  Error(E),
}

impl<T, E> Notification<T, E> {
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }

  /// Dispatches this event to `observer`.
  pub fn deliver_to<O>(self, observer: &O)
  where
    O: Observer<T, E> + ?Sized,
  {
    match self {
      Notification::Next(v) => observer.send_next(v),
      Notification::Complete => observer.send_complete(),
      Notification::Error(e) => observer.send_error(e),
    }
  }

  /// Maps the value of a `Next` event, leaving terminal events untouched.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Notification<U, E> {
    match self {
      Notification::Next(v) => Notification::Next(f(v)),
      Notification::Complete => Notification::Complete,
      Notification::Error(e) => Notification::Error(e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxsignal_macro::test]
  fn terminal_kinds() {
    assert!(!Notification::<i32, ()>::Next(1).is_terminal());
    assert!(Notification::<i32, ()>::Complete.is_terminal());
    assert!(Notification::<i32, ()>::Error(()).is_terminal());
  }

  #[rxsignal_macro::test]
  fn map_keeps_terminals() {
    assert_eq!(Notification::<i32, ()>::Next(2).map(|v| v * 3), Notification::Next(6));
    assert_eq!(Notification::<i32, ()>::Complete.map(|v| v * 3), Notification::Complete);
  }
}
