//! Error type produced by the runtime itself.

use std::time::Duration;

/// Errors synthesised by the runtime rather than by user sources.
///
/// Operators that need to raise one of these require the stream error type to
/// implement `From<SignalError>`; `SignalError` is also the default error
/// parameter of [`Signal`](crate::signal::Signal).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
  /// No notification arrived before the deadline of a `timeout` operator.
  #[error("signal timed out after {0:?}")]
  Timeout(Duration),
  /// An exclusive command was executed while an invocation was in flight.
  #[error("command cannot be executed while another invocation is in flight")]
  CommandBusy,
  /// The source completed without emitting a value.
  #[error("signal completed without emitting a value")]
  Empty,
  /// A user supplied error.
  #[error("{0}")]
  Custom(String),
}

impl SignalError {
  pub fn custom(msg: impl Into<String>) -> Self { SignalError::Custom(msg.into()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxsignal_macro::test]
  fn display_messages() {
    assert_eq!(
      SignalError::Timeout(Duration::from_millis(5)).to_string(),
      "signal timed out after 5ms"
    );
    assert_eq!(SignalError::custom("boom").to_string(), "boom");
  }
}
