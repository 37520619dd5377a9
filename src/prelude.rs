//! Commonly used types and traits, for a single glob import.

pub use crate::{
  channel::{Channel, ChannelKind, ChannelTerminal},
  command::Command,
  connection::Connection,
  disposable::{CompoundDisposable, Disposable, Teardown},
  error::SignalError,
  notification::Notification,
  observer::{Observer, ObserverRef},
  ops::{RetryConfig, ScheduleMode},
  scheduler::{Duration, Scheduler, TaskHandle},
  signal::{Observable, Signal},
  subject::{CurrentSubject, ReplaySubject, Subject, SubjectLike},
  subscriber::{ProxySubscriber, Subscriber},
};
