//! # rxsignal: a single-threaded reactive-stream runtime
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//! Signal::<i32>::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe_next(move |v| c_seen.borrow_mut().push(v));
//! assert_eq!(*seen.borrow(), vec![0, 4, 8, 12, 16]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Signal`] | Cold, lazily-started value sequence; the combinator algebra lives on it |
//! | [`Subject`] / [`ReplaySubject`] / [`CurrentSubject`] | Hot multicast sources |
//! | [`Connection`] | Binds a signal to a subject, manually or refcounted |
//! | [`Channel`] | Two cross-wired terminals |
//! | [`Command`] | Bounded-concurrency executor with a FIFO backlog |
//! | [`CompoundDisposable`] | Handle returned by every subscription |
//!
//! Everything is `Rc`/`RefCell` based and meant for one thread. Time-based
//! operators take a [`Scheduler`](scheduler::Scheduler) argument; tests use
//! the virtual-clock [`TestScheduler`](scheduler::TestScheduler).
//!
//! ## Errors
//!
//! Sources are generic over their error type, defaulting to
//! [`SignalError`]. An error that reaches a subscriber without an error
//! callback is dropped, with a `debug` event on the `tracing` facade.
//!
//! ## Feature Flags
//!
//! - **`local-scheduler`** (default): `LocalScheduler` on a `futures`
//!   `LocalPool` spawner.
//! - **`tokio-scheduler`**: `TokioScheduler` on `tokio::task::spawn_local`.
//!
//! [`Signal`]: signal::Signal
//! [`Subject`]: subject::Subject
//! [`ReplaySubject`]: subject::ReplaySubject
//! [`CurrentSubject`]: subject::CurrentSubject
//! [`Connection`]: connection::Connection
//! [`Channel`]: channel::Channel
//! [`Command`]: command::Command
//! [`CompoundDisposable`]: disposable::CompoundDisposable
//! [`SignalError`]: error::SignalError

extern crate self as rxsignal;

pub mod channel;
pub mod command;
pub mod connection;
pub mod disposable;
pub mod error;
pub mod notification;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod signal;
pub mod subject;
pub mod subscriber;
