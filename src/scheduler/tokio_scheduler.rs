use futures::future::abortable;

use super::{Duration, Scheduler, Task, TaskHandle};

/// Runs tasks with `tokio::task::spawn_local`.
///
/// Must be used from inside a [`tokio::task::LocalSet`]; tokio panics
/// otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
  fn spawn(task: Task, delay: Option<Duration>) -> TaskHandle {
    let (timer, abort) = abortable(async move {
      match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => tokio::task::yield_now().await,
      }
    });
    let handle = TaskHandle::with_abort(move || abort.abort());
    let finished = handle.clone();
    tokio::task::spawn_local(async move {
      if timer.await.is_ok() && !finished.is_closed() {
        finished.finish();
        task();
      }
    });
    handle
  }
}

impl Scheduler for TokioScheduler {
  fn schedule(&self, task: Task, delay: Option<Duration>) -> TaskHandle { Self::spawn(task, delay) }

  fn schedule_micro(&self, task: Task) -> TaskHandle { Self::spawn(task, None) }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use tokio::{runtime::Builder, task::LocalSet};

  use super::*;

  #[rxsignal_macro::test]
  fn runs_inside_local_set() {
    let rt = Builder::new_current_thread()
      .enable_time()
      .build()
      .unwrap();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    LocalSet::new().block_on(&rt, async move {
      let cancelled = {
        let log = c_log.clone();
        TokioScheduler.schedule(Box::new(move || log.borrow_mut().push(0)), Some(Duration::from_millis(1)))
      };
      cancelled.cancel();
      let log = c_log.clone();
      TokioScheduler.schedule(Box::new(move || log.borrow_mut().push(1)), Some(Duration::from_millis(1)));
      tokio::time::sleep(Duration::from_millis(20)).await;
    });
    assert_eq!(*log.borrow(), vec![1]);
  }
}
