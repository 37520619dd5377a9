use futures::{executor::LocalSpawner, future::abortable, task::LocalSpawnExt};

use super::{Duration, Scheduler, Task, TaskHandle};

/// Runs tasks on a `futures` [`LocalPool`](futures::executor::LocalPool).
///
/// Timers are driven by `futures-time` natively and `gloo-timers` on wasm.
/// Microtasks are spawned without delay and run on the next poll of the
/// pool.
#[derive(Clone)]
pub struct LocalScheduler {
  spawner: LocalSpawner,
}

impl LocalScheduler {
  pub fn new(spawner: LocalSpawner) -> Self { Self { spawner } }

  fn spawn(&self, task: Task, delay: Option<Duration>) -> TaskHandle {
    let (timer, abort) = abortable(async move {
      if let Some(delay) = delay {
        sleep(delay).await;
      }
    });
    let handle = TaskHandle::with_abort(move || abort.abort());
    let finished = handle.clone();
    let run = async move {
      if timer.await.is_ok() && !finished.is_closed() {
        finished.finish();
        task();
      }
    };
    if let Err(err) = self.spawner.spawn_local(run) {
      tracing::error!(%err, "local scheduler failed to spawn a task; task dropped");
      handle.finish();
    }
    handle
  }
}

impl Scheduler for LocalScheduler {
  fn schedule(&self, task: Task, delay: Option<Duration>) -> TaskHandle { self.spawn(task, delay) }

  fn schedule_micro(&self, task: Task) -> TaskHandle { self.spawn(task, None) }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(duration: Duration) { futures_time::task::sleep(duration.into()).await; }

#[cfg(target_arch = "wasm32")]
async fn sleep(duration: Duration) { gloo_timers::future::sleep(duration).await; }
