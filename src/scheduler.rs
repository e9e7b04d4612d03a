use std::{
  future::Future,
  pin::Pin,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  task::{Context, Poll},
  thread,
};
pub use std::time::{Duration, Instant};

use futures::{
  executor::{LocalSpawner, ThreadPool},
  ready,
  task::LocalSpawnExt,
};
use once_cell::sync::Lazy;
use pin_project_lite::pin_project;

use crate::disposable::Disposable;

pub mod test_scheduler;

pub type TaskFn = Box<dyn FnOnce() + Send>;

/// Something that can run a one-shot task, optionally after a delay.
pub trait Scheduler {
  /// Hands `task` to the execution context. Disposing the returned handle
  /// before the task has started prevents it from running.
  fn schedule(&self, delay: Option<Duration>, task: TaskFn) -> TaskHandle;
}

/// Cancellation flag of a scheduled task. The flag also flips once the task
/// has run, so `is_disposed` doubles as "this task will never fire".
#[derive(Clone, Default)]
pub struct TaskHandle(Arc<AtomicBool>);

impl TaskHandle {
  #[inline]
  pub fn new() -> Self {
    Self::default()
  }

  /// A handle whose task already ran.
  #[inline]
  pub fn finished() -> Self {
    Self(Arc::new(AtomicBool::new(true)))
  }

  #[inline]
  pub(crate) fn mark_finished(&self) {
    self.0.store(true, Ordering::Release);
  }
}

impl Disposable for TaskHandle {
  #[inline]
  fn dispose(&mut self) {
    self.0.store(true, Ordering::Release);
  }

  #[inline]
  fn is_disposed(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

pin_project! {
  struct Delayed<S> {
    #[pin]
    sleep: S,
    handle: TaskHandle,
    task: Option<TaskFn>,
  }
}

impl<S: Future> Future for Delayed<S> {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    let this = self.project();
    let _ = ready!(this.sleep.poll(cx));
    if !this.handle.is_disposed() {
      if let Some(task) = this.task.take() {
        task();
      }
    }
    this.handle.mark_finished();
    Poll::Ready(())
  }
}

impl Scheduler for ThreadPool {
  fn schedule(&self, delay: Option<Duration>, task: TaskFn) -> TaskHandle {
    let handle = TaskHandle::new();
    let sleep = futures_time::task::sleep(delay.unwrap_or_default().into());
    self.spawn_ok(Delayed {
      sleep,
      handle: handle.clone(),
      task: Some(task),
    });
    handle
  }
}

impl Scheduler for LocalSpawner {
  fn schedule(&self, delay: Option<Duration>, task: TaskFn) -> TaskHandle {
    let handle = TaskHandle::new();
    let sleep = futures_time::task::sleep(delay.unwrap_or_default().into());
    let delayed = Delayed {
      sleep,
      handle: handle.clone(),
      task: Some(task),
    };
    if self.spawn_local(delayed).is_err() {
      // The pool is gone, the task can never run.
      handle.mark_finished();
    }
    handle
  }
}

/// Runs the task on the calling thread, blocking through the delay. The
/// returned handle is already finished; inline tasks cannot be cancelled.
#[derive(Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule(&self, delay: Option<Duration>, task: TaskFn) -> TaskHandle {
    if let Some(delay) = delay.filter(|d| !d.is_zero()) {
      thread::sleep(delay);
    }
    task();
    TaskHandle::finished()
  }
}

static SHARED_POOL: Lazy<ThreadPool> =
  Lazy::new(|| ThreadPool::new().expect("spawn the shared scheduler pool"));

/// Process-wide thread pool, built lazily on first use.
pub fn shared_pool() -> ThreadPool {
  SHARED_POOL.clone()
}

#[cfg(test)]
mod tests {
  use super::*;
  use futures::executor::LocalPool;
  use std::sync::mpsc;

  #[test]
  fn immediate_runs_inline() {
    let (tx, rx) = mpsc::channel();
    let handle =
      ImmediateScheduler.schedule(None, Box::new(move || tx.send(1).unwrap()));
    assert_eq!(rx.try_recv().unwrap(), 1);
    assert!(handle.is_disposed());
  }

  #[test]
  fn local_spawner_respects_cancellation() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let (tx, rx) = mpsc::channel();

    let tx2 = tx.clone();
    let mut cancelled =
      spawner.schedule(None, Box::new(move || tx2.send("cancelled").unwrap()));
    spawner.schedule(None, Box::new(move || tx.send("kept").unwrap()));
    cancelled.dispose();

    pool.run();
    assert_eq!(rx.try_recv().unwrap(), "kept");
    assert!(rx.try_recv().is_err());
    assert!(cancelled.is_disposed());
  }

  #[test]
  fn thread_pool_runs_delayed_task() {
    let pool = shared_pool();
    let (tx, rx) = mpsc::channel();
    let handle = pool.schedule(
      Some(Duration::from_millis(10)),
      Box::new(move || tx.send(7).unwrap()),
    );
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);

    // The handle flips to finished right after the task body returns.
    let deadline = Instant::now() + Duration::from_secs(5);
    while !handle.is_disposed() {
      assert!(Instant::now() < deadline);
      thread::yield_now();
    }
  }
}
