//! Virtual-time scheduler for deterministic tests.
//!
//! Time only moves when the test calls [`TestScheduler::advance_by`] or
//! [`TestScheduler::flush`]. Tasks scheduled for the same instant run in
//! the order they were scheduled.

use std::{cell::RefCell, cmp::Ordering, collections::BinaryHeap};

use super::{Duration, Scheduler, TaskFn, TaskHandle};
use crate::disposable::Disposable;

struct ScheduledTask {
  at: Duration,
  id: usize,
  task: TaskFn,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.at == other.at && self.id == other.id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for ScheduledTask {
  // BinaryHeap is a max-heap; reverse so the earliest deadline wins and
  // equal deadlines run FIFO.
  fn cmp(&self, other: &Self) -> Ordering {
    other
      .at
      .cmp(&self.at)
      .then_with(|| other.id.cmp(&self.id))
  }
}

#[derive(Default)]
struct State {
  now: Duration,
  queue: BinaryHeap<ScheduledTask>,
  next_id: usize,
}

thread_local! {
  static STATE: RefCell<State> = RefCell::new(State::default());
}

/// Thread-local virtual clock. Cheap to copy around; all copies on one
/// thread share the same queue.
#[derive(Clone, Copy, Default)]
pub struct TestScheduler;

impl TestScheduler {
  /// Resets the clock and drops any queued task.
  pub fn init() {
    STATE.with(|state| *state.borrow_mut() = State::default());
  }

  pub fn now() -> Duration {
    STATE.with(|state| state.borrow().now)
  }

  pub fn pending_count() -> usize {
    STATE.with(|state| state.borrow().queue.len())
  }

  pub fn is_empty() -> bool {
    Self::pending_count() == 0
  }

  /// Moves the clock forward, running every task due on the way.
  pub fn advance_by(duration: Duration) {
    let target = Self::now() + duration;
    Self::run_due(Some(target));
    STATE.with(|state| state.borrow_mut().now = target);
  }

  /// Runs every queued task regardless of deadline.
  pub fn flush() {
    Self::run_due(None);
  }

  fn run_due(limit: Option<Duration>) {
    loop {
      let due = STATE.with(|state| {
        let mut state = state.borrow_mut();
        let is_due = state
          .queue
          .peek()
          .map_or(false, |t| limit.map_or(true, |l| t.at <= l));
        if !is_due {
          return None;
        }
        let task = state.queue.pop();
        if let Some(task) = &task {
          state.now = task.at;
        }
        task
      });
      let Some(due) = due else { break };
      // Run outside the borrow; the task may schedule more work.
      if !due.handle.is_disposed() {
        (due.task)();
      }
      due.handle.mark_finished();
    }
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, delay: Option<Duration>, task: TaskFn) -> TaskHandle {
    STATE.with(|state| {
      let mut state = state.borrow_mut();
      let handle = TaskHandle::new();
      let id = state.next_id;
      state.next_id += 1;
      let at = state.now + delay.unwrap_or_default();
      state.queue.push(ScheduledTask {
        at,
        id,
        task,
        handle: handle.clone(),
      });
      handle
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{
    atomic::{AtomicUsize, Ordering as AtomicOrdering},
    Arc,
  };

  fn counter_task(counter: &Arc<AtomicUsize>, add: usize) -> TaskFn {
    let counter = counter.clone();
    Box::new(move || {
      counter.fetch_add(add, AtomicOrdering::SeqCst);
    })
  }

  #[test]
  fn runs_in_deadline_order() {
    TestScheduler::init();
    let counter = Arc::new(AtomicUsize::new(0));

    TestScheduler
      .schedule(Some(Duration::from_millis(20)), counter_task(&counter, 10));
    TestScheduler
      .schedule(Some(Duration::from_millis(5)), counter_task(&counter, 1));

    TestScheduler::advance_by(Duration::from_millis(5));
    assert_eq!(counter.load(AtomicOrdering::SeqCst), 1);
    assert_eq!(TestScheduler::pending_count(), 1);

    TestScheduler::advance_by(Duration::from_millis(15));
    assert_eq!(counter.load(AtomicOrdering::SeqCst), 11);
    assert!(TestScheduler::is_empty());
    assert_eq!(TestScheduler::now(), Duration::from_millis(20));
  }

  #[test]
  fn equal_deadlines_run_fifo() {
    TestScheduler::init();
    let order = crate::rc::MutArc::own(Vec::new());

    for tag in 0..3 {
      let order = order.clone();
      TestScheduler.schedule(
        Some(Duration::from_millis(1)),
        Box::new(move || order.rc_deref_mut().push(tag)),
      );
    }
    TestScheduler::flush();
    assert_eq!(*order.rc_deref(), vec![0, 1, 2]);
  }

  #[test]
  fn disposed_handle_skips_task() {
    TestScheduler::init();
    let counter = Arc::new(AtomicUsize::new(0));

    let mut handle = TestScheduler
      .schedule(Some(Duration::from_millis(1)), counter_task(&counter, 1));
    handle.dispose();

    TestScheduler::flush();
    assert_eq!(counter.load(AtomicOrdering::SeqCst), 0);
  }

  #[test]
  fn tasks_can_reschedule() {
    TestScheduler::init();
    let counter = Arc::new(AtomicUsize::new(0));

    let inner = counter_task(&counter, 2);
    TestScheduler.schedule(
      Some(Duration::from_millis(1)),
      Box::new(move || {
        TestScheduler.schedule(Some(Duration::from_millis(1)), inner);
      }),
    );

    TestScheduler::advance_by(Duration::from_millis(1));
    assert_eq!(counter.load(AtomicOrdering::SeqCst), 0);
    TestScheduler::advance_by(Duration::from_millis(1));
    assert_eq!(counter.load(AtomicOrdering::SeqCst), 2);
  }
}
