use std::sync::mpsc;

use rxcore::{prelude::*, scheduler::test_scheduler::TestScheduler};

#[test]
fn pipeline_of_element_operators() {
  let mut values = vec![];
  observable::from_iter([1, 1, 2, 2, 3, 1])
    .distinct_until_changed()
    .map(|v| v * 2)
    .skip(1)
    .subscribe(|v| values.push(v));
  assert_eq!(values, vec![4, 6, 2]);
}

#[test]
fn scan_seeded_running_sum() {
  let mut values = vec![];
  observable::from_iter([1, 2, 3])
    .scan(0, |acc, v| acc + v)
    .subscribe(|v| values.push(v));
  assert_eq!(values, vec![1, 3, 6]);
}

#[test]
fn zip_truncates_to_the_shorter_side() {
  let mut values = vec![];
  let mut completed = false;
  observable::from_iter([1, 2, 3])
    .zip(observable::from_iter(["a", "b"]))
    .subscribe_complete(|v| values.push(v), || completed = true);
  assert_eq!(values, vec![(1, "a"), (2, "b")]);
  assert!(completed);
}

#[test]
fn concat_all_equals_merge_all_one() {
  let inners = || {
    [
      observable::from_iter(0..3),
      observable::from_iter(3..5),
      observable::from_iter(5..6),
    ]
  };

  let mut sequential = vec![];
  observable::from_iter(inners())
    .concat_all()
    .subscribe(|v| sequential.push(v));

  let mut capped = vec![];
  observable::from_iter(inners())
    .merge_all(1)
    .subscribe(|v| capped.push(v));

  assert_eq!(sequential, capped);
  assert_eq!(sequential, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn handle_dispose_is_idempotent_and_stops_delivery() {
  let mut seen = 0;
  let mut handle = observable::create(|mut observer| {
    observer.next(1);
    NopDisposable
  })
  .subscribe(|_: i32| seen += 1);

  handle.dispose();
  handle.dispose();
  assert!(handle.is_disposed());
  assert_eq!(seen, 1);
}

#[test]
fn debounce_over_virtual_time() {
  TestScheduler::init();
  let values = MutArc::own(Vec::new());

  let v = values.clone();
  let _handle = observable::create(|mut observer| {
    observer.next(1);
    observer.next(2);
    NopDisposable
  })
  .debounce(Duration::from_millis(5), TestScheduler)
  .subscribe(move |value: i32| v.rc_deref_mut().push(value));

  assert!(values.rc_deref().is_empty());
  TestScheduler::advance_by(Duration::from_millis(5));
  assert_eq!(*values.rc_deref(), vec![2]);
}

#[test]
fn throttle_dispose_cancels_the_window_task() {
  TestScheduler::init();
  let values = MutArc::own(Vec::new());

  let v = values.clone();
  let mut handle = observable::create(|mut observer| {
    observer.next(1);
    NopDisposable
  })
  .throttle(
    Duration::from_millis(5),
    ThrottleEdge::trailing(),
    TestScheduler,
  )
  .subscribe(move |value: i32| v.rc_deref_mut().push(value));

  handle.dispose();
  TestScheduler::advance_by(Duration::from_millis(5));
  assert!(values.rc_deref().is_empty());
}

#[test]
fn delay_on_the_shared_pool() {
  let (tx, rx) = mpsc::channel();
  let _handle = observable::of(5)
    .delay(Duration::from_millis(10), shared_pool())
    .subscribe(move |v| tx.send(v).unwrap());

  assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 5);
}

#[test]
fn errors_take_the_error_channel() {
  let mut values = vec![];
  let mut error = None;
  observable::from_iter([1, 2])
    .concat(observable::throw("late"))
    .subscribe_err(|v| values.push(v), |e| error = Some(e));
  assert_eq!(values, vec![1, 2]);
  assert_eq!(error, Some("late"));
}

#[test]
fn combine_latest_sums_latest_values() {
  let mut values = vec![];
  observable::from_iter([1, 2])
    .combine_latest(observable::of(10), |a, b| a + b)
    .subscribe(|v| values.push(v));
  // Both sources are synchronous: a finishes before b produces anything,
  // so only b's arrival pairs with a's last value.
  assert_eq!(values, vec![12]);
}

#[test]
fn flat_map_first_ignores_while_inner_is_active() {
  // Synchronous inners complete before the next outer value, so every
  // projection runs.
  let mut values = vec![];
  observable::from_iter(1..3)
    .flat_map_first(|v| observable::from_iter([v * 10, v * 10 + 1]))
    .subscribe(|v| values.push(v));
  assert_eq!(values, vec![10, 11, 20, 21]);
}
