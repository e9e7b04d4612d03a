use crate::{prelude::*, rc::MutArc};

/// Which edge(s) of a throttle window produce a value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ThrottleEdge {
  leading: bool,
  trailing: bool,
}

impl ThrottleEdge {
  #[inline]
  pub fn leading() -> Self {
    Self { leading: true, trailing: false }
  }

  #[inline]
  pub fn trailing() -> Self {
    Self { leading: false, trailing: true }
  }

  #[inline]
  pub fn all() -> Self {
    Self { leading: true, trailing: true }
  }
}

#[derive(Clone)]
pub struct ThrottleOp<S, SD> {
  pub(crate) source: S,
  pub(crate) duration: Duration,
  pub(crate) edge: ThrottleEdge,
  pub(crate) scheduler: SD,
}

impl<Item, Err, O, S, SD> Observable<Item, Err, O> for ThrottleOp<S, SD>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Clone + Send + 'static,
  S: Observable<Item, Err, ThrottleObserver<O, SD, Item>>,
  SD: Scheduler,
{
  type Unsub = BinaryDisposable<S::Unsub, SerialDisposable>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let pending = SerialDisposable::new();
    let source_unsub = self.source.actual_subscribe(ThrottleObserver {
      observer: MutArc::own(Some(observer)),
      duration: self.duration,
      edge: self.edge,
      scheduler: self.scheduler,
      trailing_value: MutArc::own(None),
      // No window is open until the first value arrives.
      window: TaskHandle::finished(),
      pending: pending.clone(),
    });
    BinaryDisposable::new(source_unsub, pending)
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err> for ThrottleOp<S, SD> where
  S: ObservableExt<Item, Err>
{
}

pub struct ThrottleObserver<O, SD, Item> {
  observer: MutArc<Option<O>>,
  scheduler: SD,
  duration: Duration,
  edge: ThrottleEdge,
  trailing_value: MutArc<Option<Item>>,
  // Closed once the current window's timer has fired or been cancelled.
  window: TaskHandle,
  pending: SerialDisposable,
}

impl<Item, Err, O, SD> Observer<Item, Err> for ThrottleObserver<O, SD, Item>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Clone + Send + 'static,
  SD: Scheduler,
{
  fn next(&mut self, value: Item) {
    if self.edge.trailing {
      *self.trailing_value.rc_deref_mut() = Some(value.clone());
    }
    if self.window.is_disposed() {
      if self.edge.leading {
        self.observer.next(value);
      }
      let observer = self.observer.clone();
      let trailing_value = self.trailing_value.clone();
      let handle = self.scheduler.schedule(
        Some(self.duration),
        Box::new(move || {
          let value = trailing_value.rc_deref_mut().take();
          if let Some(value) = value {
            let mut observer = observer;
            observer.next(value);
          }
        }),
      );
      self.window = handle.clone();
      self.pending.set(handle);
    }
  }

  fn error(self, err: Err) {
    self.trailing_value.rc_deref_mut().take();
    self.observer.error(err);
    let mut pending = self.pending;
    pending.dispose();
  }

  fn complete(self) {
    let trailing = self.trailing_value.rc_deref_mut().take();
    let mut observer = self.observer;
    if let Some(value) = trailing {
      observer.next(value);
    }
    observer.complete();
    let mut pending = self.pending;
    pending.dispose();
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.observer.is_closed()
  }
}

#[cfg(test)]
mod tests {
  use crate::{prelude::*, scheduler::test_scheduler::TestScheduler, test_probe::probe};

  fn throttled(
    edge: ThrottleEdge,
  ) -> (
    crate::test_probe::ProbeHandle<i32, ()>,
    MutArc<Vec<i32>>,
    SubscriptionHandle<impl Disposable>,
  ) {
    let (src, source) = probe::<i32, ()>();
    let values = MutArc::own(Vec::new());
    let v = values.clone();
    let handle = source
      .throttle(Duration::from_millis(10), edge, TestScheduler)
      .subscribe_err(move |value| v.rc_deref_mut().push(value), |_| {});
    (src, values, handle)
  }

  #[test]
  fn leading_emits_window_opener() {
    TestScheduler::init();
    let (src, values, _handle) = throttled(ThrottleEdge::leading());

    src.next(1);
    src.next(2);
    TestScheduler::advance_by(Duration::from_millis(10));
    src.next(3);

    assert_eq!(*values.rc_deref(), vec![1, 3]);
  }

  #[test]
  fn trailing_emits_last_of_window() {
    TestScheduler::init();
    let (src, values, _handle) = throttled(ThrottleEdge::trailing());

    src.next(1);
    src.next(2);
    assert!(values.rc_deref().is_empty());
    TestScheduler::advance_by(Duration::from_millis(10));
    assert_eq!(*values.rc_deref(), vec![2]);
  }

  #[test]
  fn completion_flushes_pending_trailing() {
    TestScheduler::init();
    let (src, values, _handle) = throttled(ThrottleEdge::trailing());

    src.next(1);
    src.complete();
    assert_eq!(*values.rc_deref(), vec![1]);
    TestScheduler::flush();
    assert_eq!(*values.rc_deref(), vec![1]);
  }

  #[test]
  fn dispose_cancels_pending_window() {
    TestScheduler::init();
    let (src, values, mut handle) = throttled(ThrottleEdge::trailing());

    src.next(1);
    handle.dispose();
    TestScheduler::advance_by(Duration::from_millis(10));
    assert!(values.rc_deref().is_empty());
  }
}
