use std::marker::PhantomData;

use crate::{
  disposable::{BooleanDisposable, Disposable},
  observer::{Observer, ObserverAll, ObserverComp, ObserverErr, ObserverNext},
  ops::{
    combine_latest::CombineLatestOp,
    concat::ConcatOp,
    debounce::DebounceOp,
    delay::DelayOp,
    distinct_until_changed::{
      DistinctUntilChangedByOp, DistinctUntilChangedOp, DistinctUntilKeyChangedOp,
    },
    filter::FilterOp,
    flat_map_first::FlatMapFirstOp,
    map::MapOp,
    merge::MergeOp,
    merge_all::MergeAllOp,
    scan::ScanOp,
    skip::SkipOp,
    start_with::StartWithOp,
    switch_latest::SwitchLatestOp,
    tap::TapOp,
    throttle::{ThrottleEdge, ThrottleOp},
    with_latest_from::WithLatestFromOp,
    zip::ZipOp,
    ConcatAllOp, FlatMapLatestOp, FlatMapOp,
  },
  scheduler::Duration,
  subscriber::{Subscriber, SubscriptionHandle},
};

mod create;
mod from_iter;
mod of;
mod trivial;
pub use create::*;
pub use from_iter::*;
pub use of::*;
pub use trivial::*;

/// A cold sequence of values over time. Every subscription runs the
/// producer fresh for its own observer.
///
/// `Unsub` is the upstream resource of one subscription; disposing it
/// cascades the cancellation through the whole chain.
pub trait Observable<Item, Err, O: Observer<Item, Err>> {
  type Unsub: Disposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// Operator constructors and the `subscribe` family.
pub trait ObservableExt<Item, Err>: Sized {
  /// Transforms every value with `func`.
  #[inline]
  fn map<B, F>(self, func: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp { source: self, func, _hint: PhantomData }
  }

  /// Keeps only the values `pred` accepts.
  #[inline]
  fn filter<F>(self, pred: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp { source: self, pred }
  }

  /// Runs `func` on a reference to every value, without changing the
  /// stream. The inspection hook of this crate.
  #[inline]
  fn tap<F>(self, func: F) -> TapOp<Self, F>
  where
    F: FnMut(&Item),
  {
    TapOp { source: self, func }
  }

  /// Folds the stream, emitting every intermediate accumulator. The seed
  /// itself is not emitted.
  #[inline]
  fn scan<B, F>(self, initial: B, binary_op: F) -> ScanOp<Self, F, B, Item>
  where
    F: FnMut(B, Item) -> B,
  {
    ScanOp { source: self, binary_op, initial, _hint: PhantomData }
  }

  /// Drops the first `count` values.
  #[inline]
  fn skip(self, count: usize) -> SkipOp<Self> {
    SkipOp { source: self, count }
  }

  /// Emits `values` before anything from the source.
  #[inline]
  fn start_with(self, values: Vec<Item>) -> StartWithOp<Self, Item> {
    StartWithOp { source: self, values }
  }

  /// Suppresses consecutive duplicates. The first value always passes.
  #[inline]
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self> {
    DistinctUntilChangedOp { source: self }
  }

  /// Like [`distinct_until_changed`](ObservableExt::distinct_until_changed)
  /// with an explicit equality: `comparer(prev, cur)` returning `true`
  /// suppresses `cur`.
  #[inline]
  fn distinct_until_changed_by<F>(
    self,
    comparer: F,
  ) -> DistinctUntilChangedByOp<Self, F>
  where
    F: FnMut(&Item, &Item) -> bool,
  {
    DistinctUntilChangedByOp { source: self, comparer }
  }

  /// Suppresses values whose key equals the previous value's key.
  #[inline]
  fn distinct_until_key_changed<K, F>(
    self,
    key: F,
  ) -> DistinctUntilKeyChangedOp<Self, F>
  where
    F: FnMut(&Item) -> K,
  {
    DistinctUntilKeyChangedOp { source: self, key }
  }

  /// Interleaves this sequence with `other`. Completes when both complete,
  /// errors as soon as either errors.
  #[inline]
  fn merge<B>(self, other: B) -> MergeOp<Self, B> {
    MergeOp { a: self, b: other }
  }

  /// Flattens an observable of observables, running at most `concurrent`
  /// inner subscriptions at a time; excess inners queue in arrival order.
  #[inline]
  fn merge_all(self, concurrent: usize) -> MergeAllOp<Self, Item> {
    MergeAllOp { source: self, concurrent, _hint: PhantomData }
  }

  /// Projects every value to an inner observable and merges them all.
  #[inline]
  fn flat_map<B, F>(self, func: F) -> FlatMapOp<Self, F, Item, B>
  where
    F: FnMut(Item) -> B,
  {
    MergeAllOp {
      source: self.map(func),
      concurrent: usize::MAX,
      _hint: PhantomData,
    }
  }

  /// Runs `other` only after this sequence completes. An error from this
  /// sequence suppresses `other` entirely.
  #[inline]
  fn concat<B>(self, other: B) -> ConcatOp<Self, B> {
    ConcatOp { first: self, second: other }
  }

  /// Flattens an observable of observables one inner at a time.
  #[inline]
  fn concat_all(self) -> ConcatAllOp<Self, Item> {
    self.merge_all(1)
  }

  /// Forwards only the most recent inner observable, disposing the
  /// superseded one before the replacement starts.
  #[inline]
  fn switch_latest(self) -> SwitchLatestOp<Self, Item> {
    SwitchLatestOp { source: self, _hint: PhantomData }
  }

  /// Projects every value to an inner observable, switching to the newest.
  #[inline]
  fn flat_map_latest<B, F>(self, func: F) -> FlatMapLatestOp<Self, F, Item, B>
  where
    F: FnMut(Item) -> B,
  {
    SwitchLatestOp { source: self.map(func), _hint: PhantomData }
  }

  /// Projects a value to an inner observable, ignoring source values while
  /// an inner is still active.
  #[inline]
  fn flat_map_first<B, F>(self, func: F) -> FlatMapFirstOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    FlatMapFirstOp { source: self, func, _hint: PhantomData }
  }

  /// Pairs values of both sequences by index.
  #[inline]
  fn zip<B>(self, other: B) -> ZipOp<Self, B> {
    ZipOp { a: self, b: other }
  }

  /// Emits `binary_op(latest_a, latest_b)` on every event once both sides
  /// have produced a value.
  #[inline]
  fn combine_latest<B, ItemB, Out, BF>(
    self,
    other: B,
    binary_op: BF,
  ) -> CombineLatestOp<Self, B, BF, Item, ItemB>
  where
    BF: FnMut(Item, ItemB) -> Out,
  {
    CombineLatestOp { a: self, b: other, binary_op, _hint: PhantomData }
  }

  /// Samples `other` on every source value; source values before `other`
  /// produced anything are dropped.
  #[inline]
  fn with_latest_from<B>(self, other: B) -> WithLatestFromOp<Self, B> {
    WithLatestFromOp { source: self, from: other }
  }

  /// Shifts values and completion by `delay`. Errors are not delayed.
  #[inline]
  fn delay<SD>(self, delay: Duration, scheduler: SD) -> DelayOp<Self, SD> {
    DelayOp { source: self, delay, scheduler }
  }

  /// Emits a value only after `duration` of silence; newer values cancel
  /// the pending one.
  #[inline]
  fn debounce<SD>(
    self,
    duration: Duration,
    scheduler: SD,
  ) -> DebounceOp<Self, SD> {
    DebounceOp { source: self, duration, scheduler }
  }

  /// Rate-limits values to one window per `duration`; `edge` picks the
  /// leading and/or trailing value of each window.
  #[inline]
  fn throttle<SD>(
    self,
    duration: Duration,
    edge: ThrottleEdge,
    scheduler: SD,
  ) -> ThrottleOp<Self, SD> {
    ThrottleOp { source: self, duration, edge, scheduler }
  }

  fn subscribe<N>(
    self,
    next: N,
  ) -> SubscriptionHandle<
    <Self as Observable<Item, Err, Subscriber<ObserverNext<N>>>>::Unsub,
  >
  where
    N: FnMut(Item),
    ObserverNext<N>: Observer<Item, Err>,
    Self: Observable<Item, Err, Subscriber<ObserverNext<N>>>,
  {
    let gate = BooleanDisposable::new();
    let observer = Subscriber::new(ObserverNext::new(next), gate.clone());
    let upstream = self.actual_subscribe(observer);
    SubscriptionHandle::new(gate, upstream)
  }

  fn subscribe_err<N, E>(
    self,
    next: N,
    error: E,
  ) -> SubscriptionHandle<
    <Self as Observable<Item, Err, Subscriber<ObserverErr<N, E>>>>::Unsub,
  >
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    Self: Observable<Item, Err, Subscriber<ObserverErr<N, E>>>,
  {
    let gate = BooleanDisposable::new();
    let observer = Subscriber::new(ObserverErr::new(next, error), gate.clone());
    let upstream = self.actual_subscribe(observer);
    SubscriptionHandle::new(gate, upstream)
  }

  fn subscribe_complete<N, C>(
    self,
    next: N,
    complete: C,
  ) -> SubscriptionHandle<
    <Self as Observable<Item, Err, Subscriber<ObserverComp<N, C>>>>::Unsub,
  >
  where
    N: FnMut(Item),
    C: FnOnce(),
    ObserverComp<N, C>: Observer<Item, Err>,
    Self: Observable<Item, Err, Subscriber<ObserverComp<N, C>>>,
  {
    let gate = BooleanDisposable::new();
    let observer =
      Subscriber::new(ObserverComp::new(next, complete), gate.clone());
    let upstream = self.actual_subscribe(observer);
    SubscriptionHandle::new(gate, upstream)
  }

  fn subscribe_all<N, E, C>(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> SubscriptionHandle<
    <Self as Observable<Item, Err, Subscriber<ObserverAll<N, E, C>>>>::Unsub,
  >
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    Self: Observable<Item, Err, Subscriber<ObserverAll<N, E, C>>>,
  {
    let gate = BooleanDisposable::new();
    let observer =
      Subscriber::new(ObserverAll::new(next, error, complete), gate.clone());
    let upstream = self.actual_subscribe(observer);
    SubscriptionHandle::new(gate, upstream)
  }
}
