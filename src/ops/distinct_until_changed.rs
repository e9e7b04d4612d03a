use crate::prelude::*;

#[derive(Clone)]
pub struct DistinctUntilChangedOp<S> {
  pub(crate) source: S,
}

impl<Item, Err, O, S> Observable<Item, Err, O> for DistinctUntilChangedOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DistinctObserver<O, Item>>,
  Item: PartialEq + Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(DistinctObserver { observer, last: None })
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for DistinctUntilChangedOp<S> where
  S: ObservableExt<Item, Err>
{
}

pub struct DistinctObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for DistinctObserver<O, Item>
where
  O: Observer<Item, Err>,
  Item: PartialEq + Clone,
{
  fn next(&mut self, value: Item) {
    if self.last.as_ref() != Some(&value) {
      self.last = Some(value.clone());
      self.observer.next(value)
    }
  }

  #[inline]
  fn error(self, err: Err) {
    self.observer.error(err)
  }

  #[inline]
  fn complete(self) {
    self.observer.complete()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.observer.is_closed()
  }
}

#[derive(Clone)]
pub struct DistinctUntilChangedByOp<S, F> {
  pub(crate) source: S,
  pub(crate) comparer: F,
}

impl<Item, Err, O, S, F> Observable<Item, Err, O>
  for DistinctUntilChangedByOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DistinctByObserver<O, F, Item>>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(DistinctByObserver {
      observer,
      comparer: self.comparer,
      last: None,
    })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err>
  for DistinctUntilChangedByOp<S, F>
where
  S: ObservableExt<Item, Err>,
{
}

pub struct DistinctByObserver<O, F, Item> {
  observer: O,
  comparer: F,
  last: Option<Item>,
}

impl<Item, Err, O, F> Observer<Item, Err> for DistinctByObserver<O, F, Item>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let same = self
      .last
      .as_ref()
      .map_or(false, |last| (self.comparer)(last, &value));
    if !same {
      self.last = Some(value.clone());
      self.observer.next(value)
    }
  }

  #[inline]
  fn error(self, err: Err) {
    self.observer.error(err)
  }

  #[inline]
  fn complete(self) {
    self.observer.complete()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.observer.is_closed()
  }
}

#[derive(Clone)]
pub struct DistinctUntilKeyChangedOp<S, F> {
  pub(crate) source: S,
  pub(crate) key: F,
}

impl<Item, Err, O, S, F, K> Observable<Item, Err, O>
  for DistinctUntilKeyChangedOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DistinctKeyObserver<O, F, K>>,
  F: FnMut(&Item) -> K,
  K: PartialEq,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(DistinctKeyObserver {
      observer,
      key: self.key,
      last_key: None,
    })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err>
  for DistinctUntilKeyChangedOp<S, F>
where
  S: ObservableExt<Item, Err>,
{
}

pub struct DistinctKeyObserver<O, F, K> {
  observer: O,
  key: F,
  last_key: Option<K>,
}

impl<Item, Err, O, F, K> Observer<Item, Err> for DistinctKeyObserver<O, F, K>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> K,
  K: PartialEq,
{
  fn next(&mut self, value: Item) {
    let key = (self.key)(&value);
    if self.last_key.as_ref() != Some(&key) {
      self.last_key = Some(key);
      self.observer.next(value)
    }
  }

  #[inline]
  fn error(self, err: Err) {
    self.observer.error(err)
  }

  #[inline]
  fn complete(self) {
    self.observer.complete()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.observer.is_closed()
  }
}
