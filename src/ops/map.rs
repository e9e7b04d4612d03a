use std::marker::PhantomData;

use crate::prelude::*;

pub struct MapOp<S, F, ItemIn> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _hint: PhantomData<ItemIn>,
}

impl<Item, Err, O, S, F, B> Observable<B, Err, O> for MapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapObserver<O, F>>,
  F: FnMut(Item) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(MapObserver { observer, func: self.func })
  }
}

impl<B, Err, S, F, ItemIn> ObservableExt<B, Err> for MapOp<S, F, ItemIn> {}

#[derive(Clone)]
pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F, B> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) {
    self.observer.next((self.func)(value))
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
