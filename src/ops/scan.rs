use std::marker::PhantomData;

use crate::prelude::*;

pub struct ScanOp<S, F, B, ItemIn> {
  pub(crate) source: S,
  pub(crate) binary_op: F,
  pub(crate) initial: B,
  pub(crate) _hint: PhantomData<ItemIn>,
}

impl<Item, Err, O, S, F, B> Observable<B, Err, O> for ScanOp<S, F, B, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, ScanObserver<O, F, B>>,
  F: FnMut(B, Item) -> B,
  B: Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(ScanObserver {
      observer,
      binary_op: self.binary_op,
      acc: self.initial,
    })
  }
}

impl<B, Err, S, F, ItemIn> ObservableExt<B, Err> for ScanOp<S, F, B, ItemIn> {}

#[derive(Clone)]
pub struct ScanObserver<O, F, B> {
  observer: O,
  binary_op: F,
  acc: B,
}

impl<Item, Err, O, F, B> Observer<Item, Err> for ScanObserver<O, F, B>
where
  O: Observer<B, Err>,
  F: FnMut(B, Item) -> B,
  B: Clone,
{
  fn next(&mut self, value: Item) {
    self.acc = (self.binary_op)(self.acc.clone(), value);
    self.observer.next(self.acc.clone())
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
