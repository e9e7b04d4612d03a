use std::marker::PhantomData;

use crate::{prelude::*, rc::MutArc};

#[derive(Clone)]
pub struct WithLatestFromOp<S, FS> {
  pub(crate) source: S,
  pub(crate) from: FS,
}

impl<Source, From, O, ItemA, ItemB, Err> Observable<(ItemA, ItemB), Err, O>
  for WithLatestFromOp<Source, From>
where
  O: Observer<(ItemA, ItemB), Err>,
  Source: Observable<ItemA, Err, PrimaryObserver<O, ItemB>>,
  From: Observable<ItemB, Err, SecondaryObserver<O, ItemA, ItemB>>,
  ItemB: Clone,
{
  type Unsub = BinaryDisposable<Source::Unsub, From::Unsub>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let latest = MutArc::own(None);
    let observer = MutArc::own(Some(observer));
    let from_unsub = self.from.actual_subscribe(SecondaryObserver {
      observer: observer.clone(),
      latest: latest.clone(),
      _marker: PhantomData,
    });
    let source_unsub = self
      .source
      .actual_subscribe(PrimaryObserver { observer, latest });
    BinaryDisposable::new(source_unsub, from_unsub)
  }
}

impl<Source, From, ItemA, ItemB, Err> ObservableExt<(ItemA, ItemB), Err>
  for WithLatestFromOp<Source, From>
where
  Source: ObservableExt<ItemA, Err>,
  From: ObservableExt<ItemB, Err>,
{
}

pub struct PrimaryObserver<O, ItemB> {
  observer: MutArc<Option<O>>,
  latest: MutArc<Option<ItemB>>,
}

impl<ItemA, ItemB, Err, O> Observer<ItemA, Err> for PrimaryObserver<O, ItemB>
where
  O: Observer<(ItemA, ItemB), Err>,
  ItemB: Clone,
{
  fn next(&mut self, item: ItemA) {
    // End the borrow of the latest slot before delivering.
    let latest = self.latest.rc_deref().clone();
    if let Some(latest) = latest {
      self.observer.next((item, latest));
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

pub struct SecondaryObserver<O, ItemA, ItemB> {
  observer: MutArc<Option<O>>,
  latest: MutArc<Option<ItemB>>,
  _marker: PhantomData<ItemA>,
}

impl<ItemA, ItemB, Err, O> Observer<ItemB, Err>
  for SecondaryObserver<O, ItemA, ItemB>
where
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemB) {
    *self.latest.rc_deref_mut() = Some(value);
  }

  #[inline]
  fn error(self, err: Err) {
    self.observer.error(err)
  }

  // The sampled side finishing does not end the stream.
  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool {
    self.observer.is_closed()
  }
}
