use std::marker::PhantomData;

use crate::{
  disposable::BooleanDisposable,
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Completes immediately without emitting.
#[inline]
pub fn empty<Item>() -> Empty<Item> {
  Empty(PhantomData)
}

pub struct Empty<Item>(PhantomData<Item>);

impl<Item> Clone for Empty<Item> {
  #[inline]
  fn clone(&self) -> Self {
    Empty(PhantomData)
  }
}

impl<Item, Err, O> Observable<Item, Err, O> for Empty<Item>
where
  O: Observer<Item, Err>,
{
  type Unsub = BooleanDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    observer.complete();
    BooleanDisposable::new()
  }
}

impl<Item, Err> ObservableExt<Item, Err> for Empty<Item> {}

/// Never emits and never terminates.
#[inline]
pub fn never<Item>() -> Never<Item> {
  Never(PhantomData)
}

pub struct Never<Item>(PhantomData<Item>);

impl<Item> Clone for Never<Item> {
  #[inline]
  fn clone(&self) -> Self {
    Never(PhantomData)
  }
}

impl<Item, Err, O> Observable<Item, Err, O> for Never<Item>
where
  O: Observer<Item, Err>,
{
  type Unsub = BooleanDisposable;

  fn actual_subscribe(self, _observer: O) -> Self::Unsub {
    BooleanDisposable::new()
  }
}

impl<Item, Err> ObservableExt<Item, Err> for Never<Item> {}

/// Fails immediately with `err`.
#[inline]
pub fn throw<Item, Err>(err: Err) -> Throw<Err, Item> {
  Throw(err, PhantomData)
}

pub struct Throw<Err, Item>(Err, PhantomData<Item>);

impl<Err: Clone, Item> Clone for Throw<Err, Item> {
  #[inline]
  fn clone(&self) -> Self {
    Throw(self.0.clone(), PhantomData)
  }
}

impl<Item, Err, O> Observable<Item, Err, O> for Throw<Err, Item>
where
  O: Observer<Item, Err>,
{
  type Unsub = BooleanDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    observer.error(self.0);
    BooleanDisposable::new()
  }
}

impl<Item, Err> ObservableExt<Item, Err> for Throw<Err, Item> {}
