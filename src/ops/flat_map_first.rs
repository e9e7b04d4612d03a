use std::marker::PhantomData;

use crate::{prelude::*, rc::MutArc};

pub struct FlatMapFirstOp<S, F, ItemIn> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _hint: PhantomData<ItemIn>,
}

struct FlatMapFirstState<O> {
  observer: Option<O>,
  outer_completed: bool,
  inner_active: bool,
}

impl<Inner, ItemIn, ItemOut, Err, O, S, F> Observable<ItemOut, Err, O>
  for FlatMapFirstOp<S, F, ItemIn>
where
  O: Observer<ItemOut, Err>,
  S: Observable<ItemIn, Err, FlatMapFirstOuterObserver<O, F, ItemOut>>,
  F: FnMut(ItemIn) -> Inner,
  Inner: Observable<ItemOut, Err, FlatMapFirstInnerObserver<O>>,
  S::Unsub: Send + 'static,
  Inner::Unsub: Send + 'static,
{
  type Unsub = CompositeDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = CompositeDisposable::new();
    let state = MutArc::own(FlatMapFirstState {
      observer: Some(observer),
      outer_completed: false,
      inner_active: false,
    });
    let unsub = self.source.actual_subscribe(FlatMapFirstOuterObserver {
      state,
      func: self.func,
      subscription: subscription.clone(),
      _hint: PhantomData,
    });
    subscription.add(unsub);
    subscription
  }
}

impl<ItemOut, Err, S, F, ItemIn> ObservableExt<ItemOut, Err>
  for FlatMapFirstOp<S, F, ItemIn>
{
}

pub struct FlatMapFirstOuterObserver<O, F, ItemOut> {
  state: MutArc<FlatMapFirstState<O>>,
  func: F,
  subscription: CompositeDisposable,
  _hint: PhantomData<ItemOut>,
}

impl<Inner, ItemIn, ItemOut, Err, O, F> Observer<ItemIn, Err>
  for FlatMapFirstOuterObserver<O, F, ItemOut>
where
  O: Observer<ItemOut, Err>,
  F: FnMut(ItemIn) -> Inner,
  Inner: Observable<ItemOut, Err, FlatMapFirstInnerObserver<O>>,
  Inner::Unsub: Send + 'static,
{
  fn next(&mut self, value: ItemIn) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() || state.inner_active {
        return;
      }
      state.inner_active = true;
    }
    let inner = (self.func)(value);
    let unsub = inner
      .actual_subscribe(FlatMapFirstInnerObserver { state: self.state.clone() });
    self.subscription.add(unsub);
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      observer.error(err);
    }
    let mut subscription = self.subscription;
    subscription.dispose();
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.outer_completed = true;
      if state.inner_active {
        None
      } else {
        state.observer.take()
      }
    };
    if let Some(observer) = observer {
      observer.complete();
      let mut subscription = self.subscription;
      subscription.dispose();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .rc_deref()
      .observer
      .as_ref()
      .map_or(true, |o| o.is_closed())
  }
}

pub struct FlatMapFirstInnerObserver<O> {
  state: MutArc<FlatMapFirstState<O>>,
}

impl<Item, Err, O> Observer<Item, Err> for FlatMapFirstInnerObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    if let Some(observer) = state.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.inner_active = false;
      if state.outer_completed {
        state.observer.take()
      } else {
        None
      }
    };
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .rc_deref()
      .observer
      .as_ref()
      .map_or(true, |o| o.is_closed())
  }
}
