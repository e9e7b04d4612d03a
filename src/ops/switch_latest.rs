use std::marker::PhantomData;

use crate::{prelude::*, rc::MutArc};

pub struct SwitchLatestOp<S, Inner> {
  pub(crate) source: S,
  pub(crate) _hint: PhantomData<Inner>,
}

struct SwitchState<O> {
  observer: Option<O>,
  outer_completed: bool,
  inner_active: bool,
  // Bumped for every new inner; events stamped with an older generation
  // belong to a superseded inner and are dropped.
  generation: usize,
}

impl<Inner, Item, Err, O, S> Observable<Item, Err, O>
  for SwitchLatestOp<S, Inner>
where
  O: Observer<Item, Err>,
  S: Observable<Inner, Err, SwitchOuterObserver<O, Item>>,
  Inner: Observable<Item, Err, SwitchInnerObserver<O>>,
  Inner::Unsub: Send + 'static,
{
  type Unsub = BinaryDisposable<S::Unsub, SerialDisposable>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let inner_subscription = SerialDisposable::new();
    let state = MutArc::own(SwitchState {
      observer: Some(observer),
      outer_completed: false,
      inner_active: false,
      generation: 0,
    });
    let source_unsub = self.source.actual_subscribe(SwitchOuterObserver {
      state,
      inner_subscription: inner_subscription.clone(),
      _hint: PhantomData,
    });
    BinaryDisposable::new(source_unsub, inner_subscription)
  }
}

impl<Inner, Item, Err, S> ObservableExt<Item, Err>
  for SwitchLatestOp<S, Inner>
{
}

pub struct SwitchOuterObserver<O, Item> {
  state: MutArc<SwitchState<O>>,
  inner_subscription: SerialDisposable,
  _hint: PhantomData<Item>,
}

impl<Inner, Item, Err, O> Observer<Inner, Err> for SwitchOuterObserver<O, Item>
where
  O: Observer<Item, Err>,
  Inner: Observable<Item, Err, SwitchInnerObserver<O>>,
  Inner::Unsub: Send + 'static,
{
  fn next(&mut self, inner: Inner) {
    let generation = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.generation += 1;
      state.inner_active = true;
      state.generation
    };
    // Retire the superseded inner before its replacement starts.
    self.inner_subscription.clear();
    let unsub = inner.actual_subscribe(SwitchInnerObserver {
      state: self.state.clone(),
      generation,
    });
    self.inner_subscription.set(unsub);
  }

  fn error(self, err: Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      observer.error(err);
    }
    let mut inner_subscription = self.inner_subscription;
    inner_subscription.dispose();
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

pub struct SwitchInnerObserver<O> {
  state: MutArc<SwitchState<O>>,
  generation: usize,
}

impl<Item, Err, O> Observer<Item, Err> for SwitchInnerObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    if state.generation != self.generation {
      return;
    }
    if let Some(observer) = state.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      if state.generation != self.generation {
        return;
      }
      state.observer.take()
    };
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    let observer = {
      let mut state = self.state.rc_deref_mut();
      if state.generation != self.generation {
        return;
      }
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
    let state = self.state.rc_deref();
    state.generation != self.generation
      || state.observer.as_ref().map_or(true, |o| o.is_closed())
  }
}
