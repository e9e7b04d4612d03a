use crate::{prelude::*, rc::MutArc};

#[derive(Clone)]
pub struct ConcatOp<A, B> {
  pub(crate) first: A,
  pub(crate) second: B,
}

struct ConcatState<O, B> {
  observer: Option<O>,
  second: Option<B>,
}

impl<Item, Err, O, A, B> Observable<Item, Err, O> for ConcatOp<A, B>
where
  O: Observer<Item, Err>,
  A: Observable<Item, Err, ConcatFirstObserver<O, B>>,
  B: Observable<Item, Err, ConcatSecondObserver<O, B>>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = CompositeDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = CompositeDisposable::new();
    let state = MutArc::own(ConcatState {
      observer: Some(observer),
      second: Some(self.second),
    });
    let first_unsub = self.first.actual_subscribe(ConcatFirstObserver {
      state,
      subscription: subscription.clone(),
    });
    subscription.add(first_unsub);
    subscription
  }
}

impl<Item, Err, A, B> ObservableExt<Item, Err> for ConcatOp<A, B>
where
  A: ObservableExt<Item, Err>,
  B: ObservableExt<Item, Err>,
{
}

pub struct ConcatFirstObserver<O, B> {
  state: MutArc<ConcatState<O, B>>,
  subscription: CompositeDisposable,
}

impl<Item, Err, O, B> Observer<Item, Err> for ConcatFirstObserver<O, B>
where
  O: Observer<Item, Err>,
  B: Observable<Item, Err, ConcatSecondObserver<O, B>>,
  B::Unsub: Send + 'static,
{
  fn next(&mut self, value: Item) {
    let mut state = self.state.rc_deref_mut();
    if let Some(observer) = state.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    // The second source never starts.
    let observer = {
      let mut state = self.state.rc_deref_mut();
      state.second.take();
      state.observer.take()
    };
    if let Some(observer) = observer {
      observer.error(err);
    }
    let mut subscription = self.subscription;
    subscription.dispose();
  }

  fn complete(self) {
    let second = self.state.rc_deref_mut().second.take();
    if let Some(second) = second {
      let unsub = second
        .actual_subscribe(ConcatSecondObserver { state: self.state.clone() });
      self.subscription.add(unsub);
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

pub struct ConcatSecondObserver<O, B> {
  state: MutArc<ConcatState<O, B>>,
}

impl<Item, Err, O, B> Observer<Item, Err> for ConcatSecondObserver<O, B>
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
    let observer = self.state.rc_deref_mut().observer.take();
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
