use std::{collections::VecDeque, marker::PhantomData};

use crate::{prelude::*, rc::MutArc};

pub struct MergeAllOp<S, Inner> {
  pub(crate) source: S,
  pub(crate) concurrent: usize,
  pub(crate) _hint: PhantomData<Inner>,
}

type SubscribeTask = Box<dyn FnOnce() + Send>;

struct MergeAllState<O> {
  observer: O,
  pending: VecDeque<SubscribeTask>,
  outer_completed: bool,
  active: usize,
  concurrent: usize,
}

impl<Inner, Item, Err, O, S> Observable<Item, Err, O> for MergeAllOp<S, Inner>
where
  O: Observer<Item, Err> + Send + 'static,
  S: Observable<Inner, Err, OuterObserver<O, Item>>,
  Inner: Observable<Item, Err, InnerObserver<O>> + Send + 'static,
  S::Unsub: Send + 'static,
  Inner::Unsub: Send + 'static,
{
  type Unsub = CompositeDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = CompositeDisposable::new();
    let state = MutArc::own(Some(MergeAllState {
      observer,
      pending: VecDeque::new(),
      outer_completed: false,
      active: 0,
      concurrent: self.concurrent.max(1),
    }));
    let unsub = self.source.actual_subscribe(OuterObserver {
      state,
      subscription: subscription.clone(),
      _hint: PhantomData,
    });
    subscription.add(unsub);
    subscription
  }
}

impl<Inner, Item, Err, S> ObservableExt<Item, Err> for MergeAllOp<S, Inner> {}

pub struct OuterObserver<O, Item> {
  state: MutArc<Option<MergeAllState<O>>>,
  subscription: CompositeDisposable,
  _hint: PhantomData<Item>,
}

impl<Inner, Item, Err, O> Observer<Inner, Err> for OuterObserver<O, Item>
where
  O: Observer<Item, Err> + Send + 'static,
  Inner: Observable<Item, Err, InnerObserver<O>> + Send + 'static,
  Inner::Unsub: Send + 'static,
{
  fn next(&mut self, inner: Inner) {
    {
      let mut slot = self.state.rc_deref_mut();
      let Some(state) = slot.as_mut() else { return };
      if state.active >= state.concurrent {
        let state_handle = self.state.clone();
        let subscription = self.subscription.clone();
        state.pending.push_back(Box::new(move || {
          let unsub = inner.actual_subscribe(InnerObserver {
            state: state_handle,
            subscription: subscription.clone(),
          });
          subscription.add(unsub);
        }));
        return;
      }
      state.active += 1;
    }
    let unsub = inner.actual_subscribe(InnerObserver {
      state: self.state.clone(),
      subscription: self.subscription.clone(),
    });
    self.subscription.add(unsub);
  }

  fn error(self, err: Err) {
    let state = self.state.rc_deref_mut().take();
    if let Some(state) = state {
      state.observer.error(err);
    }
    let mut subscription = self.subscription;
    subscription.dispose();
  }

  fn complete(self) {
    let finished = {
      let mut slot = self.state.rc_deref_mut();
      let Some(state) = slot.as_mut() else { return };
      state.outer_completed = true;
      if state.active == 0 && state.pending.is_empty() {
        slot.take()
      } else {
        None
      }
    };
    if let Some(state) = finished {
      state.observer.complete();
      let mut subscription = self.subscription;
      subscription.dispose();
    }
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .rc_deref()
      .as_ref()
      .map_or(true, |state| state.observer.is_closed())
  }
}

pub struct InnerObserver<O> {
  state: MutArc<Option<MergeAllState<O>>>,
  subscription: CompositeDisposable,
}

impl<Item, Err, O> Observer<Item, Err> for InnerObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut slot = self.state.rc_deref_mut();
    if let Some(state) = slot.as_mut() {
      state.observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let state = self.state.rc_deref_mut().take();
    if let Some(state) = state {
      state.observer.error(err);
    }
    let mut subscription = self.subscription;
    subscription.dispose();
  }

  fn complete(self) {
    // A queued inner inherits this slot's active count; otherwise the slot
    // frees up and the whole stream may be done.
    enum Followup<O> {
      Run(SubscribeTask),
      Finish(O),
      Nothing,
    }

    let followup = {
      let mut slot = self.state.rc_deref_mut();
      let Some(state) = slot.as_mut() else { return };
      if let Some(task) = state.pending.pop_front() {
        Followup::Run(task)
      } else {
        state.active -= 1;
        if state.active == 0 && state.outer_completed {
          match slot.take() {
            Some(state) => Followup::Finish(state.observer),
            None => Followup::Nothing,
          }
        } else {
          Followup::Nothing
        }
      }
    };
    match followup {
      // Run outside the lock: the queued source may emit synchronously.
      Followup::Run(task) => task(),
      Followup::Finish(observer) => {
        observer.complete();
        let mut subscription = self.subscription;
        subscription.dispose();
      }
      Followup::Nothing => {}
    }
  }

  fn is_closed(&self) -> bool {
    self
      .state
      .rc_deref()
      .as_ref()
      .map_or(true, |state| state.observer.is_closed())
  }
}
