use std::collections::VecDeque;

use crate::{prelude::*, rc::MutArc};

#[derive(Clone)]
pub struct ZipOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

struct ZipState<O, ItemA, ItemB> {
  observer: Option<O>,
  buffer_a: VecDeque<ItemA>,
  buffer_b: VecDeque<ItemB>,
  completed_a: bool,
  completed_b: bool,
}

impl<O, ItemA, ItemB> ZipState<O, ItemA, ItemB> {
  // No further pair can ever be formed.
  fn drained(&self) -> bool {
    (self.completed_a && self.buffer_a.is_empty())
      || (self.completed_b && self.buffer_b.is_empty())
  }
}

impl<ItemA, ItemB, Err, O, A, B> Observable<(ItemA, ItemB), Err, O>
  for ZipOp<A, B>
where
  O: Observer<(ItemA, ItemB), Err>,
  A: Observable<ItemA, Err, ZipAObserver<O, ItemA, ItemB>>,
  B: Observable<ItemB, Err, ZipBObserver<O, ItemA, ItemB>>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = CompositeDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = CompositeDisposable::new();
    let state = MutArc::own(ZipState {
      observer: Some(observer),
      buffer_a: VecDeque::new(),
      buffer_b: VecDeque::new(),
      completed_a: false,
      completed_b: false,
    });
    let a_unsub = self.a.actual_subscribe(ZipAObserver {
      state: state.clone(),
      subscription: subscription.clone(),
    });
    subscription.add(a_unsub);
    let b_unsub = self.b.actual_subscribe(ZipBObserver {
      state,
      subscription: subscription.clone(),
    });
    subscription.add(b_unsub);
    subscription
  }
}

impl<ItemA, ItemB, Err, A, B> ObservableExt<(ItemA, ItemB), Err>
  for ZipOp<A, B>
where
  A: ObservableExt<ItemA, Err>,
  B: ObservableExt<ItemB, Err>,
{
}

macro_rules! impl_zip_side_observer {
  (
    $name:ident, $item:ident, $sibling_item:ident,
    $own_buffer:ident, $sibling_buffer:ident, $completed:ident,
    $pair:expr
  ) => {
    pub struct $name<O, ItemA, ItemB> {
      state: MutArc<ZipState<O, ItemA, ItemB>>,
      subscription: CompositeDisposable,
    }

    impl<ItemA, ItemB, Err, O> Observer<$item, Err>
      for $name<O, ItemA, ItemB>
    where
      O: Observer<(ItemA, ItemB), Err>,
    {
      fn next(&mut self, value: $item) {
        let finished = {
          let mut state = self.state.rc_deref_mut();
          if state.observer.is_none() {
            return;
          }
          if let Some(sibling) = state.$sibling_buffer.pop_front() {
            let pair = $pair(value, sibling);
            if let Some(observer) = state.observer.as_mut() {
              observer.next(pair);
            }
            // Pairing may have exhausted a completed side.
            if state.drained() {
              state.observer.take()
            } else {
              None
            }
          } else {
            state.$own_buffer.push_back(value);
            None
          }
        };
        if let Some(observer) = finished {
          observer.complete();
          let mut subscription = self.subscription.clone();
          subscription.dispose();
        }
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
        let finished = {
          let mut state = self.state.rc_deref_mut();
          state.$completed = true;
          if state.drained() {
            state.observer.take()
          } else {
            None
          }
        };
        if let Some(observer) = finished {
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
  };
}

impl_zip_side_observer!(
  ZipAObserver, ItemA, ItemB, buffer_a, buffer_b, completed_a,
  |a, b| (a, b)
);
impl_zip_side_observer!(
  ZipBObserver, ItemB, ItemA, buffer_b, buffer_a, completed_b,
  |b, a| (a, b)
);
