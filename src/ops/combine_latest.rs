use std::marker::PhantomData;

use crate::{prelude::*, rc::MutArc};

pub struct CombineLatestOp<A, B, F, ItemA, ItemB> {
  pub(crate) a: A,
  pub(crate) b: B,
  pub(crate) binary_op: F,
  pub(crate) _hint: PhantomData<(ItemA, ItemB)>,
}

struct CombineState<O, ItemA, ItemB, F> {
  observer: Option<O>,
  binary_op: F,
  latest_a: Option<ItemA>,
  latest_b: Option<ItemB>,
  completed_one: bool,
}

impl<ItemA, ItemB, Out, Err, O, A, B, F> Observable<Out, Err, O>
  for CombineLatestOp<A, B, F, ItemA, ItemB>
where
  O: Observer<Out, Err>,
  A: Observable<ItemA, Err, CombineAObserver<O, ItemA, ItemB, F>>,
  B: Observable<ItemB, Err, CombineBObserver<O, ItemA, ItemB, F>>,
  F: FnMut(ItemA, ItemB) -> Out,
  ItemA: Clone,
  ItemB: Clone,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = CompositeDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = CompositeDisposable::new();
    let state = MutArc::own(CombineState {
      observer: Some(observer),
      binary_op: self.binary_op,
      latest_a: None,
      latest_b: None,
      completed_one: false,
    });
    let a_unsub = self.a.actual_subscribe(CombineAObserver {
      state: state.clone(),
      subscription: subscription.clone(),
    });
    subscription.add(a_unsub);
    let b_unsub = self.b.actual_subscribe(CombineBObserver {
      state,
      subscription: subscription.clone(),
    });
    subscription.add(b_unsub);
    subscription
  }
}

impl<Out, Err, A, B, F, ItemA, ItemB> ObservableExt<Out, Err>
  for CombineLatestOp<A, B, F, ItemA, ItemB>
{
}

macro_rules! impl_combine_side_observer {
  ($name:ident, $item:ident, $own_latest:ident) => {
    pub struct $name<O, ItemA, ItemB, F> {
      state: MutArc<CombineState<O, ItemA, ItemB, F>>,
      subscription: CompositeDisposable,
    }

    impl<ItemA, ItemB, Out, Err, O, F> Observer<$item, Err>
      for $name<O, ItemA, ItemB, F>
    where
      O: Observer<Out, Err>,
      F: FnMut(ItemA, ItemB) -> Out,
      ItemA: Clone,
      ItemB: Clone,
    {
      fn next(&mut self, value: $item) {
        let mut state = self.state.rc_deref_mut();
        if state.observer.is_none() {
          return;
        }
        state.$own_latest = Some(value);
        if let (Some(a), Some(b)) =
          (state.latest_a.clone(), state.latest_b.clone())
        {
          let out = (state.binary_op)(a, b);
          if let Some(observer) = state.observer.as_mut() {
            observer.next(out);
          }
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
        let observer = {
          let mut state = self.state.rc_deref_mut();
          if state.completed_one {
            state.observer.take()
          } else {
            state.completed_one = true;
            None
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
  };
}

impl_combine_side_observer!(CombineAObserver, ItemA, latest_a);
impl_combine_side_observer!(CombineBObserver, ItemB, latest_b);

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_probe::probe};

  #[test]
  fn waits_for_both_then_combines_every_event() {
    let (a, a_src) = probe::<i32, ()>();
    let (b, b_src) = probe::<i32, ()>();
    let values = MutArc::own(Vec::new());

    let v = values.clone();
    let _handle = a_src
      .combine_latest(b_src, |a, b| (a, b))
      .subscribe_err(move |pair| v.rc_deref_mut().push(pair), |_| {});

    a.next(1);
    a.next(2);
    assert!(values.rc_deref().is_empty());
    b.next(10);
    a.next(3);
    b.next(11);

    assert_eq!(*values.rc_deref(), vec![(2, 10), (3, 10), (3, 11)]);
  }

  #[test]
  fn completes_after_both_sides() {
    let (a, a_src) = probe::<i32, ()>();
    let (b, b_src) = probe::<i32, ()>();
    let completed = MutArc::own(false);

    let c = completed.clone();
    let _handle = a_src.combine_latest(b_src, |a, b| a + b).subscribe_all(
      |_| {},
      |_| {},
      move || *c.rc_deref_mut() = true,
    );

    a.complete();
    assert!(!*completed.rc_deref());
    b.complete();
    assert!(*completed.rc_deref());
  }
}
