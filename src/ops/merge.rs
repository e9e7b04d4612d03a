use crate::{prelude::*, rc::MutArc};

#[derive(Clone)]
pub struct MergeOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

struct MergeState<O> {
  observer: Option<O>,
  completed_one: bool,
}

impl<Item, Err, O, A, B> Observable<Item, Err, O> for MergeOp<A, B>
where
  O: Observer<Item, Err>,
  A: Observable<Item, Err, MergeObserver<O>>,
  B: Observable<Item, Err, MergeObserver<O>>,
  A::Unsub: Send + 'static,
  B::Unsub: Send + 'static,
{
  type Unsub = CompositeDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscription = CompositeDisposable::new();
    let state = MutArc::own(MergeState {
      observer: Some(observer),
      completed_one: false,
    });

    let a_unsub = self.a.actual_subscribe(MergeObserver {
      state: state.clone(),
      subscription: subscription.clone(),
    });
    subscription.add(a_unsub);
    let b_unsub = self
      .b
      .actual_subscribe(MergeObserver { state, subscription: subscription.clone() });
    subscription.add(b_unsub);
    subscription
  }
}

impl<Item, Err, A, B> ObservableExt<Item, Err> for MergeOp<A, B>
where
  A: ObservableExt<Item, Err>,
  B: ObservableExt<Item, Err>,
{
}

pub struct MergeObserver<O> {
  state: MutArc<MergeState<O>>,
  subscription: CompositeDisposable,
}

impl<Item, Err, O> Observer<Item, Err> for MergeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    // The state lock is the serialization point of the merged output.
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

#[cfg(test)]
mod tests {
  use crate::{prelude::*, test_probe::probe};

  #[test]
  fn interleaves_two_sources() {
    let (a, a_src) = probe::<i32, ()>();
    let (b, b_src) = probe::<i32, ()>();
    let values = MutArc::own(Vec::new());
    let completed = MutArc::own(false);

    let v = values.clone();
    let c = completed.clone();
    let _handle = a_src.merge(b_src).subscribe_all(
      move |value| v.rc_deref_mut().push(value),
      |_| {},
      move || *c.rc_deref_mut() = true,
    );

    a.next(1);
    b.next(10);
    a.next(2);
    a.complete();
    assert!(!*completed.rc_deref());
    b.next(11);
    b.complete();

    assert_eq!(*values.rc_deref(), vec![1, 10, 2, 11]);
    assert!(*completed.rc_deref());
  }

  #[test]
  fn error_tears_down_the_sibling() {
    let (a, a_src) = probe::<i32, &str>();
    let (b, b_src) = probe::<i32, &str>();
    let errors = MutArc::own(Vec::new());

    let e = errors.clone();
    let _handle = a_src
      .merge(b_src)
      .subscribe_err(|_| {}, move |err| e.rc_deref_mut().push(err));

    a.error("boom");
    assert_eq!(*errors.rc_deref(), vec!["boom"]);
    // The sibling's producer slot was released by the cascade.
    assert!(!b.is_active());
    b.next(1);
  }

  #[test]
  fn synchronous_sources_merge_in_subscription_order() {
    let mut values = vec![];
    observable::from_iter([1, 2])
      .merge(observable::from_iter([3, 4]))
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![1, 2, 3, 4]);
  }
}
