use crate::{
  disposable::Disposable,
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Builds an observable from an explicit producer. The producer receives
/// the observer, pushes events into it and returns its teardown.
///
/// ```
/// use rxcore::prelude::*;
///
/// let mut sum = 0;
/// observable::create(|mut observer| {
///   observer.next(1);
///   observer.next(2);
///   observer.complete();
///   NopDisposable
/// })
/// .subscribe(|v: i32| sum += v);
/// assert_eq!(sum, 3);
/// ```
#[inline]
pub fn create<F>(subscribe: F) -> Create<F> {
  Create(subscribe)
}

#[derive(Clone)]
pub struct Create<F>(F);

impl<Item, Err, O, F, U> Observable<Item, Err, O> for Create<F>
where
  O: Observer<Item, Err>,
  F: FnOnce(O) -> U,
  U: Disposable,
{
  type Unsub = U;

  #[inline]
  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    (self.0)(observer)
  }
}

impl<Item, Err, F> ObservableExt<Item, Err> for Create<F> {}
