use crate::{
  disposable::BooleanDisposable,
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Emits every item of `iter`, then completes. The observer's gate is
/// checked between items, so disposing mid-iteration stops the remainder
/// even though the emission is synchronous.
#[inline]
pub fn from_iter<I>(iter: I) -> FromIter<I>
where
  I: IntoIterator,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<I>(I);

impl<I, Item, Err, O> Observable<Item, Err, O> for FromIter<I>
where
  I: IntoIterator<Item = Item>,
  O: Observer<Item, Err>,
{
  type Unsub = BooleanDisposable;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for value in self.0 {
      if observer.is_closed() {
        return BooleanDisposable::new();
      }
      observer.next(value);
    }
    observer.complete();
    BooleanDisposable::new()
  }
}

impl<I, Err> ObservableExt<<I as IntoIterator>::Item, Err> for FromIter<I> where
  I: IntoIterator
{
}
