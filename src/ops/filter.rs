use crate::prelude::*;

#[derive(Clone)]
pub struct FilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) pred: F,
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for FilterOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, FilterObserver<O, F>>,
  F: FnMut(&Item) -> bool,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(FilterObserver { observer, pred: self.pred })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for FilterOp<S, F> where
  S: ObservableExt<Item, Err>
{
}

#[derive(Clone)]
pub struct FilterObserver<O, F> {
  observer: O,
  pred: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.pred)(&value) {
      self.observer.next(value)
    }
  }

  #[inline]
  fn error(self, err: Err) {
    self.observer.error(err)
  }

  #[inline]
  fn complete(self) {
    self.observer.complete()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.observer.is_closed()
  }
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;

  use crate::prelude::*;

  #[test]
  fn keeps_accepted_values() {
    let mut evens = vec![];
    ObservableExt::<i32, Infallible>::filter(
      observable::from_iter(0..10),
      |v| v % 2 == 0,
    )
    .subscribe(|v| evens.push(v));
    assert_eq!(evens, vec![0, 2, 4, 6, 8]);
  }
}
