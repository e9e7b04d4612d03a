use crate::{
  disposable::BooleanDisposable,
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Emits a single value, then completes.
#[inline]
pub fn of<Item>(value: Item) -> Of<Item> {
  Of(value)
}

#[derive(Clone)]
pub struct Of<Item>(Item);

impl<Item, Err, O> Observable<Item, Err, O> for Of<Item>
where
  O: Observer<Item, Err>,
{
  type Unsub = BooleanDisposable;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    observer.next(self.0);
    observer.complete();
    BooleanDisposable::new()
  }
}

impl<Item, Err> ObservableExt<Item, Err> for Of<Item> {}
