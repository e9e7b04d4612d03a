use crate::prelude::*;

#[derive(Clone)]
pub struct StartWithOp<S, Item> {
  pub(crate) source: S,
  pub(crate) values: Vec<Item>,
}

impl<Item, Err, O, S> Observable<Item, Err, O> for StartWithOp<S, Item>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, O>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    for value in self.values {
      if observer.is_closed() {
        break;
      }
      observer.next(value);
    }
    self.source.actual_subscribe(observer)
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for StartWithOp<S, Item> where
  S: ObservableExt<Item, Err>
{
}
