use crate::{prelude::*, rc::MutArc};

#[derive(Clone)]
pub struct DebounceOp<S, SD> {
  pub(crate) source: S,
  pub(crate) duration: Duration,
  pub(crate) scheduler: SD,
}

impl<Item, Err, O, S, SD> Observable<Item, Err, O> for DebounceOp<S, SD>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  S: Observable<Item, Err, DebounceObserver<O, SD, Item>>,
  SD: Scheduler,
{
  type Unsub = BinaryDisposable<S::Unsub, SerialDisposable>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let pending = SerialDisposable::new();
    let source_unsub = self.source.actual_subscribe(DebounceObserver {
      observer: MutArc::own(Some(observer)),
      duration: self.duration,
      scheduler: self.scheduler,
      trailing: MutArc::own(None),
      pending: pending.clone(),
    });
    BinaryDisposable::new(source_unsub, pending)
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err> for DebounceOp<S, SD> where
  S: ObservableExt<Item, Err>
{
}

pub struct DebounceObserver<O, SD, Item> {
  observer: MutArc<Option<O>>,
  scheduler: SD,
  duration: Duration,
  trailing: MutArc<Option<Item>>,
  pending: SerialDisposable,
}

impl<Item, Err, O, SD> Observer<Item, Err> for DebounceObserver<O, SD, Item>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  SD: Scheduler,
{
  fn next(&mut self, value: Item) {
    *self.trailing.rc_deref_mut() = Some(value);
    let observer = self.observer.clone();
    let trailing = self.trailing.clone();
    let handle = self.scheduler.schedule(
      Some(self.duration),
      Box::new(move || {
        let value = trailing.rc_deref_mut().take();
        if let Some(value) = value {
          let mut observer = observer;
          observer.next(value);
        }
      }),
    );
    // Replacing cancels the previous quiet-window timer.
    self.pending.set(handle);
  }

  fn error(self, err: Err) {
    self.trailing.rc_deref_mut().take();
    self.observer.error(err);
    let mut pending = self.pending;
    pending.dispose();
  }

  fn complete(self) {
    // Completion flushes the trailing value synchronously.
    let trailing = self.trailing.rc_deref_mut().take();
    let mut observer = self.observer;
    if let Some(value) = trailing {
      observer.next(value);
    }
    observer.complete();
    let mut pending = self.pending;
    pending.dispose();
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.observer.is_closed()
  }
}
