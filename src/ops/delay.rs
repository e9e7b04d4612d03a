use crate::{prelude::*, rc::MutArc};

#[derive(Clone)]
pub struct DelayOp<S, SD> {
  pub(crate) source: S,
  pub(crate) delay: Duration,
  pub(crate) scheduler: SD,
}

impl<Item, Err, O, S, SD> Observable<Item, Err, O> for DelayOp<S, SD>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  S: Observable<Item, Err, DelayObserver<O, SD>>,
  SD: Scheduler,
{
  type Unsub = BinaryDisposable<S::Unsub, CompositeDisposable>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let tasks = CompositeDisposable::new();
    let source_unsub = self.source.actual_subscribe(DelayObserver {
      observer: MutArc::own(Some(observer)),
      delay: self.delay,
      scheduler: self.scheduler,
      tasks: tasks.clone(),
    });
    BinaryDisposable::new(source_unsub, tasks)
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err> for DelayOp<S, SD> where
  S: ObservableExt<Item, Err>
{
}

pub struct DelayObserver<O, SD> {
  observer: MutArc<Option<O>>,
  delay: Duration,
  scheduler: SD,
  tasks: CompositeDisposable,
}

impl<Item, Err, O, SD> Observer<Item, Err> for DelayObserver<O, SD>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
  SD: Scheduler,
{
  fn next(&mut self, value: Item) {
    let observer = self.observer.clone();
    let handle = self.scheduler.schedule(
      Some(self.delay),
      Box::new(move || {
        let mut observer = observer;
        observer.next(value);
      }),
    );
    self.tasks.add(handle);
  }

  // Errors are not delayed.
  fn error(self, err: Err) {
    self.observer.error(err);
    let mut tasks = self.tasks;
    tasks.dispose();
  }

  fn complete(self) {
    let observer = self.observer.clone();
    let handle = self
      .scheduler
      .schedule(Some(self.delay), Box::new(move || observer.complete()));
    self.tasks.add(handle);
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.observer.is_closed()
  }
}
