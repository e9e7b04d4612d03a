pub use crate::observable;
pub use crate::{
  disposable::{
    ActionDisposable, BinaryDisposable, BooleanDisposable, BoxDisposable,
    CompositeDisposable, Disposable, NopDisposable, SerialDisposable,
  },
  observable::{Observable, ObservableExt},
  observer::{
    BoxObserver, DynObserver, Observer, ObserverAll, ObserverComp,
    ObserverErr, ObserverNext,
  },
  ops::throttle::ThrottleEdge,
  rc::MutArc,
  scheduler::{
    shared_pool, Duration, ImmediateScheduler, Instant, Scheduler, TaskHandle,
  },
  subscriber::{Subscriber, SubscriptionHandle},
};
