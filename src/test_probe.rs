//! A push-driven source for operator tests. Single-observer by design: the
//! producer slot holds the one observer of the current subscription, so the
//! sequence stays cold and unicast.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use crate::{
  disposable::ActionDisposable,
  observable::{Observable, ObservableExt},
  observer::{BoxObserver, Observer},
  rc::MutArc,
};

type Slot<Item, Err> = MutArc<Option<BoxObserver<Item, Err>>>;

pub(crate) fn probe<Item, Err>() -> (ProbeHandle<Item, Err>, ProbeSource<Item, Err>)
where
  Item: 'static,
  Err: 'static,
{
  let slot: Slot<Item, Err> = MutArc::own(None);
  let closed = Arc::new(AtomicBool::new(false));
  (
    ProbeHandle { slot: slot.clone(), closed: closed.clone() },
    ProbeSource { slot, closed },
  )
}

pub(crate) struct ProbeSource<Item, Err> {
  slot: Slot<Item, Err>,
  closed: Arc<AtomicBool>,
}

// Clones share the one producer slot; at most one of them may be
// subscribed at a time.
impl<Item, Err> Clone for ProbeSource<Item, Err> {
  fn clone(&self) -> Self {
    Self { slot: self.slot.clone(), closed: self.closed.clone() }
  }
}

impl<Item, Err, O> Observable<Item, Err, O> for ProbeSource<Item, Err>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: 'static,
  Err: 'static,
{
  type Unsub = ActionDisposable;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    *self.slot.rc_deref_mut() = Some(Box::new(observer));
    let closed = self.closed;
    ActionDisposable::new(move || closed.store(true, Ordering::SeqCst))
  }
}

impl<Item, Err> ObservableExt<Item, Err> for ProbeSource<Item, Err> {}

pub(crate) struct ProbeHandle<Item, Err> {
  slot: Slot<Item, Err>,
  closed: Arc<AtomicBool>,
}

impl<Item, Err> ProbeHandle<Item, Err> {
  // The observer leaves the slot while the event runs, so an event that
  // disposes its own subscription cannot re-enter the slot's lock.
  pub(crate) fn next(&self, value: Item) {
    if self.closed.load(Ordering::SeqCst) {
      self.slot.rc_deref_mut().take();
      return;
    }
    let observer = self.slot.rc_deref_mut().take();
    if let Some(mut observer) = observer {
      observer.next(value);
      if !self.closed.load(Ordering::SeqCst) {
        *self.slot.rc_deref_mut() = Some(observer);
      }
    }
  }

  pub(crate) fn error(&self, err: Err) {
    let observer = self.slot.rc_deref_mut().take();
    if let Some(observer) = observer {
      if !self.closed.load(Ordering::SeqCst) {
        observer.error(err);
      }
    }
  }

  pub(crate) fn complete(&self) {
    let observer = self.slot.rc_deref_mut().take();
    if let Some(observer) = observer {
      if !self.closed.load(Ordering::SeqCst) {
        observer.complete();
      }
    }
  }

  /// Whether a subscriber is currently attached.
  pub(crate) fn is_active(&self) -> bool {
    !self.closed.load(Ordering::SeqCst) && self.slot.rc_deref().is_some()
  }
}
