use std::sync::{Arc, Mutex, MutexGuard};

use crate::observer::Observer;

/// Shared mutable cell used by operators that fan state out to several
/// observers. A poisoned lock means an observer callback panicked; the
/// panic is propagated.
pub struct MutArc<T>(Arc<Mutex<T>>);

impl<T> MutArc<T> {
  #[inline]
  pub fn own(value: T) -> Self {
    Self(Arc::new(Mutex::new(value)))
  }

  #[inline]
  pub fn rc_deref(&self) -> MutexGuard<'_, T> {
    self.0.lock().unwrap()
  }

  #[inline]
  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> {
    self.0.lock().unwrap()
  }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<T: Default> Default for MutArc<T> {
  #[inline]
  fn default() -> Self {
    Self::own(T::default())
  }
}

// A `MutArc<Option<O>>` is itself an observer: events forward to the held
// observer, terminals take it out of the slot so later events are ignored.
impl<Item, Err, O> Observer<Item, Err> for MutArc<Option<O>>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let mut slot = self.rc_deref_mut();
    if let Some(observer) = slot.as_mut() {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    let observer = self.rc_deref_mut().take();
    if let Some(observer) = observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    let observer = self.rc_deref_mut().take();
    if let Some(observer) = observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.rc_deref().as_ref().map_or(true, |o| o.is_closed())
  }
}
