use std::convert::Infallible;

/// Receiver of the events of an observable sequence.
///
/// The grammar is `next* (error | complete)?`. Terminal events consume the
/// observer, so delivering anything after a terminal does not typecheck.
pub trait Observer<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(self, err: Err);
  fn complete(self);
  fn is_closed(&self) -> bool;
}

impl<Item, Err, O> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.as_ref().map_or(true, |o| o.is_closed())
  }
}

/// Observer that only cares about values; the error channel is pinned to
/// [`Infallible`] so it can only subscribe to infallible sequences.
pub struct ObserverNext<N>(N);

impl<N> ObserverNext<N> {
  #[inline]
  pub fn new(next: N) -> Self {
    Self(next)
  }
}

impl<Item, N> Observer<Item, Infallible> for ObserverNext<N>
where
  N: FnMut(Item),
{
  #[inline]
  fn next(&mut self, value: Item) {
    (self.0)(value)
  }

  fn error(self, _err: Infallible) {}

  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool {
    false
  }
}

pub struct ObserverErr<N, E> {
  next: N,
  error: E,
}

impl<N, E> ObserverErr<N, E> {
  #[inline]
  pub fn new(next: N, error: E) -> Self {
    Self { next, error }
  }
}

impl<Item, Err, N, E> Observer<Item, Err> for ObserverErr<N, E>
where
  N: FnMut(Item),
  E: FnOnce(Err),
{
  #[inline]
  fn next(&mut self, value: Item) {
    (self.next)(value)
  }

  #[inline]
  fn error(self, err: Err) {
    (self.error)(err)
  }

  fn complete(self) {}

  #[inline]
  fn is_closed(&self) -> bool {
    false
  }
}

pub struct ObserverComp<N, C> {
  next: N,
  complete: C,
}

impl<N, C> ObserverComp<N, C> {
  #[inline]
  pub fn new(next: N, complete: C) -> Self {
    Self { next, complete }
  }
}

impl<Item, N, C> Observer<Item, Infallible> for ObserverComp<N, C>
where
  N: FnMut(Item),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) {
    (self.next)(value)
  }

  fn error(self, _err: Infallible) {}

  #[inline]
  fn complete(self) {
    (self.complete)()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    false
  }
}

pub struct ObserverAll<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> ObserverAll<N, E, C> {
  #[inline]
  pub fn new(next: N, error: E, complete: C) -> Self {
    Self { next, error, complete }
  }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) {
    (self.next)(value)
  }

  #[inline]
  fn error(self, err: Err) {
    (self.error)(err)
  }

  #[inline]
  fn complete(self) {
    (self.complete)()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    false
  }
}

/// Object-safe mirror of [`Observer`]; terminals take `Box<Self>` so the
/// consuming contract survives type erasure.
pub trait DynObserver<Item, Err> {
  fn dyn_next(&mut self, value: Item);
  fn dyn_error(self: Box<Self>, err: Err);
  fn dyn_complete(self: Box<Self>);
  fn dyn_is_closed(&self) -> bool;
}

impl<Item, Err, T> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  #[inline]
  fn dyn_next(&mut self, value: Item) {
    self.next(value)
  }

  #[inline]
  fn dyn_error(self: Box<Self>, err: Err) {
    (*self).error(err)
  }

  #[inline]
  fn dyn_complete(self: Box<Self>) {
    (*self).complete()
  }

  #[inline]
  fn dyn_is_closed(&self) -> bool {
    self.is_closed()
  }
}

pub type BoxObserver<Item, Err> = Box<dyn DynObserver<Item, Err> + Send>;

impl<Item, Err> Observer<Item, Err> for BoxObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) {
    (**self).dyn_next(value)
  }

  #[inline]
  fn error(self, err: Err) {
    self.dyn_error(err)
  }

  #[inline]
  fn complete(self) {
    self.dyn_complete()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    (**self).dyn_is_closed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn none_is_closed() {
    let mut observer: Option<ObserverNext<fn(i32)>> = None;
    assert!(Observer::<i32, Infallible>::is_closed(&observer));
    observer.next(1);
    Observer::<i32, Infallible>::complete(observer);
  }

  #[test]
  fn boxed_observer_forwards() {
    use std::sync::{
      atomic::{AtomicBool, AtomicI32, Ordering},
      Arc,
    };

    let seen = Arc::new(AtomicI32::new(0));
    let completed = Arc::new(AtomicBool::new(false));
    {
      let seen = seen.clone();
      let completed = completed.clone();
      let mut boxed: BoxObserver<i32, Infallible> =
        Box::new(ObserverComp::new(
          move |v| seen.store(v, Ordering::SeqCst),
          move || completed.store(true, Ordering::SeqCst),
        ));
      boxed.next(42);
      boxed.complete();
    }
    assert_eq!(seen.load(Ordering::SeqCst), 42);
    assert!(completed.load(Ordering::SeqCst));
  }
}
