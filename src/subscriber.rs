use crate::{
  disposable::{BooleanDisposable, Disposable},
  observer::Observer,
};

/// Wraps the downstream observer behind a shared gate. Once the gate closes,
/// whether by a terminal event or by disposing the matching
/// [`SubscriptionHandle`], nothing further is delivered.
pub struct Subscriber<O> {
  observer: O,
  gate: BooleanDisposable,
}

impl<O> Subscriber<O> {
  #[inline]
  pub(crate) fn new(observer: O, gate: BooleanDisposable) -> Self {
    Self { observer, gate }
  }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if !self.gate.is_disposed() {
      self.observer.next(value);
    }
  }

  fn error(mut self, err: Err) {
    if !self.gate.is_disposed() {
      self.gate.dispose();
      self.observer.error(err);
    }
  }

  fn complete(mut self) {
    if !self.gate.is_disposed() {
      self.gate.dispose();
      self.observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool {
    self.gate.is_disposed()
  }
}

/// Handle returned by the `subscribe` family. Disposing closes the gate
/// first, so no event is delivered after `dispose` returns, then cascades
/// into the upstream chain.
pub struct SubscriptionHandle<U> {
  gate: BooleanDisposable,
  upstream: U,
}

impl<U> SubscriptionHandle<U> {
  #[inline]
  pub(crate) fn new(gate: BooleanDisposable, upstream: U) -> Self {
    Self { gate, upstream }
  }
}

impl<U: Disposable> Disposable for SubscriptionHandle<U> {
  fn dispose(&mut self) {
    self.gate.dispose();
    self.upstream.dispose();
  }

  #[inline]
  fn is_disposed(&self) -> bool {
    self.gate.is_disposed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::observer::ObserverAll;

  #[test]
  fn gate_blocks_after_terminal() {
    let mut values = vec![];
    let mut errored = false;
    {
      let gate = BooleanDisposable::new();
      let mut subscriber = Subscriber::new(
        ObserverAll::new(
          |v| values.push(v),
          |_: &str| errored = true,
          || {},
        ),
        gate.clone(),
      );
      subscriber.next(1);
      assert!(!subscriber.is_closed());
      subscriber.complete();
      assert!(gate.is_disposed());
    }
    assert_eq!(values, vec![1]);
    assert!(!errored);
  }

  #[test]
  fn disposed_gate_blocks_next() {
    let mut values: Vec<i32> = vec![];
    {
      let gate = BooleanDisposable::new();
      let mut subscriber = Subscriber::new(
        crate::observer::ObserverNext::new(|v| values.push(v)),
        gate.clone(),
      );
      let mut handle = SubscriptionHandle::new(gate, BooleanDisposable::new());
      subscriber.next(1);
      handle.dispose();
      subscriber.next(2);
      assert!(handle.is_disposed());
    }
    assert_eq!(values, vec![1]);
  }
}
