//! Cancellation primitives. Every disposable is idempotent: the first
//! `dispose` wins, later calls are no-ops, and all of them are safe to race
//! from multiple threads.

use std::{
  mem,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  },
};

use smallvec::SmallVec;

pub trait Disposable {
  /// Releases the resource. Idempotent.
  fn dispose(&mut self);

  fn is_disposed(&self) -> bool;
}

pub type BoxDisposable = Box<dyn Disposable + Send>;

impl<T: Disposable + ?Sized> Disposable for Box<T> {
  #[inline]
  fn dispose(&mut self) { (**self).dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { (**self).is_disposed() }
}

/// A disposable that owns nothing. Reports disposed from the start.
#[derive(Clone, Copy, Default)]
pub struct NopDisposable;

impl Disposable for NopDisposable {
  #[inline]
  fn dispose(&mut self) {}

  #[inline]
  fn is_disposed(&self) -> bool { true }
}

/// A shared boolean flag. Clones observe the same state, so one clone can
/// serve as a gate while another is handed out as the cancel handle.
#[derive(Default)]
pub struct BooleanDisposable(Arc<AtomicBool>);

impl BooleanDisposable {
  pub fn new() -> Self { Self::default() }
}

impl Clone for BooleanDisposable {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl Disposable for BooleanDisposable {
  #[inline]
  fn dispose(&mut self) { self.0.store(true, Ordering::SeqCst) }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

struct ActionInner {
  disposed: AtomicBool,
  action: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

/// Runs a teardown action on first dispose. Clones share the action; exactly
/// one disposal runs it.
pub struct ActionDisposable(Arc<ActionInner>);

impl ActionDisposable {
  pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
    Self(Arc::new(ActionInner {
      disposed: AtomicBool::new(false),
      action: Mutex::new(Some(Box::new(action))),
    }))
  }
}

impl Clone for ActionDisposable {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl Disposable for ActionDisposable {
  fn dispose(&mut self) {
    if self.0.disposed.swap(true, Ordering::SeqCst) {
      return;
    }
    // Take the action out of the lock before running it.
    let action = self.0.action.lock().unwrap().take();
    if let Some(action) = action {
      action();
    }
  }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.disposed.load(Ordering::SeqCst) }
}

/// Owns two disposables and disposes them together, first then second.
/// Both are dropped afterwards so their resources are released eagerly.
pub struct BinaryDisposable<A, B> {
  pair: Option<(A, B)>,
}

impl<A, B> BinaryDisposable<A, B> {
  pub fn new(first: A, second: B) -> Self { Self { pair: Some((first, second)) } }
}

impl<A: Disposable, B: Disposable> Disposable for BinaryDisposable<A, B> {
  fn dispose(&mut self) {
    if let Some((mut first, mut second)) = self.pair.take() {
      first.dispose();
      second.dispose();
    }
  }

  #[inline]
  fn is_disposed(&self) -> bool { self.pair.is_none() }
}

struct CompositeInner {
  disposed: bool,
  children: SmallVec<[BoxDisposable; 2]>,
}

/// A growable bag of disposables torn down as one. Adding to a disposed
/// composite disposes the newcomer on the spot.
pub struct CompositeDisposable(Arc<Mutex<CompositeInner>>);

impl CompositeDisposable {
  pub fn new() -> Self {
    Self(Arc::new(Mutex::new(CompositeInner {
      disposed: false,
      children: SmallVec::new(),
    })))
  }

  pub fn add(&self, mut disposable: impl Disposable + Send + 'static) {
    {
      let mut inner = self.0.lock().unwrap();
      if !inner.disposed {
        inner.children.retain(|child| !child.is_disposed());
        inner.children.push(Box::new(disposable));
        return;
      }
    }
    disposable.dispose();
  }

  pub fn len(&self) -> usize { self.0.lock().unwrap().children.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Default for CompositeDisposable {
  fn default() -> Self { Self::new() }
}

impl Clone for CompositeDisposable {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl Disposable for CompositeDisposable {
  fn dispose(&mut self) {
    // Children leave the lock before their dispose runs; a child may
    // re-enter this composite.
    let children = {
      let mut inner = self.0.lock().unwrap();
      if inner.disposed {
        return;
      }
      inner.disposed = true;
      mem::take(&mut inner.children)
    };
    for mut child in children {
      child.dispose();
    }
  }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.lock().unwrap().disposed }
}

struct SerialInner {
  disposed: bool,
  current: Option<BoxDisposable>,
}

/// Holds at most one disposable at a time. Replacing the occupant disposes
/// the evicted one.
pub struct SerialDisposable(Arc<Mutex<SerialInner>>);

impl SerialDisposable {
  pub fn new() -> Self {
    Self(Arc::new(Mutex::new(SerialInner { disposed: false, current: None })))
  }

  pub fn set(&self, disposable: impl Disposable + Send + 'static) {
    let incoming: BoxDisposable = Box::new(disposable);
    // On a disposed serial the incoming one is the eviction.
    let evicted = {
      let mut inner = self.0.lock().unwrap();
      if inner.disposed {
        Some(incoming)
      } else {
        inner.current.replace(incoming)
      }
    };
    if let Some(mut evicted) = evicted {
      evicted.dispose();
    }
  }

  pub fn clear(&self) {
    let evicted = self.0.lock().unwrap().current.take();
    if let Some(mut evicted) = evicted {
      evicted.dispose();
    }
  }
}

impl Default for SerialDisposable {
  fn default() -> Self { Self::new() }
}

impl Clone for SerialDisposable {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl Disposable for SerialDisposable {
  fn dispose(&mut self) {
    let current = {
      let mut inner = self.0.lock().unwrap();
      if inner.disposed {
        return;
      }
      inner.disposed = true;
      inner.current.take()
    };
    if let Some(mut current) = current {
      current.dispose();
    }
  }

  fn is_disposed(&self) -> bool { self.0.lock().unwrap().disposed }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::atomic::AtomicUsize,
    thread,
  };

  use super::*;

  #[test]
  fn action_runs_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let mut d = ActionDisposable::new(move || {
      c.fetch_add(1, Ordering::SeqCst);
    });
    assert!(!d.is_disposed());
    d.dispose();
    d.dispose();
    assert!(d.is_disposed());
    assert_eq!(count.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn action_races_to_one_run() {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let d = ActionDisposable::new(move || {
      c.fetch_add(1, Ordering::SeqCst);
    });

    let handles: Vec<_> = (0..8)
      .map(|_| {
        let mut d = d.clone();
        thread::spawn(move || d.dispose())
      })
      .collect();
    for h in handles {
      h.join().unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn binary_disposes_both_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let (a, b) = (count.clone(), count.clone());
    let mut d = BinaryDisposable::new(
      ActionDisposable::new(move || {
        a.fetch_add(1, Ordering::SeqCst);
      }),
      ActionDisposable::new(move || {
        b.fetch_add(1, Ordering::SeqCst);
      }),
    );
    d.dispose();
    d.dispose();
    assert!(d.is_disposed());
    assert_eq!(count.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn composite_add_after_dispose() {
    let mut composite = CompositeDisposable::new();
    composite.dispose();

    let ran = Arc::new(AtomicBool::new(false));
    let r = ran.clone();
    composite.add(ActionDisposable::new(move || r.store(true, Ordering::SeqCst)));
    assert!(ran.load(Ordering::SeqCst));
    assert!(composite.is_empty());
  }

  #[test]
  fn composite_concurrent_dispose_runs_children_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let composite = CompositeDisposable::new();
    for _ in 0..16 {
      let c = count.clone();
      composite.add(ActionDisposable::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
      }));
    }

    let handles: Vec<_> = (0..8)
      .map(|_| {
        let mut composite = composite.clone();
        thread::spawn(move || composite.dispose())
      })
      .collect();
    for h in handles {
      h.join().unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 16);
  }

  #[test]
  fn serial_replacement_disposes_previous() {
    let serial = SerialDisposable::new();

    let first = Arc::new(AtomicBool::new(false));
    let f = first.clone();
    serial.set(ActionDisposable::new(move || f.store(true, Ordering::SeqCst)));
    assert!(!first.load(Ordering::SeqCst));

    let second = Arc::new(AtomicBool::new(false));
    let s = second.clone();
    serial.set(ActionDisposable::new(move || s.store(true, Ordering::SeqCst)));
    assert!(first.load(Ordering::SeqCst));
    assert!(!second.load(Ordering::SeqCst));

    serial.clear();
    assert!(second.load(Ordering::SeqCst));
  }

  #[test]
  fn serial_set_after_dispose_disposes_incoming() {
    let mut serial = SerialDisposable::new();
    serial.dispose();

    let ran = Arc::new(AtomicBool::new(false));
    let r = ran.clone();
    serial.set(ActionDisposable::new(move || r.store(true, Ordering::SeqCst)));
    assert!(ran.load(Ordering::SeqCst));
  }

  #[test]
  fn boolean_clones_share_state() {
    let gate = BooleanDisposable::new();
    let mut other = gate.clone();
    other.dispose();
    assert!(gate.is_disposed());
  }
}
