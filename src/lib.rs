//! Composable observable sequences for Rust.
//!
//! The crate is built from three pieces: [`disposable`] models cancellable
//! resources, [`observable`] defines cold sequences and the operator
//! surface, and [`scheduler`] injects time so that delay-based operators
//! stay testable with a virtual clock.
//!
//! ```
//! use rxcore::prelude::*;
//!
//! let mut sums = vec![];
//! observable::from_iter(1..=4)
//!   .filter(|v| v % 2 == 0)
//!   .scan(0, |acc, v| acc + v)
//!   .subscribe(|v| sums.push(v));
//! assert_eq!(sums, vec![2, 6]);
//! ```

pub mod disposable;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subscriber;
#[cfg(test)]
pub(crate) mod test_probe;
