//! Single-assignment deferred values with synchronous callbacks.
//!
//! A [`Deferred`] commits exactly once to success ([`Deferred::resolve`]) or
//! failure ([`Deferred::reject`]) and fires the matching callbacks on the
//! caller's stack. A [`Promise`] is a read-only view of one. [`when`]
//! combines many inputs into one promise that succeeds when all of them do
//! and fails as soon as any of them fails.
//!
//! ```
//! use deferred::{args, Deferred};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(None));
//! let out = seen.clone();
//! let d: Deferred = Deferred::new();
//! d.done(move |a| *out.lock().unwrap() = Some(a.clone()));
//! d.resolve(args![1; foo = 2]).reject(args![3]);
//! assert_eq!(*seen.lock().unwrap(), Some(args![1; foo = 2]));
//! assert!(d.is_resolved() && !d.is_rejected());
//! ```
pub mod arguments;
pub mod callback_list;
pub mod deferred;
pub mod promise;
pub mod settled;
pub mod when;

use std::fmt;
use thiserror::Error;

pub use arguments::{Arguments, Value};
pub use callback_list::CallbackList;
pub use deferred::Deferred;
pub use promise::Promise;
pub use settled::{Settled, Settlement};
pub use when::{when, Input};

/// A callback registered on a [`CallbackList`]. It fires at most once.
pub type Callback<A> = Box<dyn FnOnce(&A) + Send + 'static>;

/// The state-mutating operations a [`Promise`] refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Resolve,
    Reject,
    Cancel,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Resolve => "resolve",
            Operation::Reject => "reject",
            Operation::Cancel => "cancel",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("cannot {operation} through a read-only promise")]
    ReadOnly { operation: Operation },
    #[error("the deferred was cancelled or dropped before it settled")]
    Abandoned,
}

/// The interface shared by [`Deferred`] and its read-only [`Promise`] view.
///
/// Observation goes straight through to the underlying deferred. The
/// `try_*` mutators succeed on a `Deferred` and fail with
/// [`Error::ReadOnly`] on a `Promise`, leaving its state untouched.
pub trait Deferrable<A> {
    /// Registers one callback per outcome.
    fn then_boxed(&self, on_success: Callback<A>, on_failure: Callback<A>);
    fn done_boxed(&self, callback: Callback<A>);
    fn fail_boxed(&self, callback: Callback<A>);

    fn is_resolved(&self) -> bool;
    fn is_rejected(&self) -> bool;
    fn is_cancelled(&self) -> bool;

    fn as_promise(&self) -> Promise<A>;

    fn try_resolve(&self, args: A) -> Result<(), Error>;
    fn try_reject(&self, args: A) -> Result<(), Error>;
    fn try_cancel(&self) -> Result<(), Error>;
}
