//! A deferred pairs a success and a failure [`CallbackList`] so that exactly
//! one of them can ever fire.
//!
use crate::{Arguments, Callback, CallbackList, Deferrable, Error, Promise, Settled};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Single-assignment value with success and failure callbacks.
///
/// Resolving fires the `done` callbacks and closes the failure side;
/// rejecting fires the `fail` callbacks and closes the success side.
/// Cloning gives another handle to the same deferred.
///
/// # Examples
///
/// ```
/// use deferred::{args, Deferred};
/// let d = Deferred::resolved_with(args![42]);
/// assert!(d.is_resolved());
/// d.done(|a| assert_eq!(a, &args![42]));
/// ```
pub struct Deferred<A = Arguments> {
    on_success: CallbackList<A>,
    on_failure: CallbackList<A>,
    committed: Arc<Mutex<Option<Side>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Success,
    Failure,
}

impl<A> Clone for Deferred<A> {
    fn clone(&self) -> Self {
        Self {
            on_success: self.on_success.clone(),
            on_failure: self.on_failure.clone(),
            committed: self.committed.clone(),
        }
    }
}

impl<A> fmt::Debug for Deferred<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("on_success", &self.on_success)
            .field("on_failure", &self.on_failure)
            .finish()
    }
}

impl<A> Default for Deferred<A>
where
    A: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Deferred<A>
where
    A: Send + Sync + 'static,
{
    /// A pending deferred.
    pub fn new() -> Self {
        Self {
            on_success: CallbackList::new(),
            on_failure: CallbackList::new(),
            committed: Arc::new(Mutex::new(None)),
        }
    }

    /// A deferred already resolved with `payload`.
    pub fn resolved_with(payload: A) -> Self {
        tracing::debug!("deferred created resolved");
        let deferred = Self::new();
        deferred.resolve(payload);
        deferred
    }

    /// Creates a pending deferred and hands it to `init`, which may settle
    /// it now or keep a clone to settle it later.
    ///
    /// An error from `init` is returned as is and the deferred is dropped.
    ///
    /// ```
    /// use deferred::{args, Deferred};
    /// let d: Deferred = Deferred::try_with(|d| {
    ///     d.reject(args!["boom"]);
    ///     Ok::<_, std::io::Error>(())
    /// })
    /// .unwrap();
    /// assert!(d.is_rejected());
    /// ```
    pub fn try_with<F, E>(init: F) -> Result<Self, E>
    where
        F: FnOnce(&Self) -> Result<(), E>,
    {
        let deferred = Self::new();
        if let Err(err) = init(&deferred) {
            tracing::debug!("deferred initializer failed");
            return Err(err);
        }
        Ok(deferred)
    }

    fn lock_committed(&self) -> MutexGuard<'_, Option<Side>> {
        self.committed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Picks `side` as the outcome unless one was already picked or `side`
    /// was cancelled. The opposite list is closed before the guard is
    /// released, so its callbacks can never fire once this returns true.
    fn commit(&self, side: Side) -> bool {
        let mut committed = self.lock_committed();
        let (own, opposite) = match side {
            Side::Success => (&self.on_success, &self.on_failure),
            Side::Failure => (&self.on_failure, &self.on_success),
        };
        if committed.is_some() || own.is_cancelled() {
            return false;
        }
        *committed = Some(side);
        opposite.cancel();
        true
    }

    /// Registers one callback per outcome. Pass `|_| ()` for a side you do
    /// not care about.
    pub fn then<S, F>(&self, on_success: S, on_failure: F) -> &Self
    where
        S: FnOnce(&A) + Send + 'static,
        F: FnOnce(&A) + Send + 'static,
    {
        self.done(on_success).fail(on_failure)
    }

    pub fn done<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&A) + Send + 'static,
    {
        self.on_success.attach(callback);
        self
    }

    pub fn done_all<I>(&self, callbacks: I) -> &Self
    where
        I: IntoIterator<Item = Callback<A>>,
    {
        self.on_success.attach_all(callbacks);
        self
    }

    pub fn fail<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&A) + Send + 'static,
    {
        self.on_failure.attach(callback);
        self
    }

    pub fn fail_all<I>(&self, callbacks: I) -> &Self
    where
        I: IntoIterator<Item = Callback<A>>,
    {
        self.on_failure.attach_all(callbacks);
        self
    }

    /// Commits to success. Ignored once the deferred has settled or been
    /// cancelled.
    pub fn resolve(&self, args: A) -> &Self {
        if self.commit(Side::Success) {
            self.on_success.resolve(args);
        }
        self
    }

    /// Commits to failure. Ignored once the deferred has settled or been
    /// cancelled.
    pub fn reject(&self, args: A) -> &Self {
        if self.commit(Side::Failure) {
            self.on_failure.resolve(args);
        }
        self
    }

    /// Closes both sides. After settlement the outcome stays queryable, but
    /// callbacks attached from now on no longer fire.
    pub fn cancel(&self) -> &Self {
        let _committed = self.lock_committed();
        self.on_success.cancel();
        self.on_failure.cancel();
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.on_success.is_resolved()
    }

    pub fn is_rejected(&self) -> bool {
        self.on_failure.is_resolved()
    }

    /// True once both sides are closed, which only [`Deferred::cancel`]
    /// does. A deferred that settled and was then cancelled reports both
    /// this and its outcome.
    pub fn is_cancelled(&self) -> bool {
        self.on_success.is_cancelled() && self.on_failure.is_cancelled()
    }

    pub fn as_promise(&self) -> Promise<A> {
        Promise::new(self)
    }

    /// A future completing with this deferred's outcome.
    pub fn settled(&self) -> Settled<A>
    where
        A: Clone,
    {
        Settled::new(self)
    }
}

impl<A> Deferrable<A> for Deferred<A>
where
    A: Send + Sync + 'static,
{
    fn then_boxed(&self, on_success: Callback<A>, on_failure: Callback<A>) {
        self.on_success.attach_all([on_success]);
        self.on_failure.attach_all([on_failure]);
    }

    fn done_boxed(&self, callback: Callback<A>) {
        self.on_success.attach_all([callback]);
    }

    fn fail_boxed(&self, callback: Callback<A>) {
        self.on_failure.attach_all([callback]);
    }

    fn is_resolved(&self) -> bool {
        Deferred::is_resolved(self)
    }

    fn is_rejected(&self) -> bool {
        Deferred::is_rejected(self)
    }

    fn is_cancelled(&self) -> bool {
        Deferred::is_cancelled(self)
    }

    fn as_promise(&self) -> Promise<A> {
        Deferred::as_promise(self)
    }

    fn try_resolve(&self, args: A) -> Result<(), Error> {
        self.resolve(args);
        Ok(())
    }

    fn try_reject(&self, args: A) -> Result<(), Error> {
        self.reject(args);
        Ok(())
    }

    fn try_cancel(&self) -> Result<(), Error> {
        self.cancel();
        Ok(())
    }
}
