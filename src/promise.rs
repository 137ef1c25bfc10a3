//! Read-only view of a [`Deferred`].
//!
use crate::{Arguments, Callback, Deferrable, Deferred, Error, Operation, Settled};

/// A `Promise` can observe a deferred but never settle or cancel it.
///
/// # Examples
///
/// ```
/// use deferred::{args, Deferrable, Deferred, Error, Operation};
/// let d: Deferred = Deferred::new();
/// let p = d.as_promise();
/// assert_eq!(
///     p.try_resolve(args![1]),
///     Err(Error::ReadOnly { operation: Operation::Resolve })
/// );
/// assert!(!p.is_resolved());
/// d.resolve(args![1]);
/// assert!(p.is_resolved());
/// ```
#[derive(Debug)]
pub struct Promise<A = Arguments> {
    deferred: Deferred<A>,
}

impl<A> Clone for Promise<A> {
    fn clone(&self) -> Self {
        Self {
            deferred: self.deferred.clone(),
        }
    }
}

impl<A> Promise<A>
where
    A: Send + Sync + 'static,
{
    pub fn new(deferred: &Deferred<A>) -> Self {
        Self {
            deferred: deferred.clone(),
        }
    }

    pub fn then<S, F>(&self, on_success: S, on_failure: F) -> &Self
    where
        S: FnOnce(&A) + Send + 'static,
        F: FnOnce(&A) + Send + 'static,
    {
        self.deferred.then(on_success, on_failure);
        self
    }

    pub fn done<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&A) + Send + 'static,
    {
        self.deferred.done(callback);
        self
    }

    pub fn fail<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&A) + Send + 'static,
    {
        self.deferred.fail(callback);
        self
    }

    pub fn settled(&self) -> Settled<A>
    where
        A: Clone,
    {
        self.deferred.settled()
    }

    fn refuse(&self, operation: Operation) -> Result<(), Error> {
        tracing::debug!(%operation, "refused mutation through a promise");
        Err(Error::ReadOnly { operation })
    }
}

impl<A> Deferrable<A> for Promise<A>
where
    A: Send + Sync + 'static,
{
    fn then_boxed(&self, on_success: Callback<A>, on_failure: Callback<A>) {
        self.deferred.then_boxed(on_success, on_failure);
    }

    fn done_boxed(&self, callback: Callback<A>) {
        self.deferred.done_boxed(callback);
    }

    fn fail_boxed(&self, callback: Callback<A>) {
        self.deferred.fail_boxed(callback);
    }

    fn is_resolved(&self) -> bool {
        self.deferred.is_resolved()
    }

    fn is_rejected(&self) -> bool {
        self.deferred.is_rejected()
    }

    fn is_cancelled(&self) -> bool {
        self.deferred.is_cancelled()
    }

    fn as_promise(&self) -> Promise<A> {
        self.clone()
    }

    fn try_resolve(&self, _args: A) -> Result<(), Error> {
        self.refuse(Operation::Resolve)
    }

    fn try_reject(&self, _args: A) -> Result<(), Error> {
        self.refuse(Operation::Reject)
    }

    fn try_cancel(&self) -> Result<(), Error> {
        self.refuse(Operation::Cancel)
    }
}
