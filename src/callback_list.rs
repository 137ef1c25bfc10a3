//! A single-fire broadcast list. Callbacks attached before resolution fire
//! when it happens; callbacks attached afterwards fire immediately with the
//! stored arguments. Cancelling closes the list for good.
//!
use crate::Callback;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// # Examples
///
/// ```
/// use deferred::CallbackList;
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let list = CallbackList::<u32>::new();
/// let c = calls.clone();
/// list.attach(move |n| { c.fetch_add(*n as usize, Ordering::SeqCst); });
/// list.resolve(2).resolve(5);
/// let c = calls.clone();
/// list.attach(move |n| { c.fetch_add(*n as usize, Ordering::SeqCst); });
/// assert_eq!(calls.load(Ordering::SeqCst), 4);
/// ```
pub struct CallbackList<A> {
    inner: Arc<Mutex<Inner<A>>>,
}

enum Listeners<A> {
    Open(Vec<Callback<A>>),
    Cancelled,
}

struct Inner<A> {
    listeners: Listeners<A>,
    arguments: Option<Arc<A>>,
}

impl<A> Clone for CallbackList<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A> Default for CallbackList<A> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                listeners: Listeners::Open(Vec::new()),
                arguments: None,
            })),
        }
    }
}

impl<A> fmt::Debug for CallbackList<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        let pending = match &inner.listeners {
            Listeners::Open(callbacks) => Some(callbacks.len()),
            Listeners::Cancelled => None,
        };
        f.debug_struct("CallbackList")
            .field("pending", &pending)
            .field("resolved", &inner.arguments.is_some())
            .finish()
    }
}

impl<A> CallbackList<A>
where
    A: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a single callback. See [`CallbackList::attach_all`].
    pub fn attach<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&A) + Send + 'static,
    {
        self.attach_all([Box::new(callback) as Callback<A>])
    }

    /// Attaches any number of callbacks, including none.
    ///
    /// On a cancelled list this does nothing. On a resolved list the given
    /// callbacks fire right away, in order, with the stored arguments.
    pub fn attach_all<I>(&self, callbacks: I) -> &Self
    where
        I: IntoIterator<Item = Callback<A>>,
    {
        let arguments = {
            let mut inner = self.lock();
            let inner = &mut *inner;
            match (&mut inner.listeners, &inner.arguments) {
                (Listeners::Cancelled, _) => return self,
                (_, Some(arguments)) => arguments.clone(),
                (Listeners::Open(pending), None) => {
                    pending.extend(callbacks);
                    return self;
                }
            }
        };
        for callback in callbacks {
            callback(&arguments);
        }
        self
    }

    /// Stores `args` and fires every pending callback in registration order.
    ///
    /// Only the first resolution counts; later ones, and any resolution of a
    /// cancelled list, are ignored.
    pub fn resolve(&self, args: A) -> &Self {
        let (pending, arguments) = {
            let mut inner = self.lock();
            if inner.arguments.is_some() {
                return self;
            }
            let pending = match &mut inner.listeners {
                Listeners::Cancelled => return self,
                Listeners::Open(pending) => std::mem::take(pending),
            };
            let arguments = Arc::new(args);
            inner.arguments = Some(arguments.clone());
            (pending, arguments)
        };
        tracing::trace!(pending = pending.len(), "callback list resolved");
        for callback in pending {
            callback(&arguments);
        }
        self
    }

    /// Discards pending callbacks and closes the list. Idempotent.
    ///
    /// A resolution that already fired is not undone, but nothing attached
    /// from now on will fire.
    pub fn cancel(&self) -> &Self {
        let discarded = std::mem::replace(&mut self.lock().listeners, Listeners::Cancelled);
        if let Listeners::Open(pending) = discarded {
            tracing::trace!(discarded = pending.len(), "callback list cancelled");
        }
        self
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.lock().listeners, Listeners::Cancelled)
    }

    pub fn is_resolved(&self) -> bool {
        self.lock().arguments.is_some()
    }
}

impl<A> CallbackList<A> {
    // No callback ever runs while the lock is held, so a poisoned lock
    // still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, Inner<A>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
