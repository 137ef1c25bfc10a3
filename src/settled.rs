use crate::{Deferrable, Error};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};

/// The outcome a deferred settled with.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement<A> {
    Resolved(A),
    Rejected(A),
}

impl<A> Settlement<A> {
    pub fn into_result(self) -> Result<A, A> {
        match self {
            Settlement::Resolved(a) => Ok(a),
            Settlement::Rejected(a) => Err(a),
        }
    }
}

/// A future over a deferred's outcome.
///
/// Completes with [`Error::Abandoned`] when its callbacks can never fire:
/// the deferred was cancelled, or every handle to it was dropped while it
/// was still pending. A deferred that settled and was cancelled afterwards
/// counts as cancelled, since callbacks attached after a cancel never fire.
///
/// # Examples
///
/// ```
/// use deferred::{args, Deferred, Settlement};
/// use futures::executor::block_on;
/// use std::thread;
/// let d: Deferred = Deferred::new();
/// let waiter = d.settled();
/// let task = thread::spawn(move || block_on(waiter));
/// d.resolve(args!["🍓"]);
/// let settled = task.join().expect("The task thread has panicked.");
/// assert_eq!(settled, Ok(Settlement::Resolved(args!["🍓"])));
/// ```
#[derive(Debug)]
pub struct Settled<A> {
    shared: Arc<Mutex<Shared<A>>>,
}

#[derive(Debug)]
enum WakerState {
    Fresh,
    Tainted,
}

#[derive(Debug)]
struct Shared<A> {
    value: Option<Settlement<A>>,
    waker: Result<Waker, WakerState>,
    listeners: usize,
}

/// Registered on one side of the deferred. Dropping the last listener
/// without a value taints the future.
struct Listener<A> {
    shared: Arc<Mutex<Shared<A>>>,
}

fn lock<A>(shared: &Mutex<Shared<A>>) -> MutexGuard<'_, Shared<A>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A> Listener<A> {
    fn settle(&self, settlement: Settlement<A>) {
        let waker = {
            let mut shared = lock(&self.shared);
            shared.value = Some(settlement);
            std::mem::replace(&mut shared.waker, Err(WakerState::Tainted))
        };
        if let Ok(waker) = waker {
            waker.wake()
        }
    }
}

impl<A> Drop for Listener<A> {
    fn drop(&mut self) {
        let waker = {
            let mut shared = lock(&self.shared);
            shared.listeners -= 1;
            if shared.listeners > 0 || shared.value.is_some() {
                return;
            }
            std::mem::replace(&mut shared.waker, Err(WakerState::Tainted))
        };
        if let Ok(waker) = waker {
            waker.wake()
        }
    }
}

impl<A> Settled<A>
where
    A: Clone + Send + Sync + 'static,
{
    pub(crate) fn new<D>(source: &D) -> Self
    where
        D: Deferrable<A> + ?Sized,
    {
        let shared = Arc::new(Mutex::new(Shared {
            value: None,
            waker: Err(WakerState::Fresh),
            listeners: 2,
        }));
        let on_success = Listener {
            shared: shared.clone(),
        };
        let on_failure = Listener {
            shared: shared.clone(),
        };
        source.then_boxed(
            Box::new(move |a: &A| on_success.settle(Settlement::Resolved(a.clone()))),
            Box::new(move |a: &A| on_failure.settle(Settlement::Rejected(a.clone()))),
        );
        Self { shared }
    }
}

impl<A> Future for Settled<A> {
    type Output = Result<Settlement<A>, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut shared = lock(&self.shared);
        match shared.value.take() {
            Some(value) => Poll::Ready(Ok(value)),
            None => match std::mem::replace(&mut shared.waker, Ok(cx.waker().clone())) {
                Err(WakerState::Tainted) => Poll::Ready(Err(Error::Abandoned)),
                _ => Poll::Pending,
            },
        }
    }
}
