//! Aggregation of many inputs into one promise: it resolves once every
//! input has succeeded and rejects on the first failure.
//!
use crate::{Arguments, Callback, Deferrable, Deferred, Promise, Value};
use std::sync::{Arc, Mutex, PoisonError};

/// One input to [`when`].
pub enum Input {
    /// Anything callbacks can be registered on.
    Deferred(Box<dyn Deferrable<Arguments> + Send + Sync>),
    /// A plain value, treated as already resolved with that single value.
    Value(Value),
}

impl Input {
    pub fn value(value: impl Into<Value>) -> Self {
        Input::Value(value.into())
    }
}

impl From<Deferred> for Input {
    fn from(deferred: Deferred) -> Self {
        Input::Deferred(Box::new(deferred))
    }
}

impl From<Promise> for Input {
    fn from(promise: Promise) -> Self {
        Input::Deferred(Box::new(promise))
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Value(value)
    }
}

struct Slots {
    values: Vec<Option<Arguments>>,
    remaining: usize,
}

impl Slots {
    fn new(len: usize) -> Self {
        Self {
            values: vec![None; len],
            remaining: len,
        }
    }

    /// Records a slot's payload. Returns every payload, in input order, once
    /// the last slot is filled.
    fn fill(&mut self, index: usize, args: Arguments) -> Option<Vec<Arguments>> {
        let slot = &mut self.values[index];
        if slot.is_none() {
            self.remaining -= 1;
        }
        *slot = Some(args);
        if self.remaining > 0 {
            return None;
        }
        Some(self.values.iter_mut().filter_map(Option::take).collect())
    }
}

fn fill(out: &Deferred, slots: &Mutex<Slots>, index: usize, args: Arguments) {
    let complete = slots
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .fill(index, args);
    if let Some(records) = complete {
        tracing::debug!(inputs = records.len(), "all inputs resolved");
        out.resolve(Arguments::from_positional(
            records.into_iter().map(Value::Args),
        ));
    }
}

/// Combines `inputs` into one promise.
///
/// The promise resolves when every input has resolved. Its payload holds
/// one [`Value::Args`] record per input, in input order regardless of
/// completion order; a plain value `v` contributes the record `(v)`. The
/// promise rejects as soon as any input rejects, with exactly that input's
/// arguments. Inputs still pending at that point are left alone.
///
/// ```
/// use deferred::{args, when, Arguments, Deferrable, Input, Value};
/// let p = when([Input::value(1), Input::value(2)]);
/// assert!(p.is_resolved());
/// p.done(|a| {
///     assert_eq!(
///         a,
///         &Arguments::from_positional([
///             Value::Args(args![1]),
///             Value::Args(args![2]),
///         ])
///     )
/// });
/// ```
pub fn when<I>(inputs: I) -> Promise
where
    I: IntoIterator<Item = Input>,
{
    let inputs: Vec<Input> = inputs.into_iter().collect();
    let out = Deferred::new();
    tracing::debug!(inputs = inputs.len(), "aggregating inputs");
    if inputs.is_empty() {
        out.resolve(Arguments::new());
        return out.as_promise();
    }
    let slots = Arc::new(Mutex::new(Slots::new(inputs.len())));
    for (index, input) in inputs.into_iter().enumerate() {
        match input {
            Input::Deferred(source) => {
                let on_success: Callback<Arguments> = {
                    let (out, slots) = (out.clone(), slots.clone());
                    Box::new(move |args: &Arguments| fill(&out, &slots, index, args.clone()))
                };
                let on_failure: Callback<Arguments> = {
                    let out = out.clone();
                    Box::new(move |args: &Arguments| {
                        if !out.is_rejected() {
                            tracing::debug!(index, "input rejected");
                        }
                        out.reject(args.clone());
                    })
                };
                source.then_boxed(on_success, on_failure);
            }
            Input::Value(value) => fill(&out, &slots, index, Arguments::single(value)),
        }
    }
    out.as_promise()
}
