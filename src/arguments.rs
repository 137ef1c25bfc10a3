//! The payload a deferred is resolved or rejected with: ordered positional
//! values plus named values.
//!
use std::collections::BTreeMap;

/// A dynamically typed payload value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// A nested resolution record, e.g. one slot of an aggregate.
    Args(Arguments),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_args(&self) -> Option<&Arguments> {
        match self {
            Value::Args(args) => Some(args),
            _ => None,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident as $cast:ty),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v as $cast)
            }
        })*
    };
}

value_from! {
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => Int as i64,
    u16 => Int as i64,
    u32 => Int as i64,
    f32 => Float as f64,
    f64 => Float as f64,
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Positional and named values captured at resolution time.
///
/// Named values are kept ordered by key, so two records compare equal
/// regardless of the order their names were inserted in.
///
/// # Examples
///
/// ```
/// use deferred::{args, Value};
/// let a = args![1, "two"; foo = 3];
/// assert_eq!(a.get(1), Some(&Value::from("two")));
/// assert_eq!(a.named_value("foo"), Some(&Value::Int(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record holding exactly one positional value.
    pub fn single(value: impl Into<Value>) -> Self {
        Self {
            positional: vec![value.into()],
            named: BTreeMap::new(),
        }
    }

    pub fn from_positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    /// Sets a named value, replacing a previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.named.insert(name.into(), value.into())
    }

    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named(&self) -> &BTreeMap<String, Value> {
        &self.named
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn named_value(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Number of positional plus named values.
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Builds an [`Arguments`] record: positional values first, then named
/// values after a `;`.
///
/// ```
/// use deferred::args;
/// assert!(args![].is_empty());
/// assert_eq!(args![1, 2].positional().len(), 2);
/// assert_eq!(args![; foo = 2].named().len(), 1);
/// ```
#[macro_export]
macro_rules! args {
    ($($pos:expr),* $(; $($name:ident = $val:expr),*)?) => {{
        #[allow(unused_mut)]
        let mut args = $crate::Arguments::new();
        $(args.push($pos);)*
        $($(args.insert(stringify!($name), $val);)*)?
        args
    }};
}
