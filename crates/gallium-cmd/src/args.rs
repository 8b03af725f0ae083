//! Bound argument storage.
//!
//! [`Args`] is the value a command body receives after the registry has
//! validated and converted the raw argument vector: a name-keyed map of
//! [`ArgValue`]s. [`AmbientArgs`] is the caller-owned bag of shared handles
//! (API clients, the registry itself) injected into ambient parameters.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use url::Url;

/// A single converted argument value.
#[derive(Clone)]
pub enum ArgValue {
    /// Plain text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Switch state.
    Bool(bool),
    /// Validated URL.
    Url(Url),
    /// Accumulated values of a repeating parameter.
    Many(Vec<ArgValue>),
    /// Ambient-injected shared handle.
    Shared(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(v) => f.debug_tuple("Str").field(v).finish(),
            ArgValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            ArgValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            ArgValue::Url(v) => f.debug_tuple("Url").field(&v.as_str()).finish(),
            ArgValue::Many(v) => f.debug_tuple("Many").field(v).finish(),
            ArgValue::Shared(_) => f.write_str("Shared(..)"),
        }
    }
}

/// Arguments bound to one invocation. Keys are parameter names, matched
/// case-insensitively.
#[derive(Debug, Default)]
pub struct Args {
    values: HashMap<String, ArgValue>,
}

impl Args {
    /// Empty argument set (used by tests and by commands with no parameters).
    pub fn new() -> Self {
        Args::default()
    }

    /// Bind a value. Repeating parameters accumulate into
    /// [`ArgValue::Many`]; everything else overwrites.
    pub(crate) fn bind(&mut self, name: &str, value: ArgValue, repeating: bool) {
        let key = name.to_ascii_lowercase();
        if repeating {
            let slot = self
                .values
                .entry(key)
                .or_insert_with(|| ArgValue::Many(Vec::new()));
            if let ArgValue::Many(items) = slot {
                items.push(value);
            }
        } else {
            self.values.insert(key, value);
        }
    }

    /// Raw value lookup.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(&name.to_ascii_lowercase())
    }

    /// Whether the parameter was bound at all.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Text value, if the parameter was bound as text.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ArgValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Integer value.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Switch state; an unbound switch reads as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(ArgValue::Bool(true)))
    }

    /// URL value.
    pub fn url(&self, name: &str) -> Option<&Url> {
        match self.get(name)? {
            ArgValue::Url(v) => Some(v),
            _ => None,
        }
    }

    /// Accumulated values of a repeating parameter.
    pub fn many(&self, name: &str) -> Option<&[ArgValue]> {
        match self.get(name)? {
            ArgValue::Many(v) => Some(v),
            _ => None,
        }
    }

    /// Downcast an ambient-injected handle.
    pub fn shared<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        match self.get(name)? {
            ArgValue::Shared(v) => v.clone().downcast::<T>().ok(),
            _ => None,
        }
    }
}

/// Shared handles injected into ambient parameters, keyed by exact parameter
/// name. Populated once at startup by the dispatch caller; a missing key at
/// invoke time is a wiring defect, not user error.
#[derive(Clone, Default)]
pub struct AmbientArgs {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl AmbientArgs {
    /// Empty context.
    pub fn new() -> Self {
        AmbientArgs::default()
    }

    /// Insert a shared handle under `name`.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: &str, value: Arc<T>) {
        self.values.insert(name.to_owned(), value);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<T: Any + Send + Sync>(mut self, name: &str, value: Arc<T>) -> Self {
        self.insert(name, value);
        self
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.values.get(name)
    }
}

impl fmt::Debug for AmbientArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmbientArgs")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
