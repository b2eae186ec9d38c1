// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Functions exposed to templates.
//!
//! A [`FunctionMap`] is handed to a renderer once and bound into every
//! template set it builds, so `{{ shout(title) }}` works in pages, layouts and
//! partials alike.

use std::collections::BTreeMap;

use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult, Value};
use minijinja::Environment;

/// Ordered map of template-callable functions.
///
/// # Examples
///
/// ```rust
/// use pageset::FunctionMap;
///
/// let functions = FunctionMap::new()
///     .with("shout", |s: String| s.to_uppercase())
///     .with("add", |a: i64, b: i64| a + b);
///
/// assert_eq!(functions.len(), 2);
/// assert!(functions.contains("shout"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FunctionMap {
    functions: BTreeMap<String, Value>,
}

impl FunctionMap {
    /// Creates an empty function map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under `name`, replacing any previous entry.
    pub fn insert<F, Rv, Args>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Function<Rv, Args> + Send + Sync + 'static,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.functions.insert(name.into(), Value::from_function(f));
        self
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<F, Rv, Args>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Function<Rv, Args> + Send + Sync + 'static,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.insert(name, f);
        self
    }

    /// Returns true if a function is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered function names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if no function is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub(crate) fn bind(&self, env: &mut Environment<'static>) {
        for (name, function) in &self.functions {
            env.add_global(name.clone(), function.clone());
        }
    }
}
