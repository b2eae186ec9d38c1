// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Compiled template sets and their cache.
//!
//! A [`TemplateSet`] is the executable result of one build: every layout and
//! partial plus one page, compiled together so the page can extend layouts and
//! include partials by file name.
//!
//! # Cache Implementations
//!
//! - [`MemoryCache`]: `Arc<Mutex<HashMap>>`-backed map; clones share storage
//!
//! Entries are never evicted. Once a set is stored under a name it is served
//! for as long as the cache lives.
//!
//! # Scope
//!
//! Every renderer owns its own cache by default. To make several renderers
//! share compiled sets, hand each one a clone of the same [`MemoryCache`];
//! sets are then keyed by name across all of them.
//!
//! # Custom Caches
//!
//! Implement the [`Cache`] trait to plug in another store.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use minijinja::{Environment, Value};
use serde::Serialize;

use crate::error::{PageError, Result};

/// Shared pointer to a compiled template set.
pub type SharedSet = Arc<TemplateSet>;

/// A compiled, executable template set.
///
/// Contains one named definition per source file: partials and layouts under
/// their file names, and the page under the logical name the set was built
/// for. Executing the set without naming an entry renders that page.
#[derive(Debug)]
pub struct TemplateSet {
    name: String,
    files: Vec<String>,
    env: Environment<'static>,
}

impl TemplateSet {
    pub(crate) fn new(name: String, files: Vec<String>, env: Environment<'static>) -> Self {
        Self { name, files, env }
    }

    /// The logical name of the set (the page template name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source files the set was compiled from, in build order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Names of every definition in the set, sorted.
    pub fn definitions(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .env
            .templates()
            .map(|(name, _)| name.to_string())
            .collect();
        names.sort();
        names
    }

    /// Returns true if the set contains a definition called `entry`.
    pub fn has_definition(&self, entry: &str) -> bool {
        self.env.get_template(entry).is_ok()
    }

    /// Renders the set's primary definition.
    pub fn render<D: Serialize + ?Sized>(&self, data: &D) -> Result<String> {
        self.render_entry(&self.name, data)
    }

    /// Renders one named definition of the set.
    pub fn render_entry<D: Serialize + ?Sized>(&self, entry: &str, data: &D) -> Result<String> {
        let template = self
            .env
            .get_template(entry)
            .map_err(|e| PageError::execution(&self.name, e))?;
        template
            .render(Value::from_serialize(data))
            .map_err(|e| PageError::execution(&self.name, e))
    }

    /// Renders one named definition of the set directly into a writer.
    pub fn render_entry_to_write<D, W>(&self, entry: &str, data: &D, writer: &mut W) -> Result<()>
    where
        D: Serialize + ?Sized,
        W: Write + ?Sized,
    {
        let template = self
            .env
            .get_template(entry)
            .map_err(|e| PageError::execution(&self.name, e))?;
        template
            .render_to_write(Value::from_serialize(data), writer)
            .map(|_| ())
            .map_err(|e| PageError::execution(&self.name, e))
    }
}

/// Trait for compiled template set caches.
///
/// Implementations must be thread-safe; every operation is expected to be
/// serialized internally. Stores that can fail report it through
/// [`PageError::Cache`] from `get` and `set`; `contains_key` and `len` answer
/// from whatever state is reachable.
pub trait Cache: Send + Sync + std::fmt::Debug {
    /// Retrieves a set from the cache.
    fn get(&self, key: &str) -> Result<Option<SharedSet>>;
    /// Stores a set in the cache, replacing any previous entry for the key.
    fn set(&self, key: &str, set: SharedSet) -> Result<()>;
    /// Checks if a key exists in the cache.
    fn contains_key(&self, key: &str) -> bool;
    /// Number of cached sets.
    fn len(&self) -> usize;
    /// Returns true if nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Creates a boxed clone (sharing storage).
    fn clone_box(&self) -> Box<dyn Cache>;
}

impl Clone for Box<dyn Cache> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// In-memory cache guarded by a single mutex.
///
/// A lock poisoned by a panicking holder is recovered rather than reported,
/// so every operation keeps seeing the same entries.
///
/// # Examples
///
/// ```rust,ignore
/// use pageset::{MemoryCache, Renderer};
///
/// // Two renderers sharing compiled sets
/// let shared = MemoryCache::new();
/// let admin = Renderer::new(admin_config).with_cache(Box::new(shared.clone()));
/// let site = Renderer::new(site_config).with_cache(Box::new(shared));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    cache: Arc<Mutex<HashMap<String, SharedSet>>>,
}

impl MemoryCache {
    /// Creates a new, empty memory cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryCache {
    // Entries are only ever inserted whole, so a panic while the lock was held
    // cannot leave the map half-updated.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, SharedSet>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<SharedSet>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, set: SharedSet) -> Result<()> {
        self.entries().insert(key.to_string(), set);
        Ok(())
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn clone_box(&self) -> Box<dyn Cache> {
        Box::new(Self {
            cache: Arc::clone(&self.cache),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_set(name: &str, source: &str) -> SharedSet {
        let mut env = Environment::new();
        env.add_template_owned(name.to_string(), source.to_string())
            .unwrap();
        Arc::new(TemplateSet::new(
            name.to_string(),
            vec![format!("templates/{}", name)],
            env,
        ))
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        assert!(cache.is_empty());

        cache
            .set("home.page.tmpl", sample_set("home.page.tmpl", "home"))
            .unwrap();
        let retrieved = cache.get("home.page.tmpl").unwrap().unwrap();
        assert_eq!(retrieved.name(), "home.page.tmpl");

        assert!(cache.contains_key("home.page.tmpl"));
        assert!(!cache.contains_key("about.page.tmpl"));
        assert!(cache.get("about.page.tmpl").unwrap().is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("a", sample_set("a", "first")).unwrap();
        cache.set("a", sample_set("a", "second")).unwrap();

        assert_eq!(cache.len(), 1);
        let set = cache.get("a").unwrap().unwrap();
        assert_eq!(set.render(&json!({})).unwrap(), "second");
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = MemoryCache::new();
        let other = cache.clone_box();

        other.set("a", sample_set("a", "shared")).unwrap();
        assert!(cache.contains_key("a"));
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let cache = MemoryCache::new();
        cache.set("a", sample_set("a", "kept")).unwrap();

        let inner = Arc::clone(&cache.cache);
        let poisoner = std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("poison the cache lock");
        });
        assert!(poisoner.join().is_err());
        assert!(cache.cache.is_poisoned());

        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key("a"));
        assert!(cache.get("a").unwrap().is_some());

        cache.set("b", sample_set("b", "new")).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_template_set_entries() {
        let mut env = Environment::new();
        env.add_template_owned("footer.partial.tmpl", "<footer>{{ year }}</footer>")
            .unwrap();
        env.add_template_owned(
            "home.page.tmpl",
            "<p>{{ title }}</p>{% include \"footer.partial.tmpl\" %}",
        )
        .unwrap();
        let set = TemplateSet::new("home.page.tmpl".to_string(), vec![], env);

        assert_eq!(
            set.definitions(),
            vec!["footer.partial.tmpl".to_string(), "home.page.tmpl".to_string()]
        );
        assert!(set.has_definition("footer.partial.tmpl"));
        assert!(!set.has_definition("missing.tmpl"));

        let data = json!({ "title": "Hi", "year": 2026 });
        assert_eq!(
            set.render(&data).unwrap(),
            "<p>Hi</p><footer>2026</footer>"
        );
        assert_eq!(
            set.render_entry("footer.partial.tmpl", &data).unwrap(),
            "<footer>2026</footer>"
        );

        let mut out = Vec::new();
        set.render_entry_to_write("home.page.tmpl", &data, &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<p>Hi</p><footer>2026</footer>");
    }

    #[test]
    fn test_unknown_entry_is_execution_error() {
        let set = sample_set("home.page.tmpl", "home");
        let err = set.render_entry("nope.tmpl", &json!({})).unwrap_err();
        assert!(err.is_execution());
    }
}
