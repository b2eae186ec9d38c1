// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The render facade.
//!
//! This module provides [`Renderer`], which ties discovery, assembly, caching
//! and execution together.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pageset::{RenderConfig, Renderer};
//! use serde_json::json;
//!
//! let mut renderer = Renderer::new(RenderConfig::new("./templates"));
//! renderer.load_layouts_and_partials([".layout", ".partial"])?;
//!
//! let html = renderer.render_to_string(
//!     "home.page.tmpl",
//!     &json!({ "Data": { "payload": "This is MY passed data." } }),
//! )?;
//! ```
//!
//! # Resolution
//!
//! Every render first resolves a compiled set for the page name:
//!
//! 1. With caching enabled, a cached set for the name is used as-is.
//! 2. Otherwise the set is built from disk: all discovered layouts and
//!    partials plus `template_dir/<name>`.
//! 3. A successful build is stored in the cache when caching is enabled.
//!    Failed builds never touch the cache.
//!
//! # Thread Safety
//!
//! A `Renderer` is `Send + Sync` and is meant to be shared (for example in an
//! `Arc`) by concurrent request handlers. Only cache reads and writes are
//! serialized; builds run outside the lock, so two requests racing on the
//! same uncached page may both build it and the last write wins.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::assembler::compile_set;
use crate::cache::{Cache, MemoryCache, SharedSet};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::functions::FunctionMap;
use crate::locator::{find_with_marker, join_path, FileSystemSource, TemplateSource};
use crate::response::PageSink;

/// Status reported to a sink when executing a template fails.
const INTERNAL_SERVER_ERROR: u16 = 500;

/// Page renderer with template discovery and caching.
///
/// The renderer is generic over the template source `S`, so the same
/// resolution logic runs against the filesystem or an in-memory store.
///
/// # Examples
///
/// ```rust
/// use pageset::{MemorySource, RenderConfig, Renderer};
/// use serde_json::json;
///
/// let source = MemorySource::new()
///     .with_file("templates/base.layout.tmpl", "<body>{% block content %}{% endblock %}</body>")
///     .with_file(
///         "templates/home.page.tmpl",
///         "{% extends \"base.layout.tmpl\" %}{% block content %}Hello {{ Data.payload }}{% endblock %}",
///     );
///
/// let mut renderer = Renderer::with_source(source, RenderConfig::new("templates"));
/// renderer.load_layouts_and_partials([".layout"]).unwrap();
///
/// let html = renderer
///     .render_to_string("home.page.tmpl", &json!({ "Data": { "payload": "X" } }))
///     .unwrap();
/// assert_eq!(html, "<body>Hello X</body>");
/// ```
pub struct Renderer<S: TemplateSource = FileSystemSource> {
    source: S,
    config: RenderConfig,
    functions: FunctionMap,
    partials: Vec<String>,
    cache: Box<dyn Cache>,
    builds: AtomicUsize,
}

impl Renderer<FileSystemSource> {
    /// Creates a renderer reading templates from the local filesystem.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_source(FileSystemSource::new(), config)
    }
}

impl<S: TemplateSource> Renderer<S> {
    /// Creates a renderer over a custom template source with its own cache.
    pub fn with_source(source: S, config: RenderConfig) -> Self {
        Self {
            source,
            config,
            functions: FunctionMap::new(),
            partials: Vec::new(),
            cache: Box::new(MemoryCache::new()),
            builds: AtomicUsize::new(0),
        }
    }

    /// Replaces the cache.
    ///
    /// Pass clones of one [`MemoryCache`] to several renderers to make them
    /// share compiled sets by name.
    pub fn with_cache(mut self, cache: Box<dyn Cache>) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the functions bound into every template set built from now on.
    pub fn with_functions(mut self, functions: FunctionMap) -> Self {
        self.functions = functions;
        self
    }

    /// Returns a reference to the template source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Returns the registered template functions.
    pub fn functions(&self) -> &FunctionMap {
        &self.functions
    }

    /// Layout and partial files included in every build.
    pub fn partials(&self) -> &[String] {
        &self.partials
    }

    /// Enables or disables cache reads and writes.
    pub fn set_use_cache(&mut self, enabled: bool) {
        self.config.use_cache = enabled;
    }

    /// Enables or disables debug logging.
    pub fn set_debug(&mut self, enabled: bool) {
        self.config.debug = enabled;
    }

    /// Discovers layouts and partials under the template directory.
    ///
    /// Each marker (for example `".layout"` or `".partial"`) selects the
    /// template files it classifies under the configured [`MarkerMatch`]
    /// rule. The aggregated list replaces the previous one; a file matched by
    /// several markers is kept once, at its first position.
    ///
    /// [`MarkerMatch`]: crate::MarkerMatch
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Filesystem`](crate::PageError::Filesystem) if the
    /// template directory cannot be walked. The previous list is kept.
    pub fn load_layouts_and_partials<I, M>(&mut self, markers: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut templates = Vec::new();

        for marker in markers {
            let files = find_with_marker(
                &self.source,
                &self.config.template_dir,
                &self.config.extension,
                marker.as_ref(),
                self.config.marker_match,
            )?;
            for file in files {
                if seen.insert(file.clone()) {
                    templates.push(file);
                }
            }
        }

        tracing::debug!(
            "Loaded {} layout/partial file(s) from {}: {:?}",
            templates.len(),
            self.config.template_dir,
            templates
        );
        self.partials = templates;
        Ok(())
    }

    /// Checks if a compiled set for `name` is cached.
    pub fn cache_contains(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Number of compiled sets in the cache.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Number of successful builds from disk performed by this renderer.
    ///
    /// A build whose result could not be stored in the cache is not counted.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Builds the set for page `name` from disk, bypassing any cached copy.
    ///
    /// With caching enabled the new set replaces the cached entry for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Compile`](crate::PageError::Compile) if any file is
    /// missing, unreadable or malformed. A failed build leaves the cache
    /// untouched.
    pub fn build_from_disk(&self, name: &str) -> Result<SharedSet> {
        let page_path = join_path(&self.config.template_dir, name);
        let set = Arc::new(compile_set(
            &self.source,
            name,
            &self.partials,
            &page_path,
            &self.functions,
            self.config.build_options(),
        )?);

        if self.config.use_cache {
            self.cache.set(name, Arc::clone(&set))?;
        }
        self.builds.fetch_add(1, Ordering::SeqCst);

        if self.config.debug {
            tracing::info!("Reading template {} from disk", name);
        } else {
            tracing::trace!("Reading template {} from disk", name);
        }
        Ok(set)
    }

    /// Returns the compiled set for page `name`, from cache or from disk.
    pub fn get_compiled(&self, name: &str) -> Result<SharedSet> {
        self.resolve(name)
    }

    /// Renders page `name` into a string.
    ///
    /// Executes the set's primary definition (the page itself).
    pub fn render_to_string<D: Serialize + ?Sized>(&self, name: &str, data: &D) -> Result<String> {
        let set = self.resolve(name)?;
        set.render(data)
    }

    /// Renders page `name` into `sink`, using `name` as the entry definition.
    ///
    /// If execution fails, the sink is told about it with a 500 status before
    /// the error is returned. Build failures are returned without touching
    /// the sink.
    pub fn render_to_stream<K, D>(&self, sink: &mut K, name: &str, data: &D) -> Result<()>
    where
        K: PageSink + ?Sized,
        D: Serialize + ?Sized,
    {
        let set = self.resolve(name).map_err(|e| {
            tracing::error!("error building {}: {}", name, e);
            e
        })?;

        if let Err(e) = set.render_entry_to_write(name, data, sink) {
            tracing::error!("error executing {}: {}", name, e);
            sink.report_error(INTERNAL_SERVER_ERROR, &e.to_string());
            return Err(e);
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<SharedSet> {
        if self.config.use_cache {
            if let Some(set) = self.cache.get(name)? {
                if self.config.debug {
                    tracing::info!("Reading template {} from cache", name);
                } else {
                    tracing::trace!("Reading template {} from cache", name);
                }
                return Ok(set);
            }
        }

        self.build_from_disk(name).map_err(|e| {
            tracing::warn!("Error building template {} from disk: {}", name, e);
            e
        })
    }
}
