// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Template file discovery.
//!
//! This module provides the [`TemplateSource`] trait and implementations
//! for listing and reading template files.
//!
//! # Source Implementations
//!
//! - [`FileSystemSource`]: Walks real directories with `walkdir`
//! - [`MemorySource`]: Serves files from an in-memory map (testing/embedding)
//!
//! # Classification
//!
//! Layouts and partials are recognised purely by their names. The rule is
//! chosen with [`MarkerMatch`]:
//!
//! | Rule | `base.layout.tmpl` vs marker `.layout` | `layouts/nav.tmpl` vs marker `layout` |
//! |------|---------------------------------------|--------------------------------------|
//! | [`MarkerMatch::Segment`] | match | no match |
//! | [`MarkerMatch::Contains`] | match | match |
//!
//! `Segment` compares the marker (leading `.` ignored) against the
//! dot-separated parts of the file name before its extension, so a directory
//! name can never classify a file. `Contains` is a plain substring test on the
//! whole path.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{PageError, Result};

/// Extension carried by every page, layout and partial file.
pub const PAGE_EXTENSION: &str = ".tmpl";

/// Converts a Path to a normalized string with forward slashes.
/// On Windows, uses path components to rebuild with `/` separators.
#[inline]
pub fn path_to_string<P: AsRef<Path>>(path: P) -> String {
    #[cfg(windows)]
    {
        use std::path::Component;
        let path = path.as_ref();
        let mut result = String::new();
        for (i, component) in path.components().enumerate() {
            if i > 0 && !result.ends_with('/') {
                result.push('/');
            }
            match component {
                Component::Prefix(p) => result.push_str(&p.as_os_str().to_string_lossy()),
                Component::RootDir => result.push('/'),
                Component::CurDir => result.push('.'),
                Component::ParentDir => result.push_str(".."),
                Component::Normal(s) => result.push_str(&s.to_string_lossy()),
            }
        }
        result
    }
    #[cfg(not(windows))]
    {
        path.as_ref().to_string_lossy().to_string()
    }
}

/// Joins a template name onto a directory, returning a normalized string.
pub fn join_path(dir: &str, name: &str) -> String {
    path_to_string(Path::new(dir).join(name))
}

/// Returns the last `/`-separated component of a normalized path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Rule deciding whether a discovered path carries a marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerMatch {
    /// The marker is a substring of the full path.
    ///
    /// A path containing several markers matches each of them, so the same
    /// file can be reported once per marker.
    Contains,
    /// The marker names one of the dot-separated parts of the file name
    /// before its extension.
    #[default]
    Segment,
}

impl MarkerMatch {
    /// Tests a normalized path against a marker.
    pub fn matches(&self, path: &str, marker: &str) -> bool {
        match self {
            MarkerMatch::Contains => path.contains(marker),
            MarkerMatch::Segment => {
                let marker = marker.trim_start_matches('.');
                if marker.is_empty() {
                    return false;
                }
                let name = file_name(path);
                let stem = match name.rfind('.') {
                    Some(idx) => &name[..idx],
                    None => name,
                };
                stem.split('.').any(|segment| segment == marker)
            }
        }
    }
}

/// Trait for listing and loading template files.
///
/// Implement this trait to serve templates from somewhere other than the
/// local filesystem. Implementations must be thread-safe: one source is shared
/// by every render call of a renderer.
pub trait TemplateSource: Send + Sync + 'static {
    /// Recursively lists every file under `root` whose file name ends with
    /// `extension`.
    ///
    /// Any failure aborts the whole listing; partial results are never
    /// returned.
    fn find(&self, root: &str, extension: &str) -> Result<Vec<String>>;

    /// Loads the text of one file.
    fn read(&self, path: &str) -> std::io::Result<String>;
}

/// Lists the files under `root` with the given extension that carry `marker`.
///
/// The result keeps the listing order of the source. No de-duplication is
/// done here; callers aggregating several markers are responsible for
/// overlapping matches.
pub fn find_with_marker<S: TemplateSource + ?Sized>(
    source: &S,
    root: &str,
    extension: &str,
    marker: &str,
    rule: MarkerMatch,
) -> Result<Vec<String>> {
    let files = source.find(root, extension)?;
    Ok(files
        .into_iter()
        .filter(|path| rule.matches(path, marker))
        .collect())
}

/// Filesystem-backed template source.
///
/// Directory entries are visited sorted by file name, so listings are stable
/// across runs on every platform.
#[derive(Debug, Clone, Default)]
pub struct FileSystemSource;

impl FileSystemSource {
    /// Creates a new filesystem source.
    pub fn new() -> Self {
        Self
    }
}

impl TemplateSource for FileSystemSource {
    fn find(&self, root: &str, extension: &str) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(path_to_string)
                    .unwrap_or_else(|| root.to_string());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                PageError::Filesystem { path, source }
            })?;

            if entry.file_type().is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy().ends_with(extension) {
                files.push(path_to_string(entry.path()));
            }
        }

        tracing::debug!("Found {} '{}' file(s) under {}", files.len(), extension, root);
        Ok(files)
    }

    fn read(&self, path: &str) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory template source.
///
/// Files are keyed by their normalized path (`templates/home.page.tmpl`).
/// Every [`read`](TemplateSource::read) is counted, which lets tests observe
/// whether a render went back to the store.
///
/// # Examples
///
/// ```rust
/// use pageset::{MemorySource, TemplateSource};
///
/// let source = MemorySource::new()
///     .with_file("templates/base.layout.tmpl", "<main>{% block content %}{% endblock %}</main>")
///     .with_file("templates/home.page.tmpl", "{% extends \"base.layout.tmpl\" %}");
///
/// let found = source.find("templates", ".tmpl").unwrap();
/// assert_eq!(found.len(), 2);
/// assert_eq!(source.reads(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<BTreeMap<String, String>>,
    reads: AtomicUsize,
}

impl MemorySource {
    /// Creates an empty memory source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file and returns the source (builder form).
    pub fn with_file(self, path: &str, source: &str) -> Self {
        self.add_file(path, source);
        self
    }

    /// Adds or replaces a file.
    pub fn add_file(&self, path: &str, source: &str) {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_string(), source.to_string());
    }

    /// Removes a file, returning whether it existed.
    pub fn remove_file(&self, path: &str) -> bool {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path)
            .is_some()
    }

    /// Number of successful and failed reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl TemplateSource for MemorySource {
    fn find(&self, root: &str, extension: &str) -> Result<Vec<String>> {
        let root = root.trim_end_matches('/');
        let prefix = if root.is_empty() || root == "." {
            String::new()
        } else {
            format!("{}/", root)
        };

        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        Ok(files
            .keys()
            .filter(|path| path.starts_with(&prefix) && file_name(path).ends_with(extension))
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> std::io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such template file: {}", path),
            )
        })
    }
}
