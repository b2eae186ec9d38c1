// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # pageset
//!
//! Layout, partial and page template management for server-side HTML.
//!
//! pageset discovers layout and partial templates by a naming marker,
//! compiles them together with one page into an executable set, caches the
//! compiled set by page name and renders it into a string or a response sink.
//! Templates use [minijinja](https://docs.rs/minijinja) syntax and are
//! HTML-escaped on output.
//!
//! ## Features
//!
//! - Marker-based discovery (`base.layout.tmpl`, `nav.partial.tmpl`)
//! - One compiled set per page, with every layout and partial available
//! - Thread-safe cache of compiled sets, optional per renderer
//! - Custom template functions
//! - Pluggable template sources (filesystem or memory)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pageset::{PageResponse, RenderConfig, Renderer};
//! use serde_json::json;
//!
//! let mut renderer = Renderer::new(RenderConfig::new("./templates"));
//! renderer.load_layouts_and_partials([".layout", ".partial"])?;
//!
//! let mut response = PageResponse::new();
//! renderer.render_to_stream(
//!     &mut response,
//!     "home.page.tmpl",
//!     &json!({ "Data": { "payload": "This is MY passed data." } }),
//! )?;
//! ```

/// Template set assembly.
pub mod assembler;
/// Compiled set caching.
pub mod cache;
/// Renderer configuration.
pub mod config;
/// Error types.
pub mod error;
/// Custom template functions.
pub mod functions;
/// Template discovery and loading.
pub mod locator;
/// Render facade.
pub mod render;
/// Response sinks.
pub mod response;

pub use assembler::{compile_set, BuildOptions};
pub use cache::{Cache, MemoryCache, SharedSet, TemplateSet};
pub use config::RenderConfig;
pub use error::{PageError, Result};
pub use functions::FunctionMap;
pub use locator::{
    file_name, find_with_marker, join_path, path_to_string, FileSystemSource, MarkerMatch,
    MemorySource, TemplateSource, PAGE_EXTENSION,
};
pub use render::Renderer;
pub use response::{PageResponse, PageSink, HTML_CONTENT_TYPE, TEXT_CONTENT_TYPE};
