// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Renderer configuration.
//!
//! [`RenderConfig`] deserializes from any serde format; every field has a
//! default, so an empty table is a valid configuration:
//!
//! ```toml
//! template_dir = "./templates"
//! use_cache = true
//! debug = false
//! extension = ".tmpl"
//! marker_match = "segment"
//! strict = true
//! ```

use serde::Deserialize;

use crate::assembler::BuildOptions;
use crate::locator::{MarkerMatch, PAGE_EXTENSION};

/// Settings for a [`Renderer`](crate::Renderer).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory holding pages, layouts and partials (default: "./templates").
    pub template_dir: String,
    /// Reuse compiled template sets between renders (default: true).
    pub use_cache: bool,
    /// Log cache hits and disk builds at info level (default: false).
    pub debug: bool,
    /// Extension of template files (default: ".tmpl").
    pub extension: String,
    /// Rule used to classify layouts and partials (default: segment).
    pub marker_match: MarkerMatch,
    /// Treat references to undefined values as errors (default: true).
    pub strict: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_dir: "./templates".to_string(),
            use_cache: true,
            debug: false,
            extension: PAGE_EXTENSION.to_string(),
            marker_match: MarkerMatch::default(),
            strict: true,
        }
    }
}

impl RenderConfig {
    /// Creates a default configuration rooted at `template_dir`.
    pub fn new(template_dir: impl Into<String>) -> Self {
        Self {
            template_dir: template_dir.into(),
            ..Self::default()
        }
    }

    /// Enables or disables the template cache.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Enables or disables debug logging.
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Sets the layout/partial classification rule.
    pub fn with_marker_match(mut self, rule: MarkerMatch) -> Self {
        self.marker_match = rule;
        self
    }

    /// Enables or disables strict undefined handling.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub(crate) fn build_options(&self) -> BuildOptions {
        BuildOptions {
            strict: self.strict,
        }
    }
}
