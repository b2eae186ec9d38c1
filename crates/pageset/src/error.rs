// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for pageset.
//!
//! This module defines [`PageError`], the single error enum returned by every
//! fallible operation in the crate.
//!
//! # Error Categories
//!
//! - **Filesystem errors**: the discovery walk could not start or an entry
//!   could not be inspected
//! - **Compile errors**: a file listed for a template set is missing,
//!   unreadable, or rejected by the template engine
//! - **Execution errors**: rendering a compiled set failed
//! - **Cache errors**: a custom [`Cache`](crate::Cache) store failed
//!
//! Errors are never retried or recovered from inside the crate; they are
//! returned to the immediate caller.

use thiserror::Error;

/// The main error type for pageset operations.
#[derive(Error, Debug)]
pub enum PageError {
    /// Walking the template directory failed.
    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        /// The path being visited when the walk failed.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Building a template set failed.
    #[error("Compile error in {template}: {message}")]
    Compile {
        /// Logical name of the template set being built.
        template: String,
        /// Description of the failure, including the offending file when known.
        message: String,
    },

    /// Rendering a compiled template set failed.
    #[error("Execution error in {template}: {message}")]
    Execution {
        /// Logical name of the template set being rendered.
        template: String,
        /// Description of the failure.
        message: String,
    },

    /// Cache operation failed.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl PageError {
    pub(crate) fn compile(template: &str, message: impl Into<String>) -> Self {
        PageError::Compile {
            template: template.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn execution(template: &str, err: minijinja::Error) -> Self {
        PageError::Execution {
            template: template.to_string(),
            message: err.to_string(),
        }
    }

    /// Returns true for errors raised while building a template set.
    pub fn is_compile(&self) -> bool {
        matches!(self, PageError::Compile { .. })
    }

    /// Returns true for errors raised while rendering a compiled set.
    pub fn is_execution(&self) -> bool {
        matches!(self, PageError::Execution { .. })
    }
}

/// Convenience type alias for Results with [`PageError`].
pub type Result<T> = std::result::Result<T, PageError>;
