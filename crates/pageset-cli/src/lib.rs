// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! pageset CLI library.
//!
//! This crate provides the command-line interface and a small HTTP host for
//! the pageset renderer.
//!
//! # Usage
//!
//! This crate is primarily used through the `pageset` binary:
//!
//! ```bash
//! pageset serve                    # Serve the index page over HTTP
//! pageset render home.page.tmpl    # Render one page to stdout
//! ```
//!
//! # Configuration
//!
//! Projects are configured via `pageset.toml` in the working directory.

/// CLI commands (serve, render).
pub mod commands;
/// Project configuration from `pageset.toml`.
pub mod config;
/// Log filter setup.
pub mod logging;
/// HTTP host built on axum.
pub mod server;
