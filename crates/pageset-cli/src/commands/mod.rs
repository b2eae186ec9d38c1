// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `serve`: Serve the index page over HTTP
//! - `render`: Render one page to stdout

/// One-shot render command.
pub mod render;
/// HTTP server command.
pub mod serve;
