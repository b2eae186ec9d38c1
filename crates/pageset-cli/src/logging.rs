// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Log filter setup.

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// Directive letting the renderer's debug events through.
const RENDER_DEBUG_DIRECTIVE: &str = "pageset=info";

/// Builds the subscriber filter from `--log-level`.
///
/// With `render.debug` set, `pageset` events are raised to at least `info`,
/// which is where the renderer reports cache hits and disk builds. A more
/// verbose `--log-level` is left alone.
pub fn env_filter(log_level: &str, render_debug: bool) -> EnvFilter {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let verbose_enough = filter
        .max_level_hint()
        .is_some_and(|level| level >= LevelFilter::INFO);
    if !render_debug || verbose_enough {
        return filter;
    }

    match RENDER_DEBUG_DIRECTIVE.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_is_kept_without_debug() {
        let filter = env_filter("warn", false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_debug_raises_pageset_to_info() {
        let filter = env_filter("warn", true);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        assert!(filter.to_string().contains("pageset=info"));
    }

    #[test]
    fn test_debug_keeps_more_verbose_level() {
        let filter = env_filter("trace", true);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
        assert!(!filter.to_string().contains("pageset=info"));
    }
}
