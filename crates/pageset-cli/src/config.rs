// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! pageset project configuration.
//!
//! Configuration is loaded from `pageset.toml` at the project root.
//!
//! # Example Configuration
//!
//! ```toml
//! [render]
//! template_dir = "./templates"
//! use_cache = true
//! debug = false          # true also raises `pageset` logs to info
//!
//! [discovery]
//! markers = [".layout", ".partial"]
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! index = "home.page.tmpl"
//! static_dir = "static"
//! ```

use std::fs;
use std::path::Path;

use pageset::RenderConfig;
use serde::Deserialize;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "pageset.toml";

/// Main configuration structure loaded from `pageset.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Renderer settings.
    #[serde(default)]
    pub render: RenderConfig,
    /// Layout and partial discovery.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// HTTP host settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Layout and partial discovery settings.
#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    /// Markers selecting layouts and partials (default: [".layout", ".partial"]).
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
}

fn default_markers() -> Vec<String> {
    vec![".layout".to_string(), ".partial".to_string()]
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            markers: default_markers(),
        }
    }
}

/// HTTP host configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port (default: 8080).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Page rendered at `/` and `/string` (default: "home.page.tmpl").
    #[serde(default = "default_index")]
    pub index: String,
    /// Directory served under `/static` (default: "static").
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_index() -> String {
    "home.page.tmpl".to_string()
}

fn default_static_dir() -> Option<String> {
    Some("static".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            index: default_index(),
            static_dir: default_static_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from `pageset.toml` in the current
    /// directory when no path is given.
    ///
    /// If the default file does not exist, returns default configuration. An
    /// explicitly requested file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => {
                let default_path = Path::new(CONFIG_FILE);
                if !default_path.exists() {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }
}
