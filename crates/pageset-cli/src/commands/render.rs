// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! One-shot render command.

use anyhow::Context;
use pageset::Renderer;

use crate::config::Config;
use crate::server::PageData;

/// Renders page `name` and returns the HTML.
///
/// `data` is a JSON document passed to the page as `Data`; it defaults to an
/// empty object.
pub fn render_page(config: &Config, name: &str, data: Option<&str>) -> anyhow::Result<String> {
    let data: serde_json::Value = match data {
        Some(json) => serde_json::from_str(json).context("--data is not valid JSON")?,
        None => serde_json::Value::Object(serde_json::Map::new()),
    };

    let mut renderer = Renderer::new(config.render.clone());
    renderer.load_layouts_and_partials(&config.discovery.markers)?;
    let html = renderer.render_to_string(name, &PageData::new(data))?;
    Ok(html)
}

/// Renders page `name` to stdout.
pub fn run(config: &Config, name: &str, data: Option<&str>) -> anyhow::Result<()> {
    let html = render_page(config, name, data)?;
    println!("{}", html);
    Ok(())
}
