// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server command.

use std::path::Path;
use std::sync::Arc;

use console::style;

use crate::config::Config;
use crate::server::{app, AppState};

/// Runs the HTTP host until interrupted.
///
/// `host` and `port` override the `[server]` section of the configuration.
pub async fn run(config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    println!("{}", style("Starting pageset server...").cyan().bold());
    println!(
        "{} {}",
        style("Templates:").dim(),
        config.render.template_dir
    );

    let state = AppState::from_config(&config)?;
    println!(
        "{} {} layout/partial file(s)",
        style("Loaded").green(),
        state.renderer.partials().len()
    );

    let static_dir = config
        .server
        .static_dir
        .as_deref()
        .map(Path::new)
        .filter(|dir| dir.is_dir());
    if let Some(dir) = static_dir {
        println!("{} {}", style("Serving /static from").dim(), dir.display());
    }

    let router = app(Arc::new(state), static_dir);

    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);
    println!();
    println!(
        "{} {}",
        style("Server running at").green().bold(),
        style(format!("http://{}", addr)).cyan().underlined()
    );
    println!("{}", style("Press Ctrl+C to stop").dim());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
