// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pageset_cli::config::Config;
use pageset_cli::{commands, logging};

#[derive(Parser)]
#[command(name = "pageset")]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "Layout and partial aware HTML page renderer", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Path to the configuration file (default: ./pageset.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the index page over HTTP
    Serve {
        /// Port to run the server on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,
    },
    /// Render one page to stdout
    Render {
        /// Page template name, relative to the template directory
        name: String,
        /// JSON value passed to the page as `Data`
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Initialize tracing with the specified log level
    let filter = logging::env_filter(&cli.log_level, config.render.debug);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Serve { port, host } => {
            commands::serve::run(config, host, port).await
        }
        Commands::Render { name, data } => {
            commands::render::run(&config, &name, data.as_deref())
        }
    }
}
