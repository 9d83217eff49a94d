//! trickled: the trickle demo server.
//!
//! Serves pages that all render the same slow context, each delivering
//! it a different way (buffered, raw stream, eager template in a stream,
//! lazy template stream).
//!
//! # Usage
//!
//! ```text
//! trickled serve --port 8000 --unit 1s
//! trickled serve --config trickle.toml
//! trickled config --config trickle.toml --process-time 3
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use trickle_core::TrickleConfig;
use trickle_core::config::{DelayConfig, ServerConfig, TemplatesConfig};
use trickle_web::AppState;
use trickle_web::streaming::{CONTENT_TEMPLATE, STREAMING_TEMPLATE};

#[derive(Parser)]
#[command(name = "trickled", about = "trickle streaming demo server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the demo pages.
    Serve(ConfigArgs),

    /// Print the effective configuration as TOML and exit.
    Config(ConfigArgs),
}

/// Configuration file plus per-key overrides.
#[derive(Args)]
struct ConfigArgs {
    /// Path to a trickle.toml file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    port: Option<u16>,

    /// Progress lines on the primary pages.
    #[arg(long)]
    process_time: Option<u32>,

    /// Progress lines on the content page.
    #[arg(long)]
    content_process_time: Option<u32>,

    /// Length of one delay step, e.g. "1s" or "250ms".
    #[arg(long)]
    unit: Option<String>,

    /// Directory holding the jinja templates.
    #[arg(long)]
    templates_dir: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(self) -> anyhow::Result<TrickleConfig> {
        let mut config = match &self.config {
            Some(path) => TrickleConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => TrickleConfig::default(),
        };

        if self.bind.is_some() || self.port.is_some() {
            let server = config.server.get_or_insert_with(ServerConfig::default);
            if self.bind.is_some() {
                server.bind = self.bind;
            }
            if self.port.is_some() {
                server.port = self.port;
            }
        }

        if self.process_time.is_some()
            || self.content_process_time.is_some()
            || self.unit.is_some()
        {
            let delay = config.delay.get_or_insert_with(DelayConfig::default);
            if self.process_time.is_some() {
                delay.process_time = self.process_time;
            }
            if self.content_process_time.is_some() {
                delay.content_process_time = self.content_process_time;
            }
            if self.unit.is_some() {
                delay.unit = self.unit;
            }
        }

        if self.templates_dir.is_some() {
            let templates = config.templates.get_or_insert_with(TemplatesConfig::default);
            templates.dir = self.templates_dir;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,trickled=debug,trickle_web=debug,trickle_stream=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_serve(args.load()?).await,
        Command::Config(args) => {
            let config = args.load()?;
            // Resolve once so invalid values are reported here too.
            config.delay_settings()?;
            config.bind_addr()?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

async fn run_serve(config: TrickleConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let state = AppState::from_config(&config)?;

    info!(
        process_time = state.delay.process_time,
        content_process_time = state.delay.content_process_time,
        unit = ?state.delay.unit,
        templates = %state.jinja.dir().display(),
        "trickle daemon starting"
    );

    // Fail at startup rather than on the first streamed request.
    for name in [STREAMING_TEMPLATE, CONTENT_TEMPLATE] {
        state
            .jinja
            .check(name)
            .with_context(|| format!("loading template {name}"))?;
    }

    let router = trickle_web::build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => {
                    error!(error = %e, "failed to listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    info!("trickle daemon stopped");
    Ok(())
}
