// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use scrape_agent::app::{create_router, VERSION};
use scrape_agent::models::builder::{parse_field_arg, RequestBuilder};
use scrape_agent::models::scrape::{FieldDefinition, ScrapeRequest};
use scrape_agent::models::settings::{FetchSettings, ServerConfig};
use scrape_agent::routes::ScrapeState;
use scrape_agent::services::client::ApiClient;
use scrape_agent::services::logging::{init_tracing, DEFAULT_LOG_FILTER};
use scrape_agent::services::render::{render, summary, OutputFormat};
use scrape_agent::services::scrape::ScrapeService;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

/// Stateless CSS-selector scraping service.
///
/// Without a subcommand the HTTP server is started.
#[derive(Parser)]
#[command(name = "scrape-agent", version = VERSION, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    server: ServerConfig,
}

#[derive(Subcommand)]
enum Command {
    /// Compose a scrape request, send it to a running server and show the results
    Request(RequestArgs),
}

#[derive(Args)]
struct RequestArgs {
    /// Base URL of the scrape-agent server
    #[arg(long, env = "SCRAPE_API_URL", default_value = "http://127.0.0.1:8000/")]
    api: Url,

    /// JSON payload file to send as-is instead of composing one from flags
    #[arg(long, conflicts_with_all = ["url", "container", "fields"])]
    payload: Option<PathBuf>,

    /// Page to scrape
    #[arg(long, required_unless_present = "payload")]
    url: Option<String>,

    /// CSS selector matching one element per record
    #[arg(long, required_unless_present = "payload")]
    container: Option<String>,

    /// Field as name=selector[@kind]; kind is text (default), href, src, alt,
    /// data-id, or any other attribute name
    #[arg(long = "field", value_parser = parse_field_arg)]
    fields: Vec<FieldDefinition>,

    /// Print the generated JSON payload and exit without sending it
    #[arg(long)]
    preview: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Request(args)) => {
            init_tracing("scrape_agent=warn");
            run_request(args).await
        }
        None => {
            init_tracing(DEFAULT_LOG_FILTER);
            serve(cli.server).await
        }
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    let settings = FetchSettings::from(&config);
    let scrape_service = ScrapeService::new(&settings)?;

    let app = create_router(ScrapeState::new(scrape_service));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    info!(
        addr = %config.bind,
        fetch_timeout_secs = config.fetch_timeout_secs,
        "scrape-agent v{} listening",
        VERSION
    );

    axum::serve(listener, app).await.context("HTTP server failed")
}

async fn run_request(args: RequestArgs) -> Result<()> {
    let request = match &args.payload {
        Some(path) => load_payload(path)?,
        None => {
            let builder = args.fields.iter().cloned().fold(
                RequestBuilder::new(
                    args.url.as_deref().unwrap_or_default(),
                    args.container.as_deref().unwrap_or_default(),
                ),
                |builder, field| builder.with_field(field),
            );
            if args.preview {
                println!("{}", builder.preview()?);
                return Ok(());
            }
            builder.build()
        }
    };

    if args.preview {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let client = ApiClient::new(args.api)?;
    let response = client.scrape(&request).await?;

    eprintln!("{}", summary(&response));
    let rendered = render(&response, args.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Results written to {}", path.display());
        }
        None if !rendered.is_empty() => println!("{rendered}"),
        None => {}
    }

    Ok(())
}

fn load_payload(path: &Path) -> Result<ScrapeRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON payload in {}", path.display()))
}
