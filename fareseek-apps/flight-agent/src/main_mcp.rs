//!  Fareseek Flight Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # MCP Server Entry Point
//!
//! Serves over streamable HTTP by default, stdio via subcommand.

use anyhow::{Context, Error, Result};
use clap::{Parser, Subcommand};
use fareseek_flight_agent::{DEFAULT_BASE_URL, FlightAgentServer, FlightSearchClient};
use rmcp::service::serve_server;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fareseek-flight-mcp")]
#[command(author, version, about = "MCP server for international flight fare search")]
struct Args {
    /// Base URL of the fare search site
    #[arg(long, global = true, env = "FLIGHT_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout_secs: u64,

    #[command(flatten)]
    http: HttpArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run MCP server over stdio (for Claude Desktop, etc.)
    Stdio,

    /// Run MCP server over streamable HTTP (default)
    Http,
}

/// Only used by the HTTP transport, with or without the `http` subcommand.
#[derive(clap::Args, Debug)]
struct HttpArgs {
    /// Address to bind
    #[arg(long, global = true, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, global = true, env = "PORT", default_value = "8080")]
    port: u16,
}

async fn serve_http(server: FlightAgentServer, http: HttpArgs) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", http.host, http.port)
        .parse()
        .context("Invalid host:port")?;
    let session_manager = Arc::new(LocalSessionManager::default());
    let config = StreamableHttpServerConfig {
        stateful_mode: true,
        ..Default::default()
    };
    let service = StreamableHttpService::new(move || Ok(server.clone()), session_manager, config);
    let app = axum::Router::new().nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("🚀 MCP server started on port {}", http.port);
    tracing::debug!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("HTTP server error")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".to_string().into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    tracing::debug!("Parsed args: {:?}", args);

    let flights_client = Arc::new(
        FlightSearchClient::new(args.base_url, Duration::from_secs(args.timeout_secs))
            .context("Failed to create flights client")?,
    );
    tracing::info!("Upstream base URL: {}", flights_client.base_url());
    let server = FlightAgentServer::new(flights_client);

    match args.command {
        Some(Command::Stdio) => {
            eprintln!("Starting MCP server over stdio...");
            let (stdin, stdout) = rmcp::transport::io::stdio();
            let running = serve_server(server, (stdin, stdout))
                .await
                .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
            running
                .waiting()
                .await
                .context("stdio server task failed")?;
        }
        Some(Command::Http) | None => serve_http(server, args.http).await?,
    }

    Ok(())
}
