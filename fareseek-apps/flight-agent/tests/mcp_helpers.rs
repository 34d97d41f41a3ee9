//! Shared MCP test helpers: locating the server binary and talking to it.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::Duration;

pub const TIMEOUT: Duration = Duration::from_secs(10);

pub fn find_binary() -> Result<PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_fareseek-flight-mcp") {
        return Ok(PathBuf::from(path));
    }

    let manifest_dir = PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR")
            .map_err(|e| anyhow::anyhow!("CARGO_MANIFEST_DIR not set: {}", e))?,
    );
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .ok_or_else(|| anyhow::anyhow!("Could not determine workspace root"))?;

    let paths = [
        workspace_root.join("target/debug/fareseek-flight-mcp"),
        workspace_root.join("target/release/fareseek-flight-mcp"),
    ];

    for path in &paths {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }
    anyhow::bail!(
        "Could not find fareseek-flight-mcp binary. Run `cargo build -p fareseek-flight-agent --features mcp` first. Searched: {:?}",
        paths
    )
}

pub fn get_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Starts `fareseek-flight-mcp` with the given args, pointing it at `base_url`.
pub fn spawn_server(args: &[&str], base_url: &str, port: Option<u16>) -> Result<Child> {
    let path = find_binary()?;
    let mut command = Command::new(&path);
    command
        .args(args)
        .env("FLIGHT_API_BASE_URL", base_url)
        .env("RUST_LOG", "info")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(port) = port {
        command.env("PORT", port.to_string());
    }
    command.spawn().context("Failed to spawn MCP server")
}

pub async fn wait_for_port(port: u16) -> Result<()> {
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("MCP server did not start listening on port {}", port)
}

pub async fn read_stderr_to_string(child: &mut Child) -> String {
    let mut output = String::new();
    if let Some(mut stderr) = child.stderr.take() {
        let mut buf = [0u8; 4096];
        while let Ok(Ok(n)) =
            tokio::time::timeout(Duration::from_millis(500), stderr.read(&mut buf)).await
        {
            if n == 0 {
                break;
            }
            output.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    }
    output
}

/// Extracts the JSON-RPC message from an SSE body (`data: {...}` lines).
pub fn extract_json_from_sse(body: &str) -> Option<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .filter(|data| data.contains("\"jsonrpc\""))
        .find_map(|data| serde_json::from_str(data).ok())
}

pub fn initialize_request() -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "1.0"}
        }
    })
}

pub fn tool_call_request(id: i64, name: &str, arguments: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

/// One MCP session over the streamable HTTP transport.
pub struct McpHttpSession {
    http: wreq::Client,
    url: String,
    pub session_id: String,
}

impl McpHttpSession {
    pub async fn initialize(port: u16) -> Result<Self> {
        let http = wreq::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        let url = format!("http://127.0.0.1:{}/mcp", port);

        let response = http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .body(initialize_request().to_string())
            .send()
            .await
            .context("initialize request failed")?;
        let session_id = response
            .headers()
            .get("mcp-session-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .context("No session ID")?;
        let body = response.text().await?;
        let reply = extract_json_from_sse(&body)
            .or_else(|| serde_json::from_str(&body).ok())
            .with_context(|| format!("No JSON-RPC reply to initialize: {}", body))?;
        anyhow::ensure!(reply.get("result").is_some(), "initialize failed: {}", reply);

        let session = Self {
            http,
            url,
            session_id,
        };
        session
            .notify(serde_json::json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;
        Ok(session)
    }

    pub async fn notify(&self, message: Value) -> Result<()> {
        let response = self.post(message).await?;
        anyhow::ensure!(
            response.status().is_success(),
            "notification rejected: {}",
            response.status()
        );
        Ok(())
    }

    pub async fn request(&self, message: Value) -> Result<Value> {
        let response = self.post(message).await?;
        let body = response.text().await?;
        extract_json_from_sse(&body)
            .or_else(|| serde_json::from_str(&body).ok())
            .with_context(|| format!("No JSON-RPC reply: {}", body))
    }

    async fn post(&self, message: Value) -> Result<wreq::Response> {
        self.http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .header("mcp-session-id", self.session_id.as_str())
            .body(message.to_string())
            .send()
            .await
            .context("MCP request failed")
    }
}
