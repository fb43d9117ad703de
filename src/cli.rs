//! Command-line interface: transport selection and logging setup.
//!
//! The adapter is a single long-running server process; the only choices a
//! deployment makes are which MCP transport to speak and, for HTTP, where
//! to listen. Both are exposed as flags with environment fallbacks so MCP
//! host configurations can set them without wrapping the binary.

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Host transport the MCP server speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Serve over stdin/stdout (the default for desktop MCP hosts)
    Stdio,
    /// Serve over streamable HTTP
    Http,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// MCP transport to serve on
    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value = "stdio")]
    pub transport: Transport,

    /// Bind address for the HTTP transport
    #[arg(long, env = "MCP_HTTP_ADDR", default_value = "127.0.0.1:8080")]
    pub http_addr: String,
}

/// Logging goes to stderr so the stdio transport's stdout stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
