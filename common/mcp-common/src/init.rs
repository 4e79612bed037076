//! Tracing setup for stdio MCP servers
//!
//! stdout carries the MCP protocol, so every log line goes to stderr.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default level applied to the server crate when `RUST_LOG` does not say otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Initialize tracing for an MCP server crate
///
/// - Writes to stderr without ANSI colors
/// - Honors `RUST_LOG`, adding `<crate_name>=<level>` as a default directive
/// - `LOG_FORMAT=json` selects structured JSON output
///
/// ```rust,ignore
/// mcp_common::init_tracing("backlog_mcp", LogLevel::Info)?;
/// ```
pub fn init_tracing(crate_name: &str, level: LogLevel) -> anyhow::Result<()> {
    let directive = format!("{}={}", crate_name, level.as_str());
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
