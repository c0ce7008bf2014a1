//! Command-line and environment configuration

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;
use upstream_image_fetcher::DEFAULT_ORIGIN;
use url::Url;

const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the proxy, resolved once at startup
#[derive(Debug, Clone, Parser)]
#[command(
    name = "status-image-proxy",
    version,
    about = "Caching relay for HTTP status code images",
    disable_help_flag = true
)]
pub struct ProxyConfig {
    /// Address to bind the server to
    #[arg(short = 'h', long, env = "BIND_HOST")]
    pub host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "PORT")]
    pub port: u16,

    /// Directory holding cached images, created if missing
    #[arg(short = 'c', long = "cache", env = "CACHE_DIR")]
    pub cache_dir: PathBuf,

    /// Origin images are fetched from on a cache miss
    #[arg(
        long = "upstream",
        env = "UPSTREAM_ORIGIN",
        default_value = DEFAULT_ORIGIN,
        value_parser = parse_origin
    )]
    pub upstream_origin: Url,

    /// Seconds before an upstream fetch is abandoned
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,

    /// Largest accepted image in bytes, for PUT bodies and upstream responses
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

impl ProxyConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

fn parse_origin(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {:?}, expected http or https", other)),
    }
}
