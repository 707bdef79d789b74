use std::path::{Path, PathBuf};

use clinic_common::conversation::{DEFAULT_MAX_MESSAGES, DEFAULT_TTL_SECS};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub roster_path: String,
    pub redis_url: Option<String>,
    pub convo_ttl_secs: u64,
    pub convo_max_messages: usize,
    pub http_listen_addr: Option<String>,
    pub mcp_tcp_listen_addr: Option<String>,
}

impl Config {
    /// Required:
    /// - `DOCTOR_ROSTER_PATH` (JSON array of doctor entries)
    ///
    /// Optional:
    /// - `REDIS_URL` (conversation log falls back to memory without it)
    /// - `CONVO_TTL_SECS` (default: 86400)
    /// - `CONVO_MAX_MESSAGES` (default: 200)
    /// - `HTTP_LISTEN_ADDR` (serve the JSON chat API, e.g. "127.0.0.1:8000")
    /// - `MCP_TCP_LISTEN_ADDR` (serve MCP over TCP instead of stdio)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let roster_path = var("DOCTOR_ROSTER_PATH").ok_or_else(|| {
            AppError::Config("DOCTOR_ROSTER_PATH environment variable is required".to_string())
        })?;
        if !Path::new(&roster_path).is_file() {
            return Err(AppError::Config(format!(
                "roster file not found: {roster_path}"
            )));
        }

        let convo_ttl_secs = parse_positive(&var, "CONVO_TTL_SECS")?.unwrap_or(DEFAULT_TTL_SECS);
        let convo_max_messages = parse_positive(&var, "CONVO_MAX_MESSAGES")?
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_MESSAGES);

        Ok(Self {
            roster_path,
            redis_url: var("REDIS_URL").filter(|s| !s.trim().is_empty()),
            convo_ttl_secs,
            convo_max_messages,
            http_listen_addr: var("HTTP_LISTEN_ADDR").filter(|s| !s.trim().is_empty()),
            mcp_tcp_listen_addr: var("MCP_TCP_LISTEN_ADDR").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn roster_path(&self) -> PathBuf {
        Path::new(&self.roster_path).to_path_buf()
    }
}

fn parse_positive(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u64>, AppError> {
    let Some(raw) = var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(AppError::Config(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}
