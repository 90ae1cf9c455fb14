use clap::{Parser, ValueEnum};
use numbering_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "NUMBERING_GATEWAY_LISTEN_ADDR";
pub const SERVER_ID_ENV: &str = "SERVER_ID";
pub const STORE_BACKEND_ENV: &str = "NUMBERING_STORE_BACKEND";
pub const REDIS_URL_ENV: &str = "NUMBERING_REDIS_URL";
pub const REDIS_TIMEOUT_MS_ENV: &str = "NUMBERING_REDIS_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "NUMBERING_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIS_TIMEOUT_MS: &str = "1000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StoreBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackendArg::InMemory => write!(f, "in-memory"),
            StoreBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "numbering-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Server identifier embedded in every GUID; padded or truncated to 4
    /// characters.
    #[arg(long, env = SERVER_ID_ENV)]
    pub server_id: Option<String>,

    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StoreBackendArg::InMemory
    )]
    pub store: StoreBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("store", "redis"))]
    pub redis_url: Option<String>,

    /// Upper bound for a single Redis command, in milliseconds.
    #[arg(long, env = REDIS_TIMEOUT_MS_ENV, default_value = DEFAULT_REDIS_TIMEOUT_MS)]
    pub redis_timeout_ms: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}

impl CLI {
    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}
