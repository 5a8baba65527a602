use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Hospital Insight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DB_FILE_NAME: &str = "database.db";
pub const CSV_FILE_NAME: &str = "data.csv";
pub const EVIDENCE_DIR_NAME: &str = "evidence";

pub const DEFAULT_API_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8000));
pub const DEFAULT_DASHBOARD_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8501));
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "medgemma";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 300;

/// Inquiry responses carry at most this many full records.
pub const DEFAULT_MAX_MATCHED_RECORDS: usize = 10;

/// Evidence passages returned per category.
pub const DEFAULT_EVIDENCE_TOP_K: usize = 3;

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "hospital_insight=info,tower_http=info"
}

/// Directory of the running executable. Data files resolve relative to it.
/// Falls back to the working directory when the executable path is unknown.
pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub evidence_dir: PathBuf,
    pub ollama_url: String,
    pub ollama_model: String,
    pub llm_timeout_secs: u64,
    pub cholesterol_threshold: i64,
    pub max_matched_records: usize,
    pub evidence_top_k: usize,
}

impl AppConfig {
    /// Defaults rooted at `base`, no environment involved.
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            bind_addr: DEFAULT_API_BIND,
            csv_path: base.join(CSV_FILE_NAME),
            db_path: base.join(DB_FILE_NAME),
            evidence_dir: base.join(EVIDENCE_DIR_NAME),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            cholesterol_threshold: crate::decision::rules::CHOLESTEROL_THRESHOLD,
            max_matched_records: DEFAULT_MAX_MATCHED_RECORDS,
            evidence_top_k: DEFAULT_EVIDENCE_TOP_K,
        }
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&base_dir(), |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(base: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::with_base_dir(base);

        if let Some(v) = lookup("HOSPITAL_BIND") {
            config.bind_addr = parse_var("HOSPITAL_BIND", &v)?;
        }
        if let Some(v) = lookup("HOSPITAL_CSV_PATH") {
            config.csv_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("HOSPITAL_DB_PATH") {
            config.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("HOSPITAL_EVIDENCE_DIR") {
            config.evidence_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("OLLAMA_URL") {
            config.ollama_url = v;
        }
        if let Some(v) = lookup("OLLAMA_MODEL") {
            config.ollama_model = v;
        }
        if let Some(v) = lookup("OLLAMA_TIMEOUT_SECS") {
            config.llm_timeout_secs = parse_var("OLLAMA_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("HOSPITAL_CHOLESTEROL_THRESHOLD") {
            config.cholesterol_threshold = parse_var("HOSPITAL_CHOLESTEROL_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("HOSPITAL_MAX_MATCHED_RECORDS") {
            config.max_matched_records = parse_var("HOSPITAL_MAX_MATCHED_RECORDS", &v)?;
        }
        if let Some(v) = lookup("HOSPITAL_EVIDENCE_TOP_K") {
            config.evidence_top_k = parse_var("HOSPITAL_EVIDENCE_TOP_K", &v)?;
        }

        Ok(config)
    }
}

/// Runtime configuration for the dashboard front-end.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub bind_addr: SocketAddr,
    pub backend_url: String,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup("DASHBOARD_BIND") {
            Some(v) => parse_var("DASHBOARD_BIND", &v)?,
            None => DEFAULT_DASHBOARD_BIND,
        };
        Ok(Self {
            bind_addr,
            backend_url: lookup("DASHBOARD_BACKEND_URL")
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}
