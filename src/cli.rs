//! Command-line entry points.
//!
//! `serve` runs the JSON API; `dashboard` runs the browser front-end, either
//! against a running API or with its own in-process store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgGroup, Args, Parser, Subcommand};
use thiserror::Error;

use crate::api::{start_api_server, ApiServer};
use crate::config::{AppConfig, ConfigError, DashboardConfig, APP_NAME, APP_VERSION};
use crate::core_state::{CoreError, CoreState};
use crate::dashboard::{
    start_dashboard_server, BackendError, DashboardBackend, HttpBackend, LocalBackend,
};

/// Timeout for dashboard calls to the API; covers a full LLM round trip.
const BACKEND_TIMEOUT_SECS: u64 = 600;

#[derive(Parser, Debug)]
#[command(name = "hospital-insight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the analysis and inquiry API
    Serve {
        #[command(flatten)]
        core: CoreArgs,
    },

    /// Serve the clinician dashboard
    #[command(group(
        ArgGroup::new("core_flags")
            .multiple(true)
            .args(CORE_FLAGS)
            .requires("standalone")
    ))]
    Dashboard {
        /// Run the handlers in-process instead of calling the API
        #[arg(long)]
        standalone: bool,

        /// Address the dashboard listens on
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Base URL of a running API server
        #[arg(long)]
        backend_url: Option<String>,

        #[command(flatten)]
        core: CoreArgs,
    },
}

/// Ids of the `CoreArgs` flags; only meaningful when the core runs here.
const CORE_FLAGS: [&str; 6] = ["api_bind", "csv", "db", "evidence_dir", "ollama_url", "model"];

/// Overrides for the record store, evidence and model settings.
#[derive(Args, Debug, Default)]
pub struct CoreArgs {
    /// Address the API listens on
    #[arg(long = "api-bind")]
    pub api_bind: Option<SocketAddr>,

    /// CSV file the store is rebuilt from
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory with clinical/ and insurance/ evidence files
    #[arg(long)]
    pub evidence_dir: Option<PathBuf>,

    /// Ollama base URL
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Ollama model name
    #[arg(long)]
    pub model: Option<String>,
}

impl CoreArgs {
    /// Flags win over environment and defaults.
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(v) = self.api_bind {
            config.bind_addr = v;
        }
        if let Some(v) = self.csv {
            config.csv_path = v;
        }
        if let Some(v) = self.db {
            config.db_path = v;
        }
        if let Some(v) = self.evidence_dir {
            config.evidence_dir = v;
        }
        if let Some(v) = self.ollama_url {
            config.ollama_url = v;
        }
        if let Some(v) = self.model {
            config.ollama_model = v;
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Startup failed: {0}")]
    Core(#[from] CoreError),

    #[error("Dashboard backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve { core } => {
            let mut config = AppConfig::from_env()?;
            core.apply(&mut config);
            serve(config).await
        }
        Command::Dashboard {
            standalone,
            bind,
            backend_url,
            core,
        } => {
            let mut dashboard = DashboardConfig::from_env()?;
            if let Some(v) = bind {
                dashboard.bind_addr = v;
            }
            if let Some(v) = backend_url {
                dashboard.backend_url = v;
            }
            let core_config = if standalone {
                let mut config = AppConfig::from_env()?;
                core.apply(&mut config);
                Some(config)
            } else {
                None
            };
            run_dashboard(dashboard, core_config).await
        }
    }
}

/// Load the store and collaborators on the blocking pool.
async fn build_core(config: AppConfig) -> Result<Arc<CoreState>, CliError> {
    tracing::info!(
        csv = %config.csv_path.display(),
        db = %config.db_path.display(),
        evidence = %config.evidence_dir.display(),
        "Loading patient records"
    );

    let (state, report) = tokio::task::spawn_blocking(move || CoreState::from_config(&config))
        .await
        .map_err(|e| CoreError::TaskJoin(e.to_string()))??;

    tracing::info!(
        rows_read = report.rows_read,
        inserted = report.inserted,
        duplicates = report.duplicates,
        skipped = report.skipped,
        source_missing = report.source_missing,
        "Record store ready"
    );
    Ok(Arc::new(state))
}

pub async fn serve(config: AppConfig) -> Result<(), CliError> {
    tracing::info!("{APP_NAME} API starting v{APP_VERSION}");
    let core = build_core(config.clone()).await?;
    let server = start_api_server(core, config.bind_addr).await?;
    run_until_interrupted(server).await;
    Ok(())
}

/// `core` set means standalone: handlers run in this process.
pub async fn run_dashboard(
    dashboard: DashboardConfig,
    core: Option<AppConfig>,
) -> Result<(), CliError> {
    tracing::info!("{APP_NAME} dashboard starting v{APP_VERSION}");

    let backend: Arc<dyn DashboardBackend + Send + Sync> = match core {
        Some(config) => Arc::new(LocalBackend::new(build_core(config).await?)),
        None => {
            let url = dashboard.backend_url.clone();
            tracing::info!(backend_url = %url, "Dashboard using HTTP backend");
            let backend =
                tokio::task::spawn_blocking(move || HttpBackend::new(&url, BACKEND_TIMEOUT_SECS))
                    .await
                    .map_err(|e| CoreError::TaskJoin(e.to_string()))??;
            Arc::new(backend)
        }
    };

    let server = start_dashboard_server(backend, dashboard.bind_addr).await?;
    run_until_interrupted(server).await;
    Ok(())
}

async fn run_until_interrupted(mut server: ApiServer) {
    tracing::info!(addr = %server.session.server_addr, "Listening; press Ctrl+C to stop");
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for Ctrl+C: {e}");
            }
        }
        _ = server.wait() => return,
    }
    server.shutdown();
    server.wait().await;
}
