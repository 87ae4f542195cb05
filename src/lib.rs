// Modules
pub mod ai;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod downloads;
pub mod playlist;
pub mod server;

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use ai::{ClaudeBackend, CredentialManager, GenerationClient};
use catalog::Catalog;
use config::Config;
use playlist::PlaylistService;

/// Long-lived services built once at startup
pub struct Services {
    pub catalog: Arc<Catalog>,
    pub playlists: PlaylistService,
    pub ai_enabled: bool,
}

impl Services {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let catalog = match &cfg.catalog.path {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
            None => Catalog::demo(),
        };
        log::info!("Catalog loaded with {} tracks", catalog.len());
        let catalog = Arc::new(catalog);

        let api_key = CredentialManager::resolve_from_env(cfg.ai.api_key.as_deref())?;
        let backend = ClaudeBackend::new(&cfg.ai, api_key)
            .context("Failed to create HTTP client")?;
        let ai_enabled = backend.has_api_key();

        let playlists = PlaylistService::new(
            catalog.clone(),
            GenerationClient::new(Arc::new(backend)),
        );

        Ok(Self {
            catalog,
            playlists,
            ai_enabled,
        })
    }
}

pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(cli::run(cli))
}
