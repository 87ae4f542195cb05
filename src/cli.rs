use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::ai::{compile_instruction, PlaylistRequest};
use crate::catalog::Track;
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::downloads::{self, DownloadQueue};
use crate::playlist::EMPTY_PLAYLIST_MESSAGE;
use crate::server::{self, AppState};
use crate::Services;

#[derive(Parser)]
#[command(name = "tunedrop")]
#[command(version)]
#[command(about = "Music discovery demo with AI mood playlists")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,
    /// List the catalog
    Tracks,
    /// Search the catalog by title or artist
    Search {
        /// Case-insensitive substring; omit to show the first page
        term: Option<String>,
    },
    /// Print the instruction that would be sent to the AI, without sending it
    Prompt {
        /// Starting song or artist
        #[arg(long)]
        seed: String,
        /// Description of the mood
        #[arg(long)]
        mood: String,
    },
    /// Generate an AI playlist once and print it
    Playlist {
        /// Starting song or artist
        #[arg(long)]
        seed: String,
        /// Description of the mood
        #[arg(long)]
        mood: String,
    },
}

/// Entrypoint for CLI
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = Config::load_or_default(&cli.config)?;
    let services = Services::from_config(&cfg)?;

    match cli.command {
        Commands::Serve => serve(cfg, services).await?,

        Commands::Tracks => print_tracks(services.catalog.list_tracks()),

        Commands::Search { term } => {
            let term = term.unwrap_or_default();
            let results = services.catalog.search(&term);
            if results.is_empty() {
                println!("No tracks match \"{}\"", term);
            }
            print_tracks(&results);
        }

        Commands::Prompt { seed, mood } => {
            let request = PlaylistRequest::validate(seed, mood)
                .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?;
            println!("{}", compile_instruction(&request, &services.catalog.titles()));
        }

        Commands::Playlist { seed, mood } => {
            let tracks = services
                .playlists
                .generate(&seed, &mood)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
            if tracks.is_empty() {
                println!("No Playlist Generated: {}", EMPTY_PLAYLIST_MESSAGE);
            }
            print_tracks(&tracks);
        }
    }

    Ok(())
}

async fn serve(cfg: Config, services: Services) -> anyhow::Result<()> {
    let queue = Arc::new(DownloadQueue::new(cfg.downloads.max_increment));
    let ticker = tokio::spawn(downloads::run_ticker(
        queue.clone(),
        Duration::from_millis(cfg.downloads.tick_ms.max(1)),
    ));

    let state = Arc::new(AppState {
        catalog: services.catalog,
        playlists: services.playlists,
        downloads: queue,
        ai_enabled: services.ai_enabled,
    });

    let running = server::start_server(
        &cfg.http.bind_addr,
        cfg.http.port,
        state,
        cfg.http.static_dir.clone(),
    )
    .await?;
    println!("TuneDrop running at http://{}", running.addr);

    tokio::signal::ctrl_c().await?;
    let _ = running.shutdown_tx.send(());
    running.handle.await?;
    ticker.abort();
    Ok(())
}

fn print_tracks(tracks: &[Arc<Track>]) {
    for track in tracks {
        println!("{:>3}  {} - {} ({})", track.id, track.title, track.artist, track.album);
    }
}
