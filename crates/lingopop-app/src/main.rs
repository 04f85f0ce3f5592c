use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use lingopop_core::notebook::NotebookStore;
use lingopop_core::storage::FileStore;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod audio;
pub mod controller;
pub mod events;
pub mod profile;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::audio::FileAudioSink;
use self::controller::AppController;
use self::profile::{ProfileStore, default_data_dir};
use self::state::{AppState, gemini_gateway};

/// Look up words, save them to a notebook, review and chat about them
#[derive(Parser, Debug)]
#[command(name = "lingopop", version)]
struct Args {
    /// Profile to load from the config folder
    #[arg(long, default_value = "main")]
    profile: String,

    /// Where the notebook and audio clips are stored
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Gemini API key, overrides the profile and environment
    #[arg(long)]
    api_key: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lingopop=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(args.log_json);

    let profiles = ProfileStore::user();
    profiles.init()?;
    let mut config = profiles.load(&args.profile)?.with_env_overrides();

    if let Some(key) = args.api_key {
        config.gateway.api_key = key;
    }
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = Some(dir.display().to_string());
    }

    let data_dir = config
        .storage
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_data_dir);
    tracing::info!("Data directory: {}", data_dir.display());

    let store = FileStore::new(&data_dir)
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;
    let notebook = NotebookStore::new(Box::new(store), config.storage.notebook_key.clone());
    let audio_sink = Arc::new(FileAudioSink::new(&data_dir));

    let state = Arc::new(
        AppState::new(config, notebook, audio_sink, Box::new(gemini_gateway))?
            .with_profile(profiles, args.profile),
    );

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("task exited"),
                Ok(Err(e)) => tracing::error!("task failed: {e:#}"),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.abort_all();
    while tasks.join_next().await.is_some() {}

    Ok(())
}
