#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use playlist_keeper::{
    download::download,
    loader::Loader,
    server::{self, AppState},
    source::PlaylistSource,
    store::PlaylistStore,
    util::{init_http_client, spawn_ct_watcher},
};

/// Serves an IPTV / HLS playlist over a paginated HTTP API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Playlist location: `http(s)://` URL, `file://` URL or filesystem path
    #[arg(short, long, env = "PLAYLIST_SOURCE", required = true)]
    source: Option<PlaylistSource>,

    /// Address the HTTP API listens on
    #[arg(short, long, env = "BIND_ADDRESS", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Timeout for fetching a remote playlist, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 20)]
    timeout_secs: u64,

    /// Largest playlist body accepted from a remote source
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 64 * 1024 * 1024)]
    max_body_bytes: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Saves a remote playlist to a local file, as-is
    Download {
        /// Playlist URL
        #[arg(short, long)]
        source: PlaylistSource,

        /// File the playlist is written to
        #[arg(short, long, default_value = "playlist.m3u")]
        output: PathBuf,

        /// Download timeout, in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Largest playlist body accepted
        #[arg(long, default_value_t = 64 * 1024 * 1024)]
        max_body_bytes: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Some(Command::Download {
            source,
            output,
            timeout_secs,
            max_body_bytes,
        }) => {
            let client = init_http_client(Duration::from_secs(timeout_secs))
                .context("Building HTTP client")?;
            download(&client, &source, &output, max_body_bytes)
                .await
                .context("Downloading playlist")?;
            Ok(())
        }
        None => serve(args.serve).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let source = args.source.context("--source is required")?;
    info!("Playlist source: {source}");

    let client = init_http_client(Duration::from_secs(args.timeout_secs))
        .context("Building HTTP client")?;
    let loader = Arc::new(Loader {
        client,
        source,
        max_body_bytes: args.max_body_bytes,
    });
    let store = PlaylistStore::new();

    loader.startup(&store).await;

    let ct = CancellationToken::new();
    spawn_ct_watcher(ct.clone());

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Launching HTTP server on {}", args.bind))?;
    info!("Listening on http://{}", args.bind);

    axum::serve(listener, server::router(AppState { store, loader }))
        .with_graceful_shutdown(ct.cancelled_owned())
        .await
        .context("Serving HTTP API")?;

    info!("All done successfully!");

    Ok(())
}
