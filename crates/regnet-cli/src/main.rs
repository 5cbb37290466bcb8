//! regnet command-line binary.
//!
//! Two subcommands: `import` loads a directory of extractor mention files
//! (plus the article metadata sidecar) into a SQLite graph database, and
//! `serve` exposes that database through the read-only JSON query API.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use regnet_api::api_router;
use regnet_core::store::GraphStore as _;
use regnet_ingest::{Importer, load_metadata};
use regnet_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Biomedical interaction-mention graph")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import extractor mention files into the graph database.
  Import {
    /// Path to the SQLite database (created if absent).
    #[arg(long, default_value = "regnet.db")]
    db:       PathBuf,
    /// Directory of per-document mention JSON files.
    #[arg(short, long, default_value = "data/")]
    data:     PathBuf,
    /// Path to the article metadata JSON file.
    #[arg(short, long, default_value = "articles_metadata.json")]
    metadata: PathBuf,
  },
  /// Serve the read-only query API over HTTP.
  Serve {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    /// Override the configured database path.
    #[arg(long)]
    db:     Option<PathBuf>,
    /// Override the configured listen host.
    #[arg(long)]
    host:   Option<String>,
    /// Override the configured listen port.
    #[arg(long)]
    port:   Option<u16>,
  },
}

/// Settings for `serve`, layered file < `REGNET_*` env < CLI flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ServeConfig {
  db_path: PathBuf,
  host:    String,
  port:    u16,
}

impl Default for ServeConfig {
  fn default() -> Self {
    Self {
      db_path: PathBuf::from("regnet.db"),
      host:    "127.0.0.1".to_string(),
      port:    8000,
    }
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  match Cli::parse().command {
    Command::Import { db, data, metadata } => import(db, data, metadata).await,
    Command::Serve {
      config,
      db,
      host,
      port,
    } => serve(config, db, host, port).await,
  }
}

async fn import(
  db: PathBuf,
  data: PathBuf,
  metadata: PathBuf,
) -> anyhow::Result<()> {
  let store = SqliteStore::open(&db)
    .await
    .with_context(|| format!("failed to open store at {db:?}"))?;
  let metadata = load_metadata(&metadata)
    .with_context(|| format!("failed to read metadata at {metadata:?}"))?;

  tracing::info!("Importing mention files from {data:?}");
  let mut importer = Importer::new(&store, metadata);
  let report = importer
    .import_dir(&data)
    .await
    .context("import run failed")?;

  let stats = store.stats().await.context("failed to read graph stats")?;
  tracing::info!(
    participants = stats.participants,
    descriptions = stats.descriptions,
    interactions = stats.interactions,
    journals = stats.journals,
    articles = stats.articles,
    significances = stats.significances,
    evidences = stats.evidences,
    "graph totals after import"
  );
  tracing::info!(
    documents_imported = report.documents_imported,
    documents_skipped = report.documents_skipped,
    mentions_imported = report.mentions_imported,
    mentions_skipped = report.mentions_skipped,
    "import complete"
  );
  Ok(())
}

async fn serve(
  config_path: PathBuf,
  db: Option<PathBuf>,
  host: Option<String>,
  port: Option<u16>,
) -> anyhow::Result<()> {
  let settings = config::Config::builder()
    .add_source(config::File::from(config_path).required(false))
    .add_source(config::Environment::with_prefix("REGNET"))
    .build()
    .context("failed to read config file")?;

  let mut cfg: ServeConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServeConfig")?;
  if let Some(db) = db {
    cfg.db_path = db;
  }
  if let Some(host) = host {
    cfg.host = host;
  }
  if let Some(port) = port {
    cfg.port = port;
  }

  let store = SqliteStore::open(&cfg.db_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.db_path))?;

  let app = api_router(Arc::new(store))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

  let address = format!("{}:{}", cfg.host, cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
