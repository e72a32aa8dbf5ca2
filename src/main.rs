use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use figvar::config::PluginSettings;
use figvar::document::VariablesDocument;
use figvar::export::css::graph_css;
use figvar::export::export_document;
use figvar::graph::memory::MemoryGraph;
use figvar::import::import_document;
use figvar::plugin::PluginSession;
use figvar::server::run_http_server;

#[derive(Debug, Parser)]
#[command(
    name = "figvar",
    about = "Sync design variables with JSON documents and CSS custom properties"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the plugin message protocol over HTTP.
    Serve {
        /// Address to bind; defaults to FIGVAR_BIND.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Import a variables document and print it as CSS.
    Css { path: PathBuf },
    /// Import a variables document and print the re-exported JSON.
    Json {
        path: PathBuf,
        #[arg(long)]
        compact: bool,
    },
    /// Feed newline-delimited plugin requests to a session and print every
    /// outbound message as one JSON line.
    Replay { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = PluginSettings::from_env().context("failed to load configuration")?;
    let _guard = init_tracing(&settings)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind_addr.clone());
            run_http_server(&settings, &bind).await?;
        }
        Commands::Css { path } => {
            let graph = import_file(&settings, &path).await?;
            print!("{}", graph_css(&graph).await?);
        }
        Commands::Json { path, compact } => {
            let graph = import_file(&settings, &path).await?;
            let document = export_document(&graph).await?;
            let text = if compact {
                document.to_json_compact()?
            } else {
                document.to_json_pretty()?
            };
            println!("{text}");
        }
        Commands::Replay { path } => replay_requests(&settings, &path).await?,
    }

    Ok(())
}

async fn import_file(settings: &PluginSettings, path: &Path) -> Result<MemoryGraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read variables document `{}`", path.display()))?;
    let document = VariablesDocument::from_json(&text)
        .with_context(|| format!("failed to parse `{}`", path.display()))?;

    let mut graph = MemoryGraph::new(settings.document_name.clone());
    import_document(&mut graph, &document)
        .await
        .with_context(|| format!("failed to import `{}`", path.display()))?;
    Ok(graph)
}

async fn replay_requests(settings: &PluginSettings, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read request log `{}`", path.display()))?;
    let mut session = PluginSession::new(MemoryGraph::new(settings.document_name.clone()));

    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let messages = session
            .handle_json(line)
            .await
            .with_context(|| format!("request on line {} failed", index + 1))?;
        for message in messages {
            println!("{}", serde_json::to_string(&message)?);
        }
    }

    Ok(())
}

/// Console logging goes to stderr so CSS and JSON output stay clean on stdout.
fn init_tracing(settings: &PluginSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,figvar=debug"));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(env_filter);

    let (file_layer, guard) = match &settings.log_dir {
        Some(log_dir) => {
            let file_filter = EnvFilter::try_new(&settings.file_log_filter).with_context(|| {
                format!("invalid FIGVAR_FILE_LOG `{}`", settings.file_log_filter)
            })?;
            let appender = tracing_appender::rolling::daily(log_dir, "figvar.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(guard)
}
