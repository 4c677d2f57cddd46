//! CLI binary for open-data-explorer.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use open_data_explorer::{Explorer, ExplorerConfig, FixedQueries, SelectAll, SelectIds};
use tracing_subscriber::EnvFilter;

/// Search an open data catalog with several queries at once.
#[derive(Parser)]
#[command(name = "ode", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Run every query concurrently and print the merged results as JSON.
    Search {
        /// Keep only these resource ids (repeatable).
        #[arg(short, long = "select")]
        select: Vec<String>,

        /// Catalog queries.
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Write the default configuration to a file.
    InitConfig {
        /// Destination; defaults to the standard config location.
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("open_data_explorer=info,socrata_search=info")
        }))
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => ExplorerConfig::from_file(path)?,
        None => {
            let path = ExplorerConfig::default_config_path();
            if path.exists() {
                ExplorerConfig::from_file(&path)?
            } else {
                ExplorerConfig::default()
            }
        }
    };

    match cli.command {
        Command::Search { select, queries } => run_search(config, queries, select).await,
        Command::InitConfig { path } => {
            let path = path.unwrap_or_else(ExplorerConfig::default_config_path);
            ExplorerConfig::default().save_to_file(&path)?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}

async fn run_search(
    config: ExplorerConfig,
    queries: Vec<String>,
    select: Vec<String>,
) -> anyhow::Result<()> {
    let search = config.catalog.to_search_config();
    let generator = FixedQueries(queries);
    let user_query = generator.0.join(" ");

    let exploration = if select.is_empty() {
        Explorer::new(generator, SelectAll, search)
            .explore(&user_query)
            .await?
    } else {
        let ids: HashSet<String> = select.into_iter().collect();
        Explorer::new(generator, SelectIds(ids), search)
            .explore(&user_query)
            .await?
    };

    for failure in &exploration.failures {
        tracing::warn!(query = %failure.query, error = %failure.error, "query skipped");
    }

    println!("{}", serde_json::to_string_pretty(&exploration.selected)?);
    Ok(())
}
