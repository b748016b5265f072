//! Fan token pipeline CLI: stage triggers for the fetch-and-join engine.
//!
//! Commands:
//! - `auctions`: fetch all completed fan token auctions and persist the
//!   listing artifact
//! - `earnings`: join lifetime earnings against an existing listing artifact
//!   and persist the enriched JSON and CSV artifacts
//! - `run`: both stages in sequence
//!
//! Each command stands in for the external scheduler trigger that invokes the
//! corresponding pipeline stage once its upstream artifact is available.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fantoken_core::client::HttpTransport;
use fantoken_core::pipeline::{fetch_auctions, EntityJoinPipeline};
use fantoken_core::{ApiConfig, ArtifactStore};
use std::path::PathBuf;

/// Environment variable consulted for the auth token when `--token` is not
/// given. Read here at the CLI boundary only; the core receives an explicit
/// config struct.
const AUTH_TOKEN_VAR: &str = "GRAPHQL_AUTH_TOKEN";

#[derive(Parser)]
#[command(
    name = "fantoken",
    about = "Fan token data pipeline: fetch auctions and lifetime earnings, join, export"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// API endpoint URL (overrides config file).
    #[arg(long)]
    endpoint: Option<String>,

    /// Auth token (overrides config file and GRAPHQL_AUTH_TOKEN).
    #[arg(long)]
    token: Option<String>,

    /// Artifact directory. Defaults to ./data.
    #[arg(long, default_value = "data")]
    artifact_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all completed fan token auctions and persist the listing artifact.
    Auctions {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Fetch lifetime earnings, join symbols from the listing artifact, and
    /// persist the enriched JSON and CSV artifacts.
    Earnings {
        #[command(flatten)]
        common: CommonArgs,

        /// Entities per earnings query batch (overrides config file).
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Run both stages in sequence.
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Entities per earnings query batch (overrides config file).
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Auctions { common } => {
            let config = resolve_config(&common, None)?;
            run_auctions(&config, &ArtifactStore::new(&common.artifact_dir))
        }
        Commands::Earnings { common, batch_size } => {
            let config = resolve_config(&common, batch_size)?;
            run_earnings(&config, &ArtifactStore::new(&common.artifact_dir))
        }
        Commands::Run { common, batch_size } => {
            let config = resolve_config(&common, batch_size)?;
            let store = ArtifactStore::new(&common.artifact_dir);
            run_auctions(&config, &store)?;
            run_earnings(&config, &store)
        }
    }
}

/// Build the engine config: TOML file if given, otherwise flags and the
/// token environment variable; flags win over the file.
fn resolve_config(common: &CommonArgs, batch_size: Option<usize>) -> Result<ApiConfig> {
    let mut config = match &common.config {
        Some(path) => ApiConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let token = match &common.token {
                Some(token) => token.clone(),
                None => match std::env::var(AUTH_TOKEN_VAR) {
                    Ok(token) if !token.is_empty() => token,
                    _ => bail!("no auth token: pass --token or set {AUTH_TOKEN_VAR}"),
                },
            };
            ApiConfig::new(token)
        }
    };

    if let Some(endpoint) = &common.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(token) = &common.token {
        config.auth_token = token.clone();
    }
    if let Some(batch_size) = batch_size {
        config.batch_size = batch_size;
    }
    config.validate()?;
    Ok(config)
}

fn run_auctions(config: &ApiConfig, store: &ArtifactStore) -> Result<()> {
    let transport = HttpTransport::new(config)?;
    let auctions = fetch_auctions(&transport, config)?;

    let total: usize = auctions.values().map(Vec::len).sum();
    let path = store.write_auctions(&auctions)?;
    println!("Wrote {total} auctions to {}", path.display());
    Ok(())
}

fn run_earnings(config: &ApiConfig, store: &ArtifactStore) -> Result<()> {
    let auctions = store.read_auctions().with_context(|| {
        format!(
            "failed to read the auctions artifact from {} (run `fantoken auctions` first)",
            store.dir().display()
        )
    })?;

    let transport = HttpTransport::new(config)?;
    let pipeline = EntityJoinPipeline::new(&transport, config);
    let enriched = pipeline.run(&auctions)?;

    let json_path = store.write_earnings(&enriched)?;
    let csv_path = store.export_earnings_csv(&enriched)?;
    println!(
        "Wrote {} enriched earnings to {} and {}",
        enriched.len(),
        json_path.display(),
        csv_path.display()
    );
    Ok(())
}
