//! CLI binary for appicon.

use std::path::PathBuf;

use anyhow::Context as _;
use appicon::assets::WarmSource;
use appicon::{AppConfig, AppContext, AppError, MergePolicy, ScoredResultSet, SearchError};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

/// AppIcon: find apps across regional storefronts and save their icons.
#[derive(Parser)]
#[command(name = "appicon", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search the catalog and list ranked matches.
    Search {
        /// App name, in any script.
        query: String,
        /// Print the ranked set as JSON.
        #[arg(long)]
        json: bool,
        /// Region merge policy: fallback or union.
        #[arg(long)]
        policy: Option<MergePolicy>,
    },

    /// Search and save one result's icon.
    Download {
        /// App name, in any script.
        query: String,
        /// 1-based position in the ranked list.
        #[arg(long, default_value_t = 1)]
        index: usize,
        /// Destination directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Load or refresh the ambient icon pool.
    Warm {
        /// Refetch even if the persisted pool is still fresh.
        #[arg(long)]
        force: bool,
    },

    /// Print the ambient icon pool.
    Icons,

    /// Stream random icons from the pool at the configured interval.
    Rain {
        /// Number of icons to print before stopping.
        #[arg(long, default_value_t = 10)]
        count: usize,
    },

    /// Print the effective configuration.
    Config {
        /// Also write it to the config file.
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    appicon::logging::init_tracing(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)
        .with_context(|| format!("cannot load {}", config_path.display()))?;

    if let Command::Search {
        policy: Some(policy),
        ..
    } = &cli.command
    {
        config.search.policy = *policy;
    }

    if let Command::Config { write } = &cli.command {
        return show_config(&config, &config_path, *write);
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Command::Search { query, json, .. } => run_search(&ctx, &query, json).await,
        Command::Download { query, index, dir } => run_download(&ctx, &query, index, dir).await,
        Command::Warm { force } => run_warm(&ctx, force).await,
        Command::Icons => run_icons(&ctx).await,
        Command::Rain { count } => run_rain(&ctx, count).await,
        Command::Config { .. } => Ok(()),
    }
}

/// Search, mapping a total outage to the one user-facing failure message.
async fn search_or_report(ctx: &AppContext, query: &str) -> anyhow::Result<ScoredResultSet> {
    match ctx.search(query).await {
        Ok(set) => Ok(set),
        Err(AppError::Search(SearchError::SearchFailed(detail))) => {
            tracing::error!(%detail, "search failed");
            anyhow::bail!("Search failed, please try again")
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_search(ctx: &AppContext, query: &str, json: bool) -> anyhow::Result<()> {
    let set = search_or_report(ctx, query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    if set.is_empty() {
        println!("No results found");
        return Ok(());
    }

    let regions: Vec<_> = set.regions.iter().map(|r| r.code()).collect();
    println!("{} results for \"{}\" ({})", set.len(), set.term, regions.join(", "));
    for (i, app) in set.apps.iter().enumerate() {
        println!(
            "{:>3}. {}  [{:.1} / {} ratings]  score {:.1}",
            i + 1,
            app.record.name,
            app.record.rating,
            app.record.rating_count,
            app.scores.total
        );
        println!("     {}", app.record.artwork_url);
    }
    Ok(())
}

async fn run_download(
    ctx: &AppContext,
    query: &str,
    index: usize,
    dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let set = search_or_report(ctx, query).await?;
    if set.is_empty() {
        println!("No results found");
        return Ok(());
    }

    let app = index
        .checked_sub(1)
        .and_then(|i| set.apps.get(i))
        .with_context(|| format!("index {index} out of range (1..={})", set.len()))?;

    let saved = ctx.download(app, dir.as_deref()).await?;
    println!("Saved {} to {}", app.record.name, saved.display());
    Ok(())
}

const POOL_DISABLED: &str = "Ambient icons are disabled in the configuration";

async fn run_warm(ctx: &AppContext, force: bool) -> anyhow::Result<()> {
    let report = ctx.warm_assets(force).await?;
    if report.source == WarmSource::Disabled {
        println!("{POOL_DISABLED}");
        return Ok(());
    }
    println!(
        "{} icons ({:?}), {} catalog names unresolved",
        report.count, report.source, report.failed
    );
    Ok(())
}

async fn run_icons(ctx: &AppContext) -> anyhow::Result<()> {
    if ctx.warm_assets(false).await?.source == WarmSource::Disabled {
        println!("{POOL_DISABLED}");
        return Ok(());
    }
    for url in ctx.icon_snapshot().await {
        println!("{url}");
    }
    Ok(())
}

async fn run_rain(ctx: &AppContext, count: usize) -> anyhow::Result<()> {
    if ctx.warm_assets(false).await?.source == WarmSource::Disabled {
        println!("{POOL_DISABLED}");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let mut rx = ctx.start_icon_rain(cancel.clone()).await;
    let mut printed = 0;
    while printed < count {
        tokio::select! {
            next = rx.recv() => match next {
                Some(url) => {
                    println!("{url}");
                    printed += 1;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    cancel.cancel();
    Ok(())
}

fn show_config(config: &AppConfig, path: &std::path::Path, write: bool) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    if write {
        config.save_to_file(path)?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}
