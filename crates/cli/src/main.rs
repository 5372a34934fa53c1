//! backlog-sync CLI entry point.
//!
//! This binary is the composition root for the workspace:
//!
//! 1. **Parse arguments**, with environment fallbacks (a `.env` file in the
//!    working directory is loaded first).
//! 2. **Wire logging**: `tracing-subscriber` with an `EnvFilter` and a text or
//!    JSON formatter. Every event emitted by the library crates flows through it.
//! 3. **Construct infrastructure**: build the [`GitHubIssueTracker`] and inject
//!    it into the [`SyncRunner`].
//!
//! Per-item remote failures do not change the exit code; anything that aborts
//! the run (bad configuration, missing credential, failed listing) does.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use backlog::{load_items, ItemKind, SyncSettings, DEFAULT_CONFIG_PATH, DEFAULT_ID_PREFIX};
use clap::{Parser, ValueEnum};
use github::{GitHubConfig, GitHubIssueTracker, RepositorySlug, DEFAULT_API_URL};
use reconcile::{SyncRunner, SyncScope};
use tracing::{info, info_span, Instrument};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Mirror a YAML backlog into GitHub issues.
#[derive(Debug, Parser)]
#[command(name = "backlog-sync")]
#[command(version)]
struct Cli {
    /// Which level of the hierarchy to sync
    #[arg(value_enum, ignore_case = true)]
    scope: ScopeArg,

    /// Close managed issues whose identifier is no longer in the configuration
    #[arg(long)]
    prune: bool,

    /// Path to the backlog YAML file
    #[arg(long, env = "BACKLOG_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Target repository (owner/repo format)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Identifier prefix, e.g. PALI for PALI-E1-S2
    #[arg(long, env = "BACKLOG_ID_PREFIX", default_value = DEFAULT_ID_PREFIX)]
    prefix: String,

    /// Comma-separated set of recognised priority labels
    #[arg(long, env = "BACKLOG_PRIORITY_LABELS", value_delimiter = ',', default_value = "P0,P1,P2")]
    priority_labels: Vec<String>,

    /// GitHub REST base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    Epic,
    Story,
    Task,
    Subtask,
    All,
}

impl From<ScopeArg> for SyncScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Epic => SyncScope::Kind(ItemKind::Epic),
            ScopeArg::Story => SyncScope::Kind(ItemKind::Story),
            ScopeArg::Task => SyncScope::Kind(ItemKind::Task),
            ScopeArg::Subtask => SyncScope::Kind(ItemKind::Subtask),
            ScopeArg::All => SyncScope::All,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

fn init_logging(format: LogFormat, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer().with_target(false)).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

fn read_token() -> Result<String> {
    match std::env::var(TOKEN_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => bail!("{TOKEN_VAR} is not set; export it or add it to .env"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose);

    let token = read_token()?;
    let repository: RepositorySlug = cli.repository.parse()?;
    let settings = SyncSettings::new(&cli.config, &cli.prefix, &cli.priority_labels)?;

    let items = load_items(settings.config_path(), settings.grammar())
        .with_context(|| format!("failed to load backlog from {}", cli.config.display()))?;

    let config = GitHubConfig::new(repository, token).with_api_url(cli.api_url);
    let tracker = GitHubIssueTracker::new(&config).context("failed to build GitHub client")?;

    let scope = SyncScope::from(cli.scope);
    let span = info_span!("sync_run", run_id = %Uuid::new_v4(), %scope, prune = cli.prune);

    async {
        info!(
            repository = %config.repository,
            items = items.len(),
            config = %cli.config.display(),
            "Starting sync"
        );
        SyncRunner::new(&tracker, &settings)
            .run(&items, scope, cli.prune)
            .await
            .context("sync aborted")
    }
    .instrument(span)
    .await?;

    Ok(())
}
