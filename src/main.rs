use anyhow::{Context, Result};
use changelog_core::{Changelog, Config};
use clap::Parser;
use graph::GitStore;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Render the commits between two points in history as a Markdown changelog
#[derive(Parser, Debug)]
#[command(name = "changelog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Start commit, as a hash or reference; excluded from the report
    #[arg(long)]
    start: String,

    /// End commit, as a hash or reference
    #[arg(long, default_value = "HEAD")]
    end: String,

    /// Path to the repository (discovered from the current directory by default)
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Project configuration file
    #[arg(long, default_value = "changelog.json")]
    config: PathBuf,

    /// Commit hash digits to show; zero or less shows full hashes
    #[arg(long, allow_hyphen_values = true)]
    digits: Option<i64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout may carry the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(&cli.config)?;
    if let Some(digits) = cli.digits {
        config.commit_hash_digits = digits;
    }

    let store = GitStore::open(cli.repo.as_deref()).with_context(|| match &cli.repo {
        Some(path) => format!("failed to open repository {}", path.display()),
        None => "failed to find a repository from the current directory".to_string(),
    })?;

    let changelog = Changelog::new(store, &config)?;
    let report = changelog.generate(&cli.start, &cli.end)?;

    // Only touch the destination once the whole report exists
    match &cli.out {
        Some(path) => {
            std::fs::write(path, &report.text)
                .with_context(|| format!("failed to write output file {}", path.display()))?;
            info!("wrote {} commits to {}", report.chain.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(report.text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write report to stdout")?;
        }
    }

    Ok(())
}
