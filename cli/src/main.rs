//! CLI for the app repository matcher.
//!
//! Matches app packages to their GitHub repositories and downloads
//! repository metadata, staying within the GitHub API rate limits.

use app_repo_matcher::{load_settings, Runner, RunnerConfig, RunnerError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// App Repo Matcher - Resolve app packages to GitHub repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_AUTH_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Path to a TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match packages to repositories using their app details.
    Match {
        /// CSV with `package` and `all_repos` columns.
        #[arg(long)]
        package_to_repo: PathBuf,

        /// Directory of `<package>.json` app details files.
        #[arg(long)]
        details_dir: PathBuf,

        /// Output CSV of `package_name,repository` rows.
        #[arg(long)]
        out: PathBuf,
    },

    /// Download metadata and commit counts of repositories.
    RepoData {
        /// Header-less CSV of `package,repository` rows.
        #[arg(long)]
        package_list: PathBuf,

        /// Output CSV of repository records.
        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // octocrab needs a process-wide rustls provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic. Returns the run summary as pretty JSON.
async fn run(args: Args) -> Result<String, RunnerError> {
    let settings = load_settings(args.config.as_deref())?;
    let runner = Runner::new(RunnerConfig::new(args.token, settings))?;

    let summary = match args.command {
        Command::Match {
            package_to_repo,
            details_dir,
            out,
        } => {
            let summary = runner
                .match_packages(&package_to_repo, &details_dir, &out)
                .await?;
            serde_json::to_string_pretty(&summary)
        }
        Command::RepoData { package_list, out } => {
            let summary = runner.download_repo_data(&package_list, &out).await?;
            serde_json::to_string_pretty(&summary)
        }
    };

    summary.map_err(|source| RunnerError::Json {
        path: "<summary>".to_string(),
        source,
    })
}
