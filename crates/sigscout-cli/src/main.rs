mod run;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sigscout_listener::Platform;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sigscout")]
#[command(about = "Generate a Daily Briefing from social keyword signals")]
struct Cli {
    /// Which platform to query (default: all enabled)
    #[arg(long, short, value_enum, default_value_t = PlatformArg::All)]
    platform: PlatformArg,

    /// Load configuration and context, then exit without fetching,
    /// scoring, or writing
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlatformArg {
    Bluesky,
    Youtube,
    Twitter,
    All,
}

impl PlatformArg {
    /// `None` means every enabled platform runs.
    fn selection(self) -> Option<Platform> {
        match self {
            PlatformArg::Bluesky => Some(Platform::Bluesky),
            PlatformArg::Youtube => Some(Platform::Youtube),
            PlatformArg::Twitter => Some(Platform::Twitter),
            PlatformArg::All => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // Top-level config load failure is the one fatal configuration error.
    let config = sigscout_core::load_config(&cli.config)?;

    run::run(&config, cli.platform.selection(), cli.dry_run).await
}
