#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, InfoStrategy, InitStrategy, PollInput, PollStrategy, VersionStrategy,
    WatchInput, WatchStrategy,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod command;

#[derive(Parser)]
#[command(name = "sbarro")]
#[command(about = "Tray-count sensor over a vision detection service", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/sbarro/config.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take one reading and print it as JSON
    Poll {
        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Take a reading every interval until interrupted
    Watch {
        /// Seconds between polls
        #[arg(short, long, default_value_t = 5)]
        interval: u64,

        /// Stop after this many polls
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },
    /// Show the loaded configuration
    Info,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Poll { compact } => {
            PollStrategy
                .execute(PollInput {
                    config_path: cli.config,
                    compact,
                })
                .await
        }
        Commands::Watch { interval, count } => {
            WatchStrategy
                .execute(WatchInput {
                    config_path: cli.config,
                    interval_secs: interval,
                    count,
                })
                .await
        }
        Commands::Info => InfoStrategy.execute(cli.config).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
