//! CLI application for credit-card statement field extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, extract};

/// Extract structured fields from credit-card statement text
#[derive(Parser)]
#[command(name = "cardiq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a banks config file (JSON)
    #[arg(short, long, global = true)]
    banks: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from a single statement text file
    Extract(extract::ExtractArgs),

    /// Extract fields from multiple statement text files
    Batch(batch::BatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.banks.as_deref()),
        Commands::Batch(args) => batch::run(args, cli.banks.as_deref()),
    }
}
