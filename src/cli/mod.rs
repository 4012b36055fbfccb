pub mod commands;
pub mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find career pages for every company in a file
    Run {
        /// File with one company name per line
        #[arg(short, long, default_value = "standardized_companies.txt")]
        input: PathBuf,

        /// Output base name; .csv and .json are written next to each other
        #[arg(short, long, default_value = "company_career_pages")]
        output: PathBuf,

        /// Configuration profile to use
        #[arg(short, long)]
        profile: Option<String>,

        /// Number of companies processed in parallel
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Start without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Look up a few companies and print the results
    Lookup {
        /// Company names
        #[arg(required = true)]
        companies: Vec<String>,

        /// Known homepage, skips the search (single company only)
        #[arg(long)]
        homepage: Option<String>,

        /// Save results under this base name
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration profile to use
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Manage configuration profiles
    Config {
        /// Profile name to manage
        #[arg(required = false)]
        profile: Option<String>,

        /// List all available profiles
        #[arg(short, long)]
        list: bool,
    },
}

/// Parse command line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Process the command
pub async fn process_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { input, output, profile, concurrency, yes } => {
            info!("Starting batch from {}", input.display());
            commands::run(input, output, profile, concurrency, yes).await
        },
        Commands::Lookup { companies, homepage, output, profile } => {
            info!("Looking up {} companies", companies.len());
            commands::lookup(companies, homepage, output, profile).await
        },
        Commands::Config { profile, list } => {
            if list {
                commands::list_profiles()
            } else if let Some(profile_name) = profile {
                info!("Managing configuration profile: {}", profile_name);
                commands::manage_profile(profile_name)
            } else {
                commands::show_config()
            }
        },
    }
}
