use anyhow::{Result, Context};
use chrono::Utc;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::batch::{load_companies, BatchRunner};
use crate::cli::config::FinderConfig;
use crate::discovery::{DiscoveryEngine, DiscoveryResult};
use crate::storage::{save_results_in_background, Summary};
use crate::utils::metrics::{Metrics, MetricsCollector, RequestKind};

fn load_config(profile: Option<&str>) -> Result<FinderConfig> {
    match profile {
        Some(name) => FinderConfig::load_profile(name)
            .context(format!("Failed to load profile: {}", name)),
        None => FinderConfig::load_default(),
    }
}

/// Process every company in the input file
pub async fn run(
    input: PathBuf,
    output: PathBuf,
    profile: Option<String>,
    concurrency: Option<usize>,
    yes: bool,
) -> Result<()> {
    let mut config = load_config(profile.as_deref())?;

    if let Some(c) = concurrency {
        config.batch.concurrency = c;
    }
    config.validate()?;

    let companies = load_companies(&input)?;

    println!("Career Page Finder");
    println!("{}", "=".repeat(60));
    println!("This will:");
    println!("  - Search for the main website of {} companies", companies.len());
    println!("  - Find career/jobs pages on their websites");
    println!("  - Save results in CSV and JSON format");
    println!("  - Generate summary statistics");
    println!("{}", "=".repeat(60));

    if !yes && !confirm("Do you want to proceed? (yes/no): ")? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let metrics = MetricsCollector::new();
    let engine = Arc::new(DiscoveryEngine::from_config(&config, metrics.clone())?);
    let runner = BatchRunner::new(engine, &config.batch, output);

    let results = runner.run(&companies).await?;

    print!("{}", Summary::from_results(&results));
    log_metrics(&metrics.get_metrics().await);

    Ok(())
}

/// Run discovery for a handful of companies and print what was found
pub async fn lookup(
    companies: Vec<String>,
    homepage: Option<String>,
    output: Option<PathBuf>,
    profile: Option<String>,
) -> Result<()> {
    if homepage.is_some() && companies.len() != 1 {
        anyhow::bail!("--homepage can only be used with a single company");
    }

    let config = load_config(profile.as_deref())?;
    let metrics = MetricsCollector::new();
    let engine = DiscoveryEngine::from_config(&config, metrics.clone())?;

    let mut results = Vec::with_capacity(companies.len());
    for company in &companies {
        let result = engine.find_career_page(company, homepage.as_deref()).await;
        print_result(&result);
        results.push(result);
    }

    if let Some(base) = output {
        save_results_in_background(results, base).await?;
    }

    log_metrics(&metrics.get_metrics().await);

    Ok(())
}

fn print_result(result: &DiscoveryResult) {
    println!("{}", result.company);
    println!("  Main website: {}", result.main_website());

    if let Some(cause) = result.error_cause() {
        println!("  Error: {}", cause);
    }

    if result.career_urls().is_empty() {
        println!("  No career page found");
    } else {
        println!("  Found {} career page(s):", result.career_urls().len());
        for url in result.career_urls() {
            println!("    {}", url);
        }
    }
}

fn log_metrics(metrics: &Metrics) {
    let elapsed = Utc::now() - metrics.start_time;
    info!(
        "Requests: {} total, {} successful, {} failed in {}s",
        metrics.total_requests, metrics.successful_requests, metrics.failed_requests, elapsed.num_seconds()
    );

    for kind in [RequestKind::Search, RequestKind::Page, RequestKind::Probe] {
        if let Some(counts) = metrics.by_kind.get(&kind) {
            info!(
                "  {}: {} requests, {} successful, {} failed, avg {} ms",
                kind,
                counts.total,
                counts.successful,
                counts.failed,
                metrics.average_ms(kind).unwrap_or(0)
            );
        }
    }

    let mut status_codes: Vec<_> = metrics.status_codes.iter().collect();
    status_codes.sort();
    debug!("Status codes: {:?}", status_codes);
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

/// List all available configuration profiles
pub fn list_profiles() -> Result<()> {
    let profiles = FinderConfig::list_profiles()?;

    println!("Available configuration profiles:");
    for profile in profiles {
        println!("  - {}", profile);
    }

    Ok(())
}

/// Show a profile, creating it from defaults if it does not exist
pub fn manage_profile(profile_name: String) -> Result<()> {
    match FinderConfig::load_profile(&profile_name) {
        Ok(config) => {
            println!("Profile: {}", profile_name);
            println!("{:#?}", config);
        },
        Err(_) => {
            warn!("Profile '{}' does not exist. Creating a default profile.", profile_name);
            let config = FinderConfig::default();
            config.save_as_profile(&profile_name)?;
            println!("Created default profile: {}", profile_name);
        }
    }

    Ok(())
}

/// Show the current configuration
pub fn show_config() -> Result<()> {
    let config = FinderConfig::load_default()?;
    println!("Current configuration:");
    println!("{:#?}", config);

    Ok(())
}
