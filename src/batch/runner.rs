use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::batch::rate_limit::RateLimiter;
use crate::cli::config::BatchSettings;
use crate::discovery::{DiscoveryEngine, DiscoveryResult};
use crate::storage::export::{checkpoint_base, save_results_in_background};

/// Runs discovery over a list of companies with a bounded worker pool.
pub struct BatchRunner {
    engine: Arc<DiscoveryEngine>,
    limiter: Arc<RateLimiter>,
    concurrency: usize,
    checkpoint_interval: usize,
    output: PathBuf,
}

impl BatchRunner {
    pub fn new(engine: Arc<DiscoveryEngine>, settings: &BatchSettings, output: PathBuf) -> Self {
        let limiter = RateLimiter::new(
            Duration::from_millis(settings.politeness_delay_ms),
            Duration::from_millis(settings.jitter_ms),
        );

        Self {
            engine,
            limiter: Arc::new(limiter),
            concurrency: settings.concurrency.max(1),
            checkpoint_interval: settings.checkpoint_interval.max(1),
            output,
        }
    }

    /// Process every company and save the final results.
    ///
    /// Results come back in input order. Per-company failures are part of the
    /// results; only a failed final save is an error.
    pub async fn run(&self, companies: &[String]) -> Result<Vec<DiscoveryResult>> {
        let total = companies.len();
        info!("Found {} companies to process with {} worker(s)", total, self.concurrency);

        let engine = &self.engine;
        let limiter = &self.limiter;

        let mut pending = stream::iter(companies.iter().enumerate())
            .map(|(index, company)| async move {
                limiter.acquire().await;
                info!("Processing {}/{}: {}", index + 1, total, company);
                engine.find_career_page(company, None).await
            })
            .buffered(self.concurrency);

        let mut results = Vec::with_capacity(total);

        while let Some(result) = pending.next().await {
            log_outcome(&result);
            results.push(result);

            if results.len() % self.checkpoint_interval == 0 {
                self.checkpoint(&results).await;
            }
        }

        save_results_in_background(results.clone(), self.output.clone()).await?;

        Ok(results)
    }

    async fn checkpoint(&self, results: &[DiscoveryResult]) {
        let base = checkpoint_base(&self.output, results.len());

        match save_results_in_background(results.to_vec(), base).await {
            Ok(_) => info!("Progress saved at {} companies", results.len()),
            Err(e) => error!("Failed to save progress at {} companies: {:#}", results.len(), e),
        }
    }
}

fn log_outcome(result: &DiscoveryResult) {
    let urls = result.career_urls();

    if urls.is_empty() {
        info!("{}: no career page found (main website: {})", result.company, result.main_website());
    } else {
        info!("{}: found {} career page(s) (main website: {})", result.company, urls.len(), result.main_website());
        for url in urls {
            info!("    {}", url);
        }
    }
}
