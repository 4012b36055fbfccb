use anyhow::Result;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::cli::config::FinderConfig;
use crate::discovery::classifier::LinkClassifier;
use crate::discovery::error::DiscoveryError;
use crate::discovery::http::build_client;
use crate::discovery::resolver::{HomepageResolver, SearchResolver};
use crate::discovery::result::{DiscoveryResult, HomepageSource};
use crate::utils::metrics::{MetricsCollector, RequestKind};

/// Finds career pages for a company, starting from its homepage.
pub struct DiscoveryEngine {
    resolver: Arc<dyn HomepageResolver>,
    classifier: LinkClassifier,
    probe_paths: Vec<String>,

    /// Session client for homepage fetches
    page_client: Client,

    /// Non-redirecting client for path probes
    probe_client: Client,

    fetch_timeout: Duration,
    probe_timeout: Duration,
    metrics: MetricsCollector,
}

impl DiscoveryEngine {
    /// Create an engine using the configured search resolver
    pub fn from_config(config: &FinderConfig, metrics: MetricsCollector) -> Result<Self> {
        let resolver = SearchResolver::new(
            build_client(&config.http, true)?,
            &config.search,
            Duration::from_millis(config.http.search_timeout_ms),
            metrics.clone(),
        )?;

        Self::with_resolver(config, Arc::new(resolver), metrics)
    }

    pub fn with_resolver(
        config: &FinderConfig,
        resolver: Arc<dyn HomepageResolver>,
        metrics: MetricsCollector,
    ) -> Result<Self> {
        Ok(Self {
            resolver,
            classifier: LinkClassifier::new(&config.discovery.keywords),
            probe_paths: config.discovery.probe_paths.clone(),
            page_client: build_client(&config.http, true)?,
            probe_client: build_client(&config.http, false)?,
            fetch_timeout: Duration::from_millis(config.http.fetch_timeout_ms),
            probe_timeout: Duration::from_millis(config.http.probe_timeout_ms),
            metrics,
        })
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Discover the homepage and up to three career URLs for a company.
    ///
    /// Never fails: resolver and fetch failures are folded into the result.
    pub async fn find_career_page(&self, company: &str, homepage: Option<&str>) -> DiscoveryResult {
        let (homepage, source) = match homepage {
            Some(url) => (url.to_string(), HomepageSource::Caller),
            None => match self.resolver.resolve(company).await {
                Some(url) => (url.to_string(), HomepageSource::Resolver),
                None => return DiscoveryResult::not_found(company),
            },
        };

        let homepage_url = match Url::parse(&homepage) {
            Ok(url) => url,
            Err(e) => {
                let e = DiscoveryError::InvalidUrl { url: homepage.clone(), source: e };
                warn!("Error processing {}: {}", company, e);
                return DiscoveryResult::failed(company, Some(homepage), source, e.to_string());
            }
        };

        let html = match self.fetch_page(&homepage_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Error processing {} ({}): {}", company, e.kind(), e);
                return DiscoveryResult::failed(company, Some(homepage), source, e.to_string());
            }
        };

        let mut career_urls = self.classifier.extract(&html, &homepage_url);
        debug!("Found {} career link(s) on {}", career_urls.len(), homepage_url);

        if career_urls.is_empty() {
            career_urls = self.probe_common_paths(&homepage).await;
        }

        DiscoveryResult::found(company, homepage, career_urls)
    }

    async fn fetch_page(&self, url: &Url) -> Result<String, DiscoveryError> {
        let timer = self.metrics.start_timer();

        let response = match self.page_client.get(url.clone()).timeout(self.fetch_timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_request(RequestKind::Page, false, timer.end(), None).await;
                return Err(e.into());
            }
        };

        // The body is scanned whatever the status; error pages still carry navigation
        let status = response.status();
        if !status.is_success() {
            debug!("Homepage {} answered {}", url, status);
        }

        let body = response.text().await;
        self.metrics.record_request(RequestKind::Page, body.is_ok(), timer.end(), Some(status.as_u16())).await;

        Ok(body?)
    }

    /// Check conventional career paths, keeping those that answer 200.
    async fn probe_common_paths(&self, homepage: &str) -> Vec<Url> {
        let base = homepage.trim_end_matches('/');
        let mut found = Vec::new();

        for suffix in &self.probe_paths {
            let candidate = format!("{}{}", base, suffix);
            let url = match Url::parse(&candidate) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Skipping probe {}: {}", candidate, e);
                    continue;
                }
            };

            if self.probe(&url).await {
                info!("Probe hit: {}", url);
                found.push(url);
            }
        }

        found
    }

    async fn probe(&self, url: &Url) -> bool {
        let timer = self.metrics.start_timer();

        match self.probe_client.head(url.clone()).timeout(self.probe_timeout).send().await {
            Ok(response) => {
                let status = response.status();
                let exists = status == StatusCode::OK;
                self.metrics.record_request(RequestKind::Probe, exists, timer.end(), Some(status.as_u16())).await;
                exists
            }
            Err(e) => {
                debug!("Probe {} failed: {}", url, e);
                self.metrics.record_request(RequestKind::Probe, false, timer.end(), None).await;
                false
            }
        }
    }
}
