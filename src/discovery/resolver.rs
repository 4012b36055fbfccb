use anyhow::{anyhow, Result, Context};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::cli::config::SearchSettings;
use crate::discovery::error::DiscoveryError;
use crate::utils::metrics::{MetricsCollector, RequestKind};

/// Locates a company's homepage from its name.
///
/// Never fails hard: any error is logged and reported as `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HomepageResolver: Send + Sync {
    async fn resolve(&self, company: &str) -> Option<Url>;
}

/// Resolver backed by a search engine's HTML results page.
///
/// The result markup is unversioned and may change without notice, so the
/// selector lives in configuration.
pub struct SearchResolver {
    client: Client,
    endpoint: Url,
    query_suffix: String,
    result_selector: Selector,
    timeout: Duration,
    metrics: MetricsCollector,
}

impl SearchResolver {
    pub fn new(client: Client, settings: &SearchSettings, timeout: Duration, metrics: MetricsCollector) -> Result<Self> {
        let endpoint = Url::parse(&settings.endpoint)
            .context(format!("Invalid search endpoint: {}", settings.endpoint))?;

        let result_selector = Selector::parse(&settings.result_selector)
            .map_err(|e| anyhow!("Invalid result selector '{}': {:?}", settings.result_selector, e))?;

        Ok(Self {
            client,
            endpoint,
            query_suffix: settings.query_suffix.clone(),
            result_selector,
            timeout,
            metrics,
        })
    }

    fn query_for(&self, company: &str) -> String {
        if self.query_suffix.is_empty() {
            company.to_string()
        } else {
            format!("{} {}", company, self.query_suffix)
        }
    }

    async fn fetch_results_page(&self, query: &str) -> Result<String, DiscoveryError> {
        let response = self.client.get(self.endpoint.clone())
            .query(&[("q", query)])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// First result anchor that points at an HTTP(S) page
    fn first_result(&self, html: &str) -> Option<Url> {
        let document = Html::parse_document(html);

        document.select(&self.result_selector)
            .filter_map(|anchor| anchor.value().attr("href"))
            .find_map(|href| self.to_homepage(href))
    }

    fn to_homepage(&self, href: &str) -> Option<Url> {
        let url = match self.endpoint.join(href) {
            Ok(url) => url,
            Err(e) => {
                debug!("Skipping search hit '{}': {}", href, e);
                return None;
            }
        };
        let url = unwrap_redirect(&url).unwrap_or(url);

        matches!(url.scheme(), "http" | "https").then_some(url)
    }
}

/// Search engines wrap hits in a click-tracking link carrying the target in `uddg`
fn unwrap_redirect(url: &Url) -> Option<Url> {
    url.query_pairs()
        .find(|(key, _)| key == "uddg")
        .and_then(|(_, target)| Url::parse(&target).ok())
}

#[async_trait]
impl HomepageResolver for SearchResolver {
    async fn resolve(&self, company: &str) -> Option<Url> {
        let query = self.query_for(company);
        debug!("Searching for: '{}'", query);

        let timer = self.metrics.start_timer();
        let page = self.fetch_results_page(&query).await;
        self.metrics.record_request(RequestKind::Search, page.is_ok(), timer.end(), None).await;

        let html = match page {
            Ok(html) => html,
            Err(e) => {
                warn!("Search error for {}: {}", company, e);
                return None;
            }
        };

        match self.first_result(&html) {
            Some(url) => {
                info!("Resolved {} to {}", company, url);
                Some(url)
            }
            None => {
                warn!("No search result for {}", company);
                None
            }
        }
    }
}
