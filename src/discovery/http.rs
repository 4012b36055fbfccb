use anyhow::{Result, Context};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::cli::config::HttpSettings;

/// Build an HTTP client that identifies as a desktop browser.
///
/// Probe clients are built with `follow_redirects = false` so that only a
/// literal 200 counts as an existing page.
pub fn build_client(settings: &HttpSettings, follow_redirects: bool) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    let redirect = if follow_redirects {
        Policy::default()
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(headers)
        .cookie_store(true)
        .redirect(redirect)
        .build()
        .context("Failed to create HTTP client")
}
