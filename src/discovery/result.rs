use url::Url;

/// Maximum number of career URLs kept per company
pub const MAX_CAREER_URLS: usize = 3;

pub const NOT_FOUND: &str = "Not found";
pub const ERROR: &str = "Error";

/// Where a homepage candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomepageSource {
    /// Supplied by the caller
    Caller,

    /// Found by the search resolver
    Resolver,
}

/// Outcome of locating and fetching a company's homepage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Homepage {
    /// Homepage fetched and scanned, kept exactly as given
    Found(String),

    /// The resolver returned no candidate
    NotFound,

    /// Fetching or parsing the homepage failed
    Error {
        attempted: Option<String>,
        source: HomepageSource,
        cause: String,
    },
}

/// Discovery outcome for one company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryResult {
    pub company: String,
    pub homepage: Homepage,
    career_urls: Vec<Url>,
}

impl DiscoveryResult {
    /// Successful scan. Keeps at most `MAX_CAREER_URLS` links in encounter order.
    pub fn found(company: impl Into<String>, homepage: impl Into<String>, mut career_urls: Vec<Url>) -> Self {
        career_urls.truncate(MAX_CAREER_URLS);
        Self {
            company: company.into(),
            homepage: Homepage::Found(homepage.into()),
            career_urls,
        }
    }

    pub fn not_found(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            homepage: Homepage::NotFound,
            career_urls: Vec::new(),
        }
    }

    pub fn failed(
        company: impl Into<String>,
        attempted: Option<String>,
        source: HomepageSource,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            homepage: Homepage::Error {
                attempted,
                source,
                cause: cause.into(),
            },
            career_urls: Vec::new(),
        }
    }

    pub fn career_urls(&self) -> &[Url] {
        &self.career_urls
    }

    /// Homepage as written to the output files.
    /// A failed homepage the caller supplied is echoed back; otherwise "Error".
    pub fn main_website(&self) -> &str {
        match &self.homepage {
            Homepage::Found(url) => url.as_str(),
            Homepage::NotFound => NOT_FOUND,
            Homepage::Error { attempted: Some(url), source: HomepageSource::Caller, .. } => url.as_str(),
            Homepage::Error { .. } => ERROR,
        }
    }

    /// True unless `main_website` is a sentinel
    pub fn has_website(&self) -> bool {
        !matches!(self.main_website(), NOT_FOUND | ERROR)
    }

    pub fn error_cause(&self) -> Option<&str> {
        match &self.homepage {
            Homepage::Error { cause, .. } => Some(cause),
            _ => None,
        }
    }
}
