use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Keyword based classifier for career-relevant anchors
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    /// Lower-cased keyword vocabulary
    keywords: Vec<String>,

    anchor_selector: Selector,
}

impl LinkClassifier {
    pub fn new(keywords: &[String]) -> Self {
        let keywords = keywords.iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            keywords,
            // Static selector, always valid
            anchor_selector: Selector::parse("a[href]").unwrap(),
        }
    }

    /// Substring match against lower-cased href or visible text.
    /// No word boundaries: "jobs" and "/Careers-Info" both match.
    pub fn is_career_link(&self, href: &str, text: &str) -> bool {
        let href = href.to_lowercase();
        let text = text.to_lowercase();

        self.keywords.iter()
            .any(|keyword| href.contains(keyword.as_str()) || text.contains(keyword.as_str()))
    }

    /// Extract career-relevant links from a page, resolved against `base`.
    ///
    /// Links are deduplicated by their resolved URL and returned in the
    /// order they first appear in the document.
    pub fn extract(&self, html: &str, base: &Url) -> Vec<Url> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for anchor in document.select(&self.anchor_selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let text: String = anchor.text().map(str::trim).collect();

            if !self.is_career_link(href, &text) {
                continue;
            }

            match base.join(href) {
                Ok(resolved) => {
                    if seen.insert(resolved.as_str().to_string()) {
                        links.push(resolved);
                    }
                }
                Err(e) => debug!("Skipping unresolvable link '{}': {}", href, e),
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config::DiscoverySettings;

    fn classifier() -> LinkClassifier {
        LinkClassifier::new(&DiscoverySettings::default().keywords)
    }

    fn base() -> Url {
        Url::parse("https://www.acme.com/").unwrap()
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        let classifier = classifier();

        assert!(classifier.is_career_link("/Careers-Info", ""));
        assert!(classifier.is_career_link("#", "Join Us Today"));
        assert!(classifier.is_career_link("/blog/jobs-report", "Read more"));
        assert!(classifier.is_career_link("/x", "WE ARE HIRING"));
        assert!(!classifier.is_career_link("/about", "About"));
    }

    #[test]
    fn test_extracts_relevant_links_only() {
        let html = r#"
            <html><body>
                <a href="/about">About</a>
                <a href="/careers">Careers</a>
            </body></html>
        "#;

        let links = classifier().extract(html, &base());
        let links: Vec<&str> = links.iter().map(Url::as_str).collect();

        assert_eq!(links, vec!["https://www.acme.com/careers"]);
    }

    #[test]
    fn test_resolves_relative_protocol_relative_and_absolute() {
        let html = r#"
            <a href="jobs/engineering">Engineering</a>
            <a href="//careers.acme.com/">Life at Acme</a>
            <a href="https://boards.example.com/acme">Openings</a>
        "#;

        let links = classifier().extract(html, &Url::parse("https://www.acme.com/en/").unwrap());
        let links: Vec<&str> = links.iter().map(Url::as_str).collect();

        assert_eq!(links, vec![
            "https://www.acme.com/en/jobs/engineering",
            "https://careers.acme.com/",
            "https://boards.example.com/acme",
        ]);
    }

    #[test]
    fn test_duplicates_collapse_to_first_occurrence() {
        let html = r#"
            <nav><a href="/careers">Careers</a></nav>
            <a href="/work-with-us">Work with us</a>
            <footer><a href="https://www.acme.com/careers">Jobs</a></footer>
        "#;

        let links = classifier().extract(html, &base());
        let links: Vec<&str> = links.iter().map(Url::as_str).collect();

        assert_eq!(links, vec![
            "https://www.acme.com/careers",
            "https://www.acme.com/work-with-us",
        ]);
    }

    #[test]
    fn test_nested_text_is_matched() {
        let html = r#"<a href="/team"><span>Join</span> <b>us</b></a>"#;
        // Pieces are trimmed and concatenated, so "Join" + "us" reads "joinus"
        assert!(classifier().extract(html, &base()).is_empty());

        let html = r#"<a href="/team"><span>Join us</span></a>"#;
        assert_eq!(classifier().extract(html, &base()).len(), 1);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"
            <a href="/jobs">Jobs</a>
            <a href="/hiring">Hiring</a>
            <a href="/employment">Employment</a>
            <a href="/openings">Openings</a>
        "#;

        let classifier = classifier();
        assert_eq!(classifier.extract(html, &base()), classifier.extract(html, &base()));
    }

    #[test]
    fn test_anchors_without_href_are_ignored() {
        let html = r#"<a name="careers">Careers</a>"#;
        assert!(classifier().extract(html, &base()).is_empty());
    }
}
