use std::fmt;

use crate::discovery::result::DiscoveryResult;

const TOP_COMPANIES: usize = 10;

/// Aggregate statistics over a finished batch
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub websites_found: usize,
    pub career_pages_found: usize,

    /// Companies with the most career URLs, highest first; ties keep input order
    pub top_companies: Vec<(String, usize)>,
}

impl Summary {
    pub fn from_results(results: &[DiscoveryResult]) -> Self {
        let websites_found = results.iter().filter(|r| r.has_website()).count();
        let career_pages_found = results.iter().filter(|r| !r.career_urls().is_empty()).count();

        let mut top_companies: Vec<(String, usize)> = results.iter()
            .filter(|r| !r.career_urls().is_empty())
            .map(|r| (r.company.clone(), r.career_urls().len()))
            .collect();
        top_companies.sort_by(|a, b| b.1.cmp(&a.1));
        top_companies.truncate(TOP_COMPANIES);

        Self {
            total: results.len(),
            websites_found,
            career_pages_found,
            top_companies,
        }
    }

    pub fn no_career_page(&self) -> usize {
        self.total - self.career_pages_found
    }

    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "SUMMARY REPORT")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Total companies processed: {}", self.total)?;
        writeln!(f, "Main websites found: {} ({:.1}%)", self.websites_found, self.percent(self.websites_found))?;
        writeln!(f, "Career pages found: {} ({:.1}%)", self.career_pages_found, self.percent(self.career_pages_found))?;
        writeln!(f, "No career page found: {}", self.no_career_page())?;

        if !self.top_companies.is_empty() {
            writeln!(f)?;
            writeln!(f, "Top companies with most career URLs:")?;
            for (i, (company, count)) in self.top_companies.iter().enumerate() {
                writeln!(f, "   {}. {}: {} URLs", i + 1, company, count)?;
            }
        }

        Ok(())
    }
}
