use anyhow::{Result, Context};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load company names, one per line. Blank lines are skipped and duplicates kept.
pub fn load_companies(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        anyhow::bail!("File '{}' not found!", path.display());
    }

    let contents = fs::read_to_string(path)
        .context(format!("Failed to read input file: {}", path.display()))?;

    let companies = parse_companies(&contents);
    debug!("Loaded {} companies from {}", companies.len(), path.display());

    Ok(companies)
}

fn parse_companies(contents: &str) -> Vec<String> {
    contents.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_skipped_and_names_trimmed() {
        let companies = parse_companies("Microsoft\n\n  Google  \r\nIBM\n   \nIBM\n");
        assert_eq!(companies, vec!["Microsoft", "Google", "IBM", "IBM"]);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = load_companies(Path::new("/nonexistent/companies.txt")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
