use anyhow::{Result, Context};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::discovery::result::{DiscoveryResult, MAX_CAREER_URLS};

const CSV_HEADER: [&str; 6] = [
    "Company", "Main_Website", "Career_URL_1", "Career_URL_2", "Career_URL_3", "Total_Career_URLs",
];

/// JSON shape of a single result
#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    company: &'a str,
    main_website: &'a str,
    career_urls: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> From<&'a DiscoveryResult> for ResultRecord<'a> {
    fn from(result: &'a DiscoveryResult) -> Self {
        Self {
            company: &result.company,
            main_website: result.main_website(),
            career_urls: result.career_urls().iter().map(|url| url.as_str()).collect(),
            error: result.error_cause(),
        }
    }
}

/// CSV and JSON paths for an output base name
pub fn output_paths(base: &Path) -> (PathBuf, PathBuf) {
    let with_suffix = |extension: &str| {
        if base.extension().map_or(false, |ext| ext == "txt") {
            base.with_extension(extension)
        } else {
            let mut name = base.as_os_str().to_owned();
            name.push(".");
            name.push(extension);
            PathBuf::from(name)
        }
    };

    (with_suffix("csv"), with_suffix("json"))
}

/// Base name for the checkpoint written after `processed` companies
pub fn checkpoint_base(base: &Path, processed: usize) -> PathBuf {
    let file_name = base.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    base.with_file_name(format!("progress_{}_{}", processed, file_name))
}

/// Save results as CSV and JSON next to each other
pub fn save_results(results: &[DiscoveryResult], base: &Path) -> Result<(PathBuf, PathBuf)> {
    let (csv_path, json_path) = output_paths(base);

    if let Some(parent) = csv_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    write_csv(results, &csv_path)?;
    write_json(results, &json_path)?;

    info!("Results saved to CSV: {} and JSON: {}", csv_path.display(), json_path.display());

    Ok((csv_path, json_path))
}

/// Save results from async code without stalling the runtime's worker threads
pub async fn save_results_in_background(results: Vec<DiscoveryResult>, base: PathBuf) -> Result<(PathBuf, PathBuf)> {
    tokio::task::spawn_blocking(move || save_results(&results, &base))
        .await
        .context("Result export task failed")?
}

fn write_csv(results: &[DiscoveryResult], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create output file: {}", path.display()))?;

    writer.write_record(CSV_HEADER)
        .context("Failed to write CSV header to file")?;

    for result in results {
        let urls = result.career_urls();
        let mut row = Vec::with_capacity(CSV_HEADER.len());
        row.push(result.company.clone());
        row.push(result.main_website().to_string());
        for i in 0..MAX_CAREER_URLS {
            row.push(urls.get(i).map(|url| url.to_string()).unwrap_or_default());
        }
        row.push(urls.len().to_string());

        writer.write_record(&row)
            .context("Failed to write CSV row to file")?;
    }

    writer.flush()
        .context(format!("Failed to flush output file: {}", path.display()))?;

    debug!("Exported {} records to CSV file: {}", results.len(), path.display());

    Ok(())
}

fn write_json(results: &[DiscoveryResult], path: &Path) -> Result<()> {
    let records: Vec<ResultRecord> = results.iter().map(ResultRecord::from).collect();

    let contents = serde_json::to_string_pretty(&records)
        .context("Failed to serialize results")?;

    fs::write(path, contents)
        .context(format!("Failed to write output file: {}", path.display()))?;

    debug!("Exported {} records to JSON file: {}", results.len(), path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::result::HomepageSource;
    use url::Url;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("career-finder-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_results() -> Vec<DiscoveryResult> {
        let url = |s: &str| Url::parse(s).unwrap();
        vec![
            DiscoveryResult::found(
                "Acme, Inc.",
                url("https://acme.com/"),
                vec![url("https://acme.com/careers"), url("https://jobs.acme.com/")],
            ),
            DiscoveryResult::not_found("Ghost Corp"),
            DiscoveryResult::failed(
                "Initech",
                Some("https://initech.com".into()),
                HomepageSource::Resolver,
                "Request failed: timeout",
            ),
        ]
    }

    #[test]
    fn test_output_paths() {
        let (csv, json) = output_paths(Path::new("out/company_career_pages"));
        assert_eq!(csv, PathBuf::from("out/company_career_pages.csv"));
        assert_eq!(json, PathBuf::from("out/company_career_pages.json"));

        let (csv, json) = output_paths(Path::new("results.txt"));
        assert_eq!(csv, PathBuf::from("results.csv"));
        assert_eq!(json, PathBuf::from("results.json"));
    }

    #[test]
    fn test_checkpoint_base() {
        assert_eq!(
            checkpoint_base(Path::new("out/company_career_pages"), 50),
            PathBuf::from("out/progress_50_company_career_pages")
        );
        assert_eq!(
            checkpoint_base(Path::new("company_career_pages"), 100),
            PathBuf::from("progress_100_company_career_pages")
        );
    }

    #[test]
    fn test_csv_layout() {
        let dir = scratch_dir("csv");
        let (csv_path, _) = save_results(&sample_results(), &dir.join("results")).unwrap();

        let contents = fs::read_to_string(csv_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines[0], "Company,Main_Website,Career_URL_1,Career_URL_2,Career_URL_3,Total_Career_URLs");
        assert_eq!(lines[1], "\"Acme, Inc.\",https://acme.com/,https://acme.com/careers,https://jobs.acme.com/,,2");
        assert_eq!(lines[2], "Ghost Corp,Not found,,,,0");
        assert_eq!(lines[3], "Initech,Error,,,,0");
    }

    #[tokio::test]
    async fn test_background_save_writes_both_files() {
        let dir = scratch_dir("background");
        let (csv_path, json_path) = save_results_in_background(sample_results(), dir.join("results"))
            .await
            .unwrap();

        assert_eq!(csv_path, dir.join("results.csv"));
        assert_eq!(fs::read_to_string(csv_path).unwrap().lines().count(), 4);
        assert!(fs::read_to_string(json_path).unwrap().contains("Ghost Corp"));
    }

    #[tokio::test]
    async fn test_background_save_reports_write_errors() {
        let dir = scratch_dir("blocked");
        // A regular file where the output directory should be
        let blocker = dir.join("not_a_dir");
        fs::write(&blocker, "").unwrap();

        let result = save_results_in_background(sample_results(), blocker.join("results")).await;

        assert!(result.is_err());
    }

    #[test]
    fn test_json_layout() {
        let dir = scratch_dir("json");
        let (_, json_path) = save_results(&sample_results(), &dir.join("results")).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
        let entries = value.as_array().unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["company"], "Acme, Inc.");
        assert_eq!(entries[0]["career_urls"][1], "https://jobs.acme.com/");
        assert!(entries[0].get("error").is_none());
        assert_eq!(entries[1]["main_website"], "Not found");
        assert_eq!(entries[1]["career_urls"].as_array().unwrap().len(), 0);
        assert_eq!(entries[2]["main_website"], "Error");
        assert_eq!(entries[2]["error"], "Request failed: timeout");
    }
}
