use anyhow::{Result, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::fs;
use tracing::{info, debug, error};

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FinderConfig {
    pub http: HttpSettings,
    pub search: SearchSettings,
    pub discovery: DiscoverySettings,
    pub batch: BatchSettings,
}

/// HTTP client settings shared by the resolver and the discovery engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub search_timeout_ms: u64,
    pub fetch_timeout_ms: u64,
    pub probe_timeout_ms: u64,
}

/// Search engine used to resolve a company name into a homepage
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub query_suffix: String,
    pub result_selector: String,
}

/// Career page heuristics
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiscoverySettings {
    pub keywords: Vec<String>,
    pub probe_paths: Vec<String>,
}

/// Batch orchestration settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchSettings {
    pub concurrency: usize,
    pub politeness_delay_ms: u64,  // Minimum spacing between company starts
    pub jitter_ms: u64,            // Random extra delay added to each slot
    pub checkpoint_interval: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            search_timeout_ms: 10_000,
            fetch_timeout_ms: 10_000,
            probe_timeout_ms: 5_000,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            query_suffix: "official website".to_string(),
            result_selector: "a.result__a".to_string(),
        }
    }
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        let keywords = [
            "career", "job", "work with us", "join us",
            "employment", "hiring", "opportunities", "openings",
        ];
        let probe_paths = [
            "/careers", "/career", "/jobs", "/job-opportunities", "/work-with-us",
            "/join-us", "/employment", "/opportunities", "/hiring", "/openings",
        ];

        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            probe_paths: probe_paths.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            politeness_delay_ms: 2000,
            jitter_ms: 0,
            checkpoint_interval: 50,
        }
    }
}

impl FinderConfig {
    /// Get the path to the config directory
    fn config_dir() -> PathBuf {
        let mut path = if let Some(proj_dirs) = directories::ProjectDirs::from("com", "career-finder", "career-finder") {
            proj_dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from("./config")
        };

        // Create the profiles directory if it doesn't exist
        path.push("profiles");
        if !path.exists() {
            if let Err(e) = fs::create_dir_all(&path) {
                error!("Failed to create config directory: {}", e);
            }
        }

        path.pop();
        path
    }

    /// Load the default configuration
    pub fn load_default() -> Result<Self> {
        let config_path = Self::config_dir().join("default.yaml");

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            info!("Default configuration not found. Creating...");
            let config = Self::default();
            config.save_as_default()?;
            Ok(config)
        }
    }

    /// Load a configuration profile
    pub fn load_profile(profile: &str) -> Result<Self> {
        let profile_path = Self::config_dir().join("profiles").join(format!("{}.yaml", profile));

        if profile_path.exists() {
            Self::load_from_file(&profile_path)
        } else {
            anyhow::bail!("Profile '{}' not found", profile)
        }
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let contents = fs::read_to_string(path)
            .context(format!("Failed to read configuration file: {}", path.display()))?;

        Self::from_yaml(&contents)
            .context(format!("Failed to parse configuration file: {}", path.display()))
    }

    fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the batch cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.batch.concurrency == 0 {
            anyhow::bail!("batch.concurrency must be at least 1");
        }
        if self.batch.checkpoint_interval == 0 {
            anyhow::bail!("batch.checkpoint_interval must be at least 1");
        }
        if self.discovery.keywords.iter().any(|k| k.trim().is_empty()) {
            anyhow::bail!("discovery.keywords must not contain empty entries");
        }
        Ok(())
    }

    /// Save the configuration as the default
    pub fn save_as_default(&self) -> Result<()> {
        let config_path = Self::config_dir().join("default.yaml");
        self.save_to_file(&config_path)
    }

    /// Save the configuration as a profile
    pub fn save_as_profile(&self, profile: &str) -> Result<()> {
        let profiles_dir = Self::config_dir().join("profiles");
        let profile_path = profiles_dir.join(format!("{}.yaml", profile));
        self.save_to_file(&profile_path)
    }

    /// Save the configuration to a file
    fn save_to_file(&self, path: &Path) -> Result<()> {
        debug!("Saving configuration to: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let contents = serde_yaml::to_string(self)
            .context("Failed to serialize configuration")?;

        fs::write(path, contents)
            .context(format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// List all available profiles
    pub fn list_profiles() -> Result<Vec<String>> {
        let profiles_dir = Self::config_dir().join("profiles");

        if !profiles_dir.exists() {
            return Ok(vec![]);
        }

        let mut profiles = Vec::new();

        for entry in fs::read_dir(profiles_dir)? {
            let path = entry?.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == "yaml") {
                if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                    profiles.push(name.to_string());
                }
            }
        }

        profiles.sort();
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let config = FinderConfig::default();
        assert_eq!(config.discovery.keywords.len(), 8);
        assert_eq!(config.discovery.probe_paths.len(), 10);
        assert_eq!(config.discovery.probe_paths[0], "/careers");
        assert_eq!(config.discovery.probe_paths[9], "/openings");
        assert_eq!(config.http.fetch_timeout_ms, 10_000);
        assert_eq!(config.http.probe_timeout_ms, 5_000);
        assert_eq!(config.batch.checkpoint_interval, 50);
    }

    #[test]
    fn test_yaml_roundtrip_preserves_settings() {
        let mut config = FinderConfig::default();
        config.batch.concurrency = 8;
        config.search.endpoint = "http://localhost:9000/html/".to_string();

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = FinderConfig::from_yaml(&yaml).unwrap();

        assert_eq!(parsed.batch.concurrency, 8);
        assert_eq!(parsed.search.endpoint, "http://localhost:9000/html/");
        assert_eq!(parsed.discovery.keywords, config.discovery.keywords);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = FinderConfig::default();
        config.batch.concurrency = 0;
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(FinderConfig::from_yaml(&yaml).is_err());
    }
}
