use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{ReportError, Result};
use crate::pipeline::processing::parser::ParsePolicy;

/// Run configuration. Every field has a hard-coded default; a TOML file
/// may override any subset of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cycle: String,
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
    pub parse: ParseConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub candidates: String,
    pub committees: String,
    pub contributions: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_seconds: u64,
    /// Where transient archives are written; the system temp dir when unset
    pub download_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub policy: ParsePolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub employer: String,
    pub top_parties: usize,
    pub top_recipients: usize,
    /// `None` disables the chart
    pub chart_path: Option<PathBuf>,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycle: constants::DEFAULT_CYCLE.to_string(),
            sources: SourcesConfig::default(),
            fetch: FetchConfig::default(),
            parse: ParseConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            candidates: constants::CANDIDATES_URL.to_string(),
            committees: constants::COMMITTEES_URL.to_string(),
            contributions: constants::CONTRIBUTIONS_URL.to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: constants::DEFAULT_FETCH_TIMEOUT_SECS,
            download_dir: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            employer: constants::DEFAULT_EMPLOYER.to_string(),
            top_parties: constants::DEFAULT_TOP_PARTIES,
            top_recipients: constants::DEFAULT_TOP_RECIPIENTS,
            chart_path: Some(PathBuf::from(constants::DEFAULT_CHART_PATH)),
            chart_width: constants::DEFAULT_CHART_WIDTH,
            chart_height: constants::DEFAULT_CHART_HEIGHT,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `fec_report.toml` in the
    /// working directory is used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(constants::DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ReportError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config = Self::from_toml(&config_content)?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report.employer.trim().is_empty() {
            return Err(ReportError::Config("report.employer must not be empty".into()));
        }
        if self.report.top_parties == 0 {
            return Err(ReportError::Config("report.top_parties must be at least 1".into()));
        }
        if self.fetch.timeout_seconds == 0 {
            return Err(ReportError::Config("fetch.timeout_seconds must be at least 1".into()));
        }
        Ok(())
    }
}
