use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use strata_aws::{AwsBaseConfig, LexConfig, RdsConfig};
use strata_provider::WaitConfig;

/// Top-level configuration for the Strata CLI, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct StrataConfig {
    /// Shared AWS settings.
    #[serde(default)]
    pub aws: AwsBaseConfig,
    /// RDS lookup settings.
    #[serde(default)]
    pub rds: RdsSettings,
    /// Status polling settings.
    #[serde(default)]
    pub wait: WaitSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct RdsSettings {
    /// Page size for orderable option queries.
    #[serde(default)]
    pub max_records: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct WaitSettings {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    /// Consecutive not-found polls tolerated before giving up.
    #[serde(default = "default_not_found_checks")]
    pub not_found_checks: u32,
}

fn default_timeout_seconds() -> u64 {
    300
}

fn default_poll_interval_seconds() -> u64 {
    5
}

fn default_not_found_checks() -> u32 {
    20
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            poll_interval_seconds: default_poll_interval_seconds(),
            not_found_checks: default_not_found_checks(),
        }
    }
}

impl WaitSettings {
    /// A [`WaitConfig`] for `target` using these timings.
    pub fn wait_config(&self, target: &str) -> WaitConfig {
        WaitConfig::new([target])
            .with_timeout(Duration::from_secs(self.timeout_seconds))
            .with_poll_interval(Duration::from_secs(self.poll_interval_seconds))
            .with_not_found_checks(self.not_found_checks)
    }
}

impl StrataConfig {
    /// Load configuration from `path`, or use defaults if the file does not
    /// exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            toml::from_str("")?
        };
        Ok(config)
    }

    /// Apply command-line overrides on top of the file settings.
    #[must_use]
    pub fn with_overrides(mut self, region: Option<&str>, endpoint_url: Option<&str>) -> Self {
        if let Some(region) = region {
            region.clone_into(&mut self.aws.region);
        }
        if let Some(endpoint_url) = endpoint_url {
            self.aws.endpoint_url = Some(endpoint_url.to_owned());
        }
        self
    }

    pub fn rds_config(&self) -> RdsConfig {
        RdsConfig {
            aws: self.aws.clone(),
            max_records: self.rds.max_records,
        }
    }

    pub fn lex_config(&self) -> LexConfig {
        LexConfig {
            aws: self.aws.clone(),
        }
    }
}
