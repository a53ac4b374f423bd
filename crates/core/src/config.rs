use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_LOG_PATH: &str = "./log.csv";
pub const DEFAULT_INTERVAL_SECS: u64 = 5;
const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;
const BYTES_PER_GB: f64 = 1_000_000_000.0;

/// Resolved scanner configuration, immutable once the loop starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// CSV log file path
    pub log_path: PathBuf,

    /// Outer sleep between cycles, in seconds
    pub interval_secs: u64,

    /// Echo each cycle to stdout
    pub verbose: bool,

    /// Total network bandwidth in GB, the denominator for utilization
    pub bandwidth_gb: f64,
}

/// Optional settings read from a JSON config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub log_path: Option<PathBuf>,
    pub interval_secs: Option<u64>,
    pub verbose: Option<bool>,
    pub bandwidth_gb: Option<f64>,
}

/// CLI configuration (temporary struct for CLI parsing)
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub log_path: Option<PathBuf>,
    pub interval_secs: Option<u64>,
    pub verbose: bool,
    pub bandwidth_gb: Option<f64>,
}

impl Config {
    /// Load configuration from multiple sources in order of preference:
    /// 1. CLI arguments override everything
    /// 2. JSON config file if specified
    /// 3. Default config file locations
    /// 4. Built-in defaults
    pub fn load(cli_config: Option<&CliConfig>, json_path: Option<&PathBuf>) -> Result<Self> {
        let mut layered = FileConfig::default();

        if let Some(default_config) = Self::load_default_config()? {
            layered.merge(default_config);
        }

        if let Some(path) = json_path {
            layered.merge(Self::load_from_file(path)?);
        }

        if let Some(cli) = cli_config {
            layered.apply_cli_overrides(cli);
        }

        Self::resolve(layered)
    }

    /// Load settings from a specific JSON file
    pub fn load_from_file(path: &Path) -> Result<FileConfig> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            CoreError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Turn layered optional settings into a validated configuration
    pub fn resolve(layered: FileConfig) -> Result<Self> {
        let bandwidth_gb = layered.bandwidth_gb.ok_or_else(|| {
            CoreError::config("Total network bandwidth is required (--bandwidth <GB>)")
        })?;

        let config = Self {
            log_path: layered
                .log_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH)),
            interval_secs: layered.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS),
            verbose: layered.verbose.unwrap_or(false),
            bandwidth_gb,
        };

        config.validate()?;
        Ok(config)
    }

    fn load_default_config() -> Result<Option<FileConfig>> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(Some(config)),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping config file");
                        continue;
                    }
                }
            }
        }

        Ok(None)
    }

    /// Default configuration file search paths
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("hostscan").join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".hostscan.json"));
        }

        paths.push(PathBuf::from("hostscan.json"));

        paths
    }

    fn validate(&self) -> Result<()> {
        if !self.bandwidth_gb.is_finite() || self.bandwidth_gb <= 0.0 {
            return Err(CoreError::config(format!(
                "Bandwidth must be a positive number of GB, got {}",
                self.bandwidth_gb
            )));
        }

        if self.interval_secs > MAX_INTERVAL_SECS {
            return Err(CoreError::config(
                "Interval must be at most 24 hours".to_string(),
            ));
        }

        if self.log_path.as_os_str().is_empty() {
            return Err(CoreError::config("Log path must not be empty"));
        }

        Ok(())
    }

    /// Outer sleep as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Bandwidth in bytes (GB are decimal, 10^9)
    pub fn bandwidth_bytes(&self) -> f64 {
        self.bandwidth_gb * BYTES_PER_GB
    }
}

impl FileConfig {
    /// Later layers win field by field
    fn merge(&mut self, other: Self) {
        if other.log_path.is_some() {
            self.log_path = other.log_path;
        }
        if other.interval_secs.is_some() {
            self.interval_secs = other.interval_secs;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.bandwidth_gb.is_some() {
            self.bandwidth_gb = other.bandwidth_gb;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &CliConfig) {
        if let Some(path) = &cli.log_path {
            self.log_path = Some(path.clone());
        }
        if let Some(interval) = cli.interval_secs {
            self.interval_secs = Some(interval);
        }
        if cli.verbose {
            self.verbose = Some(true);
        }
        if let Some(bandwidth) = cli.bandwidth_gb {
            self.bandwidth_gb = Some(bandwidth);
        }
    }
}
