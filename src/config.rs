use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of concurrent lookups
pub const DEFAULT_JOBS: usize = 4;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct HfinderConfig {
    /// Overall timeout for a single page request, in seconds
    pub timeout_secs: u64,

    /// Number of lookups running at the same time
    pub jobs: usize,

    /// Print prefixes found during ASN expansion to stderr
    pub progress: bool,
}

impl Default for HfinderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            jobs: DEFAULT_JOBS,
            progress: true,
        }
    }
}

impl HfinderConfig {
    /// Load configuration from the TOML file and `HFINDER_*` environment variables
    ///
    /// An explicit `path` must exist. Without one, `$HOME/.hfinder/hfinder.toml`
    /// is read when present; nothing is ever written.
    pub fn new(path: &Option<String>) -> Result<HfinderConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if !path.exists() {
                    return Err(anyhow!("Config file {} does not exist", p));
                }
                builder = builder.add_source(config::File::new(p, config::FileFormat::Toml));
            }
            None => {
                if let Some(p) = Self::config_file_path() {
                    if p.exists() {
                        builder = builder.add_source(config::File::from(p));
                    }
                }
            }
        }

        // E.g., `HFINDER_JOBS=8 hfinder -a AS13335` runs eight lookups at a time
        builder = builder.add_source(config::Environment::with_prefix("HFINDER"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<HfinderConfig> {
        let defaults = Self::default();

        let timeout_secs = match config.get("timeout_secs") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid timeout_secs '{}'", s))?,
            None => defaults.timeout_secs,
        };

        let jobs = match config.get("jobs") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid jobs '{}'", s))?,
            None => defaults.jobs,
        };

        let progress = match config.get("progress") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid progress '{}', expected true or false", s))?,
            None => defaults.progress,
        };

        let config = HfinderConfig {
            timeout_secs,
            jobs,
            progress,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides
    pub fn with_overrides(
        mut self,
        jobs: Option<usize>,
        timeout_secs: Option<u64>,
        quiet: bool,
    ) -> Result<Self> {
        if let Some(jobs) = jobs {
            self.jobs = jobs;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if quiet {
            self.progress = false;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(anyhow!("jobs must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let config_file = Self::config_file_path()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "-".to_string());
        [
            format!("Config File:   {}", config_file),
            format!("Timeout:       {} seconds", self.timeout_secs),
            format!("Jobs:          {}", self.jobs),
            format!("Progress:      {}", self.progress),
        ]
        .join("\n")
    }

    /// Get the default config file path
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".hfinder").join("hfinder.toml"))
    }
}
