//! TOML configuration for generation parameters, the export path and the
//! login credentials.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::generator::{GenerationPolicy, MAX_RECORDS};
use crate::session::Credentials;
use crate::store::GenerationKey;

pub const DEFAULT_CONFIG_FILE: &str = ".edupulse.toml";
pub const DEFAULT_SEED: u64 = 99;
pub const DEFAULT_COUNT: i64 = 300;
pub const DEFAULT_EXPORT_PATH: &str = "academic_data.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for the record generator
    pub seed: u64,

    /// Number of records to generate
    pub count: i64,

    /// Which sampling policy to draw records with
    pub policy: GenerationPolicy,

    /// Where `generate` writes the CSV artifact
    pub export_path: PathBuf,

    /// Load this CSV instead of generating
    pub dataset_path: Option<PathBuf>,

    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            count: DEFAULT_COUNT,
            policy: GenerationPolicy::Uniform,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            dataset_path: None,
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_toml(&content).map_err(|e| match e {
            DashboardError::Config(msg) => {
                DashboardError::Config(format!("{} ({msg})", path.display()))
            }
            other => other,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| DashboardError::Config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path if given, otherwise `.edupulse.toml` in the working
    /// directory, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::load_from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.count < 0 {
            return Err(DashboardError::Config(format!(
                "count must be >= 0, got {}",
                self.count
            )));
        }
        if self.count > MAX_RECORDS {
            return Err(DashboardError::Config(format!(
                "count of {} is larger than the supported {MAX_RECORDS}",
                self.count
            )));
        }
        if self.credentials.username.is_empty() {
            return Err(DashboardError::Config(
                "credentials.username cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn generation_key(&self) -> GenerationKey {
        GenerationKey {
            seed: self.seed,
            count: self.count,
            policy: self.policy,
        }
    }
}
