//! Simulation configuration
//!
//! Defaults mirror the reference workload (capacity 10, three mixed
//! workers plus one drainer, one-minute analyzer interval, five-minute
//! run). Values can come from a TOML file, with command-line flags taking
//! precedence.

use crate::app::cli::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub capacity: usize,
    pub mixed_workers: usize,
    pub drainers: usize,
    pub run_for_secs: u64,
    pub analyzer_interval_secs: u64,
    pub report_file: Option<PathBuf>,
    pub report_json: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            mixed_workers: 3,
            drainers: 1,
            run_for_secs: 300,
            analyzer_interval_secs: 60,
            report_file: None,
            report_json: false,
        }
    }
}

impl SimulationConfig {
    /// Load configuration: defaults, then the TOML file, then CLI flags
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli_overrides(args);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_cli_overrides(&mut self, args: &Args) {
        if let Some(capacity) = args.capacity {
            self.capacity = capacity;
        }
        if let Some(mixed_workers) = args.mixed_workers {
            self.mixed_workers = mixed_workers;
        }
        if let Some(drainers) = args.drainers {
            self.drainers = drainers;
        }
        if let Some(run_for_secs) = args.run_for_secs {
            self.run_for_secs = run_for_secs;
        }
        if let Some(interval) = args.analyzer_interval_secs {
            self.analyzer_interval_secs = interval;
        }
        if let Some(report_file) = &args.report_file {
            self.report_file = Some(report_file.clone());
        }
        if args.report_json {
            self.report_json = true;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid {
                message: "capacity must be at least 1".to_string(),
            });
        }
        if self.analyzer_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "analyzer_interval_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_workload() {
        let config = SimulationConfig::default();

        assert_eq!(config.capacity, 10);
        assert_eq!(config.mixed_workers, 3);
        assert_eq!(config.drainers, 1);
        assert_eq!(config.run_for_secs, 300);
        assert_eq!(config.analyzer_interval_secs, 60);
        assert!(config.report_file.is_none());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "capacity = 4\nmixed_workers = 2\nanalyzer_interval_secs = 5"
        )
        .unwrap();

        let args = Args {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = SimulationConfig::load(&args).unwrap();

        assert_eq!(config.capacity, 4);
        assert_eq!(config.mixed_workers, 2);
        assert_eq!(config.analyzer_interval_secs, 5);
        // Unspecified keys keep their defaults
        assert_eq!(config.drainers, 1);
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capacity = 4").unwrap();

        let args = Args {
            config: Some(file.path().to_path_buf()),
            capacity: Some(16),
            run_for_secs: Some(30),
            ..Default::default()
        };
        let config = SimulationConfig::load(&args).unwrap();

        assert_eq!(config.capacity, 16);
        assert_eq!(config.run_for_secs, 30);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "capactiy = 4").unwrap();

        let args = Args {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        assert!(matches!(
            SimulationConfig::load(&args),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let args = Args {
            capacity: Some(0),
            ..Default::default()
        };

        assert!(matches!(
            SimulationConfig::load(&args),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let args = Args {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Default::default()
        };

        assert!(matches!(
            SimulationConfig::load(&args),
            Err(ConfigError::Read { .. })
        ));
    }
}
