/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "rtv.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_paths")]
    pub paths: PathSettings,

    #[serde(default = "default_generation")]
    pub generation: GenerationSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathSettings {
    /// Persisted station state
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Catalog and clip library snapshot
    #[serde(default = "default_library_file")]
    pub library_file: PathBuf,

    /// Where generated playlists are written
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationSettings {
    /// Fixed seed for reproducible runs; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Minimum similarity for fuzzy show-name matches
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl CliConfig {
    /// Load configuration from a file and `RTV_*` environment variables
    ///
    /// A missing default file is fine; a missing explicit file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // e.g. RTV_PATHS__STATE_FILE=/var/lib/rtv/state.json
        settings = settings.add_source(
            config::Environment::with_prefix("RTV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let threshold = self.generation.match_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CliError::Config(format!(
                "match_threshold must be within [0, 1], got {threshold}"
            )));
        }

        if self.paths.state_file.as_os_str().is_empty() {
            return Err(CliError::Config("state_file must not be empty".to_string()));
        }

        Ok(())
    }
}

// Default values
fn default_paths() -> PathSettings {
    PathSettings {
        state_file: default_state_file(),
        library_file: default_library_file(),
        export_dir: default_export_dir(),
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from("rtv-state.json")
}

fn default_library_file() -> PathBuf {
    PathBuf::from("library.json")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_generation() -> GenerationSettings {
    GenerationSettings {
        seed: None,
        match_threshold: default_match_threshold(),
    }
}

fn default_match_threshold() -> f64 {
    rtv_core::resolver::DEFAULT_MATCH_THRESHOLD
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_filter(),
    }
}

fn default_filter() -> String {
    "rtv=info,rtv_cli=info,rtv_schedule=info,rtv_core=info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            generation: default_generation(),
            logging: default_logging(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.paths.state_file, PathBuf::from("rtv-state.json"));
        assert_eq!(config.generation.seed, None);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rtv.toml");
        std::fs::write(
            &path,
            "[paths]\nstate_file = \"/tmp/station.json\"\n\n[generation]\nseed = 42\n",
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.paths.state_file, PathBuf::from("/tmp/station.json"));
        assert_eq!(config.paths.library_file, PathBuf::from("library.json"));
        assert_eq!(config.generation.seed, Some(42));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = CliConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut config = CliConfig::default();
        config.generation.match_threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
