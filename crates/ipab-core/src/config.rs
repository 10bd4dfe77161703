//! # Configuration System
//!
//! YAML configuration for applications embedding the engines:
//!
//! - Logging (level, format, module filters)
//! - Mixer settings (resampling filter used when unifying dimensions)
//! - Beamforming evaluation settings (sweep density, heatmap extent)
//! - Simulator session settings (quick-save capacity)
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `IPAB_CONFIG` environment variable
//! 2. `./ipab.yaml` (current directory)
//! 3. `~/.config/ipab/config.yaml` (user config)
//! 4. `/etc/ipab/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! logging:
//!   level: debug
//!   format: json
//!
//! mixer:
//!   resample_filter: lanczos3
//!
//! beamforming:
//!   sweep_points: 721
//!   heatmap_resolution: 150
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::beamforming::pattern::MAX_HEATMAP_RESOLUTION;
use crate::observe::LogConfig;

/// Error type for configuration operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    ReadError(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Resampling filter used by `unify_dimensions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Nearest neighbour (fast, aliases)
    Nearest,
    /// Linear (triangle) filter
    Triangle,
    /// Cubic (Catmull-Rom) filter
    CatmullRom,
    /// Gaussian filter
    Gaussian,
    /// Lanczos with window 3
    #[default]
    Lanczos3,
}

/// Spectral mixer configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Filter used when resampling images to a common size
    pub resample_filter: ResampleFilter,
}

/// Beamforming evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamformingConfig {
    /// Number of angles in the metrics sweep over [-180, 180]
    pub sweep_points: usize,
    /// Half-width (in sweep samples) of the window excluded around the main lobe
    pub sidelobe_exclusion: usize,
    /// Number of angles in polar plot data
    pub polar_points: usize,
    /// Heatmap grid resolution (points per axis)
    pub heatmap_resolution: usize,
    /// Heatmap x extent in metres
    pub heatmap_x_range: (f64, f64),
    /// Heatmap y extent in metres
    pub heatmap_y_range: (f64, f64),
    /// Distance floor for near-field evaluation in metres
    pub min_distance: f64,
}

impl Default for BeamformingConfig {
    fn default() -> Self {
        Self {
            sweep_points: 361,
            sidelobe_exclusion: 10,
            polar_points: 361,
            heatmap_resolution: 200,
            heatmap_x_range: (-10.0, 10.0),
            heatmap_y_range: (-10.0, 10.0),
            min_distance: 1e-6,
        }
    }
}

/// Simulator session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Number of quick saves retained (oldest dropped first)
    pub max_quick_saves: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { max_quick_saves: 10 }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpabConfig {
    /// Configuration version
    pub version: String,
    /// Logging configuration
    pub logging: LogConfig,
    /// Mixer configuration
    pub mixer: MixerConfig,
    /// Beamforming configuration
    pub beamforming: BeamformingConfig,
    /// Simulator configuration
    pub simulator: SimulatorConfig,
}

impl Default for IpabConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            logging: LogConfig::default(),
            mixer: MixerConfig::default(),
            beamforming: BeamformingConfig::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl IpabConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns default config if no file is found. A path named by
    /// `IPAB_CONFIG` must exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(std::env::var("IPAB_CONFIG").ok().as_deref())
    }

    fn load_with(explicit: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let path = Path::new(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Self::load_from(path);
        }

        for path in &Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./ipab.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "ipab") {
            paths.push(config_dir.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/ipab/config.yaml"));

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bf = &self.beamforming;

        if bf.sweep_points < 3 {
            return Err(ConfigError::ValidationError(
                "sweep_points must be >= 3".to_string(),
            ));
        }

        if bf.polar_points < 2 {
            return Err(ConfigError::ValidationError(
                "polar_points must be >= 2".to_string(),
            ));
        }

        if bf.heatmap_resolution == 0 || bf.heatmap_resolution > MAX_HEATMAP_RESOLUTION {
            return Err(ConfigError::ValidationError(format!(
                "heatmap_resolution must be in 1..={}",
                MAX_HEATMAP_RESOLUTION
            )));
        }

        if bf.min_distance.is_nan() || bf.min_distance <= 0.0 {
            return Err(ConfigError::ValidationError(
                "min_distance must be positive".to_string(),
            ));
        }

        if bf.heatmap_x_range.0 >= bf.heatmap_x_range.1
            || bf.heatmap_y_range.0 >= bf.heatmap_y_range.1
        {
            return Err(ConfigError::ValidationError(
                "heatmap ranges must be increasing".to_string(),
            ));
        }

        if self.simulator.max_quick_saves == 0 {
            return Err(ConfigError::ValidationError(
                "max_quick_saves must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        serde_yaml::to_string(&Self::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{LogFormat, LogLevel};

    #[test]
    fn test_default_config() {
        let config = IpabConfig::default();
        assert_eq!(config.beamforming.sweep_points, 361);
        assert_eq!(config.mixer.resample_filter, ResampleFilter::Lanczos3);
        assert_eq!(config.simulator.max_quick_saves, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
logging:
  level: debug
  format: json

mixer:
  resample_filter: catmull_rom

beamforming:
  sweep_points: 721
  heatmap_resolution: 64
  heatmap_x_range: [-2.0, 2.0]
"#;

        let config = IpabConfig::parse(yaml).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.mixer.resample_filter, ResampleFilter::CatmullRom);
        assert_eq!(config.beamforming.sweep_points, 721);
        assert_eq!(config.beamforming.heatmap_resolution, 64);
        assert_eq!(config.beamforming.heatmap_x_range, (-2.0, 2.0));
        // Untouched fields keep their defaults
        assert_eq!(config.beamforming.heatmap_y_range, (-10.0, 10.0));
        assert_eq!(config.beamforming.sidelobe_exclusion, 10);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        let yaml = "beamforming:\n  heatmap_resolution: 0\n";
        assert!(matches!(
            IpabConfig::parse(yaml),
            Err(ConfigError::ValidationError(_))
        ));

        assert!(matches!(
            IpabConfig::parse("mixer: [1, 2"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = IpabConfig::default();
        config.beamforming.min_distance = 0.0;
        assert!(config.validate().is_err());

        config.beamforming.min_distance = 1e-6;
        config.beamforming.heatmap_y_range = (5.0, -5.0);
        assert!(config.validate().is_err());

        config.beamforming.heatmap_y_range = (-5.0, 5.0);
        config.beamforming.heatmap_resolution = MAX_HEATMAP_RESOLUTION + 1;
        assert!(config.validate().is_err());

        config.beamforming.heatmap_resolution = 200;
        config.simulator.max_quick_saves = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_yaml() {
        let yaml = IpabConfig::example_yaml();
        assert!(yaml.contains("beamforming:"));
        assert!(yaml.contains("mixer:"));
        let parsed = IpabConfig::parse(&yaml).unwrap();
        assert_eq!(parsed, IpabConfig::default());
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = IpabConfig::load_from(Path::new("/nonexistent/ipab.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let result = IpabConfig::load_with(Some("/nonexistent/ipab/config.yaml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_search_paths() {
        let paths = IpabConfig::config_search_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with("ipab.yaml"));
    }
}
