//! Configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `reagent.ron` file (if exists), or an explicit `--config` file
//! 3. Environment variables prefixed with `REAGENT_`
//!
//! Example environment variable: `REAGENT_SIMULATION__GRAVITY=1`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use reagent_core::world::{DEFAULT_GRAVITY, GridSize, SimulationConfig};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReagentConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// World size settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// World width in pixels
    pub width: u32,
    /// World height in pixels
    pub height: u32,
    /// Pixels per cell side
    pub cell_size: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 900,
            cell_size: 5,
        }
    }
}

impl WorldConfig {
    pub fn grid_size(&self) -> GridSize {
        GridSize::from_world(self.width, self.height, self.cell_size)
    }
}

/// Tick loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Target ticks per second when paced
    pub target_tps: u32,
    /// Stop after this many ticks
    pub max_ticks: u64,
    /// Sleep between ticks to hold `target_tps`
    pub paced: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_ticks: 600,
            paced: true,
        }
    }
}

/// Frame output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG image sequence
    Png,
    /// Text frames on stdout
    Text,
    /// No frames
    None,
}

/// Frame output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Directory for PNG frames
    pub directory: PathBuf,
    /// Present every Nth tick
    pub frame_every: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::None,
            directory: PathBuf::from("frames"),
            frame_every: 1,
        }
    }
}

impl ReagentConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path` if given (must exist), otherwise `reagent.ron` (if exists)
    /// 3. Environment variables prefixed with `REAGENT_` (highest priority)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("reagent")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("world.width", 900_i64)?
            .set_default("world.height", 900_i64)?
            .set_default("world.cell_size", 5_i64)?
            .set_default("simulation.gravity", DEFAULT_GRAVITY as i64)?
            .set_default("simulation.track_moved", false)?
            .set_default("runner.target_tps", 60_i64)?
            .set_default("runner.max_ticks", 600_i64)?
            .set_default("runner.paced", true)?
            .set_default("output.format", "none")?
            .set_default("output.directory", "frames")?
            .set_default("output.frame_every", 1_i64)?
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (REAGENT_RUNNER__MAX_TICKS, etc.)
            .add_source(Environment::with_prefix("REAGENT").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ReagentConfig::default();
        assert_eq!(config.world.width, 900);
        assert_eq!(config.world.cell_size, 5);
        assert_eq!(config.simulation.gravity, 3);
        assert!(!config.simulation.track_moved);
        assert_eq!(config.runner.target_tps, 60);
        assert!(config.runner.paced);
        assert_eq!(config.output.format, OutputFormat::None);
    }

    #[test]
    fn test_default_grid_size() {
        let config = ReagentConfig::default();
        assert_eq!(config.world.grid_size(), GridSize::new(180, 180));
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = ReagentConfig::load(None).expect("Failed to load config");
        assert_eq!(config.world.height, 900);
        assert_eq!(config.runner.max_ticks, 600);
        assert_eq!(config.output.directory, PathBuf::from("frames"));
    }

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        write!(
            file,
            r#"(
                world: (width: 100, height: 50, cell_size: 2),
                simulation: (gravity: 1, track_moved: true, seed: 42),
                output: (format: "png"),
            )"#
        )
        .unwrap();

        let config = ReagentConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.world.grid_size(), GridSize::new(50, 25));
        assert_eq!(config.simulation.gravity, 1);
        assert!(config.simulation.track_moved);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.output.format, OutputFormat::Png);
        // Untouched values keep their defaults
        assert_eq!(config.runner.target_tps, 60);
        assert_eq!(config.output.frame_every, 1);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReagentConfig::load(Some(&dir.path().join("missing.ron")));
        assert!(result.is_err());
    }
}
