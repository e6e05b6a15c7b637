use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Directory name under the platform config dir for all persisted files
pub const APP_DIR_NAME: &str = "HandBlaster";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Length of one round in seconds
    pub round_duration_secs: u64,

    /// Minimum gap between two fire events in milliseconds
    pub fire_cooldown_ms: u64,

    /// Per-frame decrease of the thumb/index distance needed to count as a pull
    pub pinch_closing_delta: f64,

    /// Thumb/index distance below which a pull can fire
    pub pinch_fire_distance: f64,

    /// Hit radius as a multiple of the target scale
    pub hit_radius_factor: f64,

    /// Upper bound on simultaneously live targets
    pub max_live_targets: usize,

    /// Targets spawned at the start of a round
    pub initial_burst: usize,

    /// Delay between two burst spawns in milliseconds
    pub burst_stagger_ms: u64,

    /// Shortest delay between two regular spawns in milliseconds
    pub spawn_interval_min_ms: u64,

    /// Longest delay between two regular spawns in milliseconds
    pub spawn_interval_max_ms: u64,

    /// Age after which the latest landmark frame is treated as "no hand"
    pub frame_timeout_ms: u64,

    /// Simulation ticks per second for the driver loop
    pub tick_rate_hz: u32,

    /// Width / height of the viewport used to cast aim rays
    pub viewport_aspect: f64,

    /// Fixed seed for target spawning (None = entropy)
    pub rng_seed: Option<u64>,

    /// Number of entries kept in the score history
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_duration_secs: 60,
            fire_cooldown_ms: 300,
            pinch_closing_delta: 0.02,
            pinch_fire_distance: 0.08,
            hit_radius_factor: 1.5,
            max_live_targets: 15,
            initial_burst: 5,
            burst_stagger_ms: 200,
            spawn_interval_min_ms: 1500,
            spawn_interval_max_ms: 2000,
            frame_timeout_ms: 250,
            tick_rate_hz: 60,
            viewport_aspect: 16.0 / 9.0,
            rng_seed: None,
            history_capacity: 10,
        }
    }
}

impl Config {
    /// Load configuration from the platform-specific config directory.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path, writing defaults if missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            tracing::info!("Created default config at: {}", path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to the platform-specific config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |e: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: e,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_err(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_err(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_err(Box::new(e)))?;

        Ok(())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_duration_secs == 0 {
            return Err(ConfigError::Invalid(
                "round_duration_secs must be > 0".to_string(),
            ));
        }
        if self.spawn_interval_min_ms > self.spawn_interval_max_ms {
            return Err(ConfigError::Invalid(format!(
                "spawn interval min ({}ms) exceeds max ({}ms)",
                self.spawn_interval_min_ms, self.spawn_interval_max_ms
            )));
        }
        if self.spawn_interval_max_ms == 0 {
            return Err(ConfigError::Invalid(
                "spawn_interval_max_ms must be > 0".to_string(),
            ));
        }
        if self.fire_cooldown_ms == 0 {
            return Err(ConfigError::Invalid(
                "fire_cooldown_ms must be > 0".to_string(),
            ));
        }
        if !(self.pinch_closing_delta > 0.0) || !(self.pinch_fire_distance > 0.0) {
            return Err(ConfigError::Invalid(
                "pinch thresholds must be positive".to_string(),
            ));
        }
        if !(self.hit_radius_factor > 0.0) {
            return Err(ConfigError::Invalid(
                "hit_radius_factor must be positive".to_string(),
            ));
        }
        if !(self.viewport_aspect > 0.0) {
            return Err(ConfigError::Invalid(
                "viewport_aspect must be positive".to_string(),
            ));
        }
        if self.max_live_targets == 0 {
            return Err(ConfigError::Invalid(
                "max_live_targets must be > 0".to_string(),
            ));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn round_duration(&self) -> Duration {
        Duration::from_secs(self.round_duration_secs)
    }

    pub fn fire_cooldown(&self) -> Duration {
        Duration::from_millis(self.fire_cooldown_ms)
    }

    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}
