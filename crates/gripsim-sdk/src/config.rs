// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Simulation configuration, loaded from a TOML file.
//!
//! Every field has a default, so a partial file (or no file at all) is valid:
//!
//! ```toml
//! [simulation]
//! seed = 7
//! poles = true
//!
//! [control]
//! axis_count = 3
//! tracking_mode = "hold_idle"
//!
//! [model]
//! address = "127.0.0.1:5000"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use gripsim_core::control::{ControlConfig, SpeedConfig, DOF_COUNT};
use gripsim_core::math::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        /// The config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        /// The config file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// A value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Scene and timing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Target tick rate.
    pub fps: u32,
    /// Seed of the placement RNG. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Whether the boxes carry poles.
    pub poles: bool,
    /// Whether the DoF overlay is shown.
    pub hud: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            fps: 30,
            seed: None,
            poles: false,
            hud: true,
        }
    }
}

impl SimulationSettings {
    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Duration of one tick in seconds.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.fps as f32
    }
}

/// Where to find the DoF model.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// `host:port` of a model server. The built-in model is used when absent.
    pub address: Option<String>,
    /// Model to select from the catalogue, if available.
    pub preferred: Option<String>,
}

/// Where recordings go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingSettings {
    /// Output directory of the CSV recorder.
    pub directory: PathBuf,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("recordings"),
        }
    }
}

/// The complete configuration of a simulation run.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// `[simulation]`
    pub simulation: SimulationSettings,
    /// `[control]`
    pub control: ControlConfig,
    /// `[gripper]`
    pub gripper: SpeedConfig,
    /// `[model]`
    pub model: ModelSettings,
    /// `[recording]`
    pub recording: RecordingSettings,
}

impl SimConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration at `path`.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults.", path);
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        log::info!("Loaded config from {:?}.", path);
        Ok(config)
    }

    /// Checks the ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=DOF_COUNT).contains(&self.control.axis_count) {
            return Err(ConfigError::Invalid(format!(
                "control.axis_count must be between 1 and {DOF_COUNT}, got {}",
                self.control.axis_count
            )));
        }
        if self.simulation.fps == 0 {
            return Err(ConfigError::Invalid("simulation.fps must be positive".into()));
        }
        let min = 2.0 * crate::entities::VIEW_MARGIN;
        if self.simulation.width <= min || self.simulation.height <= min {
            return Err(ConfigError::Invalid(format!(
                "canvas must be larger than {min}x{min} pixels"
            )));
        }
        Ok(())
    }
}
