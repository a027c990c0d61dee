//! Configuration surface: mesh resolution, material and visualization settings.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::material::Material;

/// Smallest scale factor offered by the visualization slider.
pub const MIN_SCALE_FACTOR: f64 = 1.0;
/// Largest scale factor offered by the visualization slider.
pub const MAX_SCALE_FACTOR: f64 = 1000.0;
/// Scale factor used until the user picks another one.
pub const DEFAULT_SCALE_FACTOR: f64 = 300.0;

/// Discrete mesh resolution presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// 51 x 4 x 4 points.
    Coarse,
    /// 101 x 6 x 6 points.
    #[default]
    Medium,
    /// 151 x 8 x 8 points.
    Fine,
}

impl Resolution {
    /// Number of mesh points along X, Y and Z.
    #[must_use]
    pub const fn points_per_axis(self) -> [usize; 3] {
        match self {
            Self::Coarse => [51, 4, 4],
            Self::Medium => [101, 6, 6],
            Self::Fine => [151, 8, 8],
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Coarse => "Coarse",
            Self::Medium => "Medium",
            Self::Fine => "Fine",
        };
        f.write_str(name)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "coarse" => Ok(Self::Coarse),
            "medium" => Ok(Self::Medium),
            "fine" => Ok(Self::Fine),
            other => Err(format!("unknown resolution `{other}`")),
        }
    }
}

/// Settings that only affect how a solved result is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Multiplier applied to displacements before drawing.
    pub scale_factor: f64,
    /// Draw the element edges on top of the deformed shape.
    pub show_edges: bool,
    /// Overlay the undeformed mesh semi-transparently.
    pub show_undeformed: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            show_edges: true,
            show_undeformed: false,
        }
    }
}

impl ViewOptions {
    /// Check the scale factor against the slider bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ScaleFactor`] when the value is outside
    /// [`MIN_SCALE_FACTOR`]..=[`MAX_SCALE_FACTOR`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&self.scale_factor) {
            Ok(())
        } else {
            Err(ConfigError::ScaleFactor {
                value: self.scale_factor,
                min: MIN_SCALE_FACTOR,
                max: MAX_SCALE_FACTOR,
            })
        }
    }
}

/// Settings that require a new solve when they change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Mesh resolution preset.
    pub resolution: Resolution,
    /// Material of the beam.
    pub material: Material,
}

/// Complete application configuration, loadable from JSON.
///
/// Every field is optional in the file and falls back to its default.
///
/// # Examples
/// ```
/// use beamx::{AppConfig, Resolution};
///
/// let config = AppConfig::from_json(r#"{"model": {"resolution": "fine"}}"#)?;
/// assert_eq!(config.model.resolution, Resolution::Fine);
/// assert!(config.view.show_edges);
/// # Ok::<(), beamx::ConfigError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Mesh and material selection.
    pub model: ModelConfig,
    /// Visualization settings.
    pub view: ViewOptions,
}

impl AppConfig {
    /// Parse and validate a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the matching bound
    /// violation otherwise.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the errors
    /// of [`AppConfig::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check every bounded value.
    ///
    /// # Errors
    ///
    /// Returns the first bound violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model.material.properties().validate()?;
        self.view.validate()
    }
}
