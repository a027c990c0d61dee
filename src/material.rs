//! Linear-elastic material definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Conversion factor from kg/m³ to t/mm³.
const KG_PER_M3_TO_T_PER_MM3: f64 = 1.0e-12;

/// Smallest accepted Young's modulus in MPa.
pub const MIN_ELASTIC_MODULUS: f64 = 1.0;
/// Largest accepted Poisson's ratio.
pub const MAX_POISSON_RATIO: f64 = 0.49;
/// Smallest accepted density in kg/m³.
pub const MIN_DENSITY: f64 = 1.0;

/// Material selection offered by the configuration surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Material {
    /// Structural steel.
    Steel,
    /// Aluminium alloy.
    Aluminum,
    /// Normal-weight concrete.
    Concrete,
    /// User supplied properties.
    Custom(MaterialProperties),
}

impl Default for Material {
    fn default() -> Self {
        Self::Steel
    }
}

impl Material {
    /// Create a validated custom material.
    ///
    /// `density` is given in kg/m³.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is outside the accepted bounds.
    pub fn custom(
        elastic_modulus: f64,
        poisson_ratio: f64,
        density: f64,
    ) -> Result<Self, ConfigError> {
        let properties = MaterialProperties {
            elastic_modulus,
            poisson_ratio,
            density,
        };
        properties.validate()?;
        Ok(Self::Custom(properties))
    }

    /// Look up a preset by name, ignoring case.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "steel" => Some(Self::Steel),
            "aluminum" | "aluminium" => Some(Self::Aluminum),
            "concrete" => Some(Self::Concrete),
            _ => None,
        }
    }

    /// Elastic constants and density of the material.
    #[must_use]
    pub fn properties(&self) -> MaterialProperties {
        match self {
            Self::Steel => MaterialProperties {
                elastic_modulus: 206_000.0,
                poisson_ratio: 0.30,
                density: 7850.0,
            },
            Self::Aluminum => MaterialProperties {
                elastic_modulus: 70_000.0,
                poisson_ratio: 0.33,
                density: 2700.0,
            },
            Self::Concrete => MaterialProperties {
                elastic_modulus: 30_000.0,
                poisson_ratio: 0.20,
                density: 2400.0,
            },
            Self::Custom(properties) => *properties,
        }
    }

    /// Display name used in reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Steel => "Steel",
            Self::Aluminum => "Aluminum",
            Self::Concrete => "Concrete",
            Self::Custom(_) => "Custom",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let properties = self.properties();
        write!(
            f,
            "{}: E = {} MPa, v = {:.2}, p = {:.0} kg/m³",
            self.name(),
            properties.elastic_modulus,
            properties.poisson_ratio,
            properties.density
        )
    }
}

/// Linear-elastic constants of a material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Young's modulus in MPa.
    pub elastic_modulus: f64,
    /// Poisson's ratio.
    pub poisson_ratio: f64,
    /// Density in kg/m³.
    pub density: f64,
}

impl MaterialProperties {
    /// Check the constants against the bounds of the configuration surface.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] variant naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elastic_modulus.is_nan() || self.elastic_modulus < MIN_ELASTIC_MODULUS {
            return Err(ConfigError::ElasticModulus(self.elastic_modulus));
        }
        if !(0.0..=MAX_POISSON_RATIO).contains(&self.poisson_ratio) {
            return Err(ConfigError::PoissonRatio(self.poisson_ratio));
        }
        if self.density.is_nan() || self.density < MIN_DENSITY {
            return Err(ConfigError::Density(self.density));
        }
        Ok(())
    }

    /// Density converted to the solver's unit system (t/mm³).
    #[must_use]
    pub fn density_t_per_mm3(&self) -> f64 {
        self.density * KG_PER_M3_TO_T_PER_MM3
    }
}
