use crate::core::geometry::framing::FramingParams;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AtomStyle {
    pub width_segments: u32,
    pub height_segments: u32,
    pub shininess: f64,
}

impl Default for AtomStyle {
    fn default() -> Self {
        Self {
            width_segments: 32,
            height_segments: 32,
            shininess: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BondStyle {
    pub radius: f64,
    pub radial_segments: u32,
    pub color: u32,
    pub shininess: f64,
}

impl Default for BondStyle {
    fn default() -> Self {
        Self {
            radius: 0.08,
            radial_segments: 8,
            color: 0x888888,
            shininess: 20.0,
        }
    }
}

/// Style of the icosahedron shown while no molecule is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PlaceholderStyle {
    pub radius: f64,
    pub detail: u32,
    pub color: u32,
    pub highlighted_color: u32,
    pub shininess: f64,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            radius: 2.0,
            detail: 0,
            color: 0x4488FF,
            highlighted_color: 0x00FF88,
            shininess: 50.0,
        }
    }
}

/// Per-frame increments, in radians, of the idle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RotationStyle {
    pub enabled: bool,
    pub x_step: f64,
    pub y_step: f64,
}

impl Default for RotationStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            x_step: 0.005,
            y_step: 0.01,
        }
    }
}

/// Everything the scene builder and viewer need besides the molecule itself.
///
/// Every section may be omitted from a TOML file, in which case the reference values
/// are used.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ViewerConfig {
    pub framing: FramingParams,
    pub atoms: AtomStyle,
    pub bonds: BondStyle,
    pub placeholder: PlaceholderStyle,
    pub rotation: RotationStyle,
}

impl ViewerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let framing = &self.framing;
        for (name, value) in [
            ("framing.target-span", framing.target_span),
            ("framing.min-scale", framing.min_scale),
            ("framing.max-scale", framing.max_scale),
            ("framing.single-atom-scale", framing.single_atom_scale),
            ("framing.fallback-scale", framing.fallback_scale),
            ("bonds.radius", self.bonds.radius),
            ("placeholder.radius", self.placeholder.radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }
        if framing.min_scale > framing.max_scale {
            return Err(ConfigError::InvalidParameter {
                name: "framing.min-scale",
                reason: format!(
                    "must not exceed framing.max-scale ({} > {})",
                    framing.min_scale, framing.max_scale
                ),
            });
        }
        if self.atoms.width_segments < 3 || self.atoms.height_segments < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "atoms.width-segments",
                reason: "spheres need at least 3 width and 2 height segments".to_string(),
            });
        }
        if self.bonds.radial_segments < 3 {
            return Err(ConfigError::InvalidParameter {
                name: "bonds.radial-segments",
                reason: "cylinders need at least 3 radial segments".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ViewerConfigBuilder {
    config: ViewerConfig,
}

impl ViewerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn framing(mut self, framing: FramingParams) -> Self {
        self.config.framing = framing;
        self
    }
    pub fn atoms(mut self, atoms: AtomStyle) -> Self {
        self.config.atoms = atoms;
        self
    }
    pub fn bonds(mut self, bonds: BondStyle) -> Self {
        self.config.bonds = bonds;
        self
    }
    pub fn placeholder(mut self, placeholder: PlaceholderStyle) -> Self {
        self.config.placeholder = placeholder;
        self
    }
    pub fn rotation(mut self, rotation: RotationStyle) -> Self {
        self.config.rotation = rotation;
        self
    }
    pub fn rotate(mut self, enabled: bool) -> Self {
        self.config.rotation.enabled = enabled;
        self
    }

    pub fn build(self) -> Result<ViewerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
