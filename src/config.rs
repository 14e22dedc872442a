//! Configuration parsing and management for Mannequin

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, MannequinError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gestures: GestureConfig,
    pub armature: ArmatureConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MannequinError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, MannequinError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, MannequinError> {
        let paths = [
            PathBuf::from("mannequin.toml"),
            PathBuf::from("config/mannequin.toml"),
            dirs_path().join("mannequin.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), MannequinError> {
        let g = &self.gestures;

        if !(g.pixels_per_radian.is_finite() && g.pixels_per_radian > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "gestures.pixels_per_radian".to_string(),
                message: "Sensitivity must be a positive number".to_string(),
            }
            .into());
        }

        if !(g.twist_factor.is_finite() && g.twist_factor > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "gestures.twist_factor".to_string(),
                message: "Twist factor must be a positive number".to_string(),
            }
            .into());
        }

        // Exactly 0.5 would put the pitch clamp on the pole.
        if !(g.camera_pitch_limit > 0.0 && g.camera_pitch_limit < 0.5) {
            return Err(ConfigError::InvalidValue {
                field: "gestures.camera_pitch_limit".to_string(),
                message: "Pitch limit must be a fraction of pi in (0, 0.5)".to_string(),
            }
            .into());
        }

        if g.flip_horizontal.iter().any(|name| name.is_empty()) {
            tracing::warn!("gestures.flip_horizontal contains an empty segment name");
        }

        Ok(())
    }
}

/// Gesture sensitivity and mapping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Pointer pixels that map to one half turn (pi radians)
    pub pixels_per_radian: f32,
    /// Multiplier applied to the rotation gesture angle
    pub twist_factor: f32,
    /// Symmetric camera pitch clamp, as a fraction of pi
    pub camera_pitch_limit: f32,
    /// Segments whose horizontal pan mapping is inverted
    pub flip_horizontal: Vec<String>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pixels_per_radian: 360.0,
            twist_factor: 2.0,
            camera_pitch_limit: 0.49,
            flip_horizontal: vec!["Head".to_string()],
        }
    }
}

impl GestureConfig {
    /// Whether a segment's horizontal pan contribution is negated
    pub fn flips_horizontal(&self, segment: &str) -> bool {
        self.flip_horizontal.iter().any(|name| name == segment)
    }

    /// Camera pitch clamp in radians
    pub fn pitch_limit_radians(&self) -> f32 {
        std::f32::consts::PI * self.camera_pitch_limit
    }
}

/// Source format of the declarative armature description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmatureFormat {
    Json,
    Toml,
}

impl ArmatureFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Armature description location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmatureConfig {
    /// Path to the armature description
    pub path: Option<PathBuf>,
    /// Explicit format; inferred from the extension when absent
    pub format: Option<ArmatureFormat>,
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("mannequin");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/mannequin");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/mannequin");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mannequin");
        }
    }

    PathBuf::from(".")
}
