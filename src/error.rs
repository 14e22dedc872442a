//! Error types for Mannequin

use thiserror::Error;

/// Main error type for Mannequin
#[derive(Error, Debug)]
pub enum MannequinError {
    #[error("Armature error: {0}")]
    Armature(#[from] ArmatureError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A malformed declarative armature description.
///
/// `segment` is the slash-separated path of the offending record
/// (`Root/Chest/Head`), or `<unnamed>` when the name itself is missing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArmatureError {
    #[error("Missing required field `{field}` in segment {segment}")]
    MissingField { segment: String, field: &'static str },

    #[error("Invalid field `{field}` in segment {segment}: {message}")]
    InvalidField {
        segment: String,
        field: &'static str,
        message: String,
    },

    #[error("Rotation range `{field}` in segment {segment} must satisfy min <= rest <= max, got {min} {rest} {max}")]
    RangeOrder {
        segment: String,
        field: &'static str,
        min: f32,
        rest: f32,
        max: f32,
    },

    #[error("Failed to parse armature description: {0}")]
    Parse(String),
}

impl ArmatureError {
    /// Name of the offending field, when the failure is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ArmatureError::MissingField { field, .. }
            | ArmatureError::InvalidField { field, .. }
            | ArmatureError::RangeOrder { field, .. } => Some(field),
            ArmatureError::Parse(_) => None,
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for Mannequin operations
pub type Result<T> = std::result::Result<T, MannequinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_accessor() {
        let err = ArmatureError::RangeOrder {
            segment: "Root/Elbow".to_string(),
            field: "RotX",
            min: 10.0,
            rest: 0.0,
            max: 90.0,
        };
        assert_eq!(err.field(), Some("RotX"));
        assert!(err.to_string().contains("Root/Elbow"));

        assert_eq!(ArmatureError::Parse("eof".to_string()).field(), None);
    }

    #[test]
    fn test_wraps_into_crate_error() {
        let err: MannequinError = ArmatureError::MissingField {
            segment: "<unnamed>".to_string(),
            field: "Name",
        }
        .into();
        assert!(matches!(err, MannequinError::Armature(_)));
    }
}
