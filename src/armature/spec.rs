//! Declarative armature description.
//!
//! The on-disk record uses the field names `Name`, `Location`, `RotX`,
//! `RotY`, `RotZ`, `ObjFile` and `Children`. It is deserialized into
//! [`RawSegment`], where every field is optional so that a missing field is
//! reported by name, then validated once into the typed [`SegmentDef`] tree.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ArmatureFormat;
use crate::error::{ArmatureError, MannequinError};
use crate::math::{degrees_to_radians, RotationRange};

/// Untyped record as it appears in the description file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(rename = "Name")]
    pub name: Option<RawField>,
    #[serde(rename = "Location")]
    pub location: Option<RawField>,
    #[serde(rename = "RotX")]
    pub rot_x: Option<RawField>,
    #[serde(rename = "RotY")]
    pub rot_y: Option<RawField>,
    #[serde(rename = "RotZ")]
    pub rot_z: Option<RawField>,
    #[serde(rename = "ObjFile")]
    pub obj_file: Option<RawField>,
    #[serde(rename = "Children", default)]
    pub children: Vec<RawSegment>,
}

/// A scalar field value. Anything but a string is kept so the type
/// mismatch can be reported against the field that carried it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Other(serde_json::Value),
}

impl RawField {
    fn kind(&self) -> &'static str {
        match self {
            RawField::Text(_) => "string",
            RawField::Other(serde_json::Value::Null) => "null",
            RawField::Other(serde_json::Value::Bool(_)) => "boolean",
            RawField::Other(serde_json::Value::Number(_)) => "number",
            RawField::Other(serde_json::Value::String(_)) => "string",
            RawField::Other(serde_json::Value::Array(_)) => "list",
            RawField::Other(serde_json::Value::Object(_)) => "table",
        }
    }
}

/// Opaque mesh asset reference handed to the scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshRef(pub String);

impl MeshRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated segment record. Angles are in radians.
///
/// Only obtainable through validation, so `range` always contains `rest`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDef {
    name: String,
    location: Vec3,
    range: RotationRange,
    rest: Vec3,
    mesh: MeshRef,
    children: Vec<SegmentDef>,
}

impl SegmentDef {
    /// Validate a raw record and all of its descendants.
    pub fn from_raw(raw: &RawSegment) -> Result<Self, ArmatureError> {
        Self::validate(raw, "")
    }

    fn validate(raw: &RawSegment, parent_path: &str) -> Result<Self, ArmatureError> {
        let unnamed = join_path(parent_path, "<unnamed>");
        let name = match text_field(&raw.name, &unnamed, "Name")? {
            None => {
                return Err(ArmatureError::MissingField {
                    segment: unnamed,
                    field: "Name",
                })
            }
            Some(n) if n.trim().is_empty() => {
                return Err(ArmatureError::InvalidField {
                    segment: unnamed,
                    field: "Name",
                    message: "name must not be empty".to_string(),
                })
            }
            Some(n) => n.to_string(),
        };
        let path = join_path(parent_path, &name);

        let location_str =
            text_field(&raw.location, &path, "Location")?.ok_or_else(|| ArmatureError::MissingField {
                segment: path.clone(),
                field: "Location",
            })?;
        let location = parse_triple(location_str, &path, "Location")?;

        let mut min = Vec3::ZERO;
        let mut rest = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        let axes = [("RotX", &raw.rot_x), ("RotY", &raw.rot_y), ("RotZ", &raw.rot_z)];
        for (i, (field, value)) in axes.into_iter().enumerate() {
            // Absent means the axis is locked at zero.
            let Some(text) = text_field(value, &path, field)? else { continue };
            let t = parse_triple(text, &path, field)?;
            if !(t.x <= t.y && t.y <= t.z) {
                return Err(ArmatureError::RangeOrder {
                    segment: path,
                    field,
                    min: t.x,
                    rest: t.y,
                    max: t.z,
                });
            }
            min[i] = t.x;
            rest[i] = t.y;
            max[i] = t.z;
        }

        let mesh = text_field(&raw.obj_file, &path, "ObjFile")?
            .map(|m| MeshRef(m.to_string()))
            .ok_or_else(|| ArmatureError::MissingField {
                segment: path.clone(),
                field: "ObjFile",
            })?;

        let children = raw
            .children
            .iter()
            .map(|child| Self::validate(child, &path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            location,
            range: RotationRange::new(degrees_to_radians(min), degrees_to_radians(max)),
            rest: degrees_to_radians(rest),
            mesh,
            children,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn range(&self) -> RotationRange {
        self.range
    }

    /// Rest orientation, radians.
    pub fn rest(&self) -> Vec3 {
        self.rest
    }

    pub fn mesh(&self) -> &MeshRef {
        &self.mesh
    }

    pub fn children(&self) -> &[SegmentDef] {
        &self.children
    }

    /// Number of records in this subtree, including self.
    pub fn segment_count(&self) -> usize {
        1 + self.children.iter().map(SegmentDef::segment_count).sum::<usize>()
    }
}

/// A complete, validated armature description.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmatureSpec {
    root: SegmentDef,
}

impl ArmatureSpec {
    pub fn root(&self) -> &SegmentDef {
        &self.root
    }

    pub fn from_raw(raw: &RawSegment) -> Result<Self, ArmatureError> {
        Ok(Self {
            root: SegmentDef::from_raw(raw)?,
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, ArmatureError> {
        let raw: RawSegment =
            serde_json::from_str(s).map_err(|e| ArmatureError::Parse(e.to_string()))?;
        Self::from_raw(&raw)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ArmatureError> {
        let raw: RawSegment = toml::from_str(s).map_err(|e| ArmatureError::Parse(e.to_string()))?;
        Self::from_raw(&raw)
    }

    /// Read a description file. The format is taken from `format`, or from
    /// the file extension when `None`.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        format: Option<ArmatureFormat>,
    ) -> Result<Self, MannequinError> {
        let path = path.as_ref();
        let format = format
            .or_else(|| ArmatureFormat::from_path(path))
            .ok_or_else(|| {
                ArmatureError::Parse(format!(
                    "{}: cannot infer description format from extension",
                    path.display()
                ))
            })?;
        let contents = std::fs::read_to_string(path)?;
        let spec = match format {
            ArmatureFormat::Json => Self::from_json_str(&contents)?,
            ArmatureFormat::Toml => Self::from_toml_str(&contents)?,
        };
        tracing::debug!(
            path = %path.display(),
            segments = spec.root.segment_count(),
            "Loaded armature description"
        );
        Ok(spec)
    }
}

/// String content of an optional scalar field; other types are rejected.
fn text_field<'a>(
    value: &'a Option<RawField>,
    segment: &str,
    field: &'static str,
) -> Result<Option<&'a str>, ArmatureError> {
    match value {
        None => Ok(None),
        Some(RawField::Text(text)) => Ok(Some(text)),
        Some(other) => Err(ArmatureError::InvalidField {
            segment: segment.to_string(),
            field,
            message: format!("expected a string, found {}", other.kind()),
        }),
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Parse exactly three whitespace-separated finite floats.
fn parse_triple(text: &str, segment: &str, field: &'static str) -> Result<Vec3, ArmatureError> {
    let invalid = |message: String| ArmatureError::InvalidField {
        segment: segment.to_string(),
        field,
        message,
    };

    let values = text
        .split_whitespace()
        .map(|tok| {
            tok.parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(format!("`{tok}` is not a finite number")))
        })
        .collect::<Result<Vec<f32>, _>>()?;

    match values.as_slice() {
        &[x, y, z] => Ok(Vec3::new(x, y, z)),
        other => Err(invalid(format!("expected 3 values, found {}", other.len()))),
    }
}
