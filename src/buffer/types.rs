//! Core input types for extruded feature buffers
//!
//! This module contains the feature records handed in by the geometry pass:
//! coordinate rings, optional style attributes and the pattern atlas lookup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A 2D or 3D coordinate (lng, lat[, z])
pub type Position = Vec<f64>;

/// RGBA color, one float per channel
pub type Color = [f32; 4];

/// Feature size, either a scalar or a vector
///
/// Only the first component of a vector size is honored. Multi-dimensional
/// sizes are not supported by the attribute layout (1 float per vertex).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureSize {
    Scalar(f32),
    Vector(Vec<f32>),
}

impl FeatureSize {
    /// Wall height in the same unit as the z coordinate
    pub fn height(&self) -> f32 {
        match self {
            FeatureSize::Scalar(value) => *value,
            FeatureSize::Vector(values) => values.first().copied().unwrap_or(0.0),
        }
    }

    /// Components written to the `sizes` attribute for one vertex
    ///
    /// A zero scalar counts as absent. A vector is only accepted with exactly
    /// two components, of which the first is kept.
    pub fn encoded(&self) -> Option<f32> {
        match self {
            FeatureSize::Scalar(value) if *value != 0.0 => Some(*value),
            FeatureSize::Scalar(_) => None,
            FeatureSize::Vector(values) if values.len() == 2 => Some(values[0]),
            FeatureSize::Vector(_) => None,
        }
    }
}

/// Shape hint carried through from the style pass (name or index)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureShape {
    Name(String),
    Index(f64),
}

/// One input feature: coordinate rings plus optional style attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Ordered rings, each an ordered list of positions
    pub coordinates: Vec<Vec<Position>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<FeatureSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<FeatureShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Picking id. An id of 0 is indistinguishable from no id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
}

impl Feature {
    pub fn new(coordinates: Vec<Vec<Position>>) -> Self {
        Self {
            coordinates,
            ..Self::default()
        }
    }

    /// Extrusion height (0 when no size is set)
    pub fn height(&self) -> f32 {
        self.size.as_ref().map(FeatureSize::height).unwrap_or(0.0)
    }

    /// Picking id with 0 treated as absent
    pub fn picking_id(&self) -> Option<u32> {
        self.id.filter(|&id| id != 0)
    }
}

/// Offset of a pattern inside the shared pattern texture
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasPosition {
    pub x: f32,
    pub y: f32,
}

/// Pattern name to atlas position lookup
pub type ImageAtlas = IndexMap<String, AtlasPosition>;
