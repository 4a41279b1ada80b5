//! Shared vertex attribute arrays
//!
//! Every array is allocated once, sized exactly from the layout plan, and
//! matches the GPU vertex layout of 3/4/1/1/2/2/3 components for positions,
//! colors, picking ids, sizes, patterns, uv and normals. Arrays serialize as
//! base64-encoded little-endian bytes for compact JSON transmission.

use base64::{engine::general_purpose, Engine as _};
use serde::{Serialize, Serializer};

pub const POSITION_COMPONENTS: usize = 3;
pub const COLOR_COMPONENTS: usize = 4;
pub const PICKING_ID_COMPONENTS: usize = 1;
pub const SIZE_COMPONENTS: usize = 1;
pub const PATTERN_COMPONENTS: usize = 2;
pub const UV_COMPONENTS: usize = 2;
pub const NORMAL_COMPONENTS: usize = 3;

fn encode_f32(data: &[f32]) -> String {
    let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
    general_purpose::STANDARD.encode(bytes)
}

/// Serialize Vec<f32> as base64-encoded string (non-optional)
pub fn serialize_f32_vec_base64<S>(data: &Vec<f32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&encode_f32(data))
}

/// Serialize Option<Vec<f32>> as base64-encoded string
pub fn serialize_f32_vec_as_base64<S>(data: &Option<Vec<f32>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match data {
        Some(vec) => serializer.serialize_some(&encode_f32(vec)),
        None => serializer.serialize_none(),
    }
}

/// Serialize Vec<u32> as base64-encoded string
pub fn serialize_u32_vec_base64<S>(data: &Vec<u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
    serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
}

/// Per-vertex attribute arrays of one buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferAttributes {
    #[serde(serialize_with = "serialize_f32_vec_base64")]
    pub positions: Vec<f32>,

    #[serde(serialize_with = "serialize_f32_vec_base64")]
    pub colors: Vec<f32>,

    #[serde(serialize_with = "serialize_f32_vec_base64")]
    pub picking_ids: Vec<f32>,

    #[serde(serialize_with = "serialize_f32_vec_base64")]
    pub sizes: Vec<f32>,

    /// Pattern atlas coordinates (x, y per vertex)
    #[serde(serialize_with = "serialize_f32_vec_base64")]
    pub patterns: Vec<f32>,

    /// Only allocated when uv output is enabled
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_f32_vec_as_base64")]
    pub uv: Option<Vec<f32>>,

    /// Only allocated once vertex normals are computed
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_f32_vec_as_base64")]
    pub normals: Option<Vec<f32>>,
}

impl BufferAttributes {
    /// Allocate zeroed arrays for `vertices_count` vertices
    pub fn allocate(vertices_count: usize, uv: bool) -> Self {
        Self {
            positions: vec![0.0; vertices_count * POSITION_COMPONENTS],
            colors: vec![0.0; vertices_count * COLOR_COMPONENTS],
            picking_ids: vec![0.0; vertices_count * PICKING_ID_COMPONENTS],
            sizes: vec![0.0; vertices_count * SIZE_COMPONENTS],
            patterns: vec![0.0; vertices_count * PATTERN_COMPONENTS],
            uv: uv.then(|| vec![0.0; vertices_count * UV_COMPONENTS]),
            normals: None,
        }
    }

    /// Number of vertices the arrays were allocated for
    pub fn vertices_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }
}

/// Concatenate several arrays into one exactly-sized array
pub fn concat<T: Copy>(arrays: &[&[T]]) -> Vec<T> {
    let total_length = arrays.iter().map(|arr| arr.len()).sum();
    let mut result = Vec::with_capacity(total_length);
    for arr in arrays {
        result.extend_from_slice(arr);
    }
    result
}
