//! Buffer module for extruded feature geometry
//!
//! This module owns the shared GPU attribute arrays and the index array,
//! sizes them from a counted layout plan, and fills them with wall geometry,
//! per-vertex attributes and vertex normals.
//!
//! # Submodules
//! - `types` - Input feature records and the pattern atlas
//! - `layout` - Per-feature layout cursors and the layout plan
//! - `attributes` - Attribute arrays, component strides and base64 serialization
//! - `lifecycle` - Buffer lifecycle (count, allocate, build) and the strategy trait
//! - `encode` - Per-vertex attribute encoding
//! - `extrude` - Wall extrusion geometry
//! - `normals` - Vertex normal accumulation and normalization
//! - `binary` - Binary bundle export for direct upload

mod types;
mod layout;
mod attributes;
mod lifecycle;
mod encode;
mod extrude;
mod normals;
mod binary;

pub use types::{
    Position,
    Color,
    FeatureSize,
    FeatureShape,
    Feature,
    AtlasPosition,
    ImageAtlas,
};

pub use layout::{
    BufferInfo,
    LayoutPlan,
};

pub use attributes::{
    POSITION_COMPONENTS,
    COLOR_COMPONENTS,
    PICKING_ID_COMPONENTS,
    SIZE_COMPONENTS,
    PATTERN_COMPONENTS,
    UV_COMPONENTS,
    NORMAL_COMPONENTS,
    BufferAttributes,
    concat,
    serialize_f32_vec_base64,
    serialize_f32_vec_as_base64,
    serialize_u32_vec_base64,
};

pub use lifecycle::{
    Buffer,
    BufferConfig,
    GeometryStrategy,
};

pub use extrude::{
    WALL_UV_SCALE,
    WALL_INDEX_PATTERN,
    check_is_closed,
};

pub use normals::{
    NormalMode,
    accumulate_normals,
    normalize_normals,
};

pub use binary::BUNDLE_MAGIC;
