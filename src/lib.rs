//! GPU-ready buffers for extruded geographic features
//!
//! Converts feature coordinate rings into flat position/color/picking/size/
//! pattern/uv/normal attribute arrays plus a shared index array, packing all
//! features into buffers that are sized once from a counted layout plan.
//!
//! ```ignore
//! let features: Vec<Feature> = serde_json::from_str(json)?;
//! let buffer = Buffer::new(&features, ImageAtlas::new(), &BufferConfig::default(), &WallStrategy)?;
//! let blob = buffer.to_bytes()?;
//! ```

pub mod buffer;
pub mod projection;
pub mod strategy;

pub use buffer::*;
pub use projection::{lng_lat_to_meters, planar};
pub use strategy::{ExtrudeStrategy, WallStrategy};
