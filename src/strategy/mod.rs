//! Concrete geometry strategies
//!
//! These decide how many vertices and indices each feature needs and emit
//! them through the buffer's extrusion and encoding operations.
//!
//! # Submodules
//! - `walls` - Wall-only extrusion of each feature's first ring
//! - `extrude` - Polygon extrusion: earcut top face plus walls for every ring

mod walls;
mod extrude;

use crate::buffer::Position;

pub use walls::WallStrategy;
pub use extrude::ExtrudeStrategy;

/// Stride used for a ring: 3 if its first point carries z, else 2
pub fn ring_dimensions(ring: &[Position]) -> usize {
    ring.first().map_or(2, |p| p.len().clamp(2, 3))
}

/// Flatten a ring into `dimensions` values per point, padding missing values with 0
pub fn flatten_ring(ring: &[Position], dimensions: usize, out: &mut Vec<f64>) {
    for point in ring {
        for d in 0..dimensions {
            out.push(point.get(d).copied().unwrap_or(0.0));
        }
    }
}
