//! Wall-only extrusion
//!
//! Every feature contributes the walls standing on its first ring:
//! N points give N - 1 segments of 4 vertices and 6 indices.

use rayon::prelude::*;

use super::{flatten_ring, ring_dimensions};
use crate::buffer::{Buffer, BufferInfo, Feature, GeometryStrategy, LayoutPlan};

#[derive(Debug, Clone, Copy, Default)]
pub struct WallStrategy;

impl GeometryStrategy for WallStrategy {
    fn count(&self, features: &[Feature]) -> anyhow::Result<LayoutPlan> {
        // Use rayon to flatten rings in parallel; offsets are assigned afterwards
        let infos: Vec<BufferInfo> = features
            .par_iter()
            .map(|feature| {
                let ring = feature.coordinates.first().map(Vec::as_slice).unwrap_or(&[]);
                let dimensions = ring_dimensions(ring);
                let mut vertices = Vec::with_capacity(ring.len() * dimensions);
                flatten_ring(ring, dimensions, &mut vertices);
                BufferInfo::for_walls(vertices, dimensions)
            })
            .collect();

        Ok(LayoutPlan::from_infos(infos))
    }

    fn build(&self, features: &[Feature], plan: &mut LayoutPlan, buffer: &mut Buffer) -> anyhow::Result<()> {
        for (feature, info) in features.iter().zip(plan.features.iter_mut()) {
            buffer.calculate_wall(feature, info);
        }
        log::debug!("Built walls for {} features", features.len());
        Ok(())
    }
}
