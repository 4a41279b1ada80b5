//! Polygon extrusion using earcut triangulation
//!
//! Each feature becomes a flat top face at its height, triangulated with
//! earcut (outer ring + holes), plus walls standing on every ring. Open rings
//! are closed by repeating their first point so the wall loop is complete.

use rayon::prelude::*;

use super::{flatten_ring, ring_dimensions};
use crate::buffer::{check_is_closed, Buffer, BufferInfo, Feature, GeometryStrategy, LayoutPlan, Position};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtrudeStrategy;

/// Rings with the closing point added where it is missing
fn closed_rings(feature: &Feature) -> Vec<Vec<Position>> {
    feature
        .coordinates
        .iter()
        .filter(|ring| !ring.is_empty())
        .map(|ring| {
            let mut ring = ring.clone();
            if !check_is_closed(std::slice::from_ref(&ring)) {
                ring.push(ring[0].clone());
            }
            ring
        })
        .collect()
}

fn plan_feature(feature: &Feature) -> anyhow::Result<BufferInfo> {
    let rings = closed_rings(feature);
    let dimensions = rings.first().map_or(2, |ring| ring_dimensions(ring));

    // Build flat coordinate array for earcut
    let mut flat_coords = Vec::new();
    let mut holes = Vec::new();
    let mut face_num = 0;
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            holes.push(flat_coords.len() / dimensions);
        }
        flatten_ring(ring, dimensions, &mut flat_coords);
        face_num += ring.len() - 1;
    }

    let triangles = if rings.first().is_some_and(|ring| ring.len() >= 4) {
        earcutr::earcut(&flat_coords, &holes, dimensions)
            .map_err(|_| anyhow::anyhow!("Failed to triangulate feature top face"))?
    } else {
        // fewer than 3 distinct points: walls only
        Vec::new()
    };

    let top_vertices = flat_coords.len() / dimensions;
    let mut info = BufferInfo::new(
        flat_coords,
        dimensions,
        top_vertices + face_num * 4,
        triangles.len() + face_num * 6,
    );
    info.holes = holes;
    info.face_num = face_num;
    info.index_array = Some(triangles.into_iter().map(|i| i as u32).collect());
    Ok(info)
}

impl GeometryStrategy for ExtrudeStrategy {
    fn count(&self, features: &[Feature]) -> anyhow::Result<LayoutPlan> {
        // Use rayon to triangulate features in parallel
        let infos = features
            .par_iter()
            .enumerate()
            .map(|(i, feature)| {
                plan_feature(feature).map_err(|e| e.context(format!("feature {}", i)))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(LayoutPlan::from_infos(infos))
    }

    fn build(&self, features: &[Feature], plan: &mut LayoutPlan, buffer: &mut Buffer) -> anyhow::Result<()> {
        for (feature, info) in features.iter().zip(plan.features.iter_mut()) {
            buffer.encode_array(feature, info, info.vertex_demand);

            let height = feature.height();
            let dimensions = info.dimensions;
            let top_vertices = info.point_count();

            // Top face
            let mut top = Vec::with_capacity(top_vertices * 3);
            for point in info.vertices.chunks_exact(dimensions) {
                top.extend_from_slice(&[point[0] as f32, point[1] as f32, height]);
            }
            buffer.write_positions(info.vertices_offset, &top);
            let base = info.vertices_offset as u32;
            let top_indices: Vec<u32> = info
                .index_array
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(|&i| i + base)
                .collect();
            buffer.write_indices(info.index_offset, &top_indices);
            info.advance(top_vertices, top_indices.len());

            // Walls, one ring at a time
            let mut ring_starts = Vec::with_capacity(info.holes.len() + 2);
            ring_starts.push(0);
            ring_starts.extend_from_slice(&info.holes);
            ring_starts.push(top_vertices);

            let BufferInfo {
                vertices,
                vertices_offset,
                index_offset,
                ..
            } = info;
            for bounds in ring_starts.windows(2) {
                let ring = &vertices[bounds[0] * dimensions..bounds[1] * dimensions];
                let face_num = (bounds[1] - bounds[0]).saturating_sub(1);
                buffer.extrude_ring(ring, dimensions, face_num, height, vertices_offset, index_offset);
            }
        }
        log::debug!("Extruded {} features", features.len());
        Ok(())
    }
}
