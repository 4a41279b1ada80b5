//! Vertex normal computation
//!
//! Walks the finished index buffer triangle by triangle, accumulates a
//! per-triangle vector into each of its three vertices, then normalizes every
//! vertex normal in place.

use glam::{DVec3, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::attributes::{NORMAL_COMPONENTS, POSITION_COMPONENTS};
use super::lifecycle::Buffer;

/// What gets accumulated per triangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalMode {
    /// The edge vector `pC - pB`, added to all three vertices.
    ///
    /// Matches the normals existing renderers were tuned against; the face
    /// cross product is not used.
    #[default]
    EdgeAccumulation,
    /// The area-weighted face normal `(pC - pB) x (pA - pB)`
    FaceWeighted,
}

fn projected_vertex<P>(positions: &[f32], vertex: usize, projection: &P) -> DVec3
where
    P: Fn([f64; 2]) -> [f64; 2],
{
    let base = vertex * POSITION_COMPONENTS;
    let [x, y] = projection([positions[base] as f64, positions[base + 1] as f64]);
    DVec3::new(x, y, positions[base + 2] as f64)
}

/// Sum per-triangle contributions into an unnormalized normal array
///
/// `positions` hold geographic x/y and a planar z. Each triangle corner is
/// projected through `projection` before the edge vectors are taken.
pub fn accumulate_normals<P>(positions: &[f32], indices: &[u32], projection: P, mode: NormalMode) -> Vec<f32>
where
    P: Fn([f64; 2]) -> [f64; 2],
{
    let vertices_count = positions.len() / POSITION_COMPONENTS;
    let mut normals = vec![0.0f32; vertices_count * NORMAL_COMPONENTS];

    for triangle in indices.chunks_exact(3) {
        let (a, b, c) = (triangle[0] as usize, triangle[1] as usize, triangle[2] as usize);
        let p_a = projected_vertex(positions, a, &projection);
        let p_b = projected_vertex(positions, b, &projection);
        let p_c = projected_vertex(positions, c, &projection);

        let cb = p_c - p_b;
        let ab = p_a - p_b;
        let contribution = match mode {
            NormalMode::EdgeAccumulation => cb,
            NormalMode::FaceWeighted => cb.cross(ab),
        };

        for vertex in [a, b, c] {
            let base = vertex * NORMAL_COMPONENTS;
            normals[base] += contribution.x as f32;
            normals[base + 1] += contribution.y as f32;
            normals[base + 2] += contribution.z as f32;
        }
    }

    normals
}

/// Normalize every xyz triple in place; zero vectors stay zero
pub fn normalize_normals(normals: &mut [f32]) {
    normals.par_chunks_exact_mut(NORMAL_COMPONENTS).for_each(|normal| {
        Vec3::from_slice(normal).normalize_or_zero().write_to_slice(normal);
    });
}

impl Buffer {
    /// Compute unit vertex normals from the finished position and index arrays
    pub fn compute_vertex_normals<P>(&mut self, projection: P, mode: NormalMode)
    where
        P: Fn([f64; 2]) -> [f64; 2],
    {
        let mut normals = accumulate_normals(&self.attributes.positions, &self.index_array, projection, mode);
        normalize_normals(&mut normals);
        log::debug!("Computed {} vertex normals ({:?})", normals.len() / NORMAL_COMPONENTS, mode);
        self.attributes.normals = Some(normals);
    }
}
