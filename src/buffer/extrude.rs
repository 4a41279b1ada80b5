//! Wall extrusion
//!
//! Each pair of consecutive ring points becomes a vertical quad from the
//! ground (z = 0) up to the feature height: 4 vertices and 6 indices.
//!
//! ```text
//!   0 ---- 1    height
//!   |    / |
//!   |  /   |
//!   2 ---- 3    ground
//! prePoint  nextPoint
//! ```

use super::attributes::{POSITION_COMPONENTS, UV_COMPONENTS};
use super::layout::BufferInfo;
use super::lifecycle::Buffer;
use super::types::{Feature, Position};

/// Local triangle indices of one wall quad
pub const WALL_INDEX_PATTERN: [u32; 6] = [1, 2, 0, 3, 2, 1];

/// Heights are divided by this to get the V extent of the wall texture,
/// which keeps atlas pattern texels at a constant size in meters
pub const WALL_UV_SCALE: f32 = 2000.0;

/// U extent of one wall panel in the pattern texture
const WALL_UV_WIDTH: f32 = 0.1;

const WALL_VERTICES: usize = 4;
const WALL_INDICES: usize = 6;

/// True if the first ring's first and last points match in x and y
///
/// Features without a ring, or with an empty first ring, are not closed.
pub fn check_is_closed(points: &[Vec<Position>]) -> bool {
    let Some(ring) = points.first() else {
        return false;
    };
    match (ring.first(), ring.last()) {
        (Some(p1), Some(p2)) if p1.len() >= 2 && p2.len() >= 2 => p1[0] == p2[0] && p1[1] == p2[1],
        _ => false,
    }
}

impl Buffer {
    /// Encode attributes for, and emit, all `face_num` wall segments of a feature
    pub fn calculate_wall(&mut self, feature: &Feature, info: &mut BufferInfo) {
        self.encode_array(feature, info, info.face_num * WALL_VERTICES);

        let height = feature.height();
        let BufferInfo {
            vertices,
            vertices_offset,
            index_offset,
            face_num,
            dimensions,
            ..
        } = info;
        self.extrude_ring(vertices, *dimensions, *face_num, height, vertices_offset, index_offset);
    }

    /// Emit `face_num` wall segments from a flattened ring, advancing both cursors
    pub(crate) fn extrude_ring(
        &mut self,
        vertices: &[f64],
        dimensions: usize,
        face_num: usize,
        height: f32,
        vertices_offset: &mut usize,
        index_offset: &mut usize,
    ) {
        for i in 0..face_num {
            let pre_point = &vertices[i * dimensions..(i + 1) * dimensions];
            let next_point = &vertices[(i + 1) * dimensions..(i + 2) * dimensions];
            self.calculate_extrude_face(pre_point, next_point, *vertices_offset, *index_offset, height);
            *vertices_offset += WALL_VERTICES;
            *index_offset += WALL_INDICES;
        }
    }

    /// Write one wall quad at `position_offset` / `index_offset`
    pub fn calculate_extrude_face(
        &mut self,
        pre_point: &[f64],
        next_point: &[f64],
        position_offset: usize,
        index_offset: usize,
        size: f32,
    ) {
        let (px, py) = (pre_point[0] as f32, pre_point[1] as f32);
        let (nx, ny) = (next_point[0] as f32, next_point[1] as f32);
        self.write_positions(
            position_offset,
            &[px, py, size, nx, ny, size, px, py, 0.0, nx, ny, 0.0],
        );

        let base = position_offset as u32;
        self.write_indices(index_offset, &WALL_INDEX_PATTERN.map(|v| v + base));

        if let Some(uv) = self.attributes.uv.as_mut() {
            let v = size / WALL_UV_SCALE;
            let start = position_offset * UV_COMPONENTS;
            uv[start..start + WALL_VERTICES * UV_COMPONENTS]
                .copy_from_slice(&[WALL_UV_WIDTH, 0.0, 0.0, 0.0, WALL_UV_WIDTH, v, 0.0, v]);
        }

        debug_assert!((position_offset + WALL_VERTICES) * POSITION_COMPONENTS <= self.attributes.positions.len());
    }
}
