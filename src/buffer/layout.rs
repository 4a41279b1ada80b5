//! Layout planning for shared feature buffers
//!
//! The counting pass describes each feature's vertex and index demand with a
//! `BufferInfo`. `LayoutPlan::from_infos` prefix-sums those demands so every
//! feature gets its own non-overlapping vertex and index range, and the build
//! pass advances each feature's cursors through that range.

use std::ops::Range;

use serde::Serialize;

/// Per-feature layout descriptor and write cursor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferInfo {
    /// Flattened source coordinates, `dimensions` values per point
    pub vertices: Vec<f64>,
    /// Precomputed triangulation indices, local to this feature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_array: Option<Vec<u32>>,
    /// Start of each hole ring, in points (earcut convention)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<usize>,
    /// Next free vertex slot
    pub vertices_offset: usize,
    /// Next free index slot
    pub index_offset: usize,
    /// Number of wall segments to emit
    pub face_num: usize,
    /// Stride of `vertices` (2 or 3)
    pub dimensions: usize,
    /// Vertices this feature occupies in the shared buffers
    pub vertex_demand: usize,
    /// Indices this feature occupies in the shared index array
    pub index_demand: usize,
    #[serde(skip)]
    vertex_start: usize,
    #[serde(skip)]
    index_start: usize,
}

impl BufferInfo {
    pub fn new(vertices: Vec<f64>, dimensions: usize, vertex_demand: usize, index_demand: usize) -> Self {
        Self {
            vertices,
            dimensions,
            vertex_demand,
            index_demand,
            ..Self::default()
        }
    }

    /// Wall-only layout: `face_num` segments of 4 vertices and 6 indices each
    pub fn for_walls(vertices: Vec<f64>, dimensions: usize) -> Self {
        let points = if dimensions == 0 { 0 } else { vertices.len() / dimensions };
        let face_num = points.saturating_sub(1);
        let mut info = Self::new(vertices, dimensions, face_num * 4, face_num * 6);
        info.face_num = face_num;
        info
    }

    /// Number of points in `vertices`
    pub fn point_count(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.vertices.len() / self.dimensions
        }
    }

    /// Vertex range assigned by the plan
    pub fn vertex_range(&self) -> Range<usize> {
        self.vertex_start..self.vertex_start + self.vertex_demand
    }

    /// Index range assigned by the plan
    pub fn index_range(&self) -> Range<usize> {
        self.index_start..self.index_start + self.index_demand
    }

    /// Move the write cursors past data that was just emitted
    pub fn advance(&mut self, vertices: usize, indices: usize) {
        self.vertices_offset += vertices;
        self.index_offset += indices;
        debug_assert!(
            self.vertices_offset <= self.vertex_range().end,
            "vertex cursor {} ran past its range {:?}",
            self.vertices_offset,
            self.vertex_range()
        );
        debug_assert!(
            self.index_offset <= self.index_range().end,
            "index cursor {} ran past its range {:?}",
            self.index_offset,
            self.index_range()
        );
    }

    /// True once the cursors sit at the end of the assigned ranges
    pub fn is_complete(&self) -> bool {
        self.vertices_offset == self.vertex_range().end && self.index_offset == self.index_range().end
    }
}

/// Layout of all features in the shared buffers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub features: Vec<BufferInfo>,
    pub vertices_count: usize,
    pub index_count: usize,
}

impl LayoutPlan {
    /// Assign consecutive, non-overlapping ranges in feature order
    pub fn from_infos(mut features: Vec<BufferInfo>) -> Self {
        let mut vertices_count = 0;
        let mut index_count = 0;
        for info in &mut features {
            info.vertex_start = vertices_count;
            info.index_start = index_count;
            info.vertices_offset = vertices_count;
            info.index_offset = index_count;
            vertices_count += info.vertex_demand;
            index_count += info.index_demand;
        }

        Self {
            features,
            vertices_count,
            index_count,
        }
    }

    /// Check that every feature filled exactly its assigned ranges
    pub fn verify(&self) -> anyhow::Result<()> {
        for (i, info) in self.features.iter().enumerate() {
            anyhow::ensure!(
                info.is_complete(),
                "feature {} wrote vertices up to {} (range {:?}) and indices up to {} (range {:?})",
                i,
                info.vertices_offset,
                info.vertex_range(),
                info.index_offset,
                info.index_range()
            );
        }
        Ok(())
    }
}
