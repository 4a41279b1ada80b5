//! Buffer lifecycle: count, allocate, build
//!
//! A `Buffer` is built start to finish in three separate phases. The injected
//! `GeometryStrategy` counts every feature's demand into a `LayoutPlan`, the
//! buffer allocates each shared array once at exactly that size, and the
//! strategy then emits geometry into the planned ranges.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::attributes::{serialize_u32_vec_base64, BufferAttributes};
use super::layout::LayoutPlan;
use super::normals::NormalMode;
use super::types::{Feature, ImageAtlas};
use crate::projection::lng_lat_to_meters;

/// Geometry-specific counting and emission
///
/// `count` must assign every feature a non-overlapping vertex and index range
/// (see `LayoutPlan::from_infos`). `build` must fill exactly those ranges,
/// advancing each feature's cursors as it goes.
pub trait GeometryStrategy {
    /// Compute per-feature demand and the total buffer sizes
    fn count(&self, features: &[Feature]) -> anyhow::Result<LayoutPlan>;

    /// Emit every feature's geometry and attributes into `buffer`
    fn build(&self, features: &[Feature], plan: &mut LayoutPlan, buffer: &mut Buffer) -> anyhow::Result<()>;
}

/// Buffer construction options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BufferConfig {
    /// Allocate and fill the `uv` attribute
    pub uv: bool,
    /// Compute vertex normals once the build finishes
    pub compute_normals: bool,
    pub normal_mode: NormalMode,
}

impl BufferConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).map_err(|e| anyhow::anyhow!("Invalid buffer config: {}", e))
    }
}

/// Shared attribute and index arrays for a set of features
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub(crate) attributes: BufferAttributes,
    #[serde(serialize_with = "serialize_u32_vec_base64")]
    pub(crate) index_array: Vec<u32>,
    pub(crate) vertices_count: usize,
    pub(crate) index_count: usize,
    #[serde(skip)]
    pub(crate) image_pos: ImageAtlas,
    #[serde(skip)]
    pub(crate) uv: bool,
    #[serde(skip)]
    layout: LayoutPlan,
}

impl Buffer {
    /// Count, allocate and build the buffers for `features`
    pub fn new(
        features: &[Feature],
        image_pos: ImageAtlas,
        config: &BufferConfig,
        strategy: &dyn GeometryStrategy,
    ) -> anyhow::Result<Self> {
        let profile = std::env::var("PROFILE_TIMING").is_ok();
        let start = Instant::now();

        let mut plan = strategy.count(features)?;
        anyhow::ensure!(
            plan.features.len() == features.len(),
            "layout plan describes {} features, expected {}",
            plan.features.len(),
            features.len()
        );
        let count_time = start.elapsed();

        let mut buffer = Self::allocate(plan.vertices_count, plan.index_count, image_pos, config.uv);
        log::debug!(
            "Allocated buffers for {} features: {} vertices, {} indices",
            features.len(),
            buffer.vertices_count,
            buffer.index_count
        );

        let build_start = Instant::now();
        strategy.build(features, &mut plan, &mut buffer)?;
        plan.verify()?;
        buffer.layout = plan;
        let build_time = build_start.elapsed();

        if config.compute_normals {
            buffer.compute_vertex_normals(lng_lat_to_meters, config.normal_mode);
        }

        if profile {
            log::info!(
                "Buffer: count {:.2}ms, build {:.2}ms, total {:.2}ms ({} vertices)",
                count_time.as_secs_f64() * 1000.0,
                build_time.as_secs_f64() * 1000.0,
                start.elapsed().as_secs_f64() * 1000.0,
                buffer.vertices_count
            );
        }

        Ok(buffer)
    }

    /// Allocate zeroed arrays sized to the counted totals
    pub fn allocate(vertices_count: usize, index_count: usize, image_pos: ImageAtlas, uv: bool) -> Self {
        Self {
            attributes: BufferAttributes::allocate(vertices_count, uv),
            index_array: vec![0; index_count],
            vertices_count,
            index_count,
            image_pos,
            uv,
            layout: LayoutPlan::default(),
        }
    }

    pub fn attributes(&self) -> &BufferAttributes {
        &self.attributes
    }

    pub fn index_array(&self) -> &[u32] {
        &self.index_array
    }

    pub fn vertices_count(&self) -> usize {
        self.vertices_count
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Layout plan after the build (cursors at the end of each range)
    pub fn layout(&self) -> &LayoutPlan {
        &self.layout
    }

    pub fn uv_enabled(&self) -> bool {
        self.uv
    }

    /// Copy raw xyz triples into `positions` starting at `vertex_offset`
    pub fn write_positions(&mut self, vertex_offset: usize, positions: &[f32]) {
        let start = vertex_offset * 3;
        debug_assert!(start + positions.len() <= self.attributes.positions.len());
        self.attributes.positions[start..start + positions.len()].copy_from_slice(positions);
    }

    /// Copy indices into the index array starting at `index_offset`
    pub fn write_indices(&mut self, index_offset: usize, indices: &[u32]) {
        debug_assert!(index_offset + indices.len() <= self.index_count);
        self.index_array[index_offset..index_offset + indices.len()].copy_from_slice(indices);
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::layout::BufferInfo;

    /// Emits one wall segment per feature from a fixed two-point ring
    struct SingleSegment;

    impl GeometryStrategy for SingleSegment {
        fn count(&self, features: &[Feature]) -> anyhow::Result<LayoutPlan> {
            let infos = features
                .iter()
                .map(|_| BufferInfo::for_walls(vec![0.0, 0.0, 1.0, 0.0], 2))
                .collect();
            Ok(LayoutPlan::from_infos(infos))
        }

        fn build(&self, features: &[Feature], plan: &mut LayoutPlan, buffer: &mut Buffer) -> anyhow::Result<()> {
            for (feature, info) in features.iter().zip(plan.features.iter_mut()) {
                buffer.calculate_wall(feature, info);
            }
            Ok(())
        }
    }

    /// Counts a segment but never emits it
    struct Lazy;

    impl GeometryStrategy for Lazy {
        fn count(&self, features: &[Feature]) -> anyhow::Result<LayoutPlan> {
            SingleSegment.count(features)
        }

        fn build(&self, _features: &[Feature], _plan: &mut LayoutPlan, _buffer: &mut Buffer) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct Failing;

    impl GeometryStrategy for Failing {
        fn count(&self, _features: &[Feature]) -> anyhow::Result<LayoutPlan> {
            anyhow::bail!("triangulation failed")
        }

        fn build(&self, _features: &[Feature], _plan: &mut LayoutPlan, _buffer: &mut Buffer) -> anyhow::Result<()> {
            unreachable!("build must not run after a failed count")
        }
    }

    #[test]
    fn test_lifecycle_sizes_buffers_exactly() {
        let features = vec![Feature::default(), Feature::default()];
        let buffer = Buffer::new(&features, ImageAtlas::new(), &BufferConfig::default(), &SingleSegment).unwrap();

        assert_eq!(buffer.vertices_count(), 8);
        assert_eq!(buffer.index_count(), 12);
        assert_eq!(buffer.attributes().positions.len(), 24);
        assert_eq!(buffer.index_array(), &[1, 2, 0, 3, 2, 1, 5, 6, 4, 7, 6, 5]);
        assert!(buffer.layout().features.iter().all(BufferInfo::is_complete));
    }

    #[test]
    fn test_incomplete_build_is_rejected() {
        let features = vec![Feature::default()];
        let result = Buffer::new(&features, ImageAtlas::new(), &BufferConfig::default(), &Lazy);
        assert!(result.is_err());
    }

    #[test]
    fn test_count_failure_aborts_construction() {
        let result = Buffer::new(&[], ImageAtlas::new(), &BufferConfig::default(), &Failing);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("triangulation failed"));
    }

    #[test]
    fn test_config_from_json() {
        let config = BufferConfig::from_json(r#"{ "uv": true, "normalMode": "face_weighted" }"#).unwrap();
        assert!(config.uv);
        assert!(!config.compute_normals);
        assert_eq!(config.normal_mode, NormalMode::FaceWeighted);

        assert!(BufferConfig::from_json("{ \"uv\": 3 }").is_err());
    }
}
