//! Per-vertex attribute encoding
//!
//! Broadcasts a feature's color, picking id, size and pattern atlas position
//! to every vertex it contributes, starting at the feature's vertex cursor.

use super::attributes::{COLOR_COMPONENTS, PATTERN_COMPONENTS, SIZE_COMPONENTS};
use super::layout::BufferInfo;
use super::lifecycle::Buffer;
use super::types::{AtlasPosition, Feature};

impl Buffer {
    /// Write attributes for `num` vertices starting at `info.vertices_offset`
    ///
    /// Absent color, id (or id 0) and size leave the slots at zero. A pattern
    /// missing from the atlas falls back to the atlas origin.
    pub fn encode_array(&mut self, feature: &Feature, info: &BufferInfo, num: usize) {
        let start = info.vertices_offset;
        let end = start + num;
        debug_assert!(end <= self.vertices_count, "encode past vertex capacity");

        if let Some(color) = feature.color {
            for slot in self.attributes.colors[start * COLOR_COMPONENTS..end * COLOR_COMPONENTS]
                .chunks_exact_mut(COLOR_COMPONENTS)
            {
                slot.copy_from_slice(&color);
            }
        }

        if let Some(id) = feature.picking_id() {
            self.attributes.picking_ids[start..end].fill(id as f32);
        }

        if let Some(size) = feature.size.as_ref().and_then(|size| size.encoded()) {
            self.attributes.sizes[start * SIZE_COMPONENTS..end * SIZE_COMPONENTS].fill(size);
        }

        if let Some(pattern) = feature.pattern.as_deref().filter(|p| !p.is_empty()) {
            let pattern_pos = self.image_pos.get(pattern).copied().unwrap_or_else(|| {
                log::trace!("Pattern '{}' not in atlas, using origin", pattern);
                AtlasPosition::default()
            });
            for slot in self.attributes.patterns[start * PATTERN_COMPONENTS..end * PATTERN_COMPONENTS]
                .chunks_exact_mut(PATTERN_COMPONENTS)
            {
                slot[0] = pattern_pos.x;
                slot[1] = pattern_pos.y;
            }
        }
    }
}
