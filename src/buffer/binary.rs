//! Binary bundle export
//!
//! Writes a finished buffer as one little-endian blob that a renderer can
//! slice straight into typed views.
//!
//! Format: [magic][vertex_count: u32][index_count: u32][flags: u8][pad: 3]
//!         [positions][colors][picking_ids][sizes][patterns][uv?][normals?][indices]
//! Flags: bit 0 = uv present, bit 1 = normals present.
//! Every section is 4-byte aligned.

use byteorder::{LittleEndian, WriteBytesExt};

use super::lifecycle::Buffer;

/// Magic header (8 bytes, already aligned)
pub const BUNDLE_MAGIC: &[u8; 8] = b"EXTRUDEB";

const FLAG_UV: u8 = 1;
const FLAG_NORMALS: u8 = 2;

fn write_f32s(out: &mut Vec<u8>, data: &[f32]) -> std::io::Result<()> {
    for &f in data {
        out.write_f32::<LittleEndian>(f)?;
    }
    Ok(())
}

impl Buffer {
    /// Serialize all attribute arrays and the index array into one blob
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let attributes = &self.attributes;
        let mut out = Vec::with_capacity(self.byte_len());

        out.extend_from_slice(BUNDLE_MAGIC);
        out.write_u32::<LittleEndian>(u32::try_from(self.vertices_count)?)?;
        out.write_u32::<LittleEndian>(u32::try_from(self.index_count)?)?;

        let mut flags = 0u8;
        if attributes.uv.is_some() {
            flags |= FLAG_UV;
        }
        if attributes.normals.is_some() {
            flags |= FLAG_NORMALS;
        }
        out.push(flags);
        // Padding to maintain 4-byte alignment
        out.extend_from_slice(&[0u8, 0u8, 0u8]);

        write_f32s(&mut out, &attributes.positions)?;
        write_f32s(&mut out, &attributes.colors)?;
        write_f32s(&mut out, &attributes.picking_ids)?;
        write_f32s(&mut out, &attributes.sizes)?;
        write_f32s(&mut out, &attributes.patterns)?;
        if let Some(uv) = &attributes.uv {
            write_f32s(&mut out, uv)?;
        }
        if let Some(normals) = &attributes.normals {
            write_f32s(&mut out, normals)?;
        }
        for &idx in &self.index_array {
            out.write_u32::<LittleEndian>(idx)?;
        }

        Ok(out)
    }

    fn byte_len(&self) -> usize {
        let attributes = &self.attributes;
        let floats = attributes.positions.len()
            + attributes.colors.len()
            + attributes.picking_ids.len()
            + attributes.sizes.len()
            + attributes.patterns.len()
            + attributes.uv.as_ref().map_or(0, Vec::len)
            + attributes.normals.as_ref().map_or(0, Vec::len);
        BUNDLE_MAGIC.len() + 12 + (floats + self.index_array.len()) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::types::ImageAtlas;
    use byteorder::ReadBytesExt;
    use std::io::Cursor;

    #[test]
    fn test_bundle_layout() {
        let mut buffer = Buffer::allocate(4, 6, ImageAtlas::new(), true);
        buffer.calculate_extrude_face(&[0.0, 0.0], &[1.0, 0.0], 0, 0, 5.0);

        let bytes = buffer.to_bytes().unwrap();
        // 4 vertices: 3+4+1+1+2+2 floats each, plus 6 indices
        assert_eq!(bytes.len(), 8 + 12 + (4 * 13 + 6) * 4);
        assert_eq!(&bytes[0..8], BUNDLE_MAGIC);

        let mut cursor = Cursor::new(&bytes[8..]);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 4);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 6);
        assert_eq!(cursor.read_u8().unwrap(), FLAG_UV);

        // first position after header + padding
        let mut cursor = Cursor::new(&bytes[20..]);
        assert_eq!(cursor.read_f32::<LittleEndian>().unwrap(), 0.0);
        assert_eq!(cursor.read_f32::<LittleEndian>().unwrap(), 0.0);
        assert_eq!(cursor.read_f32::<LittleEndian>().unwrap(), 5.0);

        // index array sits at the tail
        let tail = &bytes[bytes.len() - 24..];
        let mut cursor = Cursor::new(tail);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 1);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 2);
        assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 0);
    }
}
