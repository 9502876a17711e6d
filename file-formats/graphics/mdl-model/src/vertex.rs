use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Vec2, Vec3};
use std::io::{Read, Write};

use crate::error::{Result, truncated};

/// Size of one vertex in the binary format (8 × f32)
pub const VERTEX_SIZE: usize = 32;

/// A single model vertex.
///
/// Stored in the file as 8 consecutive little-endian f32 values:
/// `x, y, z, nx, ny, nz, u, v`. Vertices are immutable once loaded; one
/// complete buffer of them forms an animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// Object-space position
    pub position: Vec3,
    /// Surface normal
    pub normal: Vec3,
    /// Texture coordinate
    pub tex_coords: Vec2,
}

impl Vertex {
    /// Create a vertex from its attribute vectors.
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    /// Parse a vertex from a reader.
    pub(crate) fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut floats = [0.0f32; 8];
        for value in &mut floats {
            *value = reader
                .read_f32::<LittleEndian>()
                .map_err(truncated("vertex data"))?;
        }

        Ok(Self {
            position: Vec3::new(floats[0], floats[1], floats[2]),
            normal: Vec3::new(floats[3], floats[4], floats[5]),
            tex_coords: Vec2::new(floats[6], floats[7]),
        })
    }

    /// Write this vertex to a writer.
    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for value in [
            self.position.x,
            self.position.y,
            self.position.z,
            self.normal.x,
            self.normal.y,
            self.normal.z,
            self.tex_coords.x,
            self.tex_coords.y,
        ] {
            writer.write_f32::<LittleEndian>(value)?;
        }
        Ok(())
    }
}
