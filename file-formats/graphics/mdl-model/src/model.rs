//! The MDL model asset and its binary format.
//!
//! An MDL file is a morph-target model: one shared index buffer plus a list
//! of complete vertex-buffer snapshots ("frames"), each a pose sampled at
//! equal time spacing over one animation loop. The layout is little-endian
//! with no magic number and no version field:
//!
//! ```text
//! u16                 index count
//! index count × u16   indices
//! u32                 frame count
//! frame count × {
//!     u32                  vertex count
//!     vertex count × 32 B  vertices (x, y, z, nx, ny, nz, u, v as f32)
//! }
//! ```
//!
//! Parsing validates what the format itself cannot express: at least one
//! frame, a uniform vertex count across frames, and every index in range.
//! A [`MdlModel`] value therefore always satisfies those invariants.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::error::{MdlError, Result, truncated};
use crate::vertex::Vertex;

/// Upper bound on speculative pre-allocation while parsing. Declared counts
/// are not trusted until the data behind them has actually been read.
const MAX_PREALLOC: usize = 4096;

/// An immutable morph-target model: index buffer plus per-frame vertex
/// buffers.
///
/// Constructed once at startup via [`MdlModel::load`] (or [`MdlModel::new`]
/// for synthetic models) and read-only afterwards. The fields are private so
/// that no value violating the format invariants can exist.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MdlModel {
    indices: Vec<u16>,
    frames: Vec<Vec<Vertex>>,
}

impl MdlModel {
    /// Build a model from raw buffers, validating the asset invariants.
    ///
    /// # Errors
    ///
    /// - [`MdlError::EmptyModel`] if `frames` is empty
    /// - [`MdlError::FrameSizeMismatch`] if any frame's vertex count differs
    ///   from the first frame's
    /// - [`MdlError::IndexOutOfBounds`] if any index is not a valid vertex
    ///   position
    /// - [`MdlError::CountOverflow`] if a buffer is larger than its count
    ///   field in the file can encode (u16 for indices, u32 for frames and
    ///   vertices), which would make [`MdlModel::write`] lossy
    pub fn new(indices: Vec<u16>, frames: Vec<Vec<Vertex>>) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(MdlError::EmptyModel);
        };
        let vertex_count = first.len();

        for (what, count, limit) in [
            ("index", indices.len(), usize::from(u16::MAX)),
            ("frame", frames.len(), u32::MAX as usize),
            ("vertex", vertex_count, u32::MAX as usize),
        ] {
            if count > limit {
                return Err(MdlError::CountOverflow { what, count, limit });
            }
        }

        for (frame, vertices) in frames.iter().enumerate().skip(1) {
            if vertices.len() != vertex_count {
                return Err(MdlError::FrameSizeMismatch {
                    frame,
                    expected: vertex_count,
                    actual: vertices.len(),
                });
            }
        }

        // Frames all share one vertex count, so a single bound covers every
        // frame an index could be looked up in.
        for &index in &indices {
            if usize::from(index) >= vertex_count {
                return Err(MdlError::IndexOutOfBounds {
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self { indices, frames })
    }

    /// Parse a model from a reader.
    ///
    /// Reads the fields in file order. A stream that ends before the
    /// declared counts are satisfied yields [`MdlError::Truncated`]; other
    /// I/O failures yield [`MdlError::Io`]. The parsed buffers then go
    /// through the same validation as [`MdlModel::new`].
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let index_count = reader
            .read_u16::<LittleEndian>()
            .map_err(truncated("index count"))?;
        let mut indices = Vec::with_capacity(usize::from(index_count));
        for _ in 0..index_count {
            indices.push(
                reader
                    .read_u16::<LittleEndian>()
                    .map_err(truncated("index data"))?,
            );
        }

        let frame_count = reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("frame count"))?;
        let mut frames = Vec::with_capacity((frame_count as usize).min(MAX_PREALLOC));
        for _ in 0..frame_count {
            let vertex_count = reader
                .read_u32::<LittleEndian>()
                .map_err(truncated("vertex count"))?;
            let mut vertices = Vec::with_capacity((vertex_count as usize).min(MAX_PREALLOC));
            for _ in 0..vertex_count {
                vertices.push(Vertex::parse(reader)?);
            }
            frames.push(vertices);
        }

        let model = Self::new(indices, frames)?;
        debug!(
            "parsed MDL model: {} indices, {} frames, {} vertices per frame",
            model.index_count(),
            model.frame_count(),
            model.vertex_count()
        );
        Ok(model)
    }

    /// Load a model from a file.
    ///
    /// One-shot: either a fully validated model is returned or the load
    /// fails with a typed error; no partial asset is ever exposed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(&mut BufReader::new(file))
    }

    /// Write this model in the binary format.
    ///
    /// Exact inverse of [`MdlModel::parse`].
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<LittleEndian>(self.indices.len() as u16)?;
        for &index in &self.indices {
            writer.write_u16::<LittleEndian>(index)?;
        }

        writer.write_u32::<LittleEndian>(self.frames.len() as u32)?;
        for frame in &self.frames {
            writer.write_u32::<LittleEndian>(frame.len() as u32)?;
            for vertex in frame {
                vertex.write(writer)?;
            }
        }
        Ok(())
    }

    /// Save this model to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// The shared index buffer, in triangle-list order.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// All animation frames, in loop order.
    pub fn frames(&self) -> &[Vec<Vertex>] {
        &self.frames
    }

    /// The vertex buffer of frame `frame`, if it exists.
    pub fn frame(&self, frame: usize) -> Option<&[Vertex]> {
        self.frames.get(frame).map(Vec::as_slice)
    }

    /// Number of animation frames. Always at least 1.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of vertices in every frame.
    pub fn vertex_count(&self) -> usize {
        self.frames[0].len()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles described by the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl fmt::Display for MdlModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MDL model ({} triangles, {} frames, {} vertices per frame)",
            self.triangle_count(),
            self.frame_count(),
            self.vertex_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use test_case::test_case;

    fn vertex(x: f32) -> Vertex {
        Vertex::new(Vec3::new(x, 0.0, 0.0), Vec3::Y, Vec2::ZERO)
    }

    fn two_frame_model() -> MdlModel {
        MdlModel::new(
            vec![0, 1, 2],
            vec![
                vec![vertex(0.0), vertex(1.0), vertex(2.0)],
                vec![vertex(3.0), vertex(4.0), vertex(5.0)],
            ],
        )
        .unwrap()
    }

    /// Byte image of a minimal asset: 3 indices, 1 frame, 3 vertices.
    fn minimal_asset_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&3u16.to_le_bytes());
        for index in [0u16, 1, 2] {
            data.extend_from_slice(&index.to_le_bytes());
        }
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        for x in [0.0f32, 1.0, 2.0] {
            for value in [x, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0] {
                data.extend_from_slice(&value.to_le_bytes());
            }
        }
        data
    }

    #[test]
    fn parse_reproduces_hand_built_bytes_exactly() {
        let data = minimal_asset_bytes();
        let model = MdlModel::parse(&mut Cursor::new(&data)).unwrap();

        assert_eq!(model.indices(), &[0, 1, 2]);
        assert_eq!(model.frame_count(), 1);
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.frames()[0][1].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(model.frames()[0][1].normal, Vec3::Y);
        assert_eq!(model.frames()[0][1].tex_coords, Vec2::ZERO);
    }

    #[test]
    fn write_then_parse_round_trips() {
        let model = two_frame_model();
        let mut data = Vec::new();
        model.write(&mut data).unwrap();

        let parsed = MdlModel::parse(&mut Cursor::new(&data)).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn write_matches_hand_built_layout() {
        let expected = minimal_asset_bytes();
        let model = MdlModel::parse(&mut Cursor::new(&expected)).unwrap();

        let mut written = Vec::new();
        model.write(&mut written).unwrap();
        assert_eq!(written, expected);
    }

    // Byte lengths landing in the middle of each field of the minimal asset.
    #[test_case(1, "index count"; "inside the index count")]
    #[test_case(5, "index data"; "inside the index buffer")]
    #[test_case(9, "frame count"; "inside the frame count")]
    #[test_case(13, "vertex count"; "inside the vertex count")]
    #[test_case(20, "vertex data"; "inside the vertex buffer")]
    fn short_stream_names_the_missing_field(len: usize, what: &str) {
        let data = minimal_asset_bytes();
        let result = MdlModel::parse(&mut Cursor::new(&data[..len]));
        match result {
            Err(MdlError::Truncated { what: actual }) => assert_eq!(actual, what),
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn zero_frames_are_rejected() {
        assert!(matches!(
            MdlModel::new(vec![0], Vec::new()),
            Err(MdlError::EmptyModel)
        ));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let result = MdlModel::new(vec![0, 3], vec![vec![vertex(0.0); 3]]);
        assert!(matches!(
            result,
            Err(MdlError::IndexOutOfBounds {
                index: 3,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn mismatched_frame_sizes_are_rejected() {
        let result = MdlModel::new(
            vec![0],
            vec![vec![vertex(0.0); 3], vec![vertex(0.0); 2]],
        );
        assert!(matches!(
            result,
            Err(MdlError::FrameSizeMismatch {
                frame: 1,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn index_buffer_beyond_u16_count_is_rejected() {
        // 70,000 indices would wrap to 4,464 in the file's u16 count field,
        // so the model must never reach `write` in the first place.
        let result = MdlModel::new(vec![0u16; 70_000], vec![vec![vertex(0.0)]]);
        assert!(matches!(
            result,
            Err(MdlError::CountOverflow {
                what: "index",
                count: 70_000,
                limit: 65_535
            })
        ));
    }

    #[test]
    fn largest_encodable_index_buffer_round_trips() {
        let model = MdlModel::new(vec![0u16; usize::from(u16::MAX)], vec![vec![vertex(0.0)]])
            .unwrap();
        let mut data = Vec::new();
        model.write(&mut data).unwrap();
        assert_eq!(
            u16::from_le_bytes([data[0], data[1]]),
            u16::MAX,
            "declared index count"
        );

        let parsed = MdlModel::parse(&mut Cursor::new(&data)).unwrap();
        assert_eq!(parsed.index_count(), usize::from(u16::MAX));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = MdlModel::load("does/not/exist.mdl");
        assert!(matches!(result, Err(MdlError::Io(_))));
    }

    #[test]
    fn display_summarizes_counts() {
        let display = two_frame_model().to_string();
        assert!(display.contains("1 triangles"));
        assert!(display.contains("2 frames"));
        assert!(display.contains("3 vertices"));
    }
}
