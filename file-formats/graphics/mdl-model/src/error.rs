use std::io;
use thiserror::Error;

/// Error types for MDL model parsing and playback
#[derive(Error, Debug)]
pub enum MdlError {
    /// I/O error during reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended before a declared field could be read
    #[error("truncated file: unexpected end of data while reading {what}")]
    Truncated {
        /// Which field was being read when the stream ran out
        what: &'static str,
    },

    /// An index references a vertex that no frame contains
    #[error("index value {index} is out of bounds for frames with {vertex_count} vertices")]
    IndexOutOfBounds { index: u16, vertex_count: usize },

    /// The model declares zero animation frames
    #[error("model contains no animation frames")]
    EmptyModel,

    /// A frame's vertex count differs from the first frame's
    #[error("frame {frame} has {actual} vertices, expected {expected}")]
    FrameSizeMismatch {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    /// A buffer holds more elements than its count field can encode
    #[error("{what} count {count} exceeds the format limit of {limit}")]
    CountOverflow {
        what: &'static str,
        count: usize,
        limit: usize,
    },
}

/// Result type using MdlError
pub type Result<T> = std::result::Result<T, MdlError>;

/// Maps a short read to [`MdlError::Truncated`], leaving other I/O failures
/// as [`MdlError::Io`].
pub(crate) fn truncated(what: &'static str) -> impl FnOnce(io::Error) -> MdlError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            MdlError::Truncated { what }
        } else {
            MdlError::Io(e)
        }
    }
}
