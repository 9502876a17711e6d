//! Parser, validator, and playback support for MDL morph-target keyframe
//! models.
//!
//! An MDL asset stores one index buffer and a sequence of complete vertex
//! snapshots ("frames"); playback linearly blends the two frames adjacent
//! to a looping clock phase, producing smooth motion without a skeleton.
//!
//! ```no_run
//! use mdl_model::{MdlModel, MdlPlayer};
//!
//! let model = MdlModel::load("character.mdl")?;
//! let mut player = MdlPlayer::new(model);
//!
//! // Each frame-loop iteration: feed elapsed time, read vertices back.
//! player.advance(1.0 / 60.0);
//! let vertices = player.render();
//! # Ok::<(), mdl_model::MdlError>(())
//! ```

pub mod blend;
pub mod clock;
pub mod error;
pub mod model;
pub mod player;
pub mod vertex;

// Re-export common types
pub use blend::{BlendOptions, BlendedVertex, FramePair, blend, blend_into};
pub use clock::{AnimationClock, DEFAULT_LOOP_RATE};
pub use error::{MdlError, Result};
pub use model::MdlModel;
pub use player::{FIXED_TIMESTEP, MdlPlayer, PlayerOptions};
pub use vertex::{VERTEX_SIZE, Vertex};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
