//! Command implementations for keyframe-rs

pub mod mdl;
