//! Per-vertex frame blending.
//!
//! Given a model and a blend phase, the blender picks the two frames the
//! phase falls between and emits one interpolated vertex per index, in index
//! order. The output is a plain attribute stream in triangle-list order;
//! how it reaches the screen (immediate mode, a vertex buffer upload, ...)
//! is the downstream renderer's business.

use glam::{Vec2, Vec3};

use crate::model::MdlModel;

/// The two source frames selected for a blend phase, plus the interpolation
/// fraction between them.
///
/// Recomputed for every rendered frame; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePair {
    /// Index of the earlier frame
    pub first: usize,
    /// Index of the later frame, wrapping to 0 past the last frame
    pub second: usize,
    /// Interpolation fraction in `[0, 1)` between `first` and `second`
    pub fraction: f32,
}

impl FramePair {
    /// Select the frame pair for `phase` over `frame_count` frames.
    ///
    /// `phase` is expected in `[0, 1)`; `frame_count` must be non-zero,
    /// which every [`MdlModel`] guarantees. A single-frame model always
    /// selects frame 0 twice, so the fraction has no visible effect.
    pub fn select(phase: f32, frame_count: usize) -> Self {
        debug_assert!(frame_count > 0);
        let scaled = phase * frame_count as f32;
        let first = (scaled.floor() as usize) % frame_count;
        let second = (first + 1) % frame_count;
        Self {
            first,
            second,
            fraction: scaled - scaled.floor(),
        }
    }
}

/// Options controlling which vertex attributes are interpolated.
///
/// The reference player interpolated positions only, carrying the earlier
/// frame's normal and texture coordinate unchanged; with coarse frame
/// sampling that pops visibly. The default blends all three attributes;
/// [`BlendOptions::reference`] reproduces the original output exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendOptions {
    /// Interpolate normals between the two frames
    pub interpolate_normals: bool,
    /// Interpolate texture coordinates between the two frames
    pub interpolate_tex_coords: bool,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            interpolate_normals: true,
            interpolate_tex_coords: true,
        }
    }
}

impl BlendOptions {
    /// Bit-compatible with the reference player: positions are blended,
    /// normals and texture coordinates come from the earlier frame.
    pub fn reference() -> Self {
        Self {
            interpolate_normals: false,
            interpolate_tex_coords: false,
        }
    }
}

/// One interpolated vertex, ready for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlendedVertex {
    /// Blended object-space position
    pub position: Vec3,
    /// Surface normal (blended or carried, per [`BlendOptions`])
    pub normal: Vec3,
    /// Texture coordinate (blended or carried, per [`BlendOptions`])
    pub tex_coords: Vec2,
}

/// Blend `model` at `phase` into `out`, one vertex per index.
///
/// `out` is cleared first so a frame loop can reuse one allocation. Output
/// order is index order, which fixes the triangle winding for the renderer.
pub fn blend_into(
    model: &MdlModel,
    phase: f32,
    options: BlendOptions,
    out: &mut Vec<BlendedVertex>,
) {
    let pair = FramePair::select(phase, model.frame_count());
    let earlier = &model.frames()[pair.first];
    let later = &model.frames()[pair.second];
    let t = pair.fraction;

    out.clear();
    out.reserve(model.index_count());
    for &index in model.indices() {
        let v0 = &earlier[usize::from(index)];
        let v1 = &later[usize::from(index)];
        out.push(BlendedVertex {
            position: v0.position.lerp(v1.position, t),
            normal: if options.interpolate_normals {
                v0.normal.lerp(v1.normal, t)
            } else {
                v0.normal
            },
            tex_coords: if options.interpolate_tex_coords {
                v0.tex_coords.lerp(v1.tex_coords, t)
            } else {
                v0.tex_coords
            },
        });
    }
}

/// Allocating convenience wrapper around [`blend_into`].
pub fn blend(model: &MdlModel, phase: f32, options: BlendOptions) -> Vec<BlendedVertex> {
    let mut out = Vec::new();
    blend_into(model, phase, options, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;
    use test_case::test_case;

    #[test_case(0.0, 4, 0, 1, 0.0; "loop start")]
    #[test_case(0.125, 4, 0, 1, 0.5; "halfway into the first segment")]
    #[test_case(0.25, 4, 1, 2, 0.0; "second frame boundary")]
    #[test_case(0.875, 4, 3, 0, 0.5; "wrapping back to frame zero")]
    #[test_case(0.5, 1, 0, 0, 0.5; "single frame selects itself")]
    fn frame_pair_selection(phase: f32, count: usize, first: usize, second: usize, fraction: f32) {
        let pair = FramePair::select(phase, count);
        assert_eq!(pair.first, first);
        assert_eq!(pair.second, second);
        assert_eq!(pair.fraction, fraction);
    }

    fn vertex(x: f32, nx: f32, u: f32) -> Vertex {
        Vertex::new(
            Vec3::new(x, 0.0, 0.0),
            Vec3::new(nx, 0.0, 0.0),
            Vec2::new(u, 0.0),
        )
    }

    /// Four-frame model over one vertex; frame 0 at x=0, frame 1 at x=4.
    fn scenario_model() -> MdlModel {
        MdlModel::new(
            vec![0],
            vec![
                vec![vertex(0.0, 1.0, 0.0)],
                vec![vertex(4.0, -1.0, 1.0)],
                vec![vertex(8.0, 1.0, 0.5)],
                vec![vertex(12.0, -1.0, 0.25)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn phase_zero_is_frame_zero_exactly() {
        let out = blend(&scenario_model(), 0.0, BlendOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(out[0].normal, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(out[0].tex_coords, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn midpoint_is_the_arithmetic_mean() {
        // phase 0.125 over 4 frames: frames 0 and 1 at fraction 0.5.
        let out = blend(&scenario_model(), 0.125, BlendOptions::default());
        assert_eq!(out[0].position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn fraction_approaching_one_approaches_the_next_frame() {
        let out = blend(&scenario_model(), 0.249, BlendOptions::default());
        assert!((out[0].position.x - 4.0).abs() < 0.02);
    }

    #[test]
    fn reference_options_carry_frame_zero_attributes() {
        let out = blend(&scenario_model(), 0.125, BlendOptions::reference());
        assert_eq!(out[0].position, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(out[0].normal, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(out[0].tex_coords, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn default_options_interpolate_every_attribute() {
        let out = blend(&scenario_model(), 0.125, BlendOptions::default());
        assert_eq!(out[0].normal, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(out[0].tex_coords, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn single_frame_model_is_returned_unchanged() {
        let model = MdlModel::new(vec![0, 0, 0], vec![vec![vertex(7.0, 1.0, 0.25)]]).unwrap();
        for phase in [0.0, 0.3, 0.999] {
            let out = blend(&model, phase, BlendOptions::default());
            assert_eq!(out.len(), 3);
            for blended in &out {
                assert_eq!(blended.position, Vec3::new(7.0, 0.0, 0.0));
                assert_eq!(blended.normal, Vec3::new(1.0, 0.0, 0.0));
                assert_eq!(blended.tex_coords, Vec2::new(0.25, 0.0));
            }
        }
    }

    #[test]
    fn output_follows_index_order() {
        let model = MdlModel::new(
            vec![2, 0, 1],
            vec![vec![
                vertex(0.0, 0.0, 0.0),
                vertex(1.0, 0.0, 0.0),
                vertex(2.0, 0.0, 0.0),
            ]],
        )
        .unwrap();
        let out = blend(&model, 0.0, BlendOptions::default());
        let xs: Vec<f32> = out.iter().map(|v| v.position.x).collect();
        assert_eq!(xs, vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn blend_into_reuses_the_output_buffer() {
        let model = scenario_model();
        let mut out = vec![BlendedVertex::default(); 16];
        blend_into(&model, 0.125, BlendOptions::default(), &mut out);
        assert_eq!(out.len(), model.index_count());
    }
}
