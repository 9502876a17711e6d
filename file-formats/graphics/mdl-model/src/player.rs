//! The playback session: model + clock + fixed-timestep driver.
//!
//! [`MdlPlayer`] is the explicit session value an outer frame loop owns and
//! drives. Each loop iteration feeds the elapsed wall-clock time to
//! [`MdlPlayer::advance`], which converts it into zero or more fixed clock
//! steps, then reads the blended vertex stream back with
//! [`MdlPlayer::render_into`]. Everything is single-threaded and
//! synchronous; the model is read-only after construction.

use log::warn;

use crate::blend::{BlendOptions, BlendedVertex, blend_into};
use crate::clock::AnimationClock;
use crate::model::MdlModel;

/// Simulation step size of the fixed-timestep driver, in seconds.
pub const FIXED_TIMESTEP: f64 = 1.0 / 60.0;

/// Driver tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerOptions {
    /// Seconds of simulation per clock step
    pub fixed_timestep: f64,
    /// Most clock steps one [`MdlPlayer::advance`] call may run before the
    /// remaining backlog is dropped
    pub max_steps_per_update: u32,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            fixed_timestep: FIXED_TIMESTEP,
            // One second of simulation; far above any ordinary stall.
            max_steps_per_update: 60,
        }
    }
}

/// A playback session over one model.
#[derive(Debug, Clone)]
pub struct MdlPlayer {
    model: MdlModel,
    clock: AnimationClock,
    blend_options: BlendOptions,
    options: PlayerOptions,
    accumulator: f64,
}

impl MdlPlayer {
    /// Create a player with the default clock rate, blend options, and
    /// driver settings.
    pub fn new(model: MdlModel) -> Self {
        Self::with_options(
            model,
            AnimationClock::default(),
            BlendOptions::default(),
            PlayerOptions::default(),
        )
    }

    /// Create a fully configured player.
    pub fn with_options(
        model: MdlModel,
        clock: AnimationClock,
        blend_options: BlendOptions,
        options: PlayerOptions,
    ) -> Self {
        Self {
            model,
            clock,
            blend_options,
            options,
            accumulator: 0.0,
        }
    }

    /// Feed `elapsed` wall-clock seconds into the accumulator and run the
    /// clock forward in fixed steps. Returns the number of steps run.
    ///
    /// Runs zero steps when less than one timestep has accumulated (the
    /// caller is rendering faster than the simulation rate) and several
    /// when rendering fell behind. Catch-up is capped at
    /// [`PlayerOptions::max_steps_per_update`]; past the cap the remaining
    /// whole-step backlog is dropped and the animation jumps forward by at
    /// most that amount, keeping the sub-step remainder so the step cadence
    /// stays aligned.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        self.accumulator += elapsed.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.options.fixed_timestep {
            if steps == self.options.max_steps_per_update {
                let dropped = self.accumulator - self.accumulator % self.options.fixed_timestep;
                warn!("animation fell behind; dropping {dropped:.3}s of accumulated time");
                self.accumulator %= self.options.fixed_timestep;
                break;
            }
            self.clock.advance(self.options.fixed_timestep as f32);
            self.accumulator -= self.options.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// Blend the model at the clock's current phase into `out`, one vertex
    /// per index in triangle-list order.
    pub fn render_into(&self, out: &mut Vec<BlendedVertex>) {
        blend_into(&self.model, self.clock.phase(), self.blend_options, out);
    }

    /// Allocating convenience wrapper around [`MdlPlayer::render_into`].
    pub fn render(&self) -> Vec<BlendedVertex> {
        let mut out = Vec::new();
        self.render_into(&mut out);
        out
    }

    /// Current blend phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.clock.phase()
    }

    /// Wall-clock time collected but not yet simulated, in seconds.
    /// Always less than the fixed timestep between calls.
    pub fn backlog(&self) -> f64 {
        self.accumulator
    }

    /// The animation clock.
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// The model being played.
    pub fn model(&self) -> &MdlModel {
        &self.model
    }

    /// Consume the player and recover the model.
    pub fn into_model(self) -> MdlModel {
        self.model
    }
}
