use glam::{UVec2, Vec4, Vec4Swizzles};

use crate::{DenoiserParams, Vec3Ext};

/// Composites the filtered signal and prepares the next frame's history.
///
/// Clearing of the per-frame input buffers is left to the caller, since it
/// doesn't depend on anything the kernel computes.
#[derive(Clone, Copy)]
pub struct FinalizePass<'a> {
    pub params: &'a DenoiserParams,

    /// See: [`crate::GBufferMap::normal_and_depth()`].
    pub normal_and_depth: &'a [Vec4],

    pub albedo: &'a [Vec4],

    /// Output of the last à-trous iteration.
    pub direct: &'a [Vec4],

    /// See: [`Self::direct`].
    pub indirect: &'a [Vec4],

    /// Output of the temporal pass.
    pub temporal_direct: &'a [Vec4],

    /// See: [`Self::temporal_direct`].
    pub temporal_indirect: &'a [Vec4],

    pub moment: &'a [Vec4],
    pub history_length: &'a [u32],
}

#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct FinalSample {
    /// Color for the accumulator.
    pub colour: Vec4,

    /// Tone-mapped color for the anti-aliasing stage; zero when it's
    /// disabled.
    pub taa: Vec4,

    pub history_normal_and_depth: Vec4,

    /// Direct radiance to be remembered, in case the à-trous filter doesn't
    /// reach the feedback iteration; see
    /// [`DenoiserParams::finalize_commits_colors()`].
    pub history_direct: Vec4,

    /// See: [`Self::history_direct`].
    pub history_indirect: Vec4,

    pub history_moment: Vec4,
    pub history_length: u32,
}

impl<'a> FinalizePass<'a> {
    pub fn run(&self, screen_pos: UVec2) -> FinalSample {
        let idx = self.params.viewport.index(screen_pos);
        let normal_and_depth = self.normal_and_depth[idx];

        // Same as `GBufferEntry::is_sky()`, without having to read the rest
        // of the G-buffer
        let is_sky = normal_and_depth.z == 0.0;

        let mut colour = self.direct[idx].xyz() + self.indirect[idx].xyz();

        if self.params.demodulates_albedo() && !is_sky {
            colour *= self.albedo[idx].xyz();
        }

        let taa = if self.params.is_taa_enabled() {
            colour.tonemap_sqrt().extend(1.0)
        } else {
            Vec4::ZERO
        };

        FinalSample {
            colour: colour.extend(1.0),
            taa,
            history_normal_and_depth: normal_and_depth,
            history_direct: self.temporal_direct[idx],
            history_indirect: self.temporal_indirect[idx],
            history_moment: self.moment[idx],
            history_length: self.history_length[idx],
        }
    }
}
