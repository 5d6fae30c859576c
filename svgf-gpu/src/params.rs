use bytemuck::{Pod, Zeroable};

use crate::Viewport;

/// Tuning knobs of the denoiser, as seen by the kernels.
///
/// Uploaded as a uniform buffer, so that all of the values can be changed at
/// runtime without recompiling the shaders.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct DenoiserParams {
    pub viewport: Viewport,

    /// Lower bound for the temporal blending rate of color.
    pub alpha_colour: f32,

    /// Lower bound for the temporal blending rate of moments.
    pub alpha_moment: f32,

    /// Depth sensitivity of the edge-stopping function.
    pub sigma_z: f32,

    /// Normal sensitivity (exponent) of the edge-stopping function.
    pub sigma_n: f32,

    /// Luminance sensitivity of the edge-stopping function.
    pub sigma_l: f32,

    pub atrous_iterations: u32,

    /// Index of the à-trous iteration whose output becomes next frame's color
    /// history.
    pub feedback_iteration: u32,

    /// See: [`Self::FLAG_DEMODULATE_ALBEDO`], [`Self::FLAG_ENABLE_TAA`].
    pub flags: u32,
}

impl DenoiserParams {
    pub const FLAG_DEMODULATE_ALBEDO: u32 = 1;
    pub const FLAG_ENABLE_TAA: u32 = 2;

    pub fn demodulates_albedo(&self) -> bool {
        self.flags & Self::FLAG_DEMODULATE_ALBEDO > 0
    }

    pub fn is_taa_enabled(&self) -> bool {
        self.flags & Self::FLAG_ENABLE_TAA > 0
    }

    pub fn is_feedback_iteration(&self, iteration: u32) -> bool {
        iteration == self.feedback_iteration
    }

    /// Returns whether color history has to be committed by the finalize
    /// pass, because the à-trous filter never reaches the feedback iteration.
    pub fn finalize_commits_colors(&self) -> bool {
        self.atrous_iterations <= self.feedback_iteration
    }
}

/// Push constants of a single à-trous iteration.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct AtrousPassParams {
    pub iteration: u32,
    pub step_size: u32,
}

impl AtrousPassParams {
    pub fn new(iteration: u32) -> Self {
        Self {
            iteration,
            step_size: 1 << iteration,
        }
    }
}
