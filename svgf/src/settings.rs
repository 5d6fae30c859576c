use crate::{gpu, Error, Result, Viewport};

/// Tuning knobs of the denoiser.
///
/// All of them can be changed between frames, without having to rebuild
/// anything, see e.g. [`crate::CpuDenoiser::set_settings()`].
#[derive(Clone, Debug, PartialEq)]
pub struct DenoiserSettings {
    /// Number of à-trous iterations; each doubles the filter's footprint.
    pub atrous_iterations: u32,

    /// Index of the à-trous iteration whose output becomes next frame's color
    /// history.
    ///
    /// Lower values make the history noisier, higher values make it blurrier;
    /// if the filter never reaches this iteration, unfiltered (temporally
    /// accumulated) color is used instead.
    pub feedback_iteration: u32,

    /// Lower bound for the rate at which new color samples are blended into
    /// the history.
    pub alpha_colour: f32,

    /// Lower bound for the rate at which new moments are blended into the
    /// history.
    pub alpha_moment: f32,

    /// Depth sensitivity of the edge-stopping function.
    pub sigma_z: f32,

    /// Normal sensitivity of the edge-stopping function; used as an exponent,
    /// so higher values mean sharper edges.
    pub sigma_n: f32,

    /// Luminance sensitivity of the edge-stopping function.
    pub sigma_l: f32,

    /// Whether the incoming radiance is divided by albedo before filtering
    /// (and multiplied back afterwards), so that textures don't get blurred.
    pub demodulate_albedo: bool,

    /// Whether to produce a tone-mapped frame for temporal anti-aliasing.
    pub enable_taa: bool,
}

impl DenoiserSettings {
    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, reason: &'static str) -> Result<()> {
            Err(Error::InvalidSetting { name, reason })
        }

        for (name, value) in [
            ("alpha_colour", self.alpha_colour),
            ("alpha_moment", self.alpha_moment),
            ("sigma_z", self.sigma_z),
            ("sigma_n", self.sigma_n),
            ("sigma_l", self.sigma_l),
        ] {
            if !value.is_finite() {
                return invalid(name, "must be finite");
            }
        }

        for (name, value) in [
            ("alpha_colour", self.alpha_colour),
            ("alpha_moment", self.alpha_moment),
        ] {
            if value <= 0.0 || value > 1.0 {
                return invalid(name, "must be in range (0, 1]");
            }
        }

        if self.sigma_z <= 0.0 {
            return invalid("sigma_z", "must be positive");
        }

        if self.sigma_n < 0.0 {
            return invalid("sigma_n", "must not be negative");
        }

        if self.sigma_l <= 0.0 {
            return invalid("sigma_l", "must be positive");
        }

        if self.atrous_iterations > gpu::MAX_ATROUS_ITERATIONS {
            return invalid("atrous_iterations", "must be at most 10");
        }

        if self.feedback_iteration >= gpu::MAX_ATROUS_ITERATIONS {
            return invalid("feedback_iteration", "must be less than 10");
        }

        Ok(())
    }

    pub(crate) fn serialize(&self, viewport: Viewport) -> gpu::DenoiserParams {
        let mut flags = 0;

        if self.demodulate_albedo {
            flags |= gpu::DenoiserParams::FLAG_DEMODULATE_ALBEDO;
        }

        if self.enable_taa {
            flags |= gpu::DenoiserParams::FLAG_ENABLE_TAA;
        }

        gpu::DenoiserParams {
            viewport,
            alpha_colour: self.alpha_colour,
            alpha_moment: self.alpha_moment,
            sigma_z: self.sigma_z,
            sigma_n: self.sigma_n,
            sigma_l: self.sigma_l,
            atrous_iterations: self.atrous_iterations,
            feedback_iteration: self.feedback_iteration,
            flags,
        }
    }
}

impl Default for DenoiserSettings {
    fn default() -> Self {
        Self {
            atrous_iterations: 4,
            feedback_iteration: 1,
            alpha_colour: 0.2,
            alpha_moment: 0.2,
            sigma_z: 1.0,
            sigma_n: 128.0,
            sigma_l: 400.0,
            demodulate_albedo: true,
            enable_taa: false,
        }
    }
}
