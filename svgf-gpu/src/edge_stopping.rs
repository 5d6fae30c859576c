use glam::{IVec2, Vec2, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{DenoiserParams, GBufferEntry, SVGF_EPSILON};

/// Edge-stopping function shared by variance estimation and the à-trous
/// filter; evaluates how much a neighbouring tap is allowed to contribute to
/// the center pixel, separately for direct and indirect lighting.
///
/// See:
/// - https://research.nvidia.com/publication/2017-07_spatiotemporal-variance-guided-filtering-real-time-reconstruction-path-traced
#[derive(Clone, Copy)]
pub struct EdgeStopping {
    pub center: GBufferEntry,

    /// Luminance of (direct, indirect) at the center pixel.
    pub center_luma: Vec2,

    /// Scale applied to luminance differences of (direct, indirect).
    pub luma_denom: Vec2,

    pub sigma_z: f32,
    pub sigma_n: f32,
}

impl EdgeStopping {
    pub fn new(
        params: &DenoiserParams,
        center: GBufferEntry,
        center_luma: Vec2,
        luma_denom: Vec2,
    ) -> Self {
        Self {
            center,
            center_luma,
            luma_denom,
            sigma_z: params.sigma_z,
            sigma_n: params.sigma_n,
        }
    }

    /// Returns weights for (direct, indirect) of a tap located at `offset`
    /// pixels away from the center.
    pub fn eval(
        &self,
        offset: IVec2,
        depth: f32,
        normal: Vec3,
        luma: Vec2,
    ) -> Vec2 {
        // |∇z(p) · (p - q)|
        let depth_change = self.center.depth_gradient.dot(offset.as_vec2());

        let ln_w_z = (self.center.depth - depth).abs()
            / (self.sigma_z * depth_change.abs() + SVGF_EPSILON);

        let w_n = self.center.normal.dot(normal).max(0.0).powf(self.sigma_n);

        let w_l_direct = (-(self.center_luma.x - luma.x).abs()
            * self.luma_denom.x
            - ln_w_z)
            .exp();

        let w_l_indirect = (-(self.center_luma.y - luma.y).abs()
            * self.luma_denom.y
            - ln_w_z)
            .exp();

        Vec2::new(w_l_direct, w_l_indirect) * w_n
    }
}
