use glam::{vec2, IVec2, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{
    DenoiserParams, EdgeStopping, F32Ext, GBufferMap, RadianceSample,
    Vec3Ext, ATROUS_MIN_WEIGHT, GAUSSIAN_KERNEL,
};

/// Single iteration of the edge-aware à-trous wavelet filter.
///
/// Reads from one pair of radiance buffers and writes into another, so that
/// neighbouring taps never observe a partially-filtered image.
#[derive(Clone, Copy)]
pub struct AtrousPass<'a> {
    pub params: &'a DenoiserParams,
    pub gbuffer: GBufferMap<'a>,
    pub direct: &'a [Vec4],
    pub indirect: &'a [Vec4],
    pub step_size: u32,
}

impl<'a> AtrousPass<'a> {
    pub fn run(&self, screen_pos: UVec2) -> RadianceSample {
        let viewport = &self.params.viewport;
        let idx = viewport.index(screen_pos);
        let center = self.gbuffer.get(idx);

        let center_direct = self.direct[idx];
        let center_indirect = self.indirect[idx];

        if center.is_sky() {
            return RadianceSample {
                direct: center_direct,
                indirect: center_indirect,
            };
        }

        let variance = self.blurred_variance(screen_pos);
        let sigma_l_sqr = self.params.sigma_l.sqr();

        let edge_stopping = EdgeStopping::new(
            self.params,
            center,
            vec2(center_direct.xyz().luma(), center_indirect.xyz().luma()),
            vec2(
                (sigma_l_sqr * variance.x).inverse_sqrt(),
                (sigma_l_sqr * variance.y).inverse_sqrt(),
            ),
        );

        let mut sum_weight = Vec2::ONE;
        let mut sum_direct = center_direct.xyz();
        let mut sum_indirect = center_indirect.xyz();
        let mut sum_variance = vec2(center_direct.w, center_indirect.w);

        let step_size = self.step_size as i32;
        let mut offset = IVec2::splat(-1);

        loop {
            let tap_offset = offset * step_size;
            let tap_pos = screen_pos.as_ivec2() + tap_offset;

            if offset != IVec2::ZERO && viewport.contains(tap_pos) {
                let tap_idx = viewport.index(tap_pos.as_uvec2());
                let tap = self.gbuffer.get(tap_idx);

                if !tap.is_sky() {
                    let tap_direct = self.direct[tap_idx];
                    let tap_indirect = self.indirect[tap_idx];

                    let weight = edge_stopping.eval(
                        tap_offset,
                        tap.depth,
                        tap.normal,
                        vec2(
                            tap_direct.xyz().luma(),
                            tap_indirect.xyz().luma(),
                        ),
                    );

                    sum_weight += weight;
                    sum_direct += tap_direct.xyz() * weight.x;
                    sum_indirect += tap_indirect.xyz() * weight.y;

                    // Variance of a weighted sum scales with squared weights
                    sum_variance +=
                        vec2(tap_direct.w, tap_indirect.w) * weight * weight;
                }
            }

            offset.x += 1;

            if offset.x > 1 {
                offset.x = -1;
                offset.y += 1;

                if offset.y > 1 {
                    break;
                }
            }
        }

        assert!(sum_weight.x > ATROUS_MIN_WEIGHT);
        assert!(sum_weight.y > ATROUS_MIN_WEIGHT);

        let variance = sum_variance / (sum_weight * sum_weight);

        RadianceSample {
            direct: finish(sum_direct, sum_weight.x, variance.x),
            indirect: finish(sum_indirect, sum_weight.y, variance.y),
        }
    }

    /// Returns variance of (direct, indirect) smoothed with a 3x3 Gaussian;
    /// taps past the edge of the screen get clamped.
    fn blurred_variance(&self, screen_pos: UVec2) -> Vec2 {
        let viewport = &self.params.viewport;
        let mut variance = Vec2::ZERO;
        let mut offset = IVec2::splat(-1);

        loop {
            let tap_pos = viewport.clamp(screen_pos.as_ivec2() + offset);
            let tap_idx = viewport.index(tap_pos);

            let weight = GAUSSIAN_KERNEL[offset.x.abs() as usize]
                [offset.y.abs() as usize];

            variance +=
                vec2(self.direct[tap_idx].w, self.indirect[tap_idx].w) * weight;

            offset.x += 1;

            if offset.x > 1 {
                offset.x = -1;
                offset.y += 1;

                if offset.y > 1 {
                    break;
                }
            }
        }

        variance
    }
}

fn finish(sum: Vec3, sum_weight: f32, variance: f32) -> Vec4 {
    (sum / sum_weight).extend(variance)
}
