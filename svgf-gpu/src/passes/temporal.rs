use glam::{IVec2, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{
    bilinear_weights, lerp, DenoiserParams, GBufferEntry, GBufferMap,
    HistoryMap, Moment, Vec3Ext, BILINEAR_OFFSETS, MIN_HISTORY_LENGTH,
};

/// Temporal reprojection: finds this pixel's surface in the previous frame
/// and accumulates current radiance & moments on top of it.
#[derive(Clone, Copy)]
pub struct TemporalPass<'a> {
    pub params: &'a DenoiserParams,
    pub gbuffer: GBufferMap<'a>,
    pub albedo: &'a [Vec4],
    pub direct: &'a [Vec4],
    pub indirect: &'a [Vec4],
    pub history: HistoryMap<'a>,
}

#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct TemporalSample {
    /// Accumulated direct radiance, with its variance in `.w`.
    pub direct: Vec4,

    /// Accumulated indirect radiance, with its variance in `.w`.
    pub indirect: Vec4,

    /// Accumulated moments, see [`Moment::serialize()`].
    pub moment: Vec4,

    pub history_length: u32,
}

impl<'a> TemporalPass<'a> {
    pub fn run(&self, screen_pos: UVec2) -> TemporalSample {
        let idx = self.params.viewport.index(screen_pos);
        let surface = self.gbuffer.get(idx);

        if surface.is_sky() {
            let direct = self.direct[idx];
            let indirect = self.indirect[idx];

            return TemporalSample {
                direct,
                indirect,
                moment: Moment::from_luma(
                    direct.xyz().luma(),
                    indirect.xyz().luma(),
                )
                .serialize(),
                history_length: 0,
            };
        }

        let mut direct = self.direct[idx].xyz();
        let mut indirect = self.indirect[idx].xyz();

        if self.params.demodulates_albedo() {
            let albedo = self.albedo[idx].xyz();

            direct = direct.demodulate(albedo);
            indirect = indirect.demodulate(albedo);
        }

        let moment = Moment::from_luma(direct.luma(), indirect.luma());
        let prev = self.reproject(&surface);

        if prev.weight <= 0.0 {
            return TemporalSample {
                direct: direct.extend(1.0),
                indirect: indirect.extend(1.0),
                moment: moment.serialize(),
                history_length: 0,
            };
        }

        let prev = prev.normalize();

        let history_length =
            self.history.length[idx].min(u32::MAX - 1) + 1;

        let inv_history_length = 1.0 / (history_length as f32);
        let alpha_colour = self.params.alpha_colour.max(inv_history_length);
        let alpha_moment = self.params.alpha_moment.max(inv_history_length);

        let direct = lerp(prev.direct, direct, alpha_colour);
        let indirect = lerp(prev.indirect, indirect, alpha_colour);
        let moment =
            Moment::deserialize(prev.moment).blend(moment, alpha_moment);

        let variance = if history_length >= MIN_HISTORY_LENGTH {
            moment.variance()
        } else {
            Vec2::ZERO
        };

        TemporalSample {
            direct: direct.extend(variance.x),
            indirect: indirect.extend(variance.y),
            moment: moment.serialize(),
            history_length,
        }
    }

    /// Gathers history consistent with given surface; tries the bilinear
    /// footprint first and falls back to a plain 3x3 box if the footprint is
    /// empty.
    fn reproject(&self, surface: &GBufferEntry) -> HistorySample {
        let viewport = &self.params.viewport;

        // Positions further than a couple of pixels off-screen can't reach
        // any tap anyway, but left as-is they'd overflow the tap arithmetic
        let pos = viewport.ndc_to_pixel(surface.prev_ndc).clamp(
            Vec2::splat(-2.0),
            viewport.size().as_vec2() + 1.0,
        );

        let origin = pos.floor().as_ivec2();
        let weights = bilinear_weights(pos.fract());
        let weights = [weights.x, weights.y, weights.z, weights.w];

        let mut sample = HistorySample::default();
        let mut tap = 0;

        while tap < 4 {
            let tap_pos = origin + IVec2::from(BILINEAR_OFFSETS[tap]);

            if self.history.is_tap_consistent(viewport, tap_pos, surface) {
                sample.add(
                    &self.history,
                    viewport.index(tap_pos.as_uvec2()),
                    weights[tap],
                );
            }

            tap += 1;
        }

        if sample.weight > 0.0 {
            return sample;
        }

        let mut offset = IVec2::splat(-1);

        loop {
            let tap_pos = origin + offset;

            if self.history.is_tap_consistent(viewport, tap_pos, surface) {
                sample.add(
                    &self.history,
                    viewport.index(tap_pos.as_uvec2()),
                    1.0,
                );
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

        sample
    }
}

#[derive(Clone, Copy, Default)]
struct HistorySample {
    direct: Vec3,
    indirect: Vec3,
    moment: Vec4,
    weight: f32,
}

impl HistorySample {
    fn add(&mut self, history: &HistoryMap, idx: usize, weight: f32) {
        self.direct += history.direct[idx].xyz() * weight;
        self.indirect += history.indirect[idx].xyz() * weight;
        self.moment += history.moment[idx] * weight;
        self.weight += weight;
    }

    fn normalize(self) -> Self {
        Self {
            direct: self.direct / self.weight,
            indirect: self.indirect / self.weight,
            moment: self.moment / self.weight,
            weight: 1.0,
        }
    }
}
