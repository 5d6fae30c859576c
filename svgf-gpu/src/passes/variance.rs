use glam::{IVec2, UVec2, Vec2, Vec4, Vec4Swizzles};

use crate::{
    DenoiserParams, EdgeStopping, GBufferMap, Moment, RadianceSample,
    Vec3Ext, MIN_HISTORY_LENGTH, VARIANCE_MIN_WEIGHT, VARIANCE_RADIUS,
};

/// Spatial variance estimation for pixels whose history is too short for the
/// temporal estimate to be trusted.
#[derive(Clone, Copy)]
pub struct VariancePass<'a> {
    pub params: &'a DenoiserParams,
    pub gbuffer: GBufferMap<'a>,
    pub direct: &'a [Vec4],
    pub indirect: &'a [Vec4],
    pub moment: &'a [Vec4],
    pub history_length: &'a [u32],
}

impl<'a> VariancePass<'a> {
    pub fn run(&self, screen_pos: UVec2) -> RadianceSample {
        let viewport = &self.params.viewport;
        let idx = viewport.index(screen_pos);
        let center = self.gbuffer.get(idx);

        let center_direct = self.direct[idx];
        let center_indirect = self.indirect[idx];

        if self.history_length[idx] >= MIN_HISTORY_LENGTH || center.is_sky() {
            return RadianceSample {
                direct: center_direct,
                indirect: center_indirect,
            };
        }

        let edge_stopping = EdgeStopping::new(
            self.params,
            center,
            luma(center_direct, center_indirect),
            Vec2::splat(1.0 / self.params.sigma_l),
        );

        let center_moment = Moment::deserialize(self.moment[idx]);

        let mut sum_weight = Vec2::ONE;
        let mut sum_direct = center_direct.xyz();
        let mut sum_indirect = center_indirect.xyz();
        let mut sum_m1 = center_moment.m1;
        let mut sum_m2 = center_moment.m2;

        let mut offset = IVec2::splat(-VARIANCE_RADIUS);

        loop {
            let tap_pos = screen_pos.as_ivec2() + offset;

            if offset != IVec2::ZERO && viewport.contains(tap_pos) {
                let tap_idx = viewport.index(tap_pos.as_uvec2());
                let tap = self.gbuffer.get(tap_idx);

                if !tap.is_sky() {
                    let tap_direct = self.direct[tap_idx];
                    let tap_indirect = self.indirect[tap_idx];
                    let tap_moment = Moment::deserialize(self.moment[tap_idx]);

                    let weight = edge_stopping.eval(
                        offset,
                        tap.depth,
                        tap.normal,
                        luma(tap_direct, tap_indirect),
                    );

                    sum_weight += weight;
                    sum_direct += tap_direct.xyz() * weight.x;
                    sum_indirect += tap_indirect.xyz() * weight.y;
                    sum_m1 += tap_moment.m1 * weight;
                    sum_m2 += tap_moment.m2 * weight;
                }
            }

            offset.x += 1;

            if offset.x > VARIANCE_RADIUS {
                offset.x = -VARIANCE_RADIUS;
                offset.y += 1;

                if offset.y > VARIANCE_RADIUS {
                    break;
                }
            }
        }

        let sum_weight = sum_weight.max(Vec2::splat(VARIANCE_MIN_WEIGHT));

        let variance = Moment {
            m1: sum_m1 / sum_weight,
            m2: sum_m2 / sum_weight,
        }
        .variance();

        RadianceSample {
            direct: (sum_direct / sum_weight.x).extend(variance.x),
            indirect: (sum_indirect / sum_weight.y).extend(variance.y),
        }
    }
}

fn luma(direct: Vec4, indirect: Vec4) -> Vec2 {
    Vec2::new(direct.xyz().luma(), indirect.xyz().luma())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec4, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::passes::fixtures::Scene;

    struct Target {
        scene: Scene,
        moment: Vec<Vec4>,
        history_length: Vec<u32>,
    }

    impl Target {
        fn new(scene: Scene) -> Self {
            let len = scene.params.viewport.len();

            Self {
                scene,
                moment: vec![Vec4::ZERO; len],
                history_length: vec![0; len],
            }
        }

        fn run(&self, pos: UVec2) -> RadianceSample {
            VariancePass {
                params: &self.scene.params,
                gbuffer: self.scene.gbuffer(),
                direct: &self.scene.direct,
                indirect: &self.scene.indirect,
                moment: &self.moment,
                history_length: &self.history_length,
            }
            .run(pos)
        }
    }

    #[test]
    fn long_history_passes_through() {
        let mut target = Target::new(Scene::flat(3, 3));

        target.scene.direct.fill(vec4(0.0, 0.0, 0.0, 0.5));
        target.scene.direct[0] = vec4(10.0, 10.0, 10.0, 0.1);
        target.history_length.fill(MIN_HISTORY_LENGTH);

        let actual = target.run(uvec2(1, 1));

        assert_eq!(vec4(0.0, 0.0, 0.0, 0.5), actual.direct);
        assert_eq!(Vec4::ZERO, actual.indirect);
    }

    #[test]
    fn sky_passes_through() {
        let mut target = Target::new(Scene::flat(3, 3));

        target.scene.set_sky(uvec2(1, 1));
        target.scene.direct.fill(vec4(1.0, 2.0, 3.0, 0.0));
        target.scene.direct[0] = vec4(10.0, 10.0, 10.0, 0.1);
        target.scene.indirect.fill(vec4(0.5, 0.25, 0.125, 1.0));

        let actual = target.run(uvec2(1, 1));

        assert_eq!(vec4(1.0, 2.0, 3.0, 0.0), actual.direct);
        assert_eq!(vec4(0.5, 0.25, 0.125, 1.0), actual.indirect);
    }

    #[test]
    fn spatial_estimate() {
        let mut target = Target::new(Scene::flat(3, 1));

        target.scene.direct.fill(vec4(1.0, 1.0, 1.0, 0.0));
        target.scene.indirect.fill(vec4(0.5, 0.5, 0.5, 0.0));

        // Background is skipped, even though its moment would change the
        // result
        target.scene.set_sky(uvec2(2, 0));
        target.moment[0] = Moment::from_luma(0.0, 3.0).serialize();
        target.moment[1] = Moment::from_luma(2.0, 3.0).serialize();
        target.moment[2] = Moment::from_luma(100.0, 100.0).serialize();

        let actual = target.run(uvec2(1, 0));

        // E[L] = 1, E[L^2] = 2
        assert_relative_eq!(actual.direct.w, 1.0, epsilon = 1e-5);
        assert_relative_eq!(actual.indirect.w, 0.0, epsilon = 1e-5);

        assert_relative_eq!(actual.direct.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(actual.indirect.x, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn depth_discontinuity_is_not_crossed() {
        let mut target = Target::new(Scene::flat(2, 1));

        let mut surface = target.scene.surface(uvec2(1, 0));

        surface.depth = 50.0;
        target.scene.set_surface(uvec2(1, 0), surface);

        target.moment[1] = Moment::from_luma(2.0, 2.0).serialize();

        let actual = target.run(uvec2(0, 0));

        assert_eq!(0.0, actual.direct.w);
        assert_eq!(0.0, actual.indirect.w);
    }

    #[test]
    fn variance_is_never_negative() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut target = Target::new(Scene::flat(8, 8));

        for _ in 0..16 {
            for idx in 0..target.moment.len() {
                target.moment[idx] = vec4(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );

                target.scene.direct[idx] =
                    Vec3::splat(rng.gen_range(0.0..5.0)).extend(0.0);
            }

            for y in 0..8 {
                for x in 0..8 {
                    let actual = target.run(uvec2(x, y));

                    assert!(actual.direct.w >= 0.0);
                    assert!(actual.indirect.w >= 0.0);
                }
            }
        }
    }
}
