use approx::assert_abs_diff_eq;
use glam::{uvec2, vec2, vec3, vec4, Vec3, Vec4Swizzles};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::GBufferEntry;

struct Target {
    denoiser: CpuDenoiser,
    frame: FrameBuffers,
    gbuffer: GBuffer,
    history: History,
}

impl Target {
    fn new(width: u32, height: u32, settings: DenoiserSettings) -> Self {
        let viewport = Viewport::new(width, height);
        let mut gbuffer = GBuffer::new(viewport).unwrap();

        for y in 0..height {
            for x in 0..width {
                let pos = uvec2(x, y);

                gbuffer.set(
                    pos,
                    GBufferEntry {
                        normal: vec3(0.0, 0.0, 1.0),
                        depth: 5.0,
                        prev_depth: 5.0,
                        depth_gradient: vec2(0.0, 0.0),
                        prev_ndc: viewport.pixel_to_ndc(pos),
                    },
                );
            }
        }

        Self {
            denoiser: CpuDenoiser::new(viewport, settings).unwrap(),
            frame: FrameBuffers::new(viewport).unwrap(),
            gbuffer,
            history: History::new(viewport).unwrap(),
        }
    }

    fn viewport(&self) -> Viewport {
        self.denoiser.viewport()
    }

    fn positions(&self) -> impl Iterator<Item = UVec2> {
        let viewport = self.viewport();

        (0..viewport.height)
            .flat_map(move |y| (0..viewport.width).map(move |x| uvec2(x, y)))
    }

    fn update_gbuffer(&mut self, mut f: impl FnMut(&mut GBufferEntry)) {
        for pos in self.positions().collect::<Vec<_>>() {
            let mut entry = self.gbuffer.get(pos);

            f(&mut entry);
            self.gbuffer.set(pos, entry);
        }
    }

    fn denoise(&mut self) -> DenoisedFrame {
        self.denoiser
            .denoise(&mut self.frame, &self.gbuffer, &mut self.history)
            .unwrap()
    }

    fn history_lengths(&self) -> Vec<u32> {
        self.positions()
            .map(|pos| *self.history.length.get(pos))
            .collect()
    }
}

fn settings() -> DenoiserSettings {
    DenoiserSettings {
        demodulate_albedo: false,
        ..Default::default()
    }
}

#[test]
fn converges_on_static_scene() {
    let mut target = Target::new(2, 2, settings());

    for frame in 0..10u32 {
        target.frame.direct.fill(vec4(1.0, 1.0, 1.0, 0.0));

        let actual = target.denoise();

        assert_eq!(vec![frame; 4], target.history_lengths());

        for pos in target.positions() {
            let colour = *actual.accumulator.get(pos);

            assert_abs_diff_eq!(colour.x, 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(colour.y, 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(colour.z, 1.0, epsilon = 1e-5);
            assert_eq!(1.0, colour.w);
        }
    }

    // Past the fourth frame, blending is driven by `alpha_colour` alone
    assert!(target.history_lengths().iter().all(|&len| len >= 5));

    for pos in target.positions() {
        let direct = *target.history.direct.get(pos);
        let moment = gpu::Moment::deserialize(*target.history.moment.get(pos));

        assert_abs_diff_eq!(direct.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(direct.w, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(moment.variance().x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(moment.variance().y, 0.0, epsilon = 1e-5);
    }
}

#[test]
fn inconsistent_history_is_never_reused() {
    let mut target = Target::new(1, 1, settings());

    target.update_gbuffer(|entry| {
        entry.prev_ndc = vec2(5.0, 5.0);
    });

    for _ in 0..10 {
        target.frame.direct.fill(vec4(0.5, 0.5, 0.5, 0.0));
        target.denoise();

        assert_eq!(vec![0u32], target.history_lengths());
        assert_eq!(1.0, target.denoiser.scratch.temporal_direct[0].w);
        assert_eq!(1.0, target.denoiser.scratch.temporal_indirect[0].w);
    }
}

#[test]
fn sky_passes_through() {
    let mut target = Target::new(3, 3, DenoiserSettings::default());
    let center = uvec2(1, 1);

    target.gbuffer.set(center, GBufferEntry::default());

    for _ in 0..3 {
        target.frame.albedo.fill(vec4(0.5, 0.5, 0.5, 1.0));
        target.frame.direct.fill(vec4(0.1, 0.1, 0.1, 0.0));
        target.frame.indirect.fill(vec4(0.2, 0.2, 0.2, 0.0));
        target.frame.direct.set(center, vec4(2.0, 3.0, 4.0, 0.5));
        target.frame.indirect.set(center, vec4(1.0, 1.0, 1.0, 0.0));

        let actual = target.denoise();

        assert_eq!(vec4(3.0, 4.0, 5.0, 1.0), *actual.accumulator.get(center));
        assert_eq!(0, *target.history.length.get(center));

        assert_eq!(
            vec4(2.0, 3.0, 4.0, 0.5),
            *target.history.direct.get(center)
        );
    }
}

#[test]
fn albedo_is_demodulated_and_remodulated() {
    let mut target = Target::new(3, 2, DenoiserSettings::default());

    for _ in 0..5 {
        target.frame.albedo.fill(vec4(0.5, 0.25, 1.0, 1.0));
        target.frame.direct.fill(vec4(0.25, 0.125, 0.5, 0.0));

        let actual = target.denoise();

        for pos in target.positions() {
            let colour = *actual.accumulator.get(pos);

            assert_abs_diff_eq!(colour.x, 0.25, epsilon = 1e-5);
            assert_abs_diff_eq!(colour.y, 0.125, epsilon = 1e-5);
            assert_abs_diff_eq!(colour.z, 0.5, epsilon = 1e-5);

            // History keeps the untextured signal
            let direct = target.history.direct.get(pos).xyz();

            assert_abs_diff_eq!(direct.x, 0.5, epsilon = 1e-5);
            assert_abs_diff_eq!(direct.y, 0.5, epsilon = 1e-5);
            assert_abs_diff_eq!(direct.z, 0.5, epsilon = 1e-5);
        }
    }
}

#[test]
fn variance_is_never_negative() {
    let mut rng = StdRng::seed_from_u64(4321);
    let mut target = Target::new(8, 8, settings());

    for _ in 0..20 {
        let positions: Vec<_> = target.positions().collect();

        for &pos in &positions {
            let direct = Vec3::splat(rng.gen_range(0.0..10.0));
            let indirect = Vec3::splat(rng.gen_range(0.0..10.0));

            target.frame.direct.set(pos, direct.extend(0.0));
            target.frame.indirect.set(pos, indirect.extend(0.0));

            let mut entry = target.gbuffer.get(pos);

            entry.depth = rng.gen_range(1.0..3.0);
            entry.prev_depth = entry.depth;
            entry.depth_gradient = vec2(0.5, 0.5);
            target.gbuffer.set(pos, entry);
        }

        target.denoise();

        let scratch = &target.denoiser.scratch;

        for &pos in &positions {
            let idx = target.viewport().index(pos);
            let moment = target.history.moment.get(pos);
            let variance = gpu::Moment::deserialize(*moment).variance();

            assert!(scratch.temporal_direct[idx].w >= 0.0);
            assert!(scratch.temporal_indirect[idx].w >= 0.0);
            assert!(scratch.front_direct[idx].w >= 0.0);
            assert!(scratch.front_indirect[idx].w >= 0.0);
            assert!(target.history.direct.get(pos).w >= 0.0);
            assert!(target.history.indirect.get(pos).w >= 0.0);
            assert!(variance.x >= 0.0);
            assert!(variance.y >= 0.0);
        }
    }
}

/// History length is never capped, so thousands of frames must not make the
/// accumulated moments drift.
#[test]
fn long_run_stability() {
    let mut target = Target::new(4, 4, settings());
    let frames = 5000u32;

    for frame in 0..frames {
        let radiance = if frame % 2 == 0 { 0.25 } else { 0.75 };

        target.frame.direct.fill(Vec3::splat(radiance).extend(0.0));
        target.frame.indirect.fill(Vec3::splat(radiance).extend(0.0));

        let actual = target.denoise();

        for pos in target.positions() {
            let colour = *actual.accumulator.get(pos);

            assert!(colour.is_finite());
            assert!(colour.x > 0.4 && colour.x < 1.6, "{colour}");
        }
    }

    assert_eq!(vec![frames - 1; 16], target.history_lengths());

    for pos in target.positions() {
        let direct = *target.history.direct.get(pos);
        let moment = gpu::Moment::deserialize(*target.history.moment.get(pos));
        let variance = moment.variance();

        assert!(direct.is_finite());
        assert!(direct.x > 0.4 && direct.x < 0.6, "{direct}");

        // Exponential moving average of a signal alternating between 0.25
        // and 0.75 has a variance of ~0.0625
        assert!(variance.x > 0.03 && variance.x < 0.07, "{variance}");
        assert!(variance.y > 0.03 && variance.y < 0.07, "{variance}");
    }
}

#[test]
fn history_length_resets_on_disocclusion() {
    let mut target = Target::new(2, 2, settings());

    for _ in 0..3 {
        target.denoise();
    }

    assert_eq!(vec![2u32; 4], target.history_lengths());

    // Camera cut: every surface is now much further away than before
    target.update_gbuffer(|entry| {
        entry.depth = 50.0;
        entry.prev_depth = 50.0;
    });

    target.denoise();

    assert_eq!(vec![0u32; 4], target.history_lengths());

    target.denoise();

    assert_eq!(vec![1u32; 4], target.history_lengths());

    target.history.reset();
    target.denoise();

    assert_eq!(vec![0u32; 4], target.history_lengths());
}

#[test]
fn finalize_commits_colors_without_feedback() {
    let mut target = Target::new(2, 2, DenoiserSettings {
        atrous_iterations: 0,
        ..settings()
    });

    target.frame.direct.fill(vec4(0.5, 0.5, 0.5, 0.0));
    target.frame.indirect.fill(vec4(0.25, 0.25, 0.25, 0.0));
    target.denoise();

    for pos in target.positions() {
        // Unfiltered output of the temporal pass, including its "no history"
        // variance
        assert_eq!(vec4(0.5, 0.5, 0.5, 1.0), *target.history.direct.get(pos));

        assert_eq!(
            vec4(0.25, 0.25, 0.25, 1.0),
            *target.history.indirect.get(pos)
        );
    }

    target
        .denoiser
        .set_settings(DenoiserSettings {
            atrous_iterations: 1,
            feedback_iteration: 1,
            ..settings()
        })
        .unwrap();

    target.frame.direct.fill(vec4(1.0, 1.0, 1.0, 0.0));
    target.denoise();

    let scratch = &target.denoiser.scratch;

    for pos in target.positions() {
        let idx = target.viewport().index(pos);

        assert_eq!(
            scratch.temporal_direct[idx],
            *target.history.direct.get(pos)
        );
    }
}

#[test]
fn taa() {
    let mut target = Target::new(2, 2, settings());

    assert!(target.denoise().taa.is_none());

    target
        .denoiser
        .set_settings(DenoiserSettings {
            enable_taa: true,
            ..settings()
        })
        .unwrap();

    target.frame.direct.fill(vec4(1.0, 1.0, 1.0, 0.0));

    let actual = target.denoise().taa.unwrap();

    for pos in target.positions() {
        let taa = *actual.get(pos);

        assert_abs_diff_eq!(taa.x, 0.5f32.sqrt(), epsilon = 1e-5);
        assert_eq!(1.0, taa.w);
    }
}

#[test]
fn frame_buffers_are_cleared() {
    let mut target = Target::new(2, 2, settings());

    target.frame.albedo.fill(Vec4::ONE);
    target.frame.direct.fill(Vec4::ONE);
    target.frame.indirect.fill(Vec4::ONE);
    target.denoise();

    for pos in target.positions() {
        assert_eq!(Vec4::ZERO, *target.frame.albedo.get(pos));
        assert_eq!(Vec4::ZERO, *target.frame.direct.get(pos));
        assert_eq!(Vec4::ZERO, *target.frame.indirect.get(pos));
    }
}

#[test]
fn viewport_mismatch() {
    let mut target = Target::new(2, 2, settings());
    let mut frame = FrameBuffers::new(Viewport::new(4, 4)).unwrap();

    assert_eq!(
        Some(Error::ViewportMismatch {
            buffer: "albedo",
            expected: Viewport::new(2, 2),
            actual: Viewport::new(4, 4),
        }),
        target
            .denoiser
            .denoise(&mut frame, &target.gbuffer, &mut target.history)
            .err()
    );

    target.denoiser.resize(Viewport::new(4, 4)).unwrap();

    assert_eq!(
        Some(Error::ViewportMismatch {
            buffer: "gbuffer_d0",
            expected: Viewport::new(4, 4),
            actual: Viewport::new(2, 2),
        }),
        target
            .denoiser
            .denoise(&mut frame, &target.gbuffer, &mut target.history)
            .err()
    );

    let gbuffer = GBuffer::new(Viewport::new(4, 4)).unwrap();
    let mut history = History::new(Viewport::new(4, 4)).unwrap();

    assert!(target
        .denoiser
        .denoise(&mut frame, &gbuffer, &mut history)
        .is_ok());
}

#[test]
fn invalid_settings() {
    let invalid = DenoiserSettings {
        sigma_z: 0.0,
        ..Default::default()
    };

    let expected = Error::InvalidSetting {
        name: "sigma_z",
        reason: "must be positive",
    };

    assert_eq!(
        Some(expected.clone()),
        CpuDenoiser::new(Viewport::new(1, 1), invalid.clone()).err()
    );

    let mut target = Target::new(1, 1, settings());

    assert_eq!(Err(expected), target.denoiser.set_settings(invalid));
    assert_eq!(&settings(), target.denoiser.settings());

    assert_eq!(
        Err(Error::EmptyViewport {
            width: 0,
            height: 0
        }),
        target.denoiser.resize(Viewport::new(0, 0))
    );
}
