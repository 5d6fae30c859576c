use glam::{uvec2, vec2, vec3, UVec2, Vec4};

use crate::{
    DenoiserParams, GBufferEntry, GBufferMap, HistoryMap, Viewport,
};

/// Tiny in-memory frame used by the pass tests: a flat wall facing the
/// camera at depth 5, with no motion and no history.
pub struct Scene {
    pub params: DenoiserParams,
    pub d0: Vec<Vec4>,
    pub d1: Vec<Vec4>,
    pub albedo: Vec<Vec4>,
    pub direct: Vec<Vec4>,
    pub indirect: Vec<Vec4>,
    pub history_normal_and_depth: Vec<Vec4>,
    pub history_direct: Vec<Vec4>,
    pub history_indirect: Vec<Vec4>,
    pub history_moment: Vec<Vec4>,
    pub history_length: Vec<u32>,
}

impl Scene {
    pub fn flat(width: u32, height: u32) -> Self {
        let viewport = Viewport::new(width, height);

        let params = DenoiserParams {
            viewport,
            alpha_colour: 0.2,
            alpha_moment: 0.2,
            sigma_z: 1.0,
            sigma_n: 128.0,
            sigma_l: 400.0,
            atrous_iterations: 4,
            feedback_iteration: 1,
            flags: 0,
        };

        let buffer = || vec![Vec4::ZERO; viewport.len()];

        let mut this = Self {
            params,
            d0: buffer(),
            d1: buffer(),
            albedo: buffer(),
            direct: buffer(),
            indirect: buffer(),
            history_normal_and_depth: buffer(),
            history_direct: buffer(),
            history_indirect: buffer(),
            history_moment: buffer(),
            history_length: vec![0; viewport.len()],
        };

        for y in 0..height {
            for x in 0..width {
                let pos = uvec2(x, y);

                this.set_surface(
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

        this
    }

    pub fn idx(&self, pos: UVec2) -> usize {
        self.params.viewport.index(pos)
    }

    pub fn surface(&self, pos: UVec2) -> GBufferEntry {
        self.gbuffer().get(self.idx(pos))
    }

    pub fn set_surface(&mut self, pos: UVec2, surface: GBufferEntry) {
        let idx = self.idx(pos);
        let [d0, d1] = surface.pack();

        self.d0[idx] = d0;
        self.d1[idx] = d1;
    }

    pub fn set_sky(&mut self, pos: UVec2) {
        self.set_surface(pos, GBufferEntry::default());
    }

    /// Stores current geometry as history, as if this frame was seen before.
    pub fn commit_geometry(&mut self) {
        self.history_normal_and_depth = self.d0.clone();
    }

    pub fn gbuffer(&self) -> GBufferMap<'_> {
        GBufferMap::new(&self.d0, &self.d1)
    }

    pub fn history(&self) -> HistoryMap<'_> {
        HistoryMap {
            normal_and_depth: &self.history_normal_and_depth,
            direct: &self.history_direct,
            indirect: &self.history_indirect,
            moment: &self.history_moment,
            length: &self.history_length,
        }
    }
}
