use glam::{vec4, Vec2, Vec3, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::Normal;

/// Per-pixel geometry data produced by the rasterization stage.
#[derive(Clone, Copy, Default)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct GBufferEntry {
    pub normal: Vec3,

    /// Depth of the surface; zero marks background (sky).
    pub depth: f32,

    /// Depth of the same surface as seen from the previous frame's camera.
    pub prev_depth: f32,

    /// Screen-space derivatives of depth.
    pub depth_gradient: Vec2,

    /// Position of the same surface on the previous frame's screen, in
    /// normalized device coordinates.
    pub prev_ndc: Vec2,
}

impl GBufferEntry {
    pub fn unpack([d0, d1]: [Vec4; 2]) -> Self {
        Self {
            normal: Normal::decode(d0.xy()),
            depth: d0.z,
            prev_depth: d0.w,
            depth_gradient: d1.xy(),
            prev_ndc: d1.zw(),
        }
    }

    pub fn pack(self) -> [Vec4; 2] {
        let normal = Normal::encode(self.normal);

        let d0 = vec4(normal.x, normal.y, self.depth, self.prev_depth);

        let d1 = vec4(
            self.depth_gradient.x,
            self.depth_gradient.y,
            self.prev_ndc.x,
            self.prev_ndc.y,
        );

        [d0, d1]
    }

    pub fn is_sky(&self) -> bool {
        self.depth == 0.0
    }

    /// Returns how much depth is allowed to change between neighbouring
    /// pixels of this surface.
    pub fn max_depth_change(&self) -> f32 {
        self.depth_gradient.x.abs().max(self.depth_gradient.y.abs())
    }
}

/// Read-only view over the packed G-buffer.
#[derive(Clone, Copy)]
pub struct GBufferMap<'a> {
    pub d0: &'a [Vec4],
    pub d1: &'a [Vec4],
}

impl<'a> GBufferMap<'a> {
    pub fn new(d0: &'a [Vec4], d1: &'a [Vec4]) -> Self {
        Self { d0, d1 }
    }

    pub fn get(&self, idx: usize) -> GBufferEntry {
        GBufferEntry::unpack([self.d0[idx], self.d1[idx]])
    }

    /// Returns the packed normal-and-depth of given pixel, in the same format
    /// history keeps it.
    pub fn normal_and_depth(&self, idx: usize) -> Vec4 {
        self.d0[idx]
    }
}
